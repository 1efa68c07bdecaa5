use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("Metadata file not found: {0}")]
    NotFound(PathBuf),
    #[error("Unable to read metadata file")]
    Io(#[from] std::io::Error),
    #[error("Unable to parse metadata file as geojson")]
    Parse(#[from] serde_json::Error),
    #[error("Expected a FeatureCollection, found '{0}'")]
    NotFeatureCollection(String),
    #[error("Feature {0} has no url attribute")]
    MissingUrl(usize),
    #[error("Feature {index} has an invalid url")]
    InvalidUrl {
        index: usize,
        #[source]
        source: url::ParseError,
    },
}
