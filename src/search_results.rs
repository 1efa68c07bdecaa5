use crate::error::MetadataError;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use url::Url;

/// An ASF datapool search result, one feature per granule.
#[derive(Deserialize, Debug)]
pub struct SearchResults {
    #[serde(rename = "type")]
    kind: String,
    features: Vec<Feature>,
}

#[derive(Deserialize, Debug)]
struct Feature {
    properties: Properties,
}

#[derive(Deserialize, Debug)]
struct Properties {
    url: Option<String>,
    #[serde(rename = "fileName")]
    file_name: Option<String>,
    #[serde(rename = "sceneName")]
    scene_name: Option<String>,
}

impl SearchResults {
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, MetadataError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(MetadataError::NotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        let results: Self = serde_json::from_str(&content)?;
        if results.kind != "FeatureCollection" {
            return Err(MetadataError::NotFeatureCollection(results.kind));
        }
        Ok(results)
    }

    /// Granule urls in file order. Every feature must carry a parseable
    /// `url` attribute.
    pub fn urls(&self) -> Result<Vec<Url>, MetadataError> {
        self.features
            .iter()
            .enumerate()
            .map(|(index, feature)| {
                let raw = feature
                    .properties
                    .url
                    .as_deref()
                    .ok_or(MetadataError::MissingUrl(index))?;
                Url::parse(raw).map_err(|source| MetadataError::InvalidUrl { index, source })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_GRANULES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": {"type": "Polygon", "coordinates": [[[139.1, 35.2], [139.8, 35.2], [139.8, 36.0], [139.1, 36.0], [139.1, 35.2]]]},
                "properties": {
                    "url": "https://datapool.asf.alaska.edu/SLC/SA/S1A_IW_SLC__1SDV_20240116.zip",
                    "fileName": "S1A_IW_SLC__1SDV_20240116.zip",
                    "sceneName": "S1A_IW_SLC__1SDV_20240116"
                }
            },
            {
                "type": "Feature",
                "geometry": null,
                "properties": {
                    "url": "https://datapool.asf.alaska.edu/SLC/SA/S1A_IW_SLC__1SDV_20240128.zip",
                    "fileName": "S1A_IW_SLC__1SDV_20240128.zip",
                    "sceneName": "S1A_IW_SLC__1SDV_20240128"
                }
            }
        ]
    }"#;

    fn write_fixture(path: &str, content: &str) -> std::path::PathBuf {
        let path = std::path::PathBuf::from(path);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_read_geojson() {
        let path = write_fixture("/tmp/asf-fetch-read.geojson", TWO_GRANULES);
        let results = SearchResults::read(&path).unwrap();
        assert_eq!(results.features.len(), 2);
    }

    #[test]
    fn test_urls_in_file_order() {
        let path = write_fixture("/tmp/asf-fetch-order.geojson", TWO_GRANULES);
        let results = SearchResults::read(&path).unwrap();
        let urls = results.urls().unwrap();
        assert_eq!(
            urls.iter().map(Url::as_str).collect::<Vec<_>>(),
            vec![
                "https://datapool.asf.alaska.edu/SLC/SA/S1A_IW_SLC__1SDV_20240116.zip",
                "https://datapool.asf.alaska.edu/SLC/SA/S1A_IW_SLC__1SDV_20240128.zip",
            ]
        );
    }

    #[test]
    fn test_missing_file() {
        let result = SearchResults::read("/tmp/asf-fetch-no-such-file.geojson");
        assert!(matches!(result, Err(MetadataError::NotFound(_))));
    }

    #[test]
    fn test_not_a_feature_collection() {
        let path = write_fixture(
            "/tmp/asf-fetch-wrong-kind.geojson",
            r#"{"type": "Feature", "features": []}"#,
        );
        let result = SearchResults::read(&path);
        assert!(matches!(result, Err(MetadataError::NotFeatureCollection(_))));
    }

    #[test]
    fn test_malformed_json() {
        let path = write_fixture("/tmp/asf-fetch-malformed.geojson", "not geojson at all");
        let result = SearchResults::read(&path);
        assert!(matches!(result, Err(MetadataError::Parse(_))));
    }

    #[test]
    fn test_feature_without_url() {
        let path = write_fixture(
            "/tmp/asf-fetch-no-url.geojson",
            r#"{
                "type": "FeatureCollection",
                "features": [
                    {"properties": {"url": "https://datapool.asf.alaska.edu/a.zip"}},
                    {"properties": {"fileName": "b.zip"}}
                ]
            }"#,
        );
        let results = SearchResults::read(&path).unwrap();
        let result = results.urls();
        assert!(matches!(result, Err(MetadataError::MissingUrl(1))));
    }

    #[test]
    fn test_feature_with_invalid_url() {
        let path = write_fixture(
            "/tmp/asf-fetch-bad-url.geojson",
            r#"{
                "type": "FeatureCollection",
                "features": [{"properties": {"url": "not a url"}}]
            }"#,
        );
        let results = SearchResults::read(&path).unwrap();
        let result = results.urls();
        assert!(matches!(result, Err(MetadataError::InvalidUrl { index: 0, .. })));
    }
}
