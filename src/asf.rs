use crate::fetch::Fetcher;
use crate::netrc::CredentialStore;
use crate::search_results::SearchResults;
use anyhow::Result;
use std::path::Path;

/// Host the credentials are registered against; ASF redirects here for login.
pub const EARTHDATA_HOST: &str = "urs.earthdata.nasa.gov";

/// Download every Sentinel-1 SLC granule listed in an ASF datapool search
/// result.
///
/// Reads the geojson metadata, registers the Earthdata login, and hands the
/// full url list to the fetcher in one call. A missing or malformed metadata
/// file fails the operation before the credentials are registered and before
/// any transfer is attempted; transfer failures propagate unrecovered.
pub async fn download_slc(
    store: &mut impl CredentialStore,
    fetcher: &impl Fetcher,
    asf_file: &Path,
    folder_out: &Path,
    username: &str,
    password: &str,
) -> Result<()> {
    let results = SearchResults::read(asf_file)?;
    let urls = results.urls()?;

    store.register(EARTHDATA_HOST, username, password)?;

    fetcher.fetch_all(&urls, folder_out).await?;

    println!(
        "✅ Download complete. Files saved to {}",
        folder_out.display()
    );
    Ok(())
}
