use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use asf_fetch::asf;
use asf_fetch::fetch::HttpFetcher;
use asf_fetch::netrc::Netrc;

/// Bulk-download Sentinel-1 SLC granules from an ASF datapool search result
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// ASF datapool search results (geojson)
    asf_file: PathBuf,

    /// Directory to save the downloaded granules
    folder_out: PathBuf,

    /// Earthdata login username
    #[arg(short, long)]
    username: String,

    /// Earthdata login password
    #[arg(short, long)]
    password: String,

    /// Netrc file to register the credentials in (defaults to ~/.netrc)
    #[arg(long)]
    netrc: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let netrc_path = match cli.netrc {
        Some(path) => path,
        None => Netrc::default_path()?,
    };

    let mut store = Netrc::load(&netrc_path)?;
    let fetcher = HttpFetcher::new(netrc_path)?;

    asf::download_slc(
        &mut store,
        &fetcher,
        &cli.asf_file,
        &cli.folder_out,
        &cli.username,
        &cli.password,
    )
    .await
}
