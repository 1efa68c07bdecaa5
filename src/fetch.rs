//! Sequential https transfer of granules into an output folder
use crate::asf::EARTHDATA_HOST;
use crate::netrc::{Machine, Netrc};
use anyhow::{anyhow, Result};
use futures_util::StreamExt;
use reqwest::{Client, RequestBuilder, StatusCode};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use url::Url;

/// Transfers a batch of remote files into a destination folder.
pub trait Fetcher {
    async fn fetch_all(&self, urls: &[Url], folder_out: &Path) -> Result<()>;
}

pub struct HttpFetcher {
    client: Client,
    netrc_path: PathBuf,
}

impl HttpFetcher {
    pub fn new(netrc_path: PathBuf) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self { client, netrc_path })
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch_all(&self, urls: &[Url], folder_out: &Path) -> Result<()> {
        if !folder_out.exists() {
            fs::create_dir_all(folder_out)?;
        }

        // The netrc is re-read here so registrations made earlier in the
        // process are picked up
        let netrc = Netrc::load(&self.netrc_path)?;
        let auth = netrc.machine(EARTHDATA_HOST);

        for url in urls {
            println!("Current file: {}", url);
            try_fetch(&self.client, url, folder_out, auth).await?;
        }
        Ok(())
    }
}

pub async fn try_fetch(
    client: &Client,
    url: &Url,
    folder_out: &Path,
    auth: Option<&Machine>,
) -> Result<()> {
    let file_name = file_name_from_url(url)?;

    // Check if the output file already exists; return early if so
    let dst = folder_out.join(&file_name);
    if dst.exists() {
        println!("Output file already exists");
        return Ok(());
    }

    // Check if partial file exists and get its size
    let partial = folder_out.join(format!("{}.partial", file_name));
    let mut partial_file = OpenOptions::new()
        .read(true)
        .create(true)
        .append(true)
        .open(&partial)?;
    let mut byte_count = partial_file.metadata()?.len();

    // Ask the server for the total transfer size. The Content-Length header
    // is read directly; Response::content_length() reports the body size,
    // which is zero for a HEAD response.
    let head = authorize(client.head(url.clone()), auth)
        .send()
        .await?
        .error_for_status()?;
    let total_size = head
        .headers()
        .get(reqwest::header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<u64>().ok());

    match total_size {
        Some(total_size) => {
            let progress = (byte_count as f64 / total_size as f64) * 100.;
            if progress > 0.0 {
                println!("Resuming download from {:.2}% completion", progress);
            }

            if byte_count < total_size {
                println!("Downloading...");
                let range = format!("bytes={}-{}", byte_count, total_size - 1);

                let response = authorize(client.get(url.clone()), auth)
                    .header(reqwest::header::RANGE, range)
                    .send()
                    .await?
                    .error_for_status()?;

                // A server that ignores the Range request sends the whole body
                if response.status() != StatusCode::PARTIAL_CONTENT && byte_count > 0 {
                    partial_file.set_len(0)?;
                    byte_count = 0;
                }

                let mut stream = response.bytes_stream();
                while let Some(bytes) = stream.next().await {
                    let bytes = bytes?;
                    let bytes_len = bytes.len() as u64;
                    partial_file.write_all(&bytes)?;
                    byte_count += bytes_len;
                }
            }
        }
        None => {
            // No size reported, so there is no resume baseline; restart
            println!("Downloading...");
            partial_file.set_len(0)?;

            let response = authorize(client.get(url.clone()), auth)
                .send()
                .await?
                .error_for_status()?;

            let mut stream = response.bytes_stream();
            while let Some(bytes) = stream.next().await {
                partial_file.write_all(&bytes?)?;
            }
        }
    }

    println!("Download complete");
    // Rename the file to remove .partial suffix
    fs::rename(partial, dst)?;

    Ok(())
}

fn authorize(request: RequestBuilder, auth: Option<&Machine>) -> RequestBuilder {
    match auth {
        Some(machine) => request.basic_auth(&machine.login, Some(&machine.password)),
        None => request,
    }
}

fn file_name_from_url(url: &Url) -> Result<String> {
    let file_name = url
        .path_segments()
        .and_then(|segments| segments.last())
        .filter(|name| !name.is_empty())
        .ok_or(anyhow!("No file name in url: {}", url))?;
    Ok(file_name.to_string())
}
