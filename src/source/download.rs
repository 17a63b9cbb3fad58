//! Snapshot archive download

use std::io::{Seek, SeekFrom, Write};
use std::path::Path;
use std::time::Duration;

use tempfile::NamedTempFile;

use crate::error::{Result, source};

/// Streams a remote archive into a writer
pub trait ArchiveFetcher: Send + Sync {
    /// Write the body at `url` into `out`, returning the byte count
    fn fetch(&self, url: &str, out: &mut dyn Write) -> Result<u64>;
}

/// Blocking HTTP fetcher
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("ars-installer/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl ArchiveFetcher for HttpFetcher {
    fn fetch(&self, url: &str, out: &mut dyn Write) -> Result<u64> {
        let mut response = self
            .client
            .get(url)
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .map_err(|e| source::download_failed(url, e.to_string()))?;
        response
            .copy_to(out)
            .map_err(|e| source::download_failed(url, e.to_string()))
    }
}

/// Download `url` into a temporary file inside `dir`
///
/// The file is named after `file_name` and removed when the returned handle
/// drops, whatever happens to the extraction afterwards.
pub fn download_to_temp(
    fetcher: &dyn ArchiveFetcher,
    url: &str,
    dir: &Path,
    file_name: &str,
) -> Result<NamedTempFile> {
    let (prefix, suffix) = match file_name.rsplit_once('.') {
        Some((stem, ext)) => (format!("{stem}-"), format!(".{ext}")),
        None => (format!("{file_name}-"), String::new()),
    };
    let mut file = tempfile::Builder::new()
        .prefix(&prefix)
        .suffix(&suffix)
        .tempfile_in(dir)?;

    let bytes = fetcher.fetch(url, file.as_file_mut())?;
    file.as_file_mut().flush()?;
    file.as_file_mut().seek(SeekFrom::Start(0))?;
    tracing::info!(url, bytes, path = %file.path().display(), "downloaded archive");
    Ok(file)
}
