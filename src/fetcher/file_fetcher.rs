use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use url::Url;

use crate::app::{LecternError, Result};
use crate::fetcher::Fetcher;

/// Reads articles from the local filesystem.
///
/// Accepts plain paths and `file://` URLs. A missing file is reported the
/// way a static file server would report it, as status 404.
#[derive(Debug, Default, Clone)]
pub struct FileFetcher;

impl FileFetcher {
    pub fn new() -> Self {
        Self
    }

    fn to_path(url: &str) -> Result<PathBuf> {
        if url.starts_with("file:") {
            let parsed = Url::parse(url)?;
            return parsed
                .to_file_path()
                .map_err(|_| LecternError::Other(format!("Not a local file URL: {}", url)));
        }
        Ok(PathBuf::from(url))
    }
}

#[async_trait]
impl Fetcher for FileFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        let path = Self::to_path(url)?;
        tracing::debug!("Reading {}", path.display());

        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(LecternError::Status {
                status: 404,
                url: url.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }
}
