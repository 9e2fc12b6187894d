pub mod file_fetcher;
pub mod http_fetcher;
pub mod resolve;

use async_trait::async_trait;

use crate::app::{LecternError, Result};
use crate::fetcher::file_fetcher::FileFetcher;
use crate::fetcher::http_fetcher::HttpFetcher;

pub use resolve::resolve;
use resolve::url_scheme;

#[async_trait]
pub trait Fetcher {
    /// Fetch `url` and return its full body as text.
    ///
    /// A response without a success status is an error carrying that status.
    async fn fetch_text(&self, url: &str) -> Result<String>;
}

/// Sends web URLs over HTTP and local paths to the filesystem.
pub struct DefaultFetcher {
    http: HttpFetcher,
    file: FileFetcher,
}

impl DefaultFetcher {
    pub fn new() -> Result<Self> {
        Ok(Self {
            http: HttpFetcher::new()?,
            file: FileFetcher::new(),
        })
    }
}

#[async_trait]
impl Fetcher for DefaultFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        match route(url)? {
            Route::Http if url.starts_with("//") => {
                self.http.fetch_text(&format!("https:{}", url)).await
            }
            Route::Http => self.http.fetch_text(url).await,
            Route::File => self.file.fetch_text(url).await,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Route {
    Http,
    File,
}

/// Web URLs go over HTTP, `file://` URLs and plain paths to the filesystem.
/// Any other scheme is refused rather than read as a local path.
fn route(url: &str) -> Result<Route> {
    if url.starts_with("//") {
        return Ok(Route::Http);
    }
    match url_scheme(url) {
        None => Ok(Route::File),
        Some(scheme) if scheme.eq_ignore_ascii_case("file") => Ok(Route::File),
        Some(scheme)
            if scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https") =>
        {
            Ok(Route::Http)
        }
        Some(scheme) => Err(LecternError::Other(format!(
            "Unsupported URL scheme: {}",
            scheme
        ))),
    }
}
