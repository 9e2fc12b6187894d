use thiserror::Error;

#[derive(Error, Debug)]
pub enum LecternError {
    #[error("Failed to load article: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to load article (status {status})")]
    Status { status: u16, url: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("Unable to display the article: {0}")]
    Load(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, LecternError>;
