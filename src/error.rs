use thiserror::Error;

/// Why a single catalog request failed. The feed treats every variant the
/// same way: the page is dropped from its batch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("unexpected status {0}")]
    BadStatus(u16),

    #[error("could not decode response: {0}")]
    Decode(String),
}

#[derive(Error, Debug)]
pub enum MarqueeError {
    #[error("API error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MarqueeError>;
