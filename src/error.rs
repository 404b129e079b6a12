use thiserror::Error;

/// Errors surfaced by the card stack engines and their host plumbing
#[derive(Debug, Error)]
pub enum Error {
    /// Construction-time rejection of options that would yield undefined indices or timing
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The embedded content catalog is missing or malformed
    #[error("content catalog: {0}")]
    Content(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidConfiguration(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
