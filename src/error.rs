use thiserror::Error;

/// Errors reported by a word source
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SourceError {
    /// The source has not finished initializing; the caller should retry
    #[error("word source is not ready yet")]
    NotReady,
    #[error("word source failed: {0}")]
    Backend(String),
}

impl From<rusqlite::Error> for SourceError {
    fn from(e: rusqlite::Error) -> Self {
        SourceError::Backend(e.to_string())
    }
}

/// Failures surfaced by the session controller when a session cannot start
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DrillError {
    #[error("word source unavailable after {attempts} attempts")]
    SourceUnavailable { attempts: u32 },
    #[error("cannot load words: the catalog is empty")]
    EmptyCatalog,
}

/// Errors from the persisted-state storage medium
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("state store i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not encode session state: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Audio or speech playback failure. Always recovered locally.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("feedback playback failed: {0}")]
pub struct FeedbackError(pub String);
