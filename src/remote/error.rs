use std::fmt;
use thiserror::Error;

/// Failure modes of a remote analysis attempt.
///
/// None of these reach callers of the orchestrator; every variant triggers the
/// local heuristic instead.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// No usable credential; raised before any network attempt
    #[error("remote analysis is not configured: {0}")]
    Configuration(String),

    /// The call itself failed (connection, timeout, HTTP status, envelope)
    #[error("remote call failed: {0}")]
    Transport(String),

    /// The reply held no JSON object
    #[error("no JSON object in remote reply: {0}")]
    Extraction(String),

    /// The extracted object was not valid JSON
    #[error("malformed JSON in remote reply: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Field-friendly tag for a [`RemoteError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteErrorKind {
    Configuration,
    Transport,
    Extraction,
    Parse,
}

impl fmt::Display for RemoteErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RemoteErrorKind::Configuration => "configuration",
            RemoteErrorKind::Transport => "transport",
            RemoteErrorKind::Extraction => "extraction",
            RemoteErrorKind::Parse => "parse",
        };
        f.write_str(s)
    }
}

impl RemoteError {
    pub fn kind(&self) -> RemoteErrorKind {
        match self {
            RemoteError::Configuration(_) => RemoteErrorKind::Configuration,
            RemoteError::Transport(_) => RemoteErrorKind::Transport,
            RemoteError::Extraction(_) => RemoteErrorKind::Extraction,
            RemoteError::Parse(_) => RemoteErrorKind::Parse,
        }
    }

    /// Only transport failures are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, RemoteError::Transport(_))
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        RemoteError::Transport(err.to_string())
    }
}
