//! Errors raised while setting up analysis: configuration files and their
//! validation. Analysis itself never fails; remote failures have their own
//! type in [`crate::remote::RemoteError`].

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot read config file {}", path.display())]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// Values that parse but break an invariant, e.g. unordered thresholds
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("{context}: {message}")]
    WithContext { context: String, message: String },
}

impl Error {
    pub fn config_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ConfigFile {
            path: path.into(),
            source,
        }
    }

    /// Prefix the rendered error with `context`.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            message: self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

pub trait ResultExt<T> {
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}
