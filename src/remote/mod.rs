//! Remote analysis: prompt construction, the HTTP call, and turning a
//! free-text reply into [`RawMetrics`].

pub mod error;
pub mod extract;
pub mod gemini;
pub mod prompt;

pub use error::{RemoteError, RemoteErrorKind};
pub use extract::{extract_json_object, parse_reply};
pub use gemini::GeminiClient;
pub use prompt::build_prompt;

use async_trait::async_trait;

use crate::normalizer::RawMetrics;

/// Source of externally computed metrics.
///
/// Implementations must fail with [`RemoteError::Configuration`] before any
/// network activity when the credential is absent or blank.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    async fn analyze(
        &self,
        source: &str,
        language: &str,
        credential: Option<&str>,
    ) -> Result<RawMetrics, RemoteError>;
}

/// Backend for offline use: always reports that it is not configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineBackend;

#[async_trait]
impl AnalysisBackend for OfflineBackend {
    async fn analyze(
        &self,
        _source: &str,
        _language: &str,
        _credential: Option<&str>,
    ) -> Result<RawMetrics, RemoteError> {
        Err(RemoteError::Configuration("remote analysis disabled".into()))
    }
}

/// Reject absent or blank credentials.
pub fn require_credential(credential: Option<&str>) -> Result<&str, RemoteError> {
    credential
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| RemoteError::Configuration("no API credential provided".into()))
}
