//! HTTP client for the Gemini `generateContent` API.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::RemoteError;
use super::extract::parse_reply;
use super::prompt::build_prompt;
use super::{require_credential, AnalysisBackend};
use crate::config::{RemoteConfig, RetryConfig};
use crate::normalizer::RawMetrics;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Longest slice of an error body kept in a transport error.
const ERROR_BODY_LIMIT: usize = 200;

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

impl<'a> GenerateContentRequest<'a> {
    fn new(prompt: &'a str) -> Self {
        Self {
            contents: [RequestContent {
                parts: [RequestPart { text: prompt }],
            }],
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ReplyPart>,
}

#[derive(Debug, Deserialize)]
struct ReplyPart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate.
    fn into_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

/// Remote analysis backed by a Gemini-compatible endpoint.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    url: String,
    retry: RetryConfig,
}

impl GeminiClient {
    pub fn new(config: &RemoteConfig) -> Result<Self, RemoteError> {
        let mut builder =
            reqwest::Client::builder().timeout(Duration::from_secs(config.timeout_secs));
        if !config.system_proxy {
            builder = builder.no_proxy();
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            url: format!(
                "{}/models/{}:generateContent",
                config.endpoint.trim_end_matches('/'),
                config.model
            ),
            retry: config.retry.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn send_once(&self, prompt: &str, credential: &str) -> Result<String, RemoteError> {
        let response = self
            .http
            .post(&self.url)
            .header(API_KEY_HEADER, credential)
            .json(&GenerateContentRequest::new(prompt))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail: String = body.chars().take(ERROR_BODY_LIMIT).collect();
            return Err(RemoteError::Transport(format!("HTTP {status}: {detail}")));
        }

        let envelope: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| RemoteError::Transport(format!("undecodable response envelope: {e}")))?;

        envelope
            .into_text()
            .ok_or_else(|| RemoteError::Extraction("reply carried no candidate text".into()))
    }

    async fn send_with_retry(&self, prompt: &str, credential: &str) -> Result<String, RemoteError> {
        let mut delays = self.retry.delays();
        loop {
            match self.send_once(prompt, credential).await {
                Err(err) if err.is_retryable() => {
                    let Some(delay) = delays.next() else {
                        return Err(err);
                    };
                    debug!(?delay, error = %err, "retrying remote analysis");
                    tokio::time::sleep(delay).await;
                }
                outcome => return outcome,
            }
        }
    }
}

#[async_trait]
impl AnalysisBackend for GeminiClient {
    async fn analyze(
        &self,
        source: &str,
        language: &str,
        credential: Option<&str>,
    ) -> Result<RawMetrics, RemoteError> {
        let credential = require_credential(credential)?;
        let prompt = build_prompt(source, language);
        let reply = self.send_with_retry(&prompt, credential).await?;
        parse_reply(&reply)
    }
}
