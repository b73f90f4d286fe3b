//! CLI command implementations.
//!
//! - **analyze**: analyze a file once and print the report
//! - **watch**: re-analyze a file on every change until interrupted
//! - **init**: write a default `.cognalyze.toml`

pub mod analyze;
pub mod init;
pub mod watch;

pub use analyze::analyze_file;
pub use init::init_config;
pub use watch::watch_file;

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use crate::cli::{infer_language, AnalysisArgs};
use crate::clock::TokioClock;
use crate::complexity::ThresholdSet;
use crate::config::{load_config, load_config_file, resolve_credential, CognalyzeConfig};
use crate::remote::{AnalysisBackend, GeminiClient, OfflineBackend};
use crate::service::AnalysisService;

/// Configuration for a command: explicit file or discovered, then CLI overrides.
pub(crate) fn load_settings(args: &AnalysisArgs) -> Result<CognalyzeConfig> {
    let mut config = match &args.config {
        Some(path) => load_config_file(path)?,
        None => load_config(),
    };
    if let Some(preset) = args.threshold_preset {
        config.thresholds = ThresholdSet::from_preset(preset.into());
    }
    Ok(config)
}

pub(crate) fn resolve_language(args: &AnalysisArgs) -> Result<String> {
    match &args.language {
        Some(language) => Ok(language.clone()),
        None => infer_language(&args.path)
            .map(str::to_string)
            .with_context(|| {
                format!(
                    "Cannot infer the language of {}; pass --language",
                    args.path.display()
                )
            }),
    }
}

/// Check the language against the configuration before any work is done.
pub(crate) fn ensure_analyzable(config: &CognalyzeConfig, language: &str) -> Result<()> {
    if !config.enabled {
        anyhow::bail!("Analysis is disabled in configuration (enabled = false)");
    }
    if !config.supports(language) {
        anyhow::bail!("Language {language} is not supported for complexity analysis");
    }
    Ok(())
}

pub(crate) fn build_service(config: CognalyzeConfig, args: &AnalysisArgs) -> Result<AnalysisService> {
    let backend: Arc<dyn AnalysisBackend> = if args.offline {
        Arc::new(OfflineBackend)
    } else {
        Arc::new(GeminiClient::new(&config.remote)?)
    };

    let service = AnalysisService::new(config, backend, TokioClock::shared());
    if !args.offline {
        let credential = resolve_credential(args.api_key.as_deref());
        if credential.is_none() {
            info!("No API credential found; using the local heuristic");
        }
        service.set_credential(credential);
    }
    Ok(service)
}
