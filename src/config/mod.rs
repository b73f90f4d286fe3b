//! Configuration for the analysis engine.
//!
//! Settings are read from `.cognalyze.toml`, found by walking up from the
//! working directory. Every field has a default, so an empty or missing file
//! yields a fully usable configuration.

mod core;
mod loader;
pub mod retry;

pub use self::core::{CognalyzeConfig, RemoteConfig, DEFAULT_LANGUAGES};
pub use loader::{
    find_config_file, load_config, load_config_file, load_config_from, parse_and_validate_config,
    CONFIG_FILE_NAME,
};
pub use retry::{Backoff, RetryConfig};

/// Environment variables consulted, in order, for the remote credential.
pub const CREDENTIAL_ENV_VARS: [&str; 2] = ["COGNALYZE_API_KEY", "GEMINI_API_KEY"];

/// Resolve the remote credential: explicit value first, then the environment.
///
/// Blank values are treated as absent.
pub fn resolve_credential(explicit: Option<&str>) -> Option<String> {
    resolve_credential_with(explicit, |name| std::env::var(name).ok())
}

pub(crate) fn resolve_credential_with<F>(explicit: Option<&str>, lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    explicit
        .map(str::to_string)
        .into_iter()
        .chain(CREDENTIAL_ENV_VARS.iter().filter_map(|name| lookup(name)))
        .find(|value| !value.trim().is_empty())
}
