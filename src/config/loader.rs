use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::core::CognalyzeConfig;
use crate::complexity::ThresholdSet;
use crate::core::errors::{Error, Result, ResultExt};

pub const CONFIG_FILE_NAME: &str = ".cognalyze.toml";

/// Directories inspected when searching upwards, the start included.
const SEARCH_DEPTH: usize = 10;

/// Parse TOML contents into a configuration.
///
/// Syntax and type errors are returned. A threshold set that is not strictly
/// increasing is replaced by the default set with a warning.
pub fn parse_and_validate_config(contents: &str) -> Result<CognalyzeConfig> {
    let mut config: CognalyzeConfig = toml::from_str(contents)?;

    if let Err(e) = config.thresholds.validate() {
        warn!(error = %e, "ignoring configured thresholds, using defaults");
        config.thresholds = ThresholdSet::default();
    }

    Ok(config)
}

/// Load a specific config file. Any failure is an error.
pub fn load_config_file(path: &Path) -> Result<CognalyzeConfig> {
    let contents = fs::read_to_string(path).map_err(|e| Error::config_file(path, e))?;
    let config = parse_and_validate_config(&contents).context(path.display().to_string())?;
    debug!(path = %path.display(), "configuration loaded");
    Ok(config)
}

/// Nearest `.cognalyze.toml` at or above `start`.
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .take(SEARCH_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}

/// Load the nearest config file, falling back to defaults when there is none
/// or it cannot be used.
pub fn load_config_from(start: &Path) -> CognalyzeConfig {
    let Some(path) = find_config_file(start) else {
        debug!(start = %start.display(), "no {CONFIG_FILE_NAME} found, using defaults");
        return CognalyzeConfig::default();
    };

    load_config_file(&path).unwrap_or_else(|e| {
        warn!("{e}. Using default configuration.");
        CognalyzeConfig::default()
    })
}

/// [`load_config_from`] the working directory.
pub fn load_config() -> CognalyzeConfig {
    match std::env::current_dir() {
        Ok(dir) => load_config_from(&dir),
        Err(e) => {
            warn!(error = %e, "cannot determine working directory, using default configuration");
            CognalyzeConfig::default()
        }
    }
}
