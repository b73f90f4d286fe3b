use crate::config::CONFIG_FILE_NAME;
use crate::io;
use anyhow::Result;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG: &str = r#"# Cognalyze Configuration

# Master switch for analysis
enabled = true

# Re-analyze on every change (debounced)
real_time = true
analysis_delay_ms = 1000

# How long a cached result stays fresh
cache_ttl_ms = 30000

supported_languages = ["javascript", "typescript", "python", "java", "csharp", "cpp", "c"]

# Overall score boundaries: <= low is low, <= medium is medium, above is high
[thresholds]
low = 10
medium = 20
high = 30

# The API credential is read from COGNALYZE_API_KEY or GEMINI_API_KEY
[remote]
endpoint = "https://generativelanguage.googleapis.com/v1beta"
model = "gemini-pro"
timeout_secs = 30

[remote.retry]
enabled = false
max_retries = 2
base_delay_ms = 250
max_delay_ms = 5000
backoff = "exponential"
"#;

pub fn init_config(force: bool) -> Result<()> {
    let path = init_config_in(Path::new("."), force)?;
    println!("Created {} configuration file", path.display());
    Ok(())
}

/// Write the default configuration into `dir`, returning the file path.
pub fn init_config_in(dir: &Path, force: bool) -> Result<PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    io::write_config(&config_path, DEFAULT_CONFIG, force)?;
    Ok(config_path)
}
