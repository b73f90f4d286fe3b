use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThresholdPreset {
    /// Flag complexity early
    Strict,
    /// Default boundaries
    Balanced,
    /// For legacy or inherently complex code
    Lenient,
}

impl From<ThresholdPreset> for crate::complexity::ThresholdPreset {
    fn from(preset: ThresholdPreset) -> Self {
        match preset {
            ThresholdPreset::Strict => Self::Strict,
            ThresholdPreset::Balanced => Self::Balanced,
            ThresholdPreset::Lenient => Self::Lenient,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Terminal,
}

impl From<OutputFormat> for crate::io::output::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => Self::Json,
            OutputFormat::Terminal => Self::Terminal,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "cognalyze")]
#[command(about = "Code complexity and cognitive load analyzer", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG takes precedence
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a source file once
    Analyze(AnalysisArgs),

    /// Re-analyze a source file whenever it changes
    Watch {
        #[command(flatten)]
        args: AnalysisArgs,

        /// How often to check the file for changes, in milliseconds
        #[arg(
            long = "poll-interval",
            default_value = "500",
            value_parser = clap::value_parser!(u64).range(1..)
        )]
        poll_interval_ms: u64,
    },

    /// Write a default .cognalyze.toml in the current directory
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Args, Debug, Clone)]
pub struct AnalysisArgs {
    /// Source file to analyze
    pub path: PathBuf,

    /// Language identifier (inferred from the file extension when omitted)
    #[arg(short, long)]
    pub language: Option<String>,

    /// Remote analysis credential (falls back to COGNALYZE_API_KEY, then GEMINI_API_KEY)
    #[arg(long = "api-key")]
    pub api_key: Option<String>,

    /// Skip remote analysis and use the local heuristic
    #[arg(long)]
    pub offline: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "terminal")]
    pub format: OutputFormat,

    /// Configuration file (defaults to the nearest .cognalyze.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Severity threshold preset, overriding the configured thresholds
    #[arg(long = "threshold-preset", value_enum)]
    pub threshold_preset: Option<ThresholdPreset>,
}

/// Map a file extension to a language identifier.
pub fn infer_language(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    let language = match extension.as_str() {
        "js" | "jsx" | "mjs" | "cjs" => "javascript",
        "ts" | "tsx" | "mts" | "cts" => "typescript",
        "py" | "pyw" => "python",
        "java" => "java",
        "cs" => "csharp",
        "cpp" | "cc" | "cxx" | "hpp" | "hh" | "hxx" => "cpp",
        "c" | "h" => "c",
        _ => return None,
    };
    Some(language)
}
