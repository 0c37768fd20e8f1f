//! CLI argument definitions for ig-indexer.

use clap::{Parser, ValueEnum};

/// Generate index.html directory listings for an S3 prefix.
///
/// Lists every object under the prefix, rebuilds the directory hierarchy from
/// the object keys and renders one index page per directory. Without
/// `--upload` nothing is written; the pages that would be uploaded are logged.
///
/// A directory containing a `.noindex` object is never indexed.
///
/// ## Examples
///
/// Dry run over a whole bucket:
///   ig-indexer -b my-bucket
///
/// Index and upload a subtree:
///   ig-indexer -b my-bucket --prefix releases/ --upload
///
/// Against LocalStack, with a JSON report on stdout:
///   ig-indexer -b my-bucket --s3-endpoint http://localhost:4566 --report json
#[derive(Parser, Debug)]
#[command(name = "ig-indexer")]
#[command(version, about, long_about = None)]
pub struct Cli {
    // === S3 Configuration ===
    /// S3 bucket name
    #[arg(short, long, env = "IG_S3_BUCKET")]
    pub bucket: String,

    /// Prefix to scan; only directories under it are indexed
    #[arg(short, long, env = "IG_S3_PREFIX", default_value = "")]
    pub prefix: String,

    /// Custom S3 endpoint URL (for LocalStack)
    #[arg(long, env = "IG_S3_ENDPOINT")]
    pub s3_endpoint: Option<String>,

    /// AWS region
    #[arg(long, env = "AWS_REGION", default_value = "us-east-1")]
    pub region: String,

    /// AWS access key ID
    #[arg(long, env = "AWS_ACCESS_KEY_ID")]
    pub access_key: Option<String>,

    /// AWS secret access key
    #[arg(long, env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,

    /// AWS profile name
    #[arg(long, env = "AWS_PROFILE")]
    pub profile: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "30")]
    pub timeout: u64,

    // === Indexing Options ===
    /// Upload generated index pages (default is a dry run)
    #[arg(long)]
    pub upload: bool,

    /// Maximum retries for each list or upload request
    #[arg(long, default_value = "3")]
    pub max_retries: u32,

    // === Output Options ===
    /// Run report format
    #[arg(long, value_enum, default_value = "text")]
    pub report: ReportFormat,

    // === Logging Options ===
    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

/// Run report format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable summary on stderr
    Text,
    /// JSON document on stdout
    Json,
}

/// Log level argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    /// Trace level (most verbose)
    Trace,
    /// Debug level
    Debug,
    /// Info level (default)
    Info,
    /// Warning level
    Warn,
    /// Error level (least verbose)
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}
