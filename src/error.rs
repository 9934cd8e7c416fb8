use std::path::PathBuf;

use thiserror::Error;

/// Failures when resolving the survey source, before any data is read.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("not a valid path: {0:?}")]
    InvalidPath(String),

    #[error("file {} does not exist", .0.display())]
    NotFound(PathBuf),

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),
}

/// Failures when loading or validating the pipeline configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {}", .0.join("; "))]
    Invalid(Vec<String>),
}
