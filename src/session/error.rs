use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Invalid URL '{value}': {reason}")]
    InvalidUrl { value: String, reason: String },

    #[error("Target URL is required before starting a run")]
    MissingUrl,

    #[error("Wordlist {} does not exist or cannot be read", .path.display())]
    UnreadableWordlist { path: PathBuf },

    #[error("Invalid HTTP method '{0}'")]
    InvalidMethod(String),

    #[error("Invalid timeout '{0}': expected a positive number of seconds")]
    InvalidTimeout(String),

    #[error("Invalid {kind} list: {}", .warnings.join("; "))]
    MalformedPairs {
        kind: &'static str,
        warnings: Vec<String>,
    },

    #[error("Invalid additional options: {0}")]
    InvalidOptions(String),

    #[error("Output path {} is a directory", .path.display())]
    InvalidOutputPath { path: PathBuf },
}
