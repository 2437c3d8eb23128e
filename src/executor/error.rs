use std::{io, path::PathBuf};

use thiserror::Error;

use super::models::ArtifactKind;
use crate::session::SessionError;

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("{binary} is not installed or not in PATH")]
    ToolUnavailable { binary: String },

    #[error("failed to start {binary}: {source}")]
    Launch {
        binary: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to read output from {binary}: {source}")]
    Capture {
        binary: String,
        #[source]
        source: io::Error,
    },

    #[error("{} of 3 artifacts could not be written", .failures.len())]
    Artifacts {
        written: Vec<(ArtifactKind, PathBuf)>,
        failures: Vec<ArtifactError>,
    },
}

#[derive(Debug, Error)]
#[error("Error writing {kind} to {}: {source}", .path.display())]
pub struct ArtifactError {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}
