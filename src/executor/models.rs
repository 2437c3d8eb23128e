use std::path::PathBuf;

use chrono::{DateTime, Local};
use serde::Serialize;
use uuid::Uuid;

use crate::session::{OutputFiles, SessionConfig, SessionError};

/// Frozen copy of the session taken when a run starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub url: String,
    pub wordlist: Option<PathBuf>,
    pub method: String,
    pub headers: Vec<(String, String)>,
    pub cookies: Vec<(String, String)>,
    pub timeout_secs: u64,
    pub extra_options: String,
    pub outputs: OutputFiles,
}

impl RunRequest {
    pub fn from_session(session: &SessionConfig) -> Result<Self, SessionError> {
        let url = session.target_url().ok_or(SessionError::MissingUrl)?;
        Ok(Self {
            url: url.to_string(),
            wordlist: session.wordlist().map(|p| p.to_path_buf()),
            method: session.method().to_string(),
            headers: session.headers().to_vec(),
            cookies: session.cookies().to_vec(),
            timeout_secs: session.timeout_secs(),
            extra_options: session.extra_options().to_string(),
            outputs: session.outputs().clone(),
        })
    }
}

pub struct ExecutionOptions {
    /// Fuzzer executable: a bare name looked up on `PATH`, or a path.
    pub binary: String,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        Self {
            binary: "ffuf".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStatus {
    Success,
    Error,
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LineDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub words: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lines: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapturedLine {
    pub output: String,
    pub status: LineStatus,
    pub details: LineDetails,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunCounts {
    pub successful: usize,
    pub errors: usize,
    pub unknown: usize,
    pub total: usize,
}

impl RunCounts {
    pub fn tally<'a>(lines: impl IntoIterator<Item = &'a CapturedLine>) -> Self {
        let mut counts = Self::default();
        for line in lines {
            counts.total += 1;
            match line.status {
                LineStatus::Success => counts.successful += 1,
                LineStatus::Error => counts.errors += 1,
                LineStatus::Unknown => counts.unknown += 1,
            }
        }
        counts
    }
}

pub struct RunResult {
    pub run_id: Uuid,
    pub binary: PathBuf,
    pub args: Vec<String>,
    pub exit_code: Option<i32>,
    pub lines: Vec<CapturedLine>,
    pub stderr: String,
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
}

impl RunResult {
    pub fn counts(&self) -> RunCounts {
        RunCounts::tally(&self.lines)
    }

    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// The invocation as a single shell-quoted line, for display.
    pub fn command_line(&self) -> String {
        render_command(&self.binary.to_string_lossy(), &self.args)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Results,
    Log,
    Report,
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArtifactKind::Results => write!(f, "results"),
            ArtifactKind::Log => write!(f, "log"),
            ArtifactKind::Report => write!(f, "summary report"),
        }
    }
}

#[derive(Debug, Default)]
pub struct ArtifactReport {
    pub written: Vec<(ArtifactKind, PathBuf)>,
    pub failures: Vec<super::ArtifactError>,
}

pub struct RunOutcome {
    pub result: RunResult,
    pub artifacts: ArtifactReport,
}

pub(crate) fn render_command(binary: &str, args: &[String]) -> String {
    let mut words = Vec::with_capacity(args.len() + 1);
    words.push(binary);
    words.extend(args.iter().map(String::as_str));
    shell_words::join(words)
}
