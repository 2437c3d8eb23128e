mod classify;
mod command;
mod error;
mod models;
mod printer;
mod runner;
mod writer;

pub use classify::classify_line;
pub use command::build_command_args;
pub use error::{ArtifactError, RunError};
pub use models::{
    ArtifactKind, ArtifactReport, CapturedLine, ExecutionOptions, LineDetails, LineStatus,
    RunCounts, RunOutcome, RunRequest, RunResult,
};
pub use printer::{format_captured_line, preview_command, print_run_outcome};
pub use runner::{execute_run, resolve_binary, RunObserver, SilentObserver};
pub use writer::{summary_line, write_artifacts};

use crate::session::SessionConfig;

/// Snapshots the session, runs the fuzzer and writes the three artifacts.
///
/// Launch failures return before anything touches the filesystem. Artifact
/// failures are collected and returned together once every write has been
/// attempted.
pub async fn start_run(
    session: &SessionConfig,
    options: &ExecutionOptions,
    observer: &mut dyn RunObserver,
) -> Result<RunOutcome, RunError> {
    let request = RunRequest::from_session(session)?;
    let result = execute_run(&request, options, observer).await?;
    let artifacts = write_artifacts(&request, &result);

    if !artifacts.failures.is_empty() {
        return Err(RunError::Artifacts {
            written: artifacts.written,
            failures: artifacts.failures,
        });
    }

    Ok(RunOutcome { result, artifacts })
}
