use std::{io, path::PathBuf, process::Stdio};

use chrono::Local;
use log::{debug, info};
use tokio::{
    io::{AsyncBufReadExt, AsyncReadExt, BufReader},
    process::Command,
};
use uuid::Uuid;

use super::{
    classify::classify_line,
    command::build_command_args,
    error::RunError,
    models::{CapturedLine, ExecutionOptions, RunRequest, RunResult},
};

/// Receives each classified stdout line while the fuzzer is running.
pub trait RunObserver {
    fn on_start(&mut self, _command_line: &str) {}
    fn on_line(&mut self, line: &CapturedLine);
}

/// Observer that ignores everything.
pub struct SilentObserver;

impl RunObserver for SilentObserver {
    fn on_line(&mut self, _line: &CapturedLine) {}
}

pub fn resolve_binary(binary: &str) -> Result<PathBuf, RunError> {
    which::which(binary).map_err(|_| RunError::ToolUnavailable {
        binary: binary.to_string(),
    })
}

/// Runs the fuzzer to completion and captures its output.
///
/// The fuzzer's own exit status is recorded in the result, never turned
/// into an error.
pub async fn execute_run(
    request: &RunRequest,
    options: &ExecutionOptions,
    observer: &mut dyn RunObserver,
) -> Result<RunResult, RunError> {
    let binary = resolve_binary(&options.binary)?;
    let args = build_command_args(request);
    let run_id = Uuid::new_v4();
    debug!("resolved {} to {}", options.binary, binary.display());
    debug!("arguments: {args:?}");

    let mut child = Command::new(&binary)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| match source.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
                RunError::ToolUnavailable {
                    binary: options.binary.clone(),
                }
            }
            _ => RunError::Launch {
                binary: options.binary.clone(),
                source,
            },
        })?;

    let started_at = Local::now();
    info!("run {run_id} started");

    let result = RunResult {
        run_id,
        binary,
        args,
        exit_code: None,
        lines: Vec::new(),
        stderr: String::new(),
        started_at,
        finished_at: started_at,
    };
    observer.on_start(&result.command_line());

    let capture_error = |source: io::Error| RunError::Capture {
        binary: options.binary.clone(),
        source,
    };

    let stdout = child.stdout.take().ok_or_else(|| {
        capture_error(io::Error::new(io::ErrorKind::BrokenPipe, "stdout not captured"))
    })?;
    let mut stderr = child.stderr.take().ok_or_else(|| {
        capture_error(io::Error::new(io::ErrorKind::BrokenPipe, "stderr not captured"))
    })?;

    let stderr_task = tokio::spawn(async move {
        let mut buffer = Vec::new();
        stderr.read_to_end(&mut buffer).await.map(|_| buffer)
    });

    let mut lines = Vec::new();
    let mut reader = BufReader::new(stdout);
    let mut buffer = Vec::new();
    loop {
        buffer.clear();
        let read = reader
            .read_until(b'\n', &mut buffer)
            .await
            .map_err(capture_error)?;
        if read == 0 {
            break;
        }
        let text = String::from_utf8_lossy(&buffer);
        let text = text.trim_end();
        if text.trim().is_empty() {
            continue;
        }
        let captured = classify_line(text);
        observer.on_line(&captured);
        lines.push(captured);
    }

    let status = child.wait().await.map_err(capture_error)?;
    let stderr_bytes = stderr_task
        .await
        .map_err(|err| capture_error(io::Error::new(io::ErrorKind::Other, err)))?
        .map_err(capture_error)?;

    let finished_at = Local::now();
    info!(
        "run {run_id} finished with exit code {:?} after {} lines",
        status.code(),
        lines.len()
    );

    Ok(RunResult {
        exit_code: status.code(),
        lines,
        stderr: String::from_utf8_lossy(&stderr_bytes).into_owned(),
        finished_at,
        ..result
    })
}
