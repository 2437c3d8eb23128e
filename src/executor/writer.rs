use std::{
    fs::{self, OpenOptions},
    io::{self, Write},
    path::Path,
};

use chrono::{DateTime, Local};
use log::{info, warn};
use serde::Serialize;
use uuid::Uuid;

use super::{
    error::ArtifactError,
    models::{
        ArtifactKind, ArtifactReport, CapturedLine, LineStatus, RunCounts, RunRequest, RunResult,
    },
};

const LOG_TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Serialize)]
struct ResultsDocument<'a> {
    run_id: Uuid,
    tool: String,
    command: &'a [String],
    url: &'a str,
    method: &'a str,
    wordlist: Option<&'a Path>,
    timeout_secs: u64,
    started_at: DateTime<Local>,
    finished_at: DateTime<Local>,
    duration_ms: i64,
    exit_code: Option<i32>,
    summary: RunCounts,
    results: &'a [CapturedLine],
    stderr: &'a str,
}

/// Writes the results, log and summary files. Each write is attempted even
/// when an earlier one failed.
pub fn write_artifacts(request: &RunRequest, result: &RunResult) -> ArtifactReport {
    let outputs = &request.outputs;
    let attempts = [
        (
            ArtifactKind::Results,
            &outputs.results,
            write_results(&outputs.results, request, result),
        ),
        (
            ArtifactKind::Log,
            &outputs.log,
            append_log(&outputs.log, result),
        ),
        (
            ArtifactKind::Report,
            &outputs.report,
            write_report(&outputs.report, request, result),
        ),
    ];

    let mut report = ArtifactReport::default();
    for (kind, path, outcome) in attempts {
        match outcome {
            Ok(()) => {
                info!("{kind} saved to {}", path.display());
                report.written.push((kind, path.clone()));
            }
            Err(source) => {
                let error = ArtifactError {
                    kind,
                    path: path.clone(),
                    source,
                };
                warn!("{error}");
                report.failures.push(error);
            }
        }
    }
    report
}

fn write_results(path: &Path, request: &RunRequest, result: &RunResult) -> io::Result<()> {
    let document = ResultsDocument {
        run_id: result.run_id,
        tool: result.binary.to_string_lossy().into_owned(),
        command: &result.args,
        url: &request.url,
        method: &request.method,
        wordlist: request.wordlist.as_deref(),
        timeout_secs: request.timeout_secs,
        started_at: result.started_at,
        finished_at: result.finished_at,
        duration_ms: (result.finished_at - result.started_at).num_milliseconds(),
        exit_code: result.exit_code,
        summary: result.counts(),
        results: &result.lines,
        stderr: &result.stderr,
    };
    let json = serde_json::to_string_pretty(&document).map_err(io::Error::from)?;
    ensure_parent(path)?;
    fs::write(path, json + "\n")
}

fn append_log(path: &Path, result: &RunResult) -> io::Result<()> {
    let stamp = |time: &DateTime<Local>| time.format(LOG_TIMESTAMP).to_string();
    let started = stamp(&result.started_at);
    let finished = stamp(&result.finished_at);

    let mut block = format!(
        "[{started}] ===== run {} started: {}\n",
        result.run_id,
        result.command_line()
    );
    for line in &result.lines {
        block.push_str(&format!("[{started}] {}\n", line.output));
    }
    for line in result.stderr.lines().filter(|l| !l.trim().is_empty()) {
        block.push_str(&format!("[{started}] [stderr] {line}\n"));
    }
    let exit = result
        .exit_code
        .map(|code| code.to_string())
        .unwrap_or_else(|| "none".to_string());
    block.push_str(&format!(
        "[{finished}] ===== run {} finished (exit code {exit})\n",
        result.run_id
    ));

    ensure_parent(path)?;
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(block.as_bytes())
}

fn write_report(path: &Path, request: &RunRequest, result: &RunResult) -> io::Result<()> {
    ensure_parent(path)?;
    fs::write(path, render_report(request, result))
}

pub(crate) fn render_report(request: &RunRequest, result: &RunResult) -> String {
    let counts = result.counts();
    let mut out = String::new();
    out.push_str("----- Post-Processing Report -----\n");
    out.push_str(&format!("Target: {}\n", request.url));
    out.push_str(&format!("Method: {}\n", request.method));
    out.push_str(&format!(
        "Exit code: {}\n",
        result
            .exit_code
            .map(|code| code.to_string())
            .unwrap_or_else(|| "none".to_string())
    ));
    out.push_str(&format!("{}\n\n", summary_line(&counts)));
    out.push_str(&format!("Success: {}\n", counts.successful));
    out.push_str(&format!("Error: {}\n", counts.errors));
    out.push_str(&format!("Unknown: {}\n", counts.unknown));

    let successful: Vec<&str> = result
        .lines
        .iter()
        .filter(|line| line.status == LineStatus::Success)
        .map(|line| line.output.as_str())
        .collect();
    if !successful.is_empty() {
        out.push_str("\n----- Successful Requests -----\n");
        for line in successful {
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}

pub fn summary_line(counts: &RunCounts) -> String {
    format!(
        "{} successful, {} errors, {} total",
        counts.successful, counts.errors, counts.total
    )
}

fn ensure_parent(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}
