#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use anyhow::Result;
use pretty_assertions::assert_eq;
use tempfile::tempdir;
use wonderffuf::executor::{
    build_command_args, start_run, ExecutionOptions, RunError, RunRequest, SilentObserver,
};
use wonderffuf::session::SessionConfig;

fn write_stub(dir: &Path, body: &str) -> Result<String> {
    let path = dir.join("stub-ffuf");
    fs::write(&path, format!("#!/bin/sh\n{body}\n"))?;
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;
    Ok(path.to_string_lossy().into_owned())
}

fn session_in(dir: &Path) -> Result<SessionConfig> {
    let words = dir.join("words.txt");
    fs::write(&words, "admin\nlogin\n")?;

    let mut session = SessionConfig::new();
    session.set_target_url("https://example.com")?;
    session.set_wordlist(words.to_str().unwrap())?;
    session.set_method("GET")?;
    session.set_timeout("5")?;
    session.set_outputs(
        dir.join("out/results.json").to_str().unwrap(),
        dir.join("out/output.log").to_str().unwrap(),
        dir.join("out/summary.txt").to_str().unwrap(),
    )?;
    Ok(session)
}

#[tokio::test]
async fn end_to_end_run_writes_all_artifacts() -> Result<()> {
    let temp = tempdir()?;
    let session = session_in(temp.path())?;
    let binary = write_stub(
        temp.path(),
        "echo 'admin [Status: 200, Size: 10, Words: 2, Lines: 1, Duration: 5ms]'\n\
         echo 'login [Status: 301, Size: 0, Words: 1, Lines: 1, Duration: 7ms]'",
    )?;

    let outcome = start_run(&session, &ExecutionOptions { binary }, &mut SilentObserver).await?;
    assert_eq!(outcome.result.exit_code, Some(0));
    assert_eq!(outcome.artifacts.written.len(), 3);

    let summary = fs::read_to_string(temp.path().join("out/summary.txt"))?;
    assert!(summary.contains("2 successful, 0 errors, 2 total"));

    let results: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(temp.path().join("out/results.json"))?)?;
    assert_eq!(results["url"], "https://example.com");
    assert_eq!(results["method"], "GET");
    assert_eq!(results["timeout_secs"], 5);
    let outputs: Vec<&str> = results["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["output"].as_str().unwrap())
        .collect();
    assert_eq!(
        outputs,
        vec![
            "admin [Status: 200, Size: 10, Words: 2, Lines: 1, Duration: 5ms]",
            "login [Status: 301, Size: 0, Words: 1, Lines: 1, Duration: 7ms]"
        ]
    );

    let log = fs::read_to_string(temp.path().join("out/output.log"))?;
    assert!(log.contains("admin [Status: 200"));
    assert!(log.contains("finished (exit code 0)"));
    Ok(())
}

#[tokio::test]
async fn non_zero_exit_is_recorded_not_raised() -> Result<()> {
    let temp = tempdir()?;
    let session = session_in(temp.path())?;
    let binary = write_stub(temp.path(), "echo 'Encountered error: bad flag' >&2\nexit 1")?;

    let outcome = start_run(&session, &ExecutionOptions { binary }, &mut SilentObserver).await?;
    assert_eq!(outcome.result.exit_code, Some(1));

    let results: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(temp.path().join("out/results.json"))?)?;
    assert_eq!(results["exit_code"], 1);
    assert!(results["stderr"].as_str().unwrap().contains("bad flag"));

    let summary = fs::read_to_string(temp.path().join("out/summary.txt"))?;
    assert!(summary.contains("0 successful, 0 errors, 0 total"));
    Ok(())
}

#[tokio::test]
async fn missing_tool_writes_no_artifacts() -> Result<()> {
    let temp = tempdir()?;
    let session = session_in(temp.path())?;
    let options = ExecutionOptions {
        binary: temp.path().join("not-there").to_string_lossy().into_owned(),
    };

    let err = start_run(&session, &options, &mut SilentObserver)
        .await
        .err()
        .expect("run should fail");
    assert!(matches!(err, RunError::ToolUnavailable { .. }));
    assert!(!temp.path().join("out").exists());
    Ok(())
}

#[tokio::test]
async fn run_without_url_is_rejected() -> Result<()> {
    let err = start_run(
        &SessionConfig::new(),
        &ExecutionOptions::default(),
        &mut SilentObserver,
    )
    .await
    .err()
    .expect("run should fail");
    assert!(err.to_string().contains("Target URL is required"));
    Ok(())
}

#[tokio::test]
async fn failed_artifact_write_is_reported_after_the_others() -> Result<()> {
    let temp = tempdir()?;
    let mut session = session_in(temp.path())?;
    let blocker = temp.path().join("blocker");
    fs::write(&blocker, "file, not a directory")?;
    session.set_outputs(
        blocker.join("results.json").to_str().unwrap(),
        temp.path().join("ok.log").to_str().unwrap(),
        temp.path().join("ok.txt").to_str().unwrap(),
    )?;
    let binary = write_stub(temp.path(), "echo 'Found: /admin'")?;

    let err = start_run(&session, &ExecutionOptions { binary }, &mut SilentObserver)
        .await
        .err()
        .expect("results write should fail");
    match err {
        RunError::Artifacts { written, failures } => {
            assert_eq!(written.len(), 2);
            assert_eq!(failures.len(), 1);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(temp.path().join("ok.log").exists());
    assert!(temp.path().join("ok.txt").exists());
    Ok(())
}

#[test]
fn argument_list_is_stable_for_a_fixed_session() -> Result<()> {
    let temp = tempdir()?;
    let mut session = session_in(temp.path())?;
    session.set_headers("X-One: 1, X-Two: 2")?;
    session.set_cookies("a=1; b=2")?;
    session.set_extra_options("-mc all -t 5")?;

    let request = RunRequest::from_session(&session)?;
    let first = build_command_args(&request);
    for _ in 0..5 {
        assert_eq!(build_command_args(&RunRequest::from_session(&session)?), first);
    }
    let flags: Vec<&str> = first
        .iter()
        .map(String::as_str)
        .filter(|arg| arg.starts_with('-'))
        .collect();
    assert_eq!(
        flags,
        vec!["-u", "-w", "-X", "-H", "-H", "-H", "-timeout", "-mc", "-t"]
    );
    Ok(())
}
