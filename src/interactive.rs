use std::{
    fmt,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use anyhow::{anyhow, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use inquire::{Confirm, InquireError, Select, Text};

use crate::{
    executor::{
        format_captured_line, preview_command, print_run_outcome, resolve_binary, start_run,
        CapturedLine, ExecutionOptions, RunError, RunObserver, RunRequest,
    },
    session::{SessionConfig, DEFAULT_LOG_FILE, DEFAULT_REPORT_FILE, DEFAULT_RESULTS_FILE},
};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const BUILD_TIMESTAMP: &str = env!("BUILD_TIMESTAMP");

pub struct InteractiveOptions {
    pub session: SessionConfig,
    pub execution: ExecutionOptions,
    pub profile_name: Option<String>,
}

pub async fn run_interactive(options: InteractiveOptions) -> Result<()> {
    let mut ui = InquireUi;
    run_interactive_with_ui(options, &mut ui).await
}

pub(crate) async fn run_interactive_with_ui(
    options: InteractiveOptions,
    ui: &mut dyn InteractiveUi,
) -> Result<()> {
    let InteractiveOptions {
        mut session,
        execution,
        profile_name,
    } = options;

    ui.print(&format!("wonderffuf v{} (built {})", VERSION, BUILD_TIMESTAMP));
    if let Some(profile) = &profile_name {
        ui.print(&format!("Profile: {profile}"));
    }
    if let Err(err) = resolve_binary(&execution.binary) {
        ui.print(&format!("{} {err}", "Warning:".yellow().bold()));
    }

    loop {
        let items = MenuItem::ALL;
        let labels: Vec<String> = items
            .iter()
            .enumerate()
            .map(|(index, item)| menu_label(index, *item, &session))
            .collect();

        let index = ui.select("----- FFUF Fuzzing Tool -----", &labels, 0)?;
        let choice = items
            .get(index)
            .copied()
            .ok_or_else(|| anyhow!("invalid menu selection"))?;

        match choice {
            MenuItem::TargetUrl => {
                if let Some(value) = ui.input(
                    "Enter the target URL (e.g., http://example.com):",
                    session.target_url(),
                )? {
                    report(ui, session.set_target_url(&value), "Target URL updated");
                }
            }
            MenuItem::Wordlist => {
                let current = session.wordlist().map(|p| p.display().to_string());
                if let Some(value) = ui.input(
                    "Enter the wordlist path (e.g., /path/to/wordlist.txt):",
                    current.as_deref(),
                )? {
                    report(ui, session.set_wordlist(&value), "Wordlist updated");
                }
            }
            MenuItem::Method => {
                let current = session.method().to_string();
                if let Some(value) = ui.input(
                    "Enter the HTTP method (GET, POST, PUT, DELETE, HEAD, PATCH, OPTIONS):",
                    Some(&current),
                )? {
                    report(ui, session.set_method(&value), "HTTP method updated");
                }
            }
            MenuItem::ExtraOptions => {
                let current = session.extra_options().to_string();
                if let Some(value) =
                    ui.input("Enter any additional FFUF options:", Some(&current))?
                {
                    report(ui, session.set_extra_options(&value), "Additional options updated");
                }
            }
            MenuItem::Headers => {
                if let Some(value) = ui.input(
                    "Enter custom headers (comma-separated 'Name: value' pairs):",
                    None,
                )? {
                    let outcome = session.set_headers(&value);
                    report_pairs(ui, outcome, "Headers", session.headers().len());
                }
            }
            MenuItem::Cookies => {
                if let Some(value) =
                    ui.input("Enter cookies (comma-separated name=value pairs):", None)?
                {
                    let outcome = session.set_cookies(&value);
                    report_pairs(ui, outcome, "Cookies", session.cookies().len());
                }
            }
            MenuItem::Timeout => {
                let current = session.timeout_secs().to_string();
                if let Some(value) = ui.input(
                    "Enter the timeout in seconds for each request:",
                    Some(&current),
                )? {
                    report(ui, session.set_timeout(&value), "Timeout updated");
                }
            }
            MenuItem::OutputFiles => prompt_outputs(ui, &mut session)?,
            MenuItem::Start => handle_start(ui, &session, &execution).await?,
            MenuItem::Exit => {
                if ui.confirm("Are you sure you want to exit?", false)? {
                    ui.print("Exiting.");
                    break;
                }
            }
        }
    }

    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MenuItem {
    TargetUrl,
    Wordlist,
    Method,
    ExtraOptions,
    Headers,
    Cookies,
    Timeout,
    OutputFiles,
    Start,
    Exit,
}

impl MenuItem {
    const ALL: [MenuItem; 10] = [
        MenuItem::TargetUrl,
        MenuItem::Wordlist,
        MenuItem::Method,
        MenuItem::ExtraOptions,
        MenuItem::Headers,
        MenuItem::Cookies,
        MenuItem::Timeout,
        MenuItem::OutputFiles,
        MenuItem::Start,
        MenuItem::Exit,
    ];
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuItem::TargetUrl => write!(f, "Set Target URL"),
            MenuItem::Wordlist => write!(f, "Set Wordlist"),
            MenuItem::Method => write!(f, "Set HTTP Method (default: GET)"),
            MenuItem::ExtraOptions => write!(f, "Set Additional Options"),
            MenuItem::Headers => write!(f, "Set Custom Headers"),
            MenuItem::Cookies => write!(f, "Set Cookies"),
            MenuItem::Timeout => write!(f, "Set Timeout (default: 10 seconds)"),
            MenuItem::OutputFiles => write!(f, "Set Output File Names"),
            MenuItem::Start => write!(f, "Start Fuzzing"),
            MenuItem::Exit => write!(f, "Exit"),
        }
    }
}

fn menu_label(index: usize, item: MenuItem, session: &SessionConfig) -> String {
    let current = match item {
        MenuItem::TargetUrl => session.target_url().map(str::to_string),
        MenuItem::Wordlist => session.wordlist().map(|p| p.display().to_string()),
        MenuItem::Method => Some(session.method().to_string()),
        MenuItem::ExtraOptions => {
            Some(session.extra_options().to_string()).filter(|s| !s.is_empty())
        }
        MenuItem::Headers => count_label(session.headers().len()),
        MenuItem::Cookies => count_label(session.cookies().len()),
        MenuItem::Timeout => Some(format!("{}s", session.timeout_secs())),
        MenuItem::OutputFiles => Some(session.outputs().results.display().to_string()),
        MenuItem::Start | MenuItem::Exit => None,
    };

    match current {
        Some(value) => format!("{}. {} [{}]", index + 1, item, value),
        None => format!("{}. {}", index + 1, item),
    }
}

fn count_label(count: usize) -> Option<String> {
    (count > 0).then(|| format!("{count} set"))
}

fn report<E: fmt::Display>(ui: &mut dyn InteractiveUi, outcome: Result<(), E>, success: &str) {
    match outcome {
        Ok(()) => ui.print(success),
        Err(err) => ui.print(&format!("{} {err}", "Error:".red().bold())),
    }
}

fn report_pairs<E: fmt::Display>(
    ui: &mut dyn InteractiveUi,
    outcome: Result<Vec<String>, E>,
    label: &str,
    stored: usize,
) {
    match outcome {
        Ok(warnings) => {
            for warning in &warnings {
                ui.print(&format!("{} {warning}", "Warning:".yellow().bold()));
            }
            ui.print(&format!("{label} updated ({stored} stored)"));
        }
        Err(err) => ui.print(&format!("{} {err}", "Error:".red().bold())),
    }
}

fn prompt_outputs(ui: &mut dyn InteractiveUi, session: &mut SessionConfig) -> Result<()> {
    let prompts = [
        ("Enter the result file path:", DEFAULT_RESULTS_FILE),
        ("Enter the log file path:", DEFAULT_LOG_FILE),
        ("Enter the report file path:", DEFAULT_REPORT_FILE),
    ];

    let mut values = Vec::with_capacity(prompts.len());
    for (prompt, default) in prompts {
        match ui.input(prompt, Some(default))? {
            Some(value) => values.push(value),
            None => {
                ui.print("Output file names unchanged.");
                return Ok(());
            }
        }
    }

    report(
        ui,
        session.set_outputs(&values[0], &values[1], &values[2]),
        "Output file names updated",
    );
    Ok(())
}

async fn handle_start(
    ui: &mut dyn InteractiveUi,
    session: &SessionConfig,
    execution: &ExecutionOptions,
) -> Result<()> {
    let request = match RunRequest::from_session(session) {
        Ok(request) => request,
        Err(err) => {
            ui.print(&format!("{} {err}", "Error:".red().bold()));
            return Ok(());
        }
    };
    if request.wordlist.is_none() {
        ui.print(&format!(
            "{} no wordlist set, ffuf will likely refuse to run",
            "Warning:".yellow().bold()
        ));
    }

    ui.print(&format!(
        "Generated FFUF Command: {}",
        preview_command(&execution.binary, &request).cyan()
    ));
    if !ui.confirm("Do you want to proceed with this command?", false)? {
        ui.print("Fuzzing canceled by the user.");
        return Ok(());
    }

    let total = request.wordlist.as_deref().and_then(count_wordlist_entries);
    let mut observer = ProgressObserver::new(total);
    let outcome = start_run(session, execution, &mut observer).await;
    observer.finish();

    match outcome {
        Ok(outcome) => print_run_outcome(&outcome),
        Err(RunError::Artifacts { written, failures }) => {
            for (kind, path) in &written {
                ui.print(&format!("Saved {kind}: {}", path.display()));
            }
            for failure in &failures {
                ui.print(&format!("{} {failure}", "Error:".red().bold()));
            }
        }
        Err(err) => ui.print(&format!("{} {err}", "Error:".red().bold())),
    }
    Ok(())
}

fn count_wordlist_entries(path: &Path) -> Option<u64> {
    let file = File::open(path).ok()?;
    let count = BufReader::new(file)
        .lines()
        .map_while(|line| line.ok())
        .filter(|line| !line.trim().is_empty())
        .count();
    Some(count as u64)
}

/// Streams captured lines above a progress bar sized by the wordlist.
struct ProgressObserver {
    bar: ProgressBar,
}

impl ProgressObserver {
    fn new(total: Option<u64>) -> Self {
        let bar = match total {
            Some(len) => {
                let bar = ProgressBar::new(len);
                if let Ok(style) =
                    ProgressStyle::with_template("Processing {bar:40} {pos}/{len} entries")
                {
                    bar.set_style(style);
                }
                bar
            }
            None => ProgressBar::new_spinner(),
        };
        Self { bar }
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl RunObserver for ProgressObserver {
    fn on_start(&mut self, command_line: &str) {
        log::debug!("running {command_line}");
    }

    fn on_line(&mut self, line: &CapturedLine) {
        self.bar.println(format_captured_line(line));
        self.bar.inc(1);
    }
}

pub(crate) trait InteractiveUi {
    fn print(&mut self, message: &str);
    fn select(&mut self, prompt: &str, items: &[String], start: usize) -> Result<usize>;
    fn input(&mut self, prompt: &str, default: Option<&str>) -> Result<Option<String>>;
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool>;
}

struct InquireUi;

impl InteractiveUi for InquireUi {
    fn print(&mut self, message: &str) {
        println!("{}", message);
    }

    fn select(&mut self, prompt: &str, items: &[String], start: usize) -> Result<usize> {
        let choice = Select::new(prompt, items.to_vec())
            .with_page_size(10)
            .with_starting_cursor(start)
            .prompt()?;
        items
            .iter()
            .position(|item| item == &choice)
            .ok_or_else(|| anyhow!("selection not found"))
    }

    fn input(&mut self, prompt: &str, default: Option<&str>) -> Result<Option<String>> {
        let mut builder = Text::new(prompt);
        if let Some(value) = default {
            builder = builder.with_default(value);
        }
        match builder.prompt() {
            Ok(value) => Ok(Some(value)),
            Err(InquireError::OperationCanceled) => Ok(None),
            Err(other) => Err(other.into()),
        }
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool> {
        match Confirm::new(prompt).with_default(default).prompt() {
            Ok(value) => Ok(value),
            Err(InquireError::OperationCanceled) => Ok(false),
            Err(other) => Err(other.into()),
        }
    }
}
