use colored::{Color, Colorize};

use super::{
    models::{render_command, CapturedLine, LineStatus, RunOutcome, RunRequest},
    writer::summary_line,
};

/// Renders the command that a run of `request` would execute.
pub fn preview_command(binary: &str, request: &RunRequest) -> String {
    render_command(binary, &super::command::build_command_args(request))
}

pub fn format_captured_line(line: &CapturedLine) -> String {
    match line.status {
        LineStatus::Success => line.output.color(Color::Green).to_string(),
        LineStatus::Error => line.output.color(Color::Red).to_string(),
        LineStatus::Unknown => line.output.dimmed().to_string(),
    }
}

pub fn print_run_outcome(outcome: &RunOutcome) {
    let counts = outcome.result.counts();
    let exit = match outcome.result.exit_code {
        Some(0) => "0".green().to_string(),
        Some(code) => code.to_string().yellow().to_string(),
        None => "terminated by signal".yellow().to_string(),
    };

    println!();
    println!("{}", "----- Results Summary -----".bold());
    println!("{} {}", "Total Requests Made:".bold(), counts.total);
    println!(
        "{} {}",
        "Total Successful Responses:".bold(),
        counts.successful.to_string().green()
    );
    println!("{} {}", "Total Errors:".bold(), counts.errors.to_string().red());
    println!("{} {}", "Exit code:".bold(), exit);
    println!("{}", summary_line(&counts).dimmed());

    for (kind, path) in &outcome.artifacts.written {
        println!("{} {}", format!("Saved {kind}:").bold(), path.display().to_string().cyan());
    }
}
