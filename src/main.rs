use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use wonderffuf::config::{apply_config, load_config};
use wonderffuf::executor::ExecutionOptions;
use wonderffuf::interactive::{run_interactive, InteractiveOptions};
use wonderffuf::session::SessionConfig;

#[derive(Parser, Debug)]
#[command(
    name = "wonderffuf",
    version,
    about = "Interactive ffuf runner with JSON, log and summary output",
    disable_help_subcommand = true
)]
struct Cli {
    /// Directory or file containing wonderffuf.json
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Select a profile from wonderffuf.json
    #[arg(short = 'P', long)]
    profile: Option<String>,

    /// Fuzzer executable, looked up on PATH unless it is a path
    #[arg(short, long)]
    binary: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_env(
            env_logger::Env::default()
                .filter("WONDERFFUF_LOG")
                .write_style("WONDERFFUF_LOG_STYLE"),
        )
        .init();

    let cli = Cli::parse();
    let cwd = std::env::current_dir()?;

    let config_target = cli
        .config
        .as_ref()
        .map(|p| resolve_relative(&cwd, p))
        .unwrap_or_else(|| cwd.clone());

    let mut session = SessionConfig::new();
    let mut execution = ExecutionOptions::default();
    let mut profile_name = None;

    if let Some(loaded) = load_config(&config_target).context("loading configuration")? {
        let applied = apply_config(&mut session, &loaded, cli.profile.as_deref())?;
        for warning in &applied.warnings {
            println!("{} {warning}", "Warning:".yellow().bold());
        }
        if let Some(binary) = applied.binary {
            execution.binary = binary;
        }
        profile_name = applied.profile_name;
    } else if let Some(profile) = &cli.profile {
        anyhow::bail!("Profile '{profile}' requested but no configuration was found");
    }

    if let Some(binary) = cli.binary {
        execution.binary = binary;
    }

    run_interactive(InteractiveOptions {
        session,
        execution,
        profile_name,
    })
    .await
}

fn resolve_relative(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_relative_joins_when_needed() {
        let base = Path::new("/tmp/base");
        let relative = Path::new("conf/wonderffuf.json");
        assert_eq!(resolve_relative(base, relative), base.join(relative));

        let absolute = Path::new("/etc/wonderffuf.json");
        assert_eq!(resolve_relative(base, absolute), absolute);
    }

    #[test]
    fn cli_parses_flags() {
        let cli = Cli::parse_from(["wonderffuf", "-P", "api", "--binary", "/opt/ffuf"]);
        assert_eq!(cli.profile.as_deref(), Some("api"));
        assert_eq!(cli.binary.as_deref(), Some("/opt/ffuf"));
        assert!(cli.config.is_none());
    }
}
