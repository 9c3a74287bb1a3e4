mod commands;
mod config;
mod editor;
mod error;
mod state;
mod surface;
mod thought;
mod tui;

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const LOG_ENV_VAR: &str = "PHILOSOPHY_LOG";

#[derive(Parser)]
#[command(
    name = "philosophy",
    about = "Draw thoughts and the implications between them"
)]
struct Cli {
    /// Configuration file (default: $PHILOSOPHY_CONFIG, then ./philosophy.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Append logs to this file (filter with PHILOSOPHY_LOG)
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Open the editor (the default)
    View {
        /// Start with a few sample thoughts and arrows
        #[arg(long)]
        demo: bool,
    },
    /// Write a default philosophy.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the configuration in effect
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let explicit = cli.config.as_deref();
    let command = cli.command.unwrap_or(Command::View { demo: false });
    let log_file = cli.log_file.as_deref();

    match command {
        Command::Init { force } => {
            init_logging(log_file)?;
            commands::init::run(explicit, force)
        }
        Command::View { demo } => {
            let config = load_config(explicit, log_file)?;
            commands::view::run(&config, demo)
        }
        Command::Config => {
            let config = load_config(explicit, log_file)?;
            commands::config::run(&config, explicit)
        }
    }
}

/// Load the configuration, then start logging to `--log-file` or the
/// configured `log_file`.
fn load_config(explicit: Option<&Path>, log_file: Option<&Path>) -> Result<config::Config> {
    let config = config::load(explicit)?;
    init_logging(log_file.or(config.log_file.as_deref()))?;
    if let Some(path) = config::resolve_path(explicit) {
        tracing::debug!(path = %path.display(), "configuration loaded");
    }
    Ok(config)
}

/// Send `tracing` output to `log_file`. Without one, nothing is installed: the
/// editor owns the terminal.
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    let env_filter =
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .with(env_filter)
        .init();
    tracing::info!(path = %path.display(), "logging initialised");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn no_subcommand_means_view() {
        let cli = Cli::try_parse_from(["philosophy"]).expect("bare invocation should parse");
        assert_eq!(cli.command, None);
    }

    #[test]
    fn view_accepts_demo() {
        let cli = Cli::try_parse_from(["philosophy", "view", "--demo"])
            .expect("view --demo should parse");
        assert_eq!(cli.command, Some(Command::View { demo: true }));
    }

    #[test]
    fn global_flags_work_after_the_subcommand() {
        let cli = Cli::try_parse_from([
            "philosophy",
            "init",
            "--force",
            "--config",
            "custom.toml",
            "--log-file",
            "philosophy.log",
        ])
        .expect("global flags should parse after the subcommand");
        assert_eq!(cli.command, Some(Command::Init { force: true }));
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        assert_eq!(cli.log_file, Some(PathBuf::from("philosophy.log")));
    }

    #[test]
    fn unknown_subcommands_are_rejected() {
        let parsed = Cli::try_parse_from(["philosophy", "update"]);
        let err = parsed.err().expect("expected clap parse error");
        assert_eq!(err.kind(), ErrorKind::InvalidSubcommand);
    }

    #[test]
    fn config_takes_no_arguments() {
        let parsed = Cli::try_parse_from(["philosophy", "config", "--demo"]);
        let err = parsed.err().expect("expected clap parse error");
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }
}
