//! mirrorctl CLI - scheduled repository mirroring orchestrator
//!
//! Designed to run from cron/systemd timers with no arguments: the config
//! lives at a fixed path and a lock file keeps overlapping runs out. Both
//! paths can be overridden for staged deployments and tests.
//!
//! Exit code 0 when every configured mirror synced (or was skipped as
//! unchanged), 1 otherwise.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use mirrorctl::config::{Config, DEFAULT_CONFIG_PATH};
use mirrorctl::lock::{RunLock, DEFAULT_LOCK_PATH};
use mirrorctl::Coordinator;

/// mirrorctl - mirror package repositories on a schedule
#[derive(Parser, Debug)]
#[command(name = "mirrorctl")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Path to the single-instance lock file
    #[arg(long, default_value = DEFAULT_LOCK_PATH)]
    lock_file: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<bool> {
    // Held for the whole run; dropped (and the file removed) on every exit
    // path, including errors below.
    let _lock = RunLock::acquire(&cli.lock_file)?;

    let (config, warnings) = Config::load(&cli.config)?;
    for warning in &warnings {
        eprintln!("warning: {warning}");
    }

    let report = Coordinator::new(config).run_all()?;
    Ok(report.all_succeeded())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults_to_system_paths() {
        let cli = Cli::try_parse_from(["mirrorctl"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("/etc/mirrorctl.toml"));
        assert_eq!(cli.lock_file, PathBuf::from("/tmp/mirrorctl.lock"));
    }

    #[test]
    fn cli_accepts_overrides() {
        let cli = Cli::try_parse_from([
            "mirrorctl",
            "--config",
            "/tmp/staged.toml",
            "--lock-file",
            "/tmp/staged.lock",
        ])
        .unwrap();
        assert_eq!(cli.config, PathBuf::from("/tmp/staged.toml"));
        assert_eq!(cli.lock_file, PathBuf::from("/tmp/staged.lock"));
    }

    #[test]
    fn cli_rejects_positional_arguments() {
        assert!(Cli::try_parse_from(["mirrorctl", "sync"]).is_err());
    }
}
