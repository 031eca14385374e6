//! Session-start hook for agent hosts.
//!
//! Reads the event payload as JSON from stdin (or `--payload`), prints the
//! hook result as JSON on stdout, and logs to stderr. Set `BRIEF_LOG` to
//! adjust log verbosity (default: `warn`).
//!
//! Exit codes: `0` on success, `1` when the project language cannot be
//! determined, `2` when the payload is unreadable or malformed.
//!
//! # Examples
//!
//! ```sh
//! echo '{"cwd": "/path/to/project", "phase": "compact"}' | brief-hook
//!
//! # Human-readable banner, no registry query
//! brief-hook --payload event.json --plain --no-update-check
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use brief_hook::HookSettings;
use brief_rs::prelude::*;
use clap::Parser;
use tokio::io::AsyncReadExt;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "BRIEF_LOG";

const EXIT_FAULT: u8 = 1;
const EXIT_BAD_PAYLOAD: u8 = 2;

/// Session-start status banner for agent hosts.
#[derive(Parser)]
#[command(name = "brief-hook", version)]
struct Cli {
    /// Settings file. Default: `<cwd>/.brief/settings.json`.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Home directory holding `.claude/CLAUDE.md`. Default: `$HOME`.
    #[arg(long)]
    home: Option<PathBuf>,

    /// Read the payload from a file instead of stdin.
    #[arg(long)]
    payload: Option<PathBuf>,

    /// Print only the banner text instead of hook JSON.
    #[arg(long)]
    plain: bool,

    /// Skip the registry query for newer releases.
    #[arg(long)]
    no_update_check: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    let raw = match read_payload(&cli).await {
        Ok(raw) => raw,
        Err(e) => {
            eprintln!("Error: failed to read hook payload: {e}");
            return ExitCode::from(EXIT_BAD_PAYLOAD);
        }
    };
    let payload = match Payload::from_json(&raw) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(EXIT_BAD_PAYLOAD);
        }
    };

    let settings_path = cli
        .config
        .clone()
        .unwrap_or_else(|| HookSettings::default_path(&payload.cwd));
    debug!("Loading settings from {}", settings_path.display());
    let mut settings = HookSettings::load(&settings_path);
    if cli.no_update_check {
        settings = settings.with_check_updates(false);
    }

    let mut handler = SessionStartHandler::new(settings.build_sources(), settings.brief.clone());
    if let Some(home) = cli.home.clone().or_else(home_dir) {
        handler = handler.with_home(home);
    }

    match handler.handle(&payload).await {
        Ok(result) => {
            if cli.plain {
                if let Some(message) = &result.system_message {
                    println!("{message}");
                }
            } else {
                println!("{}", result.to_json());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(EXIT_FAULT)
        }
    }
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();
}

async fn read_payload(cli: &Cli) -> std::io::Result<String> {
    match &cli.payload {
        Some(path) => tokio::fs::read_to_string(path).await,
        None => {
            let mut raw = String::new();
            tokio::io::stdin().read_to_string(&mut raw).await?;
            Ok(raw)
        }
    }
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
}
