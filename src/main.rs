use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{ArgAction, Parser};
use proctree::{Caller, Config, Dispatcher, Request, SysinfoTable, UsageError};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "proctree", version)]
#[command(about = "Query and signal processes inside a process tree", long_about = None)]
#[command(disable_help_flag = true, disable_version_flag = true)]
struct Args {
    /// Process to inspect or act on
    process_id: String,

    /// Root of the tree the process must belong to
    root_process: String,

    /// -pr/-rp kill, -xt pause, -xc resume, -xd/-xg/-xn/-xs/-xz/-xa list, -zs status
    #[arg(allow_hyphen_values = true)]
    option: Option<String>,

    /// Config file (defaults to ~/.config/proctree/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    // Long forms only: -h and -V in the option slot are invalid options
    /// Print help
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,

    /// Print version
    #[arg(long, action = ArgAction::Version)]
    version: Option<bool>,
}

fn main() -> Result<ExitCode> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(_) => return usage_error(&UsageError::MissingArguments),
    };

    let config = Config::load(args.config.as_deref())?;
    init_tracing(&config.logging.filter);

    let request = match Request::parse(
        &args.process_id,
        &args.root_process,
        args.option.as_deref(),
    ) {
        Ok(request) => request,
        Err(e) => return usage_error(&e),
    };

    let table = SysinfoTable::snapshot()
        .context("Failed to read the process table")?
        .with_terminate_signal(config.signals.terminate_signal()?);

    let outcome = Dispatcher::new(&table, Caller::current(), io::stdout(), io::stderr())
        .run(&request)?;
    debug!(?outcome, "done");

    Ok(ExitCode::from(outcome.exit_code()))
}

fn usage_error(error: &UsageError) -> Result<ExitCode> {
    let code = error.report(io::stdout(), io::stderr())?;
    Ok(ExitCode::from(code))
}

/// Logs go to stderr; stdout carries only command output.
///
/// `RUST_LOG` takes precedence over the configured filter.
fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
