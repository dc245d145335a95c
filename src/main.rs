// Copyright (c) 2025 Robert August Vincent II <pillarsdotnet@gmail.com>
// Co-author: Cursor-AI.

//! # autolog — assignment time log
//!
//! Keeps a plain-text log of work sessions on an assignment: an estimate, one row per session,
//! a running total and the people the solution was discussed with. The log is whichever file,
//! in the current directory or the nearest parent, starts with
//! `ESTIMATE of time to complete assignment`.
//!
//! ## Subcommands
//!
//! | Command  | Description |
//! |----------|-------------|
//! | `create` | Write a new log file and prompt for the estimate in hours. |
//! | `start`  | Open a session stamped with the current time. Refused if the last session is still open. |
//! | `stop`   | Close the open session, prompt for what was done, and update the total. |
//! | `collab` | Append a name to the "I discussed my solution with:" line. |
//!
//! ## Environment
//!
//! `AUTOLOG_DEBUG` (any value) turns on debug diagnostics on stderr; `RUST_LOG` overrides the filter.

mod error;
mod locator;
mod session;
mod store;
mod timefmt;

use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::process;

use chrono::Local;
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::error::{Error, Result};

/// Assignment time log
#[derive(Parser, Debug)]
#[command(name = "autolog", version, about = "Track time spent on an assignment in a plain-text log")]
#[command(arg_required_else_help = true)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Directory to search for the log from, and to create it in (default: current directory)
    #[arg(short = 'C', long, global = true)]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a new log file and record an estimate
    Create {
        /// Log file to write (replaced if it exists)
        filename: PathBuf,
    },

    /// Start timing a work session
    Start,

    /// Stop the current session and describe the work done
    Stop,

    /// Record who you discussed your solution with
    Collab {
        /// Collaborator name; several words are joined into one name
        #[arg(required = true, num_args = 1..)]
        names: Vec<String>,
    },
}

fn setup_logging(verbose: u8) {
    let level = if env::var_os("AUTOLOG_DEBUG").is_some() {
        "debug"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("autolog={}", level))),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(command: Commands, dir: &Path) -> Result<()> {
    let now = Local::now().naive_local();
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout().lock();
    debug!(?command, dir = %dir.display(), "dispatching");
    match command {
        Commands::Create { filename } => session::cmd_create(&dir.join(filename), &mut input, &mut output),
        Commands::Start => session::cmd_start(dir, now, &mut output).map(|_| ()),
        Commands::Stop => session::cmd_stop(dir, now, &mut input, &mut output).map(|_| ()),
        Commands::Collab { names } => session::cmd_collab(dir, &names, &mut output),
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = e.print();
            process::exit(code);
        }
    };
    setup_logging(cli.verbose);

    let dir = match cli.dir {
        Some(d) => d,
        None => match env::current_dir() {
            Ok(d) => d,
            Err(e) => {
                eprintln!("Error: {}", Error::io(Path::new("."), e));
                process::exit(1);
            }
        },
    };

    if let Err(e) = run(cli.command, &dir) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
