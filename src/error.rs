// Copyright (c) 2025 Robert August Vincent II <pillarsdotnet@gmail.com>
// Co-author: Cursor-AI.

//! Error type shared by every autolog command.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Everything that can abort a command. A command that returns one of these has not written the log.
#[derive(Error, Debug)]
pub enum Error {
    /// A required command-line argument was not supplied.
    #[error("{0}")]
    MissingArgument(&'static str),

    /// No file with the marker line exists in the starting directory or any parent.
    #[error("No log file found.")]
    LogFileNotFound,

    /// The log is missing one of its structural lines.
    #[error("File formatted incorrectly: {0}")]
    MalformedLogFile(String),

    /// `start` while the last entry is still open.
    #[error("Previous entry not completed with stop command.")]
    IncompleteEntryConflict,

    /// `stop` with nothing to close.
    #[error("No incomplete entry found.")]
    NoOpenEntry,

    /// A start stamp (`MM/DD  HH:MMAM`) or spent time (`HH:MM`) that does not parse.
    #[error("could not parse time {0:?}")]
    TimeParse(String),

    /// Prompt or confirmation could not be read or written.
    #[error("console: {0}")]
    Console(#[from] io::Error),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wraps an I/O error with the path it concerns.
    pub fn io(path: &Path, source: io::Error) -> Self {
        Error::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
