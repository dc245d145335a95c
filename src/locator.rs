// Copyright (c) 2025 Robert August Vincent II <pillarsdotnet@gmail.com>
// Co-author: Cursor-AI.

//! Finds the assignment log by walking from a starting directory up to the filesystem root.

use std::fs;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

/// Substring that identifies the first line of a log file.
pub const MARKER: &str = "ESTIMATE of time to complete assignment";

/// Upper bound on bytes read while looking for the first line of a candidate file.
const FIRST_LINE_LIMIT: u64 = 4096;

/// Returns the first regular file (by name) in `start` or its nearest ancestor whose first line
/// contains [`MARKER`]; `None` if no directory up to the root has one.
pub fn find_log_file(start: &Path) -> Option<PathBuf> {
    let start = fs::canonicalize(start).unwrap_or_else(|_| start.to_path_buf());
    for dir in start.ancestors() {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(dir = %dir.display(), error = %e, "skipping unreadable directory");
                continue;
            }
        };
        let mut files: Vec<PathBuf> = entries
            .flatten()
            .map(|e| e.path())
            .filter(|p| p.is_file())
            .collect();
        files.sort();
        debug!(dir = %dir.display(), candidates = files.len(), "probing for log file");
        if let Some(found) = files.into_iter().find(|p| first_line_has_marker(p)) {
            info!(path = %found.display(), "found log file");
            return Some(found);
        }
    }
    None
}

fn first_line_has_marker(path: &Path) -> bool {
    let file = match fs::File::open(path) {
        Ok(f) => f,
        Err(_) => return false,
    };
    let mut line = Vec::new();
    if BufReader::new(file.take(FIRST_LINE_LIMIT))
        .read_until(b'\n', &mut line)
        .is_err()
    {
        return false;
    }
    String::from_utf8_lossy(&line).contains(MARKER)
}
