// Copyright (c) 2025 Robert August Vincent II <pillarsdotnet@gmail.com>
// Co-author: Cursor-AI.

//! The four commands. Each one works out what to do from the log's contents; nothing else is persisted.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::locator::find_log_file;
use crate::store::{self, Entry, LogFile};
use crate::timefmt::{self, Spent};

const ESTIMATE_PROMPT: &str = "Enter your estimate of time to complete the assignment: ";
const WORK_PROMPT: &str = "Description of Completed Work: ";

/// Writes `question`, then reads one line of input with surrounding whitespace removed.
fn prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> Result<String> {
    write!(output, "{}", question)?;
    output.flush()?;
    let mut buf = String::new();
    input.read_line(&mut buf)?;
    Ok(buf.trim().to_string())
}

fn locate(start_dir: &Path) -> Result<PathBuf> {
    find_log_file(start_dir).ok_or(Error::LogFileNotFound)
}

/// Writes a fresh log at `path` and records the estimate read from `input`.
pub fn cmd_create<R: BufRead, W: Write>(path: &Path, input: &mut R, output: &mut W) -> Result<()> {
    store::create_skeleton(path)?;
    let estimate = prompt(input, output, ESTIMATE_PROMPT)?;
    if !store::insert_estimate(path, &estimate)? {
        warn!(path = %path.display(), "marker line missing; estimate not recorded");
    }
    writeln!(output, "Created {}", path.display())?;
    Ok(())
}

/// Opens a new entry stamped `now` in the log found from `start_dir`.
pub fn cmd_start<W: Write>(start_dir: &Path, now: NaiveDateTime, output: &mut W) -> Result<PathBuf> {
    let path = locate(start_dir)?;
    let stamp = timefmt::format_stamp(now);
    store::append_entry(&path, Entry::open(stamp.as_str()))?;
    writeln!(output, "Started: {} in {}", stamp, path.display())?;
    Ok(path)
}

/// Closes the open entry with the time since its stamp and a description read from `input`.
/// Returns the new total.
pub fn cmd_stop<R: BufRead, W: Write>(
    start_dir: &Path,
    now: NaiveDateTime,
    input: &mut R,
    output: &mut W,
) -> Result<Spent> {
    let path = locate(start_dir)?;
    let log = LogFile::load(&path)?;
    let open = log.open_entry().ok_or(Error::NoOpenEntry)?;
    let spent = timefmt::elapsed(&open.started, now)?;
    debug!(started = %open.started, %spent, "closing entry");
    let work = prompt(input, output, WORK_PROMPT)?;
    let total = store::close_open_entry(&path, spent, &work)?;
    writeln!(output, "Stopped: {} spent, {} total.", spent, total)?;
    Ok(total)
}

/// Adds `names`, joined with spaces, as one collaborator on the discussion line.
pub fn cmd_collab<W: Write>(start_dir: &Path, names: &[String], output: &mut W) -> Result<()> {
    if names.is_empty() {
        return Err(Error::MissingArgument("No collaborator name provided."));
    }
    let path = locate(start_dir)?;
    let name = names.join(" ");
    if store::append_collaborator(&path, &name)? {
        writeln!(output, "Added collaborator: {}", name)?;
    } else {
        warn!(path = %path.display(), "no \"{}\" line; nothing recorded", store::DISCUSSED_PREFIX);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use std::fs;
    use std::io::Cursor;

    fn at(mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    fn new_log(dir: &Path) -> PathBuf {
        let path = dir.join("log.txt");
        let mut out = Vec::new();
        cmd_create(&path, &mut Cursor::new("3\n"), &mut out).unwrap();
        path
    }

    fn stop(dir: &Path, now: NaiveDateTime, work: &str) -> Result<Spent> {
        let mut out = Vec::new();
        cmd_stop(dir, now, &mut Cursor::new(format!("{}\n", work)), &mut out)
    }

    #[test]
    fn test_create_records_trimmed_estimate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.txt");
        let mut out = Vec::new();
        cmd_create(&path, &mut Cursor::new("   6.5  \n"), &mut out).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(
            text.lines().next().unwrap(),
            "ESTIMATE of time to complete assignment: 6.5 hours"
        );
        let shown = String::from_utf8(out).unwrap();
        assert!(shown.starts_with(ESTIMATE_PROMPT));
        assert!(shown.contains("Created"));
    }

    #[test]
    fn test_create_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("log.txt");
        let mut out = Vec::new();
        let err = cmd_create(&path, &mut Cursor::new("3\n"), &mut out).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
        assert!(out.is_empty());
    }

    #[test]
    fn test_start_without_log() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = Vec::new();
        let err = cmd_start(dir.path(), at(3, 4, 9, 0), &mut out).unwrap_err();
        assert!(matches!(err, Error::LogFileNotFound));
    }

    #[test]
    fn test_start_appends_open_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = new_log(dir.path());
        let mut out = Vec::new();
        let found = cmd_start(dir.path(), at(3, 4, 9, 5), &mut out).unwrap();
        assert_eq!(found.file_name(), path.file_name());
        let log = LogFile::load(&path).unwrap();
        let open = log.open_entry().unwrap();
        assert_eq!(open.started, "03/04  09:05AM");
        assert!(String::from_utf8(out).unwrap().contains("03/04  09:05AM"));
    }

    #[test]
    fn test_start_from_subdirectory() {
        let dir = tempfile::tempdir().unwrap();
        let path = new_log(dir.path());
        let sub = dir.path().join("src");
        fs::create_dir(&sub).unwrap();
        let mut out = Vec::new();
        cmd_start(&sub, at(3, 4, 9, 5), &mut out).unwrap();
        assert!(LogFile::load(&path).unwrap().open_entry().is_some());
    }

    #[test]
    fn test_start_twice_fails_and_leaves_file_unmodified() {
        let dir = tempfile::tempdir().unwrap();
        let path = new_log(dir.path());
        let mut out = Vec::new();
        cmd_start(dir.path(), at(3, 4, 9, 5), &mut out).unwrap();
        let before = fs::read_to_string(&path).unwrap();
        let err = cmd_start(dir.path(), at(3, 4, 9, 30), &mut out).unwrap_err();
        assert!(matches!(err, Error::IncompleteEntryConflict));
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn test_stop_closes_entry_and_updates_total() {
        let dir = tempfile::tempdir().unwrap();
        let path = new_log(dir.path());
        let mut out = Vec::new();
        cmd_start(dir.path(), at(3, 4, 9, 5), &mut out).unwrap();
        let mut out = Vec::new();
        let total = cmd_stop(
            dir.path(),
            at(3, 4, 10, 35),
            &mut Cursor::new("  read the handout \n"),
            &mut out,
        )
        .unwrap();
        assert_eq!(total.to_string(), "01:30");
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("03/04  09:05AM  01:30  read the handout\n"));
        assert!(text.contains("                01:30  TOTAL time spent\n"));
        let shown = String::from_utf8(out).unwrap();
        assert!(shown.starts_with(WORK_PROMPT));
        assert!(shown.contains("01:30 total"));
    }

    #[test]
    fn test_stop_without_open_entry_fails_before_prompting() {
        let dir = tempfile::tempdir().unwrap();
        let path = new_log(dir.path());
        let before = fs::read_to_string(&path).unwrap();
        let mut out = Vec::new();
        let err = cmd_stop(dir.path(), at(3, 4, 9, 0), &mut Cursor::new("x\n"), &mut out).unwrap_err();
        assert!(matches!(err, Error::NoOpenEntry));
        assert!(out.is_empty());
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn test_stop_with_unparsable_stamp_leaves_file_unmodified() {
        let dir = tempfile::tempdir().unwrap();
        let path = new_log(dir.path());
        let text = fs::read_to_string(&path)
            .unwrap()
            .replace("--------------\n\n", "--------------\n13/45  09:00AM\n\n");
        fs::write(&path, &text).unwrap();
        let err = stop(dir.path(), at(3, 4, 9, 0), "x").unwrap_err();
        assert!(matches!(err, Error::TimeParse(_)));
        assert_eq!(fs::read_to_string(&path).unwrap(), text);
    }

    #[test]
    fn test_total_is_sum_of_sessions() {
        let dir = tempfile::tempdir().unwrap();
        let path = new_log(dir.path());
        let sessions = [(at(3, 1, 9, 0), 45), (at(3, 2, 20, 10), 95), (at(3, 3, 23, 30), 50)];
        let mut out = Vec::new();
        let mut total = Spent::ZERO;
        for (i, (start, minutes)) in sessions.iter().enumerate() {
            cmd_start(dir.path(), *start, &mut out).unwrap();
            total = stop(dir.path(), *start + Duration::minutes(*minutes), &format!("part {}", i)).unwrap();
        }
        assert_eq!(total.minutes(), 45 + 95 + 50);
        let log = LogFile::load(&path).unwrap();
        assert_eq!(log.total, total);
        assert_eq!(log.entries().count(), 3);
        assert!(log.open_entry().is_none());
    }

    #[test]
    fn test_stop_after_midnight_new_year() {
        let dir = tempfile::tempdir().unwrap();
        new_log(dir.path());
        let start = at(12, 31, 23, 50);
        let mut out = Vec::new();
        cmd_start(dir.path(), start, &mut out).unwrap();
        let total = stop(dir.path(), start + Duration::minutes(15), "late night").unwrap();
        assert_eq!(total.to_string(), "00:15");
    }

    #[test]
    fn test_collab_requires_a_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = Vec::new();
        let err = cmd_collab(dir.path(), &[], &mut out).unwrap_err();
        assert!(matches!(err, Error::MissingArgument(_)));
    }

    #[test]
    fn test_collab_appends_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = new_log(dir.path());
        let mut out = Vec::new();
        cmd_collab(dir.path(), &["Alice".to_string()], &mut out).unwrap();
        cmd_collab(dir.path(), &["Bob".to_string(), "Smith".to_string()], &mut out).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("I discussed my solution with: Alice, Bob Smith\n"));
    }

    #[test]
    fn test_collab_without_log() {
        let dir = tempfile::tempdir().unwrap();
        let mut out = Vec::new();
        let err = cmd_collab(dir.path(), &["Alice".to_string()], &mut out).unwrap_err();
        assert!(matches!(err, Error::LogFileNotFound));
    }
}
