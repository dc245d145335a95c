// Copyright (c) 2025 Robert August Vincent II <pillarsdotnet@gmail.com>
// Co-author: Cursor-AI.

//! # Log file layout
//!
//! ```text
//! ESTIMATE of time to complete assignment: 4 hours
//!
//!        Time     Time
//! Date   Started  Spent  Work Completed
//! -----  -------  -----  --------------
//! 03/04  09:05AM  01:42  read the handout
//! 03/05  07:30PM
//!
//!                 -----
//!                 01:42  TOTAL time spent
//!
//! I discussed my solution with: Alice, Bob
//!
//! DISCUSSION:
//! ```
//!
//! Rows between the column rule and the separator are entries. An entry with no spent time is open.
//! Lines that do not parse as entries are kept verbatim and never counted.

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::locator::MARKER;
use crate::timefmt::Spent;

const COLUMN_TITLES: &str = "       Time     Time";
const COLUMN_NAMES: &str = "Date   Started  Spent  Work Completed";
const COLUMN_RULE: &str = "-----  -------  -----  --------------";
/// Line between the entries and the total.
pub const SEPARATOR: &str = "                -----";
const TOTAL_SUFFIX: &str = "TOTAL time spent";
pub const DISCUSSED_PREFIX: &str = "I discussed my solution with:";
const DISCUSSION: &str = "DISCUSSION:";

/// Column where "Time Spent" begins; the work description starts two columns after it.
const SPENT_COLUMN: usize = 16;

fn entry_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^\s*(?P<started>\d{1,2}/\d{1,2}\s+\d{1,2}:\d{2}\s*[AaPp][Mm])(?:\s+(?P<spent>\d+:\d{2})(?:\s+(?P<work>.*?))?)?\s*$",
        )
        .expect("entry pattern is valid")
    })
}

fn total_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(?P<total>\d+:\d{2})\s+TOTAL time spent").expect("total pattern is valid")
    })
}

/// One work session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    /// Start stamp as written, e.g. `03/04  09:05AM`.
    pub started: String,
    pub spent: Option<Spent>,
    pub work: String,
}

impl Entry {
    pub fn open(started: impl Into<String>) -> Self {
        Entry {
            started: started.into(),
            spent: None,
            work: String::new(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.spent.is_none()
    }

    pub fn parse(line: &str) -> Option<Entry> {
        let caps = entry_re().captures(line)?;
        let spent = match caps.name("spent") {
            Some(m) => Some(m.as_str().parse().ok()?),
            None => None,
        };
        Some(Entry {
            started: caps["started"].to_string(),
            spent,
            work: caps
                .name("work")
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
        })
    }

    pub fn render(&self) -> String {
        let mut line = format!("{:<width$}", self.started, width = SPENT_COLUMN);
        if self.started.len() >= SPENT_COLUMN {
            line.push_str("  ");
        }
        if let Some(spent) = self.spent {
            line.push_str(&format!("{}  {}", spent, self.work));
        }
        line
    }
}

/// A line of the entry table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Row {
    Entry(Entry),
    /// Anything else between the column rule and the separator, preserved as-is.
    Other(String),
}

impl Row {
    fn parse(line: &str) -> Row {
        match Entry::parse(line) {
            Some(entry) => Row::Entry(entry),
            None => Row::Other(line.to_string()),
        }
    }

    fn render(&self) -> String {
        match self {
            Row::Entry(e) => e.render(),
            Row::Other(s) => s.clone(),
        }
    }
}

/// In-memory view of a log file: header, entry table, total and everything after it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogFile {
    /// Marker line through the column rule.
    pub header: Vec<String>,
    pub rows: Vec<Row>,
    pub total: Spent,
    /// Lines after the total line (collaborators, discussion), verbatim.
    pub tail: Vec<String>,
}

impl LogFile {
    pub fn parse(text: &str) -> Result<LogFile> {
        let lines: Vec<&str> = text.lines().collect();
        let rule = lines
            .iter()
            .position(|l| l.starts_with(COLUMN_RULE))
            .ok_or_else(|| Error::MalformedLogFile("column header rule missing".to_string()))?;
        let sep = lines[rule + 1..]
            .iter()
            .position(|l| l.contains(SEPARATOR))
            .map(|i| rule + 1 + i)
            .ok_or_else(|| Error::MalformedLogFile("separator line missing".to_string()))?;
        let total = lines
            .get(sep + 1)
            .and_then(|l| total_re().captures(l))
            .and_then(|c| c["total"].parse::<Spent>().ok())
            .ok_or_else(|| Error::MalformedLogFile("total time line missing".to_string()))?;
        Ok(LogFile {
            header: lines[..=rule].iter().map(|l| l.to_string()).collect(),
            rows: lines[rule + 1..sep]
                .iter()
                .filter(|l| !l.trim().is_empty())
                .map(|l| Row::parse(l))
                .collect(),
            total,
            tail: lines[sep + 2..].iter().map(|l| l.to_string()).collect(),
        })
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.header {
            out.push_str(line);
            out.push('\n');
        }
        for row in &self.rows {
            out.push_str(&row.render());
            out.push('\n');
        }
        out.push('\n');
        out.push_str(SEPARATOR);
        out.push('\n');
        out.push_str(&total_line(self.total));
        out.push('\n');
        for line in &self.tail {
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    pub fn load(path: &Path) -> Result<LogFile> {
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let log = LogFile::parse(&text)?;
        debug!(path = %path.display(), rows = log.rows.len(), total = %log.total, "loaded log");
        Ok(log)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.render()).map_err(|e| Error::io(path, e))?;
        info!(path = %path.display(), total = %self.total, "wrote log");
        Ok(())
    }

    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.rows.iter().filter_map(|r| match r {
            Row::Entry(e) => Some(e),
            Row::Other(_) => None,
        })
    }

    pub fn last_entry(&self) -> Option<&Entry> {
        self.entries().last()
    }

    /// The first entry without a spent time.
    pub fn open_entry(&self) -> Option<&Entry> {
        self.entries().find(|e| e.is_open())
    }

    /// Sum of every closed entry.
    pub fn closed_total(&self) -> Spent {
        self.entries().filter_map(|e| e.spent).sum()
    }

    /// Appends `entry` after the last row. Refused while the last entry is still open.
    pub fn push_entry(&mut self, entry: Entry) -> Result<()> {
        if self.last_entry().is_some_and(Entry::is_open) {
            return Err(Error::IncompleteEntryConflict);
        }
        self.rows.push(Row::Entry(entry));
        Ok(())
    }

    /// Closes the first open entry and recomputes the total, which is returned.
    pub fn close_open_entry(&mut self, spent: Spent, work: &str) -> Result<Spent> {
        let entry = self
            .rows
            .iter_mut()
            .find_map(|r| match r {
                Row::Entry(e) if e.is_open() => Some(e),
                _ => None,
            })
            .ok_or(Error::NoOpenEntry)?;
        entry.spent = Some(spent);
        entry.work = work.trim().to_string();
        self.total = self.closed_total();
        debug!(
            spent_minutes = spent.minutes(),
            total_minutes = self.total.minutes(),
            "closed entry"
        );
        Ok(self.total)
    }
}

fn total_line(total: Spent) -> String {
    format!("{}{}  {}", " ".repeat(SPENT_COLUMN), total, TOTAL_SUFFIX)
}

/// Text of a fresh log with no estimate, no entries and a zero total.
pub fn skeleton() -> String {
    format!(
        "{MARKER}: \n\n{COLUMN_TITLES}\n{COLUMN_NAMES}\n{COLUMN_RULE}\n\n{SEPARATOR}\n{}\n\n{DISCUSSED_PREFIX} \n\n{DISCUSSION}\n\n\n",
        total_line(Spent::ZERO)
    )
}

/// Writes a fresh log to `path`, replacing anything already there.
pub fn create_skeleton(path: &Path) -> Result<()> {
    fs::write(path, skeleton()).map_err(|e| Error::io(path, e))?;
    info!(path = %path.display(), "created log skeleton");
    Ok(())
}

/// Rewrites `path` with `edit` applied to the first line for which `matches` is true.
/// Returns false, without writing, when no line matches.
fn edit_first_line(
    path: &Path,
    matches: impl Fn(&str) -> bool,
    edit: impl FnOnce(&mut String),
) -> Result<bool> {
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let mut lines: Vec<String> = text.lines().map(str::to_string).collect();
    let Some(line) = lines.iter_mut().find(|l| matches(l.as_str())) else {
        return Ok(false);
    };
    edit(line);
    let mut out = lines.join("\n");
    out.push('\n');
    fs::write(path, out).map_err(|e| Error::io(path, e))?;
    Ok(true)
}

/// Appends `<estimate> hours` to the marker line. No-op when the marker line is missing.
pub fn insert_estimate(path: &Path, estimate: &str) -> Result<bool> {
    let marker = format!("{MARKER}:");
    edit_first_line(
        path,
        |l| l.contains(&marker),
        |l| l.push_str(&format!("{} hours", estimate)),
    )
}

/// Adds `entry` to the log at `path` as the new last row.
pub fn append_entry(path: &Path, entry: Entry) -> Result<()> {
    let mut log = LogFile::load(path)?;
    log.push_entry(entry)?;
    log.save(path)
}

/// Closes the open entry in the log at `path` and returns the new total.
pub fn close_open_entry(path: &Path, spent: Spent, work: &str) -> Result<Spent> {
    let mut log = LogFile::load(path)?;
    let total = log.close_open_entry(spent, work)?;
    log.save(path)?;
    Ok(total)
}

/// Adds `name` to the "discussed my solution with" line, comma-separated from earlier names.
/// No-op when that line is missing.
pub fn append_collaborator(path: &Path, name: &str) -> Result<bool> {
    edit_first_line(
        path,
        |l| l.starts_with(DISCUSSED_PREFIX),
        |l| {
            if !l.ends_with(' ') {
                l.push_str(", ");
            }
            l.push_str(name);
        },
    )
}
