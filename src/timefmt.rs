// Copyright (c) 2025 Robert August Vincent II <pillarsdotnet@gmail.com>
// Co-author: Cursor-AI.

//! Start stamps (`MM/DD  HH:MMAM`) and `HH:MM` spent durations.

use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;

use chrono::{Datelike, NaiveDateTime};

use crate::error::{Error, Result};

/// Layout of the "Date / Time Started" columns. Two spaces between date and time.
pub const STAMP_FORMAT: &str = "%m/%d  %I:%M%p";

/// Renders a local time as a start stamp, e.g. `03/04  09:05AM`.
pub fn format_stamp(t: NaiveDateTime) -> String {
    t.format(STAMP_FORMAT).to_string()
}

/// Parses a stamp, which carries no year, as falling in `year`.
fn parse_stamp(stamp: &str, year: i32) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(&format!("{} {}", year, stamp), "%Y %m/%d  %I:%M%p").ok()
}

/// Time from `stamp` until `now`.
///
/// The stamp is placed in `now`'s year unless that would put it on a later calendar day than `now`,
/// in which case the session started last year (Dec 31 start, Jan 1 stop).
pub fn elapsed(stamp: &str, now: NaiveDateTime) -> Result<Spent> {
    let stamp = stamp.trim();
    let year = now.year();
    let this_year = parse_stamp(stamp, year);
    let start = match this_year {
        Some(start) if start.date() <= now.date() => start,
        _ => parse_stamp(stamp, year - 1)
            .or(this_year)
            .ok_or_else(|| Error::TimeParse(stamp.to_string()))?,
    };
    let minutes = (now - start).num_minutes().unsigned_abs();
    Ok(Spent::from_minutes(u32::try_from(minutes).unwrap_or(u32::MAX)))
}

/// A duration in whole minutes, shown as zero-padded `HH:MM`. Hours are not wrapped at a day.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Spent(u32);

impl Spent {
    pub const ZERO: Spent = Spent(0);

    pub fn from_minutes(minutes: u32) -> Self {
        Spent(minutes)
    }

    pub fn minutes(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Spent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl FromStr for Spent {
    type Err = Error;

    /// Accepts `H:MM` with any number of hour digits; minutes must be two digits below 60.
    fn from_str(s: &str) -> Result<Self> {
        let bad = || Error::TimeParse(s.to_string());
        let (h, m) = s.trim().split_once(':').ok_or_else(bad)?;
        if h.is_empty() || !h.bytes().all(|b| b.is_ascii_digit()) {
            return Err(bad());
        }
        if m.len() != 2 || !m.bytes().all(|b| b.is_ascii_digit()) {
            return Err(bad());
        }
        let hours: u32 = h.parse().map_err(|_| bad())?;
        let minutes: u32 = m.parse().map_err(|_| bad())?;
        if minutes >= 60 {
            return Err(bad());
        }
        hours
            .checked_mul(60)
            .and_then(|h| h.checked_add(minutes))
            .map(Spent)
            .ok_or_else(bad)
    }
}

impl Add for Spent {
    type Output = Spent;

    fn add(self, rhs: Spent) -> Spent {
        Spent(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Spent {
    fn sum<I: Iterator<Item = Spent>>(iter: I) -> Spent {
        iter.fold(Spent::ZERO, Add::add)
    }
}
