//! Recurring day/month dates and their expansion onto the simulation horizon.
//!
//! # Expansion rule
//!
//! A [`DayMonth`] recurs every year.  For each year from the start year to
//! the end year inclusive, the date is kept if it falls within
//! `[start, end]` and contributes its offset (in days) from `start`.  A
//! window of `span` days contributes that offset and the `span - 1` days
//! after it (used for multi-day trapping sessions).  29 February only
//! occurs in leap years.
//!
//! The horizon is `end - start` days, so the end date itself is never
//! simulated.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use stoat_core::SimDay;

use crate::{ScheduleError, ScheduleResult};

// ── DayMonth ──────────────────────────────────────────────────────────────────

/// A day of the year, written `"DD/MM"` in configuration files.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DayMonth {
    day:   u32,
    month: u32,
}

impl DayMonth {
    /// Validated against a leap year, so `29/2` is accepted.
    pub fn new(day: u32, month: u32) -> ScheduleResult<Self> {
        Self::checked(day, month).ok_or(ScheduleError::InvalidDayMonth { day, month })
    }

    /// `const` form of [`DayMonth::new`] for built-in defaults.
    pub const fn checked(day: u32, month: u32) -> Option<Self> {
        let last = match month {
            2 => 29,
            4 | 6 | 9 | 11 => 30,
            1..=12 => 31,
            _ => return None,
        };
        if day == 0 || day > last {
            return None;
        }
        Some(Self { day, month })
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// This day/month in `year`, if it exists there.
    pub fn in_year(&self, year: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, self.month, self.day)
    }
}

impl fmt::Display for DayMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.day, self.month)
    }
}

impl FromStr for DayMonth {
    type Err = ScheduleError;

    fn from_str(s: &str) -> ScheduleResult<Self> {
        let (d, m) = s
            .trim()
            .split_once('/')
            .ok_or_else(|| ScheduleError::Parse(format!("expected DD/MM, got {s:?}")))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<u32>()
                .map_err(|e| ScheduleError::Parse(format!("{s:?}: {e}")))
        };
        DayMonth::new(parse(d)?, parse(m)?)
    }
}

impl TryFrom<String> for DayMonth {
    type Error = ScheduleError;

    fn try_from(s: String) -> ScheduleResult<Self> {
        s.parse()
    }
}

impl From<DayMonth> for String {
    fn from(dm: DayMonth) -> String {
        dm.to_string()
    }
}

// ── DaySet ────────────────────────────────────────────────────────────────────

/// Sorted, de-duplicated set of simulation days.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DaySet {
    days: Vec<SimDay>,
}

impl DaySet {
    pub fn new(mut days: Vec<SimDay>) -> Self {
        days.sort_unstable();
        days.dedup();
        Self { days }
    }

    #[inline]
    pub fn contains(&self, day: SimDay) -> bool {
        self.days.binary_search(&day).is_ok()
    }

    pub fn days(&self) -> &[SimDay] {
        &self.days
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl FromIterator<SimDay> for DaySet {
    fn from_iter<I: IntoIterator<Item = SimDay>>(iter: I) -> Self {
        DaySet::new(iter.into_iter().collect())
    }
}

// ── Calendar ──────────────────────────────────────────────────────────────────

/// The simulated period `[start, end)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Calendar {
    start: NaiveDate,
    end:   NaiveDate,
}

impl Calendar {
    pub fn new(start: NaiveDate, end: NaiveDate) -> ScheduleResult<Self> {
        if end < start {
            return Err(ScheduleError::EndBeforeStart { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of simulated days.
    pub fn n_days(&self) -> u32 {
        (self.end - self.start).num_days() as u32
    }

    /// Calendar date of a simulation day.
    pub fn date_of(&self, day: SimDay) -> Option<NaiveDate> {
        self.start.checked_add_days(chrono::Days::new(day.0 as u64))
    }

    /// Expand recurring dates onto day offsets; each occurrence opens a
    /// window of `span` consecutive days.
    pub fn days_for(&self, dates: &[DayMonth], span: u32) -> DaySet {
        let mut days = Vec::new();
        for dm in dates {
            for year in self.start.year()..=self.end.year() {
                let Some(date) = dm.in_year(year) else { continue };
                if date < self.start || date > self.end {
                    continue;
                }
                let first = (date - self.start).num_days() as u32;
                days.extend((0..span).map(|n| SimDay(first + n)));
            }
        }
        DaySet::new(days)
    }
}
