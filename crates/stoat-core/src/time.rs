//! Simulation time model.
//!
//! # Design
//!
//! The model advances in two nested integer units: simulated days (the
//! calendar granularity of every scheduled event) and hours within a day
//! (the movement granularity).  `hours_per_day` is a model parameter, not a
//! wall-clock fact: the reference parameterisation uses 16 active hours.
//!
//! Integer time keeps all calendar arithmetic exact and comparisons O(1).

use std::fmt;

// ── SimDay ───────────────────────────────────────────────────────────────────

/// Zero-based day offset from the simulation start date.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimDay(pub u32);

impl SimDay {
    pub const ZERO: SimDay = SimDay(0);

    /// Return the day `n` days after `self`.
    #[inline]
    pub fn offset(self, n: u32) -> SimDay {
        SimDay(self.0 + n)
    }

    /// Signed day number, for arithmetic against backdated pregnancy days.
    #[inline]
    pub fn as_i64(self) -> i64 {
        self.0 as i64
    }
}

impl fmt::Display for SimDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "D{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Current (day, hour) position of a realisation.
///
/// `SimClock` is cheap to copy and holds no heap data.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    pub day: SimDay,
    /// Hour within `day`, in `0..hours_per_day`.
    pub hour: u32,
    pub hours_per_day: u32,
}

impl SimClock {
    /// A clock positioned at day 0, hour 0.
    pub fn new(hours_per_day: u32) -> Self {
        Self { day: SimDay::ZERO, hour: 0, hours_per_day }
    }

    /// A clock positioned at `(day, hour)`.
    pub fn at(day: SimDay, hour: u32, hours_per_day: u32) -> Self {
        debug_assert!(hour < hours_per_day, "hour must be < hours_per_day");
        Self { day, hour, hours_per_day }
    }

    /// Advance by one hour, rolling into the next day after the last hour.
    /// Returns `true` if a new day began.
    pub fn advance(&mut self) -> bool {
        self.hour += 1;
        if self.hour >= self.hours_per_day {
            self.hour = 0;
            self.day = self.day.offset(1);
            return true;
        }
        false
    }

    #[inline]
    pub fn is_first_hour(&self) -> bool {
        self.hour == 0
    }

    /// Natural mortality is evaluated on this hour only.
    #[inline]
    pub fn is_last_hour(&self) -> bool {
        self.hour + 1 == self.hours_per_day
    }

    /// Flat hour counter since the start of the realisation.
    #[inline]
    pub fn hour_index(&self) -> u64 {
        self.day.0 as u64 * self.hours_per_day as u64 + self.hour as u64
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} h{:02}", self.day, self.hour)
    }
}
