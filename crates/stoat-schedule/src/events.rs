//! `EventCalendar`: which scheduled events fall on each simulation day.

use serde::{Deserialize, Serialize};
use tracing::debug;

use stoat_core::SimDay;

use crate::{Calendar, DayMonth, DaySet};

/// Recurring event dates of a campaign, as configured.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventDates {
    pub lure_release: Vec<DayMonth>,
    pub estrus_start: DayMonth,
    pub estrus_end:   DayMonth,
    pub dispersal:    DayMonth,
    pub birth:        DayMonth,
    /// First day of each trapping session.  Empty means no trapping.
    pub trapping:     Vec<DayMonth>,
    /// Length of each trapping session in days.
    pub trap_session_days: u32,
}

/// The flags the scheduler checks at the start of a day.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DayEvents {
    pub lure_release: bool,
    pub estrus_start: bool,
    pub estrus_end:   bool,
    pub dispersal:    bool,
    pub birth:        bool,
    pub trapping:     bool,
}

/// Expanded event days for one realisation.
#[derive(Clone, Debug)]
pub struct EventCalendar {
    calendar: Calendar,
    pub lure_release: DaySet,
    pub estrus_start: DaySet,
    pub estrus_end:   DaySet,
    pub dispersal:    DaySet,
    pub birth:        DaySet,
    pub trapping:     DaySet,
}

impl EventCalendar {
    pub fn new(calendar: Calendar, dates: &EventDates) -> Self {
        let ec = Self {
            calendar,
            lure_release: calendar.days_for(&dates.lure_release, 1),
            estrus_start: calendar.days_for(&[dates.estrus_start], 1),
            estrus_end:   calendar.days_for(&[dates.estrus_end], 1),
            dispersal:    calendar.days_for(&[dates.dispersal], 1),
            birth:        calendar.days_for(&[dates.birth], 1),
            trapping:     calendar.days_for(&dates.trapping, dates.trap_session_days),
        };
        debug!(
            horizon = ec.horizon(),
            releases = ec.lure_release.len(),
            trap_days = ec.trapping.len(),
            "event calendar expanded"
        );
        ec
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    /// Number of days to simulate.
    pub fn horizon(&self) -> u32 {
        self.calendar.n_days()
    }

    pub fn events_on(&self, day: SimDay) -> DayEvents {
        DayEvents {
            lure_release: self.lure_release.contains(day),
            estrus_start: self.estrus_start.contains(day),
            estrus_end:   self.estrus_end.contains(day),
            dispersal:    self.dispersal.contains(day),
            birth:        self.birth.contains(day),
            trapping:     self.trapping.contains(day),
        }
    }
}
