//! `stoat-schedule`: the campaign calendar.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`calendar`]  | `DayMonth`, `DaySet`, `Calendar` (date → day expansion)   |
//! | [`events`]    | `EventDates`, `EventCalendar`, `DayEvents`                |
//! | [`error`]     | `ScheduleError`, `ScheduleResult<T>`                      |
//!
//! Dates are configured as recurring day/month pairs and expanded once per
//! realisation into sorted day sets, so the per-day lookups in the scheduler
//! are binary searches.

pub mod calendar;
pub mod error;
pub mod events;

#[cfg(test)]
mod tests;

pub use calendar::{Calendar, DayMonth, DaySet};
pub use error::{ScheduleError, ScheduleResult};
pub use events::{DayEvents, EventCalendar, EventDates};
