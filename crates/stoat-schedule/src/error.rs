use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("schedule parse error: {0}")]
    Parse(String),

    #[error("{day}/{month} is not a calendar day")]
    InvalidDayMonth { day: u32, month: u32 },

    #[error("end date {end} is before start date {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
