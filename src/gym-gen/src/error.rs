use std::io;
use std::result;

use chrono::NaiveDate;
use chrono::Weekday;
use thiserror::Error;

pub type Result<T> = result::Result<T, GymGenError>;

#[derive(Error, Debug)]
pub enum GymGenError {
    #[error("UnknownWeekdayProfile: no hour profile for {0:?}")]
    UnknownWeekdayProfile(Weekday),
    #[error("WindowTooNarrow: no {weekday:?} found in [{start}, {end}) after {attempts} attempt(s)")]
    WindowTooNarrow {
        weekday: Weekday,
        start: NaiveDate,
        end: NaiveDate,
        attempts: usize,
    },
    #[error("InvalidConfig: {0}")]
    InvalidConfig(String),
    #[error("Internal: {0:?}")]
    Internal(String),
    #[error("CSVError: {0:?}")]
    CSVError(#[from] csv::Error),
    #[error("StdIO: {0:?}")]
    StdIO(#[from] io::Error),
}

impl GymGenError {
    /// Errors scoped to a single sampling call. The caller may skip the entity and go on.
    pub fn is_sampling(&self) -> bool {
        matches!(
            self,
            GymGenError::UnknownWeekdayProfile(_) | GymGenError::WindowTooNarrow { .. }
        )
    }
}
