use chrono::Datelike;
use chrono::Duration;
use chrono::NaiveDate;
use chrono::Weekday;
use rand::Rng;

use crate::error::GymGenError;
use crate::error::Result;

pub const DEFAULT_MAX_DATE_RETRIES: usize = 1000;

/// Calendar range `[start, end)` over which visits are spread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl SimulationWindow {
    pub fn try_new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(GymGenError::InvalidConfig(format!(
                "window start {start} is after its end {end}"
            )));
        }

        Ok(Self { start, end })
    }

    /// The `days` days right before `end`.
    pub fn ending_at(end: NaiveDate, days: i64) -> Result<Self> {
        let start = end
            .checked_sub_signed(Duration::days(days))
            .ok_or_else(|| GymGenError::InvalidConfig(format!("{days} day(s) before {end}")))?;

        Self::try_new(start, end)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }
}

pub fn pick_date_matching_weekday<R: Rng + ?Sized>(
    window: &SimulationWindow,
    weekday: Weekday,
    rng: &mut R,
) -> Result<NaiveDate> {
    pick_date_matching_weekday_with_retries(window, weekday, DEFAULT_MAX_DATE_RETRIES, rng)
}

/// Rejection sampling of a uniform day offset until it lands on `weekday`.
/// Gives up after `max_attempts` draws.
pub fn pick_date_matching_weekday_with_retries<R: Rng + ?Sized>(
    window: &SimulationWindow,
    weekday: Weekday,
    max_attempts: usize,
    rng: &mut R,
) -> Result<NaiveDate> {
    let days = window.len_days();
    let too_narrow = |attempts| GymGenError::WindowTooNarrow {
        weekday,
        start: window.start,
        end: window.end,
        attempts,
    };
    if days == 0 {
        return Err(too_narrow(0));
    }

    for _ in 0..max_attempts {
        let offset = rng.gen_range(0..days);
        let date = window
            .start
            .checked_add_signed(Duration::days(offset))
            .ok_or_else(|| GymGenError::Internal(format!("{} + {offset} days", window.start)))?;
        if date.weekday() == weekday {
            return Ok(date);
        }
    }

    Err(too_narrow(max_attempts))
}
