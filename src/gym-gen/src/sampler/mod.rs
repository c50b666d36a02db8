//! Weighted sampling of visit timestamps.
//!
//! A visit is placed by three independent draws taken from the same rng in a fixed order:
//! the weekday, a date in the simulation window falling on that weekday, and an hour from
//! the weekday's hour profile. Seeding the rng makes the whole sequence reproducible.

use chrono::NaiveDate;
use chrono::NaiveTime;
use chrono::Weekday;
use rand::Rng;

use crate::error::Result;

mod hours;
mod weekday;
mod window;

pub use hours::pick_hour;
pub use hours::DailyHourProfile;
pub use hours::HourBand;
pub use weekday::pick_weekday;
pub use weekday::WeekdayWeightTable;
pub use weekday::WEEKDAYS;
pub use window::pick_date_matching_weekday;
pub use window::pick_date_matching_weekday_with_retries;
pub use window::SimulationWindow;
pub use window::DEFAULT_MAX_DATE_RETRIES;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisitTimestamp {
    pub date: NaiveDate,
    pub hour: u32,
}

impl VisitTimestamp {
    pub fn time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour, 0, 0).unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct VisitSampler {
    weekdays: WeekdayWeightTable,
    hours: DailyHourProfile,
    window: SimulationWindow,
    max_date_retries: usize,
}

impl VisitSampler {
    pub fn new(
        weekdays: WeekdayWeightTable,
        hours: DailyHourProfile,
        window: SimulationWindow,
    ) -> Self {
        Self {
            weekdays,
            hours,
            window,
            max_date_retries: DEFAULT_MAX_DATE_RETRIES,
        }
    }

    pub fn with_max_date_retries(mut self, max_date_retries: usize) -> Self {
        self.max_date_retries = max_date_retries;
        self
    }

    pub fn window(&self) -> &SimulationWindow {
        &self.window
    }

    pub fn weekdays(&self) -> &WeekdayWeightTable {
        &self.weekdays
    }

    pub fn hours(&self) -> &DailyHourProfile {
        &self.hours
    }

    /// Weekday, then date, then hour.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<VisitTimestamp> {
        let weekday: Weekday = pick_weekday(&self.weekdays, rng);
        let date = pick_date_matching_weekday_with_retries(
            &self.window,
            weekday,
            self.max_date_retries,
            rng,
        )?;
        let hour = pick_hour(&self.hours, weekday, rng)?;

        Ok(VisitTimestamp { date, hour })
    }
}
