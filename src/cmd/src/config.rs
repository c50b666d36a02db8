use std::collections::HashMap;

use chrono::NaiveDate;
use chrono::Utc;
use chrono::Weekday;
use clap::ValueEnum;
use dateparser::DateTimeUtc;
use gym_gen::assembler;
use gym_gen::sampler::DailyHourProfile;
use gym_gen::sampler::HourBand;
use gym_gen::sampler::SimulationWindow;
use gym_gen::sampler::VisitSampler;
use gym_gen::sampler::WeekdayWeightTable;
use gym_gen::sampler::DEFAULT_MAX_DATE_RETRIES;
use gym_gen::sampler::WEEKDAYS;
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing::Level;

use crate::error::Error;
use crate::error::Result;

#[derive(Debug, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Log {
    pub level: LogLevel,
}

#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Copy)]
pub struct Bounds {
    pub min: usize,
    pub max: usize,
}

impl Bounds {
    fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Dataset {
    pub customers: usize,
    pub members: usize,
    pub visits_per_member: Bounds,
    pub day_pass_purchases: Bounds,
    pub sales: Bounds,
    pub seed: Option<u64>,
    // last day of the simulation (exclusive), today when empty
    pub to_date: Option<String>,
    pub duration: String,
}

impl Default for Dataset {
    fn default() -> Self {
        Self {
            customers: 10_000,
            members: 1_000,
            visits_per_member: Bounds::new(50, 250),
            day_pass_purchases: Bounds::new(5_000, 15_000),
            sales: Bounds::new(3_000, 7_000),
            seed: None,
            to_date: None,
            duration: "730 days".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct Band {
    pub name: String,
    pub from: u32,
    pub to: u32,
    pub weight: f64,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Visits {
    pub max_date_retries: usize,
    // weekday name -> weight, unlisted weekdays keep the default
    pub weekday_weights: HashMap<String, f64>,
    // weekday name -> bands, unlisted weekdays keep the default
    pub hours: HashMap<String, Vec<Band>>,
}

impl Default for Visits {
    fn default() -> Self {
        Self {
            max_date_retries: DEFAULT_MAX_DATE_RETRIES,
            weekday_weights: HashMap::new(),
            hours: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub log: Log,
    pub dataset: Dataset,
    pub visits: Visits,
}

fn parse_weekday(s: &str) -> Result<Weekday> {
    s.parse::<Weekday>()
        .map_err(|_| Error::BadRequest(format!("unknown weekday {s:?}")))
}

pub fn parse_duration_days(s: &str) -> Result<i64> {
    let days = chrono::Duration::from_std(parse_duration::parse(s)?)?.num_days();
    if days < 1 {
        return Err(Error::BadRequest(format!(
            "duration {s:?} must be at least one day"
        )));
    }

    Ok(days)
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }

    Ok(s.parse::<DateTimeUtc>()?.0.date_naive())
}

impl Visits {
    pub fn weekday_weights(&self) -> Result<WeekdayWeightTable> {
        let defaults = WeekdayWeightTable::default();
        let mut weights = [0.; 7];
        for (idx, weekday) in WEEKDAYS.iter().enumerate() {
            weights[idx] = defaults.weight(*weekday);
        }
        for (name, weight) in &self.weekday_weights {
            weights[parse_weekday(name)?.num_days_from_monday() as usize] = *weight;
        }

        Ok(WeekdayWeightTable::try_new(weights)?)
    }

    pub fn hour_profile(&self) -> Result<DailyHourProfile> {
        let mut profile = DailyHourProfile::climbing_gym();
        for (name, bands) in &self.hours {
            let bands = bands
                .iter()
                .map(|b| HourBand::try_new(b.name.clone(), b.from..b.to, b.weight))
                .collect::<gym_gen::Result<Vec<_>>>()?;
            profile.insert(parse_weekday(name)?, bands)?;
        }

        Ok(profile)
    }
}

impl Config {
    pub fn to_date(&self) -> Result<NaiveDate> {
        match &self.dataset.to_date {
            None => Ok(Utc::now().date_naive()),
            Some(dt) => parse_date(dt),
        }
    }

    pub fn sampler(&self, today: NaiveDate) -> Result<VisitSampler> {
        let weights = self.visits.weekday_weights()?;
        let hours = self.visits.hour_profile()?;
        let missing = hours.missing(&weights);
        if !missing.is_empty() {
            return Err(Error::BadRequest(format!(
                "no hour profile for {missing:?}"
            )));
        }

        let window =
            SimulationWindow::ending_at(today, parse_duration_days(&self.dataset.duration)?)?;

        Ok(VisitSampler::new(weights, hours, window)
            .with_max_date_retries(self.visits.max_date_retries))
    }

    pub fn assembler_config(&self, progress: bool) -> Result<assembler::Config> {
        let d = &self.dataset;
        let today = self.to_date()?;
        let visits = |v: usize| {
            u32::try_from(v)
                .map_err(|_| Error::BadRequest(format!("visits per member {v} is too large")))
        };
        Ok(assembler::Config {
            customers: d.customers,
            members: d.members,
            visits_per_member: visits(d.visits_per_member.min)?..=visits(d.visits_per_member.max)?,
            day_pass_purchases: d.day_pass_purchases.min..=d.day_pass_purchases.max,
            sales: d.sales.min..=d.sales.max,
            today,
            sampler: self.sampler(today)?,
            progress,
        })
    }
}

#[derive(Deserialize, Copy, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Default)]
pub enum LogLevel {
    #[serde(rename = "trace")]
    Trace,
    #[serde(rename = "debug")]
    Debug,
    #[default]
    #[serde(rename = "info")]
    Info,
    #[serde(rename = "warn")]
    Warn,
    #[serde(rename = "error")]
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
        .into()
    }
}
