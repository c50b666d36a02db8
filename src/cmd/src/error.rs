use std::result;

use chrono::OutOfRangeError;
use gym_gen::error::GymGenError;
use loader::error::LoaderError;
use thiserror::Error;
use tracing::subscriber::SetGlobalDefaultError;

pub type Result<T> = result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("GymGen: {0}")]
    GymGen(#[from] GymGenError),
    #[error("Loader: {0}")]
    Loader(#[from] LoaderError),
    #[error("Config: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("StdIO: {0:?}")]
    StdIO(#[from] std::io::Error),
    #[error("TimeDurationOutOfRange: {0:?}")]
    TimeDurationOutOfRange(#[from] OutOfRangeError),
    #[error("ParseDuration: {0:?}")]
    ParseDuration(#[from] parse_duration::parse::Error),
    #[error("SetGlobalDefaultError: {0:?}")]
    SetGlobalDefaultError(#[from] SetGlobalDefaultError),
    #[error("other: {0:?}")]
    Other(#[from] anyhow::Error),
}
