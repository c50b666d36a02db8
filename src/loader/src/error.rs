use std::io;
use std::result;

use thiserror::Error;

pub type Result<T> = result::Result<T, LoaderError>;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("SqliteError: {0:?}")]
    SqliteError(#[from] rusqlite::Error),
    #[error("CSVError: {0:?}")]
    CSVError(#[from] csv::Error),
    #[error("StdIO: {0:?}")]
    StdIO(#[from] io::Error),
    #[error("FileNotFound: {0:?}")]
    FileNotFound(String),
    #[error("UnknownQuery: {0:?}")]
    UnknownQuery(String),
}
