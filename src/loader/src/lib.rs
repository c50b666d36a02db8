use std::path::Path;

use rusqlite::Connection;
use tracing::debug;

use crate::error::Result;

pub mod error;
pub mod load;
pub mod queries;
pub mod schema;

/// Opens (or creates) the database file with foreign key enforcement on.
pub fn open(path: &Path) -> Result<Connection> {
    debug!("opening database {path:?}");
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;

    Ok(conn)
}
