use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use loader::load::load_dir;
use loader::schema::create_tables;
use loader::schema::drop_tables;
use tracing::info;

use crate::error::Result;

#[derive(Parser, Clone, Debug)]
pub struct Load {
    /// SQLite database file, created when missing
    #[arg(long, default_value = "gym.db")]
    pub db: PathBuf,
    /// Directory holding the generated CSV files
    #[arg(long, default_value = "data")]
    pub data_path: PathBuf,
}

#[derive(Parser, Clone, Debug)]
pub struct DropTables {
    #[arg(long, default_value = "gym.db")]
    pub db: PathBuf,
}

pub fn start(args: &Load) -> Result<()> {
    let start = Instant::now();
    let mut conn = loader::open(&args.db)?;
    create_tables(&conn)?;
    let report = load_dir(&mut conn, &args.data_path)?;
    for (table, rows) in &report.tables {
        info!("{table}: {rows} row(s)");
    }
    info!(
        "loaded into {:?} in {}",
        args.db,
        humantime::format_duration(start.elapsed())
    );

    Ok(())
}

pub fn drop_schema(args: &DropTables) -> Result<()> {
    let conn = loader::open(&args.db)?;
    drop_tables(&conn)?;
    info!("tables dropped from {:?}", args.db);

    Ok(())
}
