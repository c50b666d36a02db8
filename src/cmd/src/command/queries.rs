use std::io;
use std::path::PathBuf;

use clap::Parser;
use loader::queries::run_query;
use loader::queries::write_queries;
use loader::queries::QUERIES;
use tracing::info;

use crate::error::Result;

#[derive(Parser, Clone, Debug)]
pub struct Queries {
    /// Directory the .sql files are written to
    #[arg(long, default_value = "queries")]
    pub out_path: PathBuf,
    /// Print the available queries instead of writing them
    #[arg(long, default_value_t = false)]
    pub list: bool,
}

#[derive(Parser, Clone, Debug)]
pub struct Query {
    #[arg(long, default_value = "gym.db")]
    pub db: PathBuf,
    /// Name of a canned query, see `queries --list`
    pub name: String,
}

pub fn write(args: &Queries) -> Result<()> {
    if args.list {
        for q in QUERIES {
            println!("{:<30}{}", q.name, q.description);
        }
        return Ok(());
    }

    write_queries(&args.out_path)?;

    Ok(())
}

pub fn run(args: &Query) -> Result<()> {
    let conn = loader::open(&args.db)?;
    let rows = run_query(&conn, &args.name, io::stdout().lock())?;
    info!("{}: {rows} row(s)", args.name);

    Ok(())
}
