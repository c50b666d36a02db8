use std::io;
use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use cmd::command::generate;
use cmd::command::generate::Generate;
use cmd::command::load;
use cmd::command::load::DropTables;
use cmd::command::load::Load;
use cmd::command::queries;
use cmd::command::queries::Queries;
use cmd::command::queries::Query;
use cmd::config::Config;
use cmd::config::LogLevel;
use cmd::error::Error;
use cmd::error::Result;
use tracing::debug;
use tracing_subscriber::FmtSubscriber;

#[derive(Subcommand, Clone)]
enum Commands {
    /// Generate the gym dataset as CSV files
    Generate(Generate),
    /// Create the schema and load the CSV files into SQLite
    Load(Load),
    /// Drop every table of the schema
    Drop(DropTables),
    /// Write the canned analysis queries as .sql files
    Queries(Queries),
    /// Run a canned query and print the result as CSV
    Query(Query),
}

#[derive(Parser)]
#[command(propagate_version = true)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// TOML config, defaults are used when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Overrides the configured log level
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,
    #[command(subcommand)]
    command: Option<Commands>,
}

fn main() -> Result<()> {
    let args = Cli::parse();
    let Some(command) = &args.command else {
        return Err(Error::BadRequest("no command specified".to_string()));
    };

    let cfg: Config = match &args.config {
        Some(path) => config::Config::builder()
            .add_source(config::File::from(path.clone()))
            .build()?
            .try_deserialize()?,
        None => Config::default(),
    };

    let level = args.log_level.unwrap_or(cfg.log.level);
    // stdout is reserved for query output
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).map_err(Error::SetGlobalDefaultError)?;

    let version = env!("CARGO_PKG_VERSION");
    debug!("climbgen v{version}");

    match command {
        Commands::Generate(args) => generate::start(args, cfg)?,
        Commands::Load(args) => load::start(args)?,
        Commands::Drop(args) => load::drop_schema(args)?,
        Commands::Queries(args) => queries::write(args)?,
        Commands::Query(args) => queries::run(args)?,
    }

    Ok(())
}
