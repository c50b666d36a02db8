use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use gym_gen::assembler::Assembler;
use gym_gen::writer::write_dataset;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::config::Config;
use crate::error::Result;

#[derive(Parser, Clone, Debug)]
pub struct Generate {
    /// Directory the CSV files are written to
    #[arg(long, default_value = "data")]
    pub out_path: PathBuf,
    /// Seed of the random generator, random when omitted
    #[arg(long)]
    pub seed: Option<u64>,
    /// Last day of the simulation, defaults to today
    #[arg(long)]
    pub to_date: Option<String>,
    /// Length of the simulation window, e.g. "730 days"
    #[arg(long)]
    pub duration: Option<String>,
    /// Show a progress bar
    #[arg(long, default_value_t = false)]
    pub progress: bool,
}

pub fn start(args: &Generate, mut cfg: Config) -> Result<()> {
    if let Some(seed) = args.seed {
        cfg.dataset.seed = Some(seed);
    }
    if let Some(to_date) = &args.to_date {
        cfg.dataset.to_date = Some(to_date.clone());
    }
    if let Some(duration) = &args.duration {
        cfg.dataset.duration = duration.clone();
    }

    let asm_cfg = cfg.assembler_config(args.progress)?;
    let window = asm_cfg.sampler.window();
    info!(
        "simulating visits from {} to {}",
        window.start(),
        window.end()
    );
    let asm = Assembler::try_new(asm_cfg)?;

    let seed = cfg.dataset.seed.unwrap_or_else(rand::random);
    info!("seed: {seed}");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let start = Instant::now();
    let (dataset, stats) = asm.run(&mut rng)?;
    if stats.skipped_visits > 0 || stats.skipped_day_passes > 0 {
        info!(
            "skipped {} visit(s) and {} day pass(es)",
            stats.skipped_visits, stats.skipped_day_passes
        );
    }

    fs::create_dir_all(&args.out_path)?;
    write_dataset(&args.out_path, &dataset)?;
    info!(
        "dataset saved to {:?} in {}",
        args.out_path,
        humantime::format_duration(start.elapsed())
    );

    Ok(())
}
