//! Repute - Entry Point
//!
//! Loads the leveling config, prints the level threshold table and resolves
//! any experience totals given on the command line.
//!
//! Usage: `repute [--config PATH] [--levels N] [TOTAL ...]`

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use repute::config::{config_path, load_config};
use repute::progression::{Level, LevelCache, LevelResolver};

#[derive(Parser)]
#[command(name = "repute", version)]
#[command(about = "Print the level table and resolve experience totals")]
struct Cli {
    /// Config file (defaults to $REPUTE_CONFIG or the platform config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of levels to print
    #[arg(long, default_value_t = 20)]
    levels: Level,

    /// Experience totals to resolve
    #[arg(allow_negative_numbers = true)]
    totals: Vec<f64>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting Repute v{}", env!("CARGO_PKG_VERSION"));

    let args = Cli::parse();
    let path = match args.config {
        Some(path) => path,
        None => config_path()?,
    };
    // Missing or invalid leveling constants are fatal
    let config = load_config(&path).with_context(|| format!("loading {:?}", path))?;

    let curve = config.curve()?;
    let cache = Arc::new(LevelCache::new(curve));
    let resolver = LevelResolver::with_batch(Arc::clone(&cache), config.cache_batch);

    // Cost to leave each level and the total at which the next one starts
    println!("{:>6}  {:>12}  {:>14}", "level", "cost", "next level at");
    let thresholds = cache.thresholds_up_to(args.levels)?;
    for level in 1..=args.levels {
        println!(
            "{:>6}  {:>12.2}  {:>14.2}",
            level,
            curve.cost(level)?,
            thresholds[level as usize]
        );
    }

    for total in args.totals {
        match resolver.progress(total) {
            Ok(progress) => println!(
                "{:.2} xp -> level {} ({:.0}% done, {:.2} xp to go)",
                total,
                progress.level,
                progress.fraction() * 100.0,
                progress.remaining()
            ),
            Err(e) => {
                log::error!("Cannot resolve {}: {}", total, e);
                eprintln!("Error: {}", e);
            }
        }
    }

    Ok(())
}
