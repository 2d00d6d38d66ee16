#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs the level assembler and prints the
//! generated level as text.

use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use level_forge_grid::{query, LevelGrid};
use level_forge_system_assembly::{Assembler, AssemblerConfig};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Generates a budget-constrained platformer level and prints it.
#[derive(Debug, Parser)]
#[command(name = "level-forge", version)]
struct Args {
    /// Width of the generated level in tile columns.
    #[arg(long, default_value_t = 150)]
    width: u32,

    /// Height of the generated level in tile rows.
    #[arg(long, default_value_t = 16)]
    height: u32,

    /// Seed for the random source; omit for an entropy-derived seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Number of hard pieces drawn up front.
    #[arg(long, default_value_t = 3)]
    hard_count: u32,

    /// Number of mid pieces drawn after the hard quota.
    #[arg(long, default_value_t = 3)]
    mid_count: u32,

    /// Expand the piece bank with horizontally mirrored variants.
    #[arg(long)]
    mirror: bool,

    /// Time budget forwarded to the generator; accepted for interface
    /// compatibility, never enforced mid-run.
    #[arg(long, default_value_t = 30_000)]
    time_budget_ms: u64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let assembler = Assembler::new(AssemblerConfig {
        hard_count: args.hard_count,
        mid_count: args.mid_count,
        mirrored_variants: args.mirror,
    });
    log::info!("running generator '{}'", assembler.name());

    let mut rng = match args.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    let mut grid = LevelGrid::new(args.width, args.height);
    assembler
        .generate(
            &mut grid,
            Duration::from_millis(args.time_budget_ms),
            &mut rng,
        )
        .with_context(|| {
            format!(
                "could not assemble a {}x{} level under the configured quotas",
                args.width, args.height
            )
        })?;

    println!("{}", query::render(&grid));
    Ok(())
}
