use std::time::Duration;

use level_forge_core::{Tile, TileSink};
use level_forge_grid::{query, LevelGrid};
use level_forge_system_assembly::{Assembler, AssemblerConfig, AssemblyError, BudgetError};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const TIME_BUDGET: Duration = Duration::from_secs(30);

fn generate(width: u32, height: u32, seed: u64, config: AssemblerConfig) -> LevelGrid {
    let mut grid = LevelGrid::new(width, height);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    Assembler::new(config)
        .generate(&mut grid, TIME_BUDGET, &mut rng)
        .expect("generation succeeds");
    grid
}

#[test]
fn every_seed_fills_the_grid_exactly() {
    for seed in 0..32 {
        let grid = generate(150, 16, seed, AssemblerConfig::default());
        let text = query::render(&grid);
        assert_eq!(text.lines().count(), 16, "seed {seed}");
        for line in text.lines() {
            assert_eq!(line.len(), 150, "seed {seed}");
        }
    }
}

#[test]
fn last_column_carries_the_exit_marker() {
    for seed in 0..32 {
        let grid = generate(150, 16, seed, AssemblerConfig::default());
        assert_eq!(grid.tile(149, 12), Some(Tile::Exit), "seed {seed}");
        assert_eq!(grid.tile(149, 13), Some(Tile::Block), "seed {seed}");
        assert_eq!(grid.tile(149, 14), Some(Tile::Ground), "seed {seed}");
        assert_eq!(grid.tile(149, 15), Some(Tile::Ground), "seed {seed}");
    }
}

#[test]
fn column_zero_carries_start_marker_and_ground() {
    for seed in 0..32 {
        let grid = generate(150, 16, seed, AssemblerConfig::default());
        assert_eq!(grid.tile(0, 8), Some(Tile::Start), "seed {seed}");
        assert_eq!(grid.tile(0, 15), Some(Tile::Ground), "seed {seed}");
    }
}

#[test]
fn mirrored_variants_preserve_the_invariants() {
    let config = AssemblerConfig {
        mirrored_variants: true,
        ..AssemblerConfig::default()
    };
    for seed in 0..16 {
        let grid = generate(150, 16, seed, config);
        assert_eq!(grid.tile(149, 12), Some(Tile::Exit), "seed {seed}");
        assert_eq!(grid.tile(0, 8), Some(Tile::Start), "seed {seed}");
    }
}

#[test]
fn custom_quotas_fill_wider_grids() {
    let config = AssemblerConfig {
        hard_count: 2,
        mid_count: 4,
        ..AssemblerConfig::default()
    };
    for seed in 0..16 {
        let grid = generate(200, 16, seed, config);
        assert_eq!(grid.tile(199, 12), Some(Tile::Exit), "seed {seed}");
    }
}

#[test]
fn narrow_grid_surfaces_budget_exhaustion() {
    let mut grid = LevelGrid::new(50, 16);
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let error = Assembler::default()
        .generate(&mut grid, TIME_BUDGET, &mut rng)
        .expect_err("quotas cannot fit 50 columns");
    assert_eq!(
        error,
        AssemblyError::Budget(BudgetError::Exhausted {
            target_width: 50,
            deficit: 8
        })
    );
}

#[test]
fn generation_clears_stale_grid_content() {
    let mut grid = LevelGrid::new(150, 16);
    grid.set_tile(10, 0, Tile::Koopa);
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    Assembler::default()
        .generate(&mut grid, TIME_BUDGET, &mut rng)
        .expect("generation succeeds");
    assert_eq!(grid.tile(10, 0), Some(Tile::Empty));
}
