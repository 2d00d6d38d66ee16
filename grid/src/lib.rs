#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Grid collaborator that owns the destination tile array.
//!
//! The assembler mutates the grid exclusively through the [`TileSink`]
//! interface during a single generation call; reading the result back out
//! happens through the [`query`] module once generation succeeds.

use level_forge_core::{Tile, TileSink};

/// Dense `width x height` tile array owned by the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelGrid {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
}

impl LevelGrid {
    /// Creates a grid of the provided dimensions with every cell empty.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let capacity_u64 = u64::from(width) * u64::from(height);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            width,
            height,
            tiles: vec![Tile::Empty; capacity],
        }
    }

    /// Returns the tile at the provided coordinates, if in range.
    #[must_use]
    pub fn tile(&self, x: u32, y: u32) -> Option<Tile> {
        self.index(x, y).and_then(|index| self.tiles.get(index)).copied()
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.width && y < self.height {
            let row = usize::try_from(y).ok()?;
            let column = usize::try_from(x).ok()?;
            let width = usize::try_from(self.width).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

impl TileSink for LevelGrid {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self) {
        self.tiles.fill(Tile::Empty);
    }

    fn set_tile(&mut self, x: u32, y: u32, tile: Tile) {
        if let Some(index) = self.index(x, y) {
            if let Some(slot) = self.tiles.get_mut(index) {
                *slot = tile;
            }
        }
    }
}

/// Query functions that provide read-only access to the grid contents.
pub mod query {
    use super::LevelGrid;

    /// Renders the grid as its textual level representation.
    ///
    /// One line per row, top to bottom, each tile encoded through its
    /// alphabet character.
    #[must_use]
    pub fn render(grid: &LevelGrid) -> String {
        let width = grid.width as usize;
        let height = grid.height as usize;
        let mut text = String::with_capacity(height * (width + 1));
        for row in 0..height {
            if row > 0 {
                text.push('\n');
            }
            for tile in &grid.tiles[row * width..(row + 1) * width] {
                text.push(tile.symbol());
            }
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_empty() {
        let grid = LevelGrid::new(4, 3);
        for y in 0..3 {
            for x in 0..4 {
                assert_eq!(grid.tile(x, y), Some(Tile::Empty));
            }
        }
    }

    #[test]
    fn set_tile_writes_in_bounds() {
        let mut grid = LevelGrid::new(4, 3);
        grid.set_tile(2, 1, Tile::Ground);
        assert_eq!(grid.tile(2, 1), Some(Tile::Ground));
    }

    #[test]
    fn set_tile_ignores_out_of_bounds() {
        let mut grid = LevelGrid::new(4, 3);
        let untouched = grid.clone();
        grid.set_tile(4, 0, Tile::Ground);
        grid.set_tile(0, 3, Tile::Ground);
        assert_eq!(grid, untouched);
    }

    #[test]
    fn clear_resets_every_cell() {
        let mut grid = LevelGrid::new(3, 2);
        grid.set_tile(0, 0, Tile::Exit);
        grid.set_tile(2, 1, Tile::Brick);
        grid.clear();
        assert_eq!(grid, LevelGrid::new(3, 2));
    }

    #[test]
    fn render_emits_rows_top_to_bottom() {
        let mut grid = LevelGrid::new(3, 2);
        grid.set_tile(1, 0, Tile::Coin);
        grid.set_tile(0, 1, Tile::Ground);
        grid.set_tile(1, 1, Tile::Ground);
        grid.set_tile(2, 1, Tile::Ground);
        assert_eq!(query::render(&grid), "-o-\nXXX");
    }
}
