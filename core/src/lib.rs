#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Level Forge assembler.
//!
//! This crate defines the vocabulary that connects the piece bank, the
//! assembly system, and the grid collaborator. Pieces are immutable
//! rectangular blocks of symbolic [`Tile`] values; the assembler composes
//! them into a plan of [`PlanEntry`] values and stamps the result through
//! the narrow [`TileSink`] interface. The core never reads tiles back from
//! the sink for decision-making.

use std::{error::Error, fmt};

use serde::{Deserialize, Serialize};

/// Symbolic tile alphabet used by authored pieces and the synthesizer.
///
/// Exactly one variant denotes the empty sentinel ([`Tile::Empty`], never
/// stamped), exactly one the player start marker ([`Tile::Start`]) and
/// exactly one the exit marker ([`Tile::Exit`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    /// Absence of content; skipped during stamping.
    Empty,
    /// Solid ground the player can stand on.
    Ground,
    /// Breakable brick block.
    Brick,
    /// Collectible coin.
    Coin,
    /// Upper lip of a pipe.
    PipeTop,
    /// Body segment of a pipe.
    PipeBody,
    /// Question block hiding a power-up.
    Question,
    /// Jump-through platform.
    Platform,
    /// Indestructible block.
    Block,
    /// Walking enemy.
    Goomba,
    /// Shelled enemy.
    Koopa,
    /// Brick concealing a coin.
    CoinBrick,
    /// Exit marker terminating the level.
    Exit,
    /// Player start marker.
    Start,
}

impl Tile {
    /// Stable one-character encoding used for authoring and rendering.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Empty => '-',
            Self::Ground => 'X',
            Self::Brick => 'S',
            Self::Coin => 'o',
            Self::PipeTop => 't',
            Self::PipeBody => 'T',
            Self::Question => '@',
            Self::Platform => '%',
            Self::Block => '#',
            Self::Goomba => 'g',
            Self::Koopa => 'k',
            Self::CoinBrick => 'C',
            Self::Exit => 'F',
            Self::Start => 'M',
        }
    }

    /// Resolves a tile from its character encoding, if the character
    /// belongs to the alphabet.
    #[must_use]
    pub const fn from_symbol(symbol: char) -> Option<Self> {
        Some(match symbol {
            '-' => Self::Empty,
            'X' => Self::Ground,
            'S' => Self::Brick,
            'o' => Self::Coin,
            't' => Self::PipeTop,
            'T' => Self::PipeBody,
            '@' => Self::Question,
            '%' => Self::Platform,
            '#' => Self::Block,
            'g' => Self::Goomba,
            'k' => Self::Koopa,
            'C' => Self::CoinBrick,
            'F' => Self::Exit,
            'M' => Self::Start,
            _ => return None,
        })
    }

    /// Reports whether the tile is the empty sentinel.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Difficulty tier a piece was drawn from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Filler pieces used to pad out leftover width.
    Easy,
    /// Medium-difficulty pieces filling the middle of the budget.
    Mid,
    /// Hard pieces that anchor the difficulty curve.
    Hard,
}

/// Narrow grid-mutation interface exposed by the external grid owner.
///
/// The assembler treats the sink as write-only: it clears it once per
/// generation call and stamps tiles into it, never reading content back.
pub trait TileSink {
    /// Number of tile columns in the destination grid.
    fn width(&self) -> u32;

    /// Number of tile rows in the destination grid.
    fn height(&self) -> u32;

    /// Resets every cell to the empty sentinel.
    fn clear(&mut self);

    /// Writes a tile at the provided coordinates. Implementations ignore
    /// coordinates outside the grid bounds.
    fn set_tile(&mut self, x: u32, y: u32, tile: Tile);
}

/// Immutable rectangular block of tiles representing one layout segment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    rows: Vec<Vec<Tile>>,
    width: u32,
    height: u32,
}

impl Piece {
    /// Parses a piece from one string per row using the tile alphabet.
    pub fn from_rows(rows: &[&str]) -> Result<Self, ShapeError> {
        let mut tile_rows = Vec::with_capacity(rows.len());
        for row in rows {
            let mut tiles = Vec::with_capacity(row.len());
            for symbol in row.chars() {
                let tile =
                    Tile::from_symbol(symbol).ok_or(ShapeError::UnknownSymbol { symbol })?;
                tiles.push(tile);
            }
            tile_rows.push(tiles);
        }
        Self::from_tile_rows(tile_rows)
    }

    /// Builds a piece from already-symbolic rows, validating rectangularity.
    pub fn from_tile_rows(rows: Vec<Vec<Tile>>) -> Result<Self, ShapeError> {
        let Some(first) = rows.first() else {
            return Err(ShapeError::NoRows);
        };
        if first.is_empty() {
            return Err(ShapeError::NoColumns);
        }

        let expected = first.len();
        for row in &rows {
            if row.len() != expected {
                return Err(ShapeError::RaggedRows {
                    expected: expected as u32,
                    found: row.len() as u32,
                });
            }
        }

        let width = expected as u32;
        let height = rows.len() as u32;
        Ok(Self {
            rows,
            width,
            height,
        })
    }

    /// Width of the piece in tile columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the piece in tile rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Returns the tile at the provided coordinates, if in range.
    #[must_use]
    pub fn tile(&self, x: u32, y: u32) -> Option<Tile> {
        self.rows
            .get(usize::try_from(y).ok()?)
            .and_then(|row| row.get(usize::try_from(x).ok()?))
            .copied()
    }

    /// Produces a new piece with every row reversed left-to-right.
    ///
    /// Height and the set of tiles used are unchanged; mirroring a mirror
    /// reproduces the original layout exactly.
    #[must_use]
    pub fn mirrored(&self) -> Self {
        let rows = self
            .rows
            .iter()
            .map(|row| row.iter().rev().copied().collect())
            .collect();
        Self {
            rows,
            width: self.width,
            height: self.height,
        }
    }

    /// Copies every non-empty tile into the sink at the piece's offset.
    ///
    /// Empty tiles are skipped so pieces compose by overlay: a later
    /// stamp never erases non-empty content written earlier.
    pub fn stamp_into(&self, sink: &mut dyn TileSink, start_x: u32) {
        for (y, row) in self.rows.iter().enumerate() {
            for (x, tile) in row.iter().enumerate() {
                if tile.is_empty() {
                    continue;
                }
                sink.set_tile(start_x.saturating_add(x as u32), y as u32, *tile);
            }
        }
    }
}

/// Plan entry pairing a drawn piece with the tier it was drawn from.
///
/// The explicit tag makes removal-by-category during budget trimming a
/// direct filter instead of an identity probe against the source bank.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlanEntry {
    category: Category,
    piece: Piece,
}

impl PlanEntry {
    /// Creates a new plan entry tagged with its source tier.
    #[must_use]
    pub const fn new(category: Category, piece: Piece) -> Self {
        Self { category, piece }
    }

    /// Tier the piece was drawn from.
    #[must_use]
    pub const fn category(&self) -> Category {
        self.category
    }

    /// Piece selected for the plan.
    #[must_use]
    pub const fn piece(&self) -> &Piece {
        &self.piece
    }

    /// Width of the planned piece in tile columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.piece.width()
    }

    /// Consumes the entry, yielding the planned piece.
    #[must_use]
    pub fn into_piece(self) -> Piece {
        self.piece
    }
}

/// Malformed piece geometry or an undersized exit segment request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeError {
    /// The piece was constructed without any rows.
    NoRows,
    /// The piece's rows contain no columns.
    NoColumns,
    /// A row's length differed from the first row's length.
    RaggedRows {
        /// Length of the first row, in tiles.
        expected: u32,
        /// Length of the offending row, in tiles.
        found: u32,
    },
    /// A character outside the tile alphabet was encountered.
    UnknownSymbol {
        /// The unrecognized character.
        symbol: char,
    },
    /// An exit segment was requested with insufficient width.
    ExitTooNarrow {
        /// Width that was requested, in tile columns.
        width: u32,
    },
    /// An exit segment was requested for a grid too shallow to hold it.
    ExitTooShallow {
        /// Height that was requested, in tile rows.
        height: u32,
    },
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoRows => write!(f, "piece must have at least one row"),
            Self::NoColumns => write!(f, "piece rows must have at least one column"),
            Self::RaggedRows { expected, found } => write!(
                f,
                "piece rows must all be {expected} tiles wide, found a row of {found}"
            ),
            Self::UnknownSymbol { symbol } => {
                write!(f, "character '{symbol}' is not part of the tile alphabet")
            }
            Self::ExitTooNarrow { width } => {
                write!(f, "exit segment needs at least 3 columns, got {width}")
            }
            Self::ExitTooShallow { height } => {
                write!(f, "exit segment needs at least 4 rows, got {height}")
            }
        }
    }
}

impl Error for ShapeError {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{de::DeserializeOwned, Serialize};

    struct RecordingSink {
        width: u32,
        height: u32,
        writes: Vec<(u32, u32, Tile)>,
    }

    impl TileSink for RecordingSink {
        fn width(&self) -> u32 {
            self.width
        }

        fn height(&self) -> u32 {
            self.height
        }

        fn clear(&mut self) {
            self.writes.clear();
        }

        fn set_tile(&mut self, x: u32, y: u32, tile: Tile) {
            self.writes.push((x, y, tile));
        }
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn symbol_mapping_round_trips_the_alphabet() {
        let tiles = [
            Tile::Empty,
            Tile::Ground,
            Tile::Brick,
            Tile::Coin,
            Tile::PipeTop,
            Tile::PipeBody,
            Tile::Question,
            Tile::Platform,
            Tile::Block,
            Tile::Goomba,
            Tile::Koopa,
            Tile::CoinBrick,
            Tile::Exit,
            Tile::Start,
        ];
        for tile in tiles {
            assert_eq!(Tile::from_symbol(tile.symbol()), Some(tile));
        }
        assert_eq!(Tile::from_symbol('?'), None);
    }

    #[test]
    fn rectangular_rows_produce_a_piece() {
        let piece = Piece::from_rows(&["--o", "XXX"]).expect("valid piece");
        assert_eq!(piece.width(), 3);
        assert_eq!(piece.height(), 2);
        assert_eq!(piece.tile(2, 0), Some(Tile::Coin));
        assert_eq!(piece.tile(0, 1), Some(Tile::Ground));
        assert_eq!(piece.tile(3, 0), None);
    }

    #[test]
    fn empty_row_slice_is_rejected() {
        assert_eq!(Piece::from_rows(&[]), Err(ShapeError::NoRows));
    }

    #[test]
    fn zero_width_rows_are_rejected() {
        assert_eq!(Piece::from_rows(&["", ""]), Err(ShapeError::NoColumns));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        assert_eq!(
            Piece::from_rows(&["----", "---"]),
            Err(ShapeError::RaggedRows {
                expected: 4,
                found: 3
            })
        );
    }

    #[test]
    fn unknown_symbols_are_rejected() {
        assert_eq!(
            Piece::from_rows(&["--?-"]),
            Err(ShapeError::UnknownSymbol { symbol: '?' })
        );
    }

    #[test]
    fn mirror_of_mirror_reproduces_the_original() {
        let piece = Piece::from_rows(&["t---", "T-o-", "XXXX"]).expect("valid piece");
        assert_eq!(piece.mirrored().mirrored(), piece);
    }

    #[test]
    fn mirroring_reverses_rows_horizontally() {
        let piece = Piece::from_rows(&["o--"]).expect("valid piece");
        let mirrored = piece.mirrored();
        assert_eq!(mirrored.tile(2, 0), Some(Tile::Coin));
        assert_eq!(mirrored.tile(0, 0), Some(Tile::Empty));
    }

    #[test]
    fn stamping_skips_empty_tiles_and_applies_offset() {
        let piece = Piece::from_rows(&["-o", "XX"]).expect("valid piece");
        let mut sink = RecordingSink {
            width: 10,
            height: 2,
            writes: Vec::new(),
        };
        piece.stamp_into(&mut sink, 4);
        assert_eq!(
            sink.writes,
            vec![
                (5, 0, Tile::Coin),
                (4, 1, Tile::Ground),
                (5, 1, Tile::Ground),
            ]
        );
    }

    #[test]
    fn plan_entry_exposes_tag_and_width() {
        let piece = Piece::from_rows(&["XX"]).expect("valid piece");
        let entry = PlanEntry::new(Category::Mid, piece.clone());
        assert_eq!(entry.category(), Category::Mid);
        assert_eq!(entry.width(), 2);
        assert_eq!(entry.into_piece(), piece);
    }

    #[test]
    fn tile_round_trips_through_bincode() {
        assert_round_trip(&Tile::Question);
    }

    #[test]
    fn category_round_trips_through_bincode() {
        assert_round_trip(&Category::Hard);
    }

    #[test]
    fn piece_round_trips_through_bincode() {
        let piece = Piece::from_rows(&["-g-", "XXX"]).expect("valid piece");
        assert_round_trip(&piece);
    }

    #[test]
    fn shape_error_round_trips_through_bincode() {
        assert_round_trip(&ShapeError::ExitTooNarrow { width: 2 });
    }
}
