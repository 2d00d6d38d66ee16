#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Difficulty-tiered piece collections with uniform draw-with-replacement.
//!
//! A [`PieceBank`] is built once at the start of a generation run, either
//! from the authored catalog or from custom collections, optionally
//! expanded with horizontally mirrored variants. Banks are immutable once
//! built, so the mirrored superset can never double more than once.

use std::{error::Error, fmt};

use level_forge_core::{Category, Piece};
use rand::Rng;

/// Three ordered collections of pieces tagged by difficulty tier.
#[derive(Clone, Debug)]
pub struct PieceBank {
    easy: Vec<Piece>,
    mid: Vec<Piece>,
    hard: Vec<Piece>,
}

impl PieceBank {
    /// Builds the bank from custom collections, one per tier.
    pub fn from_collections(
        easy: Vec<Piece>,
        mid: Vec<Piece>,
        hard: Vec<Piece>,
    ) -> Result<Self, BankError> {
        for (category, collection) in [
            (Category::Easy, &easy),
            (Category::Mid, &mid),
            (Category::Hard, &hard),
        ] {
            if collection.is_empty() {
                return Err(BankError::EmptyCategory { category });
            }
        }
        Ok(Self { easy, mid, hard })
    }

    /// Builds the bank from the authored piece catalog.
    #[must_use]
    pub fn authored() -> Self {
        Self {
            easy: parse_catalog(&EASY_PIECES),
            mid: parse_catalog(&MID_PIECES),
            hard: parse_catalog(&HARD_PIECES),
        }
    }

    /// Consumes the bank, appending the horizontal mirror of every piece
    /// to its collection.
    ///
    /// The receiver is moved so an expanded bank cannot be expanded again
    /// by accident; callers build the bank once per generation run.
    #[must_use]
    pub fn with_mirrored_variants(self) -> Self {
        Self {
            easy: append_mirrors(self.easy),
            mid: append_mirrors(self.mid),
            hard: append_mirrors(self.hard),
        }
    }

    /// Pieces available in the provided tier, in insertion order.
    #[must_use]
    pub fn pieces(&self, category: Category) -> &[Piece] {
        match category {
            Category::Easy => &self.easy,
            Category::Mid => &self.mid,
            Category::Hard => &self.hard,
        }
    }

    /// Draws one piece uniformly at random, with replacement.
    pub fn draw<R: Rng + ?Sized>(&self, category: Category, rng: &mut R) -> &Piece {
        let collection = self.pieces(category);
        debug_assert!(!collection.is_empty(), "bank categories are non-empty");
        let index = rng.gen_range(0..collection.len());
        &collection[index]
    }
}

impl Default for PieceBank {
    fn default() -> Self {
        Self::authored()
    }
}

fn append_mirrors(mut collection: Vec<Piece>) -> Vec<Piece> {
    let mirrors: Vec<Piece> = collection.iter().map(Piece::mirrored).collect();
    collection.extend(mirrors);
    collection
}

fn parse_catalog(catalog: &[&[&str]]) -> Vec<Piece> {
    catalog
        .iter()
        .map(|rows| Piece::from_rows(rows).expect("authored piece rows are rectangular"))
        .collect()
}

/// Errors raised while constructing a piece bank.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BankError {
    /// A tier was provided without any pieces to draw from.
    EmptyCategory {
        /// Tier whose collection was empty.
        category: Category,
    },
}

impl fmt::Display for BankError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyCategory { category } => {
                write!(f, "bank category {category:?} has no pieces to draw from")
            }
        }
    }
}

impl Error for BankError {}

const EASY_PIECES: [&[&str]; 3] = [
    &[
        "----------------",
        "----------------",
        "----------------",
        "----------------",
        "----------------",
        "----------------",
        "----------------",
        "----------------",
        "----------------",
        "----------------",
        "----------------",
        "----------------",
        "----------------",
        "----o----o----o-",
        "----S----S----S-",
        "XXXXXXXXXXXXXXXX",
    ],
    &[
        "----------------",
        "----------------",
        "----------------",
        "----------------",
        "----------------",
        "----------------",
        "----------------",
        "----------------",
        "----------------",
        "----------------",
        "----t-----t-----",
        "----T-----T-----",
        "----------------",
        "----------------",
        "----------------",
        "XXXXXXXXXXXXXXXX",
    ],
    &[
        "----------------",
        "----------------",
        "----------------",
        "----------------",
        "----------------",
        "----------------",
        "----------------",
        "----------------",
        "----------------",
        "----S----S----S-",
        "----------------",
        "----@----@----@-",
        "----------------",
        "----------------",
        "----------------",
        "XXXXXXXXXXXXXXXX",
    ],
];

const MID_PIECES: [&[&str]; 3] = [
    &[
        "----------------",
        "----------------",
        "----------------",
        "----------------",
        "----------------",
        "----------------",
        "----------------",
        "------%--------%",
        "------%--------%",
        "------%--------%",
        "------S--------S",
        "------S--------S",
        "------S--------S",
        "------g--------g",
        "----------------",
        "XXXXXXXXXXXXXXXX",
    ],
    &[
        "----------------",
        "----------------",
        "----------------",
        "----------------",
        "----------------",
        "----------------",
        "----------------",
        "-------t-------t",
        "-------T-------T",
        "----------------",
        "----SSS----SSS--",
        "----------------",
        "----o-o----o-o--",
        "----------------",
        "----g--------g--",
        "XXXXXXXXXXXXXXXX",
    ],
    &[
        "----------------",
        "----------------",
        "----------------",
        "----------------",
        "----------------",
        "----------------",
        "-----#----------",
        "-----#----------",
        "-----#----------",
        "-----@----------",
        "----------------",
        "-----C----------",
        "----------------",
        "----g-----------",
        "----------------",
        "XXXXXXXXXXXXXXXX",
    ],
];

const HARD_PIECES: [&[&str]; 3] = [
    &[
        "----------------",
        "----------------",
        "----------------",
        "----------------",
        "------%----%----",
        "------%----%----",
        "------%----%----",
        "------%----%----",
        "------S----S----",
        "------S----S----",
        "------S----S----",
        "------g----g----",
        "------k----k----",
        "------g----g----",
        "----------------",
        "XXXXXXXXXXXXXXXX",
    ],
    &[
        "----------------",
        "----------------",
        "----------------",
        "-------%--------",
        "-------%--------",
        "-------%--------",
        "-------%--------",
        "----------------",
        "------t---------",
        "------T---------",
        "------@---------",
        "------@---------",
        "------@---------",
        "------@---------",
        "------g---------",
        "XXXXXXXXXXXXXXXX",
    ],
    &[
        "----------------",
        "----------------",
        "----------------",
        "----------------",
        "-----###--------",
        "-----#@#--------",
        "-----#@#--------",
        "-----#@#--------",
        "-----#@#--------",
        "-----#@#--------",
        "-----#@#--------",
        "-----#@#--------",
        "-----#@#--------",
        "-----#@#--------",
        "-----#@#--------",
        "XXXXXXXXXXXXXXXX",
    ],
];
