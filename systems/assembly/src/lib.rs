#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Budget-constrained level assembly system.
//!
//! The assembler selects pieces from a difficulty-tiered bank under a
//! fixed width budget, shuffles the selection, synthesizes a terminal exit
//! segment over the exact leftover width, and stamps everything into the
//! externally-owned grid through the narrow [`TileSink`] interface. The
//! whole pipeline is single-threaded, synchronous, and bounded by piece
//! counts rather than grid size.

use std::{error::Error, fmt, time::Duration};

use level_forge_core::{Category, Piece, PlanEntry, ShapeError, Tile, TileSink};
use level_forge_system_piece_bank::PieceBank;
use log::debug;
use rand::{seq::SliceRandom, Rng};

/// Stable name the generator reports to the host for logging/selection.
pub const GENERATOR_NAME: &str = "piece-budget-assembler";

/// Minimum trailing width that must remain after the quota draws so the
/// easy fill and the exit segment have room to work with.
const MIN_TRAILING_WIDTH: i64 = 10;

/// Easy pieces are drawn while more than this many columns remain; the
/// 3..=12 tail is reserved for the exit segment.
const EASY_FILL_CEILING: i64 = 12;

/// Narrowest exit segment that still fits the marker and its support.
const EXIT_MIN_WIDTH: u32 = 3;

/// Shallowest grid that can hold the exit marker above its support block.
const EXIT_MIN_HEIGHT: u32 = 4;

/// Quotas and options controlling a generation run.
#[derive(Clone, Copy, Debug)]
pub struct AssemblerConfig {
    /// Number of hard pieces drawn up front.
    pub hard_count: u32,
    /// Number of mid pieces drawn after the hard quota.
    pub mid_count: u32,
    /// Whether the bank is expanded with mirrored variants before drawing.
    pub mirrored_variants: bool,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            hard_count: 3,
            mid_count: 3,
            mirrored_variants: false,
        }
    }
}

/// Finalized, pre-shuffle selection of pieces plus the exact leftover
/// width reserved for the exit segment.
#[derive(Clone, Debug)]
pub struct SelectionPlan {
    entries: Vec<PlanEntry>,
    leftover: u32,
}

impl SelectionPlan {
    /// Planned entries in draw order.
    #[must_use]
    pub fn entries(&self) -> &[PlanEntry] {
        &self.entries
    }

    /// Width reserved for the exit segment, always at least 3.
    #[must_use]
    pub const fn leftover(&self) -> u32 {
        self.leftover
    }

    /// Consumes the plan, yielding its entries.
    #[must_use]
    pub fn into_entries(self) -> Vec<PlanEntry> {
        self.entries
    }
}

/// Piece paired with the horizontal offset assigned by the sequencer.
#[derive(Clone, Debug)]
pub struct PlacedPiece {
    piece: Piece,
    offset: u32,
}

impl PlacedPiece {
    /// Piece scheduled for stamping.
    #[must_use]
    pub const fn piece(&self) -> &Piece {
        &self.piece
    }

    /// Column at which the piece's left edge is stamped.
    #[must_use]
    pub const fn offset(&self) -> u32 {
        self.offset
    }
}

/// Selects pieces from the bank until their widths, plus a 3..=12 column
/// tail for the exit segment, account for the full target width.
///
/// Quotas fix the difficulty curve: `hard_count` hard pieces always
/// survive, while mid and easy pieces are trimmed from the tail of the
/// plan when the leftover width falls outside its legal range. Removal
/// targets the most-recently-appended entry of the matching tier, found
/// through the explicit [`Category`] tag, so every trim iteration either
/// refunds width or stops.
pub fn allocate<R: Rng + ?Sized>(
    bank: &PieceBank,
    target_width: u32,
    hard_count: u32,
    mid_count: u32,
    rng: &mut R,
) -> Result<SelectionPlan, BudgetError> {
    let mut entries: Vec<PlanEntry> = Vec::new();
    let mut used: i64 = 0;

    for &(category, quota) in &[(Category::Hard, hard_count), (Category::Mid, mid_count)] {
        for _ in 0..quota {
            let piece = bank.draw(category, rng).clone();
            used += i64::from(piece.width());
            debug!(
                "drew {category:?} piece of width {}, used {used} of {target_width}",
                piece.width()
            );
            entries.push(PlanEntry::new(category, piece));
        }
    }

    let mut remaining = i64::from(target_width) - used;

    // Refund mid pieces until the tail is wide enough for the easy fill
    // and the exit segment.
    while remaining < MIN_TRAILING_WIDTH {
        let Some(index) = last_index_of(&entries, Category::Mid) else {
            break;
        };
        let refunded = entries.remove(index);
        remaining += i64::from(refunded.width());
        debug!(
            "refunded mid piece of width {}, {remaining} columns remain",
            refunded.width()
        );
    }

    if remaining < MIN_TRAILING_WIDTH {
        let deficit = (MIN_TRAILING_WIDTH - remaining).unsigned_abs() as u32;
        return Err(BudgetError::Exhausted {
            target_width,
            deficit,
        });
    }

    // Greedy easy fill down to the reserved tail.
    while remaining > EASY_FILL_CEILING {
        let piece = bank.draw(Category::Easy, rng).clone();
        remaining -= i64::from(piece.width());
        debug!(
            "drew easy piece of width {}, {remaining} columns remain",
            piece.width()
        );
        entries.push(PlanEntry::new(Category::Easy, piece));
    }

    // Correct overshoot from an easy piece wider than the gap it filled.
    while remaining < i64::from(EXIT_MIN_WIDTH) {
        let Some(index) = last_index_of(&entries, Category::Easy) else {
            break;
        };
        let refunded = entries.remove(index);
        remaining += i64::from(refunded.width());
        debug!(
            "refunded easy piece of width {}, {remaining} columns remain",
            refunded.width()
        );
    }

    debug_assert!(remaining >= i64::from(EXIT_MIN_WIDTH));
    let leftover = u32::try_from(remaining).expect("leftover width is non-negative after trimming");
    Ok(SelectionPlan { entries, leftover })
}

fn last_index_of(entries: &[PlanEntry], category: Category) -> Option<usize> {
    entries
        .iter()
        .rposition(|entry| entry.category() == category)
}

/// Shuffles the plan uniformly and assigns each piece its horizontal
/// offset as the running sum of preceding widths, left to right.
pub fn sequence<R: Rng + ?Sized>(entries: Vec<PlanEntry>, rng: &mut R) -> Vec<PlacedPiece> {
    let mut pieces: Vec<Piece> = entries.into_iter().map(PlanEntry::into_piece).collect();
    pieces.shuffle(rng);

    let mut offset = 0;
    let mut placed = Vec::with_capacity(pieces.len());
    for piece in pieces {
        let width = piece.width();
        placed.push(PlacedPiece { piece, offset });
        offset += width;
    }
    placed
}

/// Synthesizes the terminal segment guaranteeing a reachable, marked exit.
///
/// The bottom two rows are solid ground across the full width; the last
/// column holds a support block at row `height - 3` and the exit marker
/// at row `height - 4`; every other cell is empty.
pub fn exit_segment(width: u32, height: u32) -> Result<Piece, ShapeError> {
    if width < EXIT_MIN_WIDTH {
        return Err(ShapeError::ExitTooNarrow { width });
    }
    if height < EXIT_MIN_HEIGHT {
        return Err(ShapeError::ExitTooShallow { height });
    }

    let columns = width as usize;
    let mut rows = vec![vec![Tile::Empty; columns]; height as usize];
    rows[(height - 1) as usize].fill(Tile::Ground);
    rows[(height - 2) as usize].fill(Tile::Ground);
    rows[(height - 3) as usize][columns - 1] = Tile::Block;
    rows[(height - 4) as usize][columns - 1] = Tile::Exit;
    Piece::from_tile_rows(rows)
}

/// Stamps the sequenced pieces and the exit segment into the sink.
///
/// The sink is cleared first; pieces occupy disjoint column ranges so the
/// stamping order is immaterial. After all placements the start marker is
/// written at column 0 on the vertical-center row and a ground tile at
/// column 0 on the bottom row, overriding whatever the first piece put
/// there.
pub fn stamp(
    sink: &mut dyn TileSink,
    placed: &[PlacedPiece],
    exit_piece: &Piece,
) -> Result<(), AssemblyError> {
    sink.clear();

    let mut cursor = 0u32;
    for placement in placed {
        placement.piece.stamp_into(sink, placement.offset);
        cursor = placement.offset.saturating_add(placement.piece.width());
    }
    exit_piece.stamp_into(sink, cursor);

    let total_width = cursor.saturating_add(exit_piece.width());
    if total_width != sink.width() {
        return Err(AssemblyError::WidthMismatch {
            expected: sink.width(),
            actual: total_width,
        });
    }

    sink.set_tile(0, sink.height() / 2, Tile::Start);
    sink.set_tile(0, sink.height().saturating_sub(1), Tile::Ground);
    Ok(())
}

/// Budget-constrained procedural level assembler.
#[derive(Clone, Copy, Debug, Default)]
pub struct Assembler {
    config: AssemblerConfig,
}

impl Assembler {
    /// Creates an assembler using the supplied configuration.
    #[must_use]
    pub const fn new(config: AssemblerConfig) -> Self {
        Self { config }
    }

    /// Stable name reported to the host for logging/selection purposes.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        GENERATOR_NAME
    }

    /// Generates a level into the sink using the injected random source.
    ///
    /// `time_budget` is accepted for host-interface compatibility and is
    /// never consulted mid-run; the algorithm always completes in steps
    /// proportional to piece counts. On error the sink may be left
    /// partially cleared or stamped and must not be treated as valid
    /// output.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        sink: &mut dyn TileSink,
        time_budget: Duration,
        rng: &mut R,
    ) -> Result<(), AssemblyError> {
        debug!(
            "{GENERATOR_NAME}: generating {}x{} level, time budget {time_budget:?} (unenforced)",
            sink.width(),
            sink.height()
        );

        let bank = if self.config.mirrored_variants {
            PieceBank::authored().with_mirrored_variants()
        } else {
            PieceBank::authored()
        };

        let plan = allocate(
            &bank,
            sink.width(),
            self.config.hard_count,
            self.config.mid_count,
            rng,
        )?;
        let leftover = plan.leftover();
        let placed = sequence(plan.into_entries(), rng);
        let exit_piece = exit_segment(leftover, sink.height())?;
        stamp(sink, &placed, &exit_piece)
    }
}

/// Failures surfaced by a generation call. Never retried internally.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssemblyError {
    /// The quotas leave less than the minimum viable leftover width.
    Budget(BudgetError),
    /// Malformed piece geometry or an undersized exit segment.
    Shape(ShapeError),
    /// Post-assembly consistency check failed; indicates a defect in the
    /// allocator's arithmetic rather than a recoverable condition.
    WidthMismatch {
        /// Width of the destination grid.
        expected: u32,
        /// Combined width of every placed piece.
        actual: u32,
    },
}

impl fmt::Display for AssemblyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Budget(error) => write!(f, "{error}"),
            Self::Shape(error) => write!(f, "{error}"),
            Self::WidthMismatch { expected, actual } => write!(
                f,
                "placed pieces span {actual} columns but the grid is {expected} wide"
            ),
        }
    }
}

impl Error for AssemblyError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Budget(error) => Some(error),
            Self::Shape(error) => Some(error),
            Self::WidthMismatch { .. } => None,
        }
    }
}

impl From<BudgetError> for AssemblyError {
    fn from(error: BudgetError) -> Self {
        Self::Budget(error)
    }
}

impl From<ShapeError> for AssemblyError {
    fn from(error: ShapeError) -> Self {
        Self::Shape(error)
    }
}

/// Configuration mismatch between the quotas and the target width.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BudgetError {
    /// Even after refunding every mid piece the trailing width stayed
    /// below the minimum viable leftover.
    Exhausted {
        /// Width the plan had to fill.
        target_width: u32,
        /// Columns missing from the minimum trailing width.
        deficit: u32,
    },
}

impl fmt::Display for BudgetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exhausted {
                target_width,
                deficit,
            } => write!(
                f,
                "no legal layout for width {target_width} under the configured quotas \
                 ({deficit} columns short of the minimum trailing width)"
            ),
        }
    }
}

impl Error for BudgetError {}
