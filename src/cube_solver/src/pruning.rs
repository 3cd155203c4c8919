//! Corner pattern databases used as admissible heuristics for the solver.

use crate::{
    corners::{CORNER_COUNT, CornerLocator},
    permutation_indexer::PermutationIndexer,
    puzzle::{CubeState, Move},
    start, success, working,
};
use log::{debug, info, warn};
use std::{
    fs::{self, File},
    io::{self, Read},
    path::Path,
    time::Instant,
};
use thiserror::Error;

pub mod nibble;

use nibble::NibbleArray;

/// The largest value a nibble can hold, used as "unknown" for loaded
/// databases.
pub const MAX_NIBBLE: u8 = 15;

/// Orientation states of the first seven corners. The eighth twist is implied
/// by the other seven.
const ORIENTATION_STATES: u64 = 3_u64.pow(CORNER_COUNT as u32 - 1);

type CornerIndexer = PermutationIndexer<CORNER_COUNT, CORNER_COUNT>;

/// A lower bound on the number of moves needed to solve a cube. It must never
/// overestimate.
pub trait AdmissibleHeuristic<C: CubeState> {
    fn admissible_heuristic(&self, state: &C) -> u8;
}

impl<C: CubeState, T: AdmissibleHeuristic<C>> AdmissibleHeuristic<C> for &T {
    fn admissible_heuristic(&self, state: &C) -> u8 {
        (**self).admissible_heuristic(state)
    }
}

/// The trivial heuristic. Turns IDA* into iterative deepening.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroTable;

impl<C: CubeState> AdmissibleHeuristic<C> for ZeroTable {
    fn admissible_heuristic(&self, _state: &C) -> u8 {
        0
    }
}

/// Which corner information is folded into the database index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CornerGranularity {
    /// Only where each corner cubelet is.
    Permutation,
    /// Where each corner cubelet is and how it is twisted.
    #[default]
    PermutationAndOrientation,
}

impl CornerGranularity {
    /// The number of entries in a database of this granularity.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn size(self) -> usize {
        match self {
            CornerGranularity::Permutation => CornerIndexer::SIZE as usize,
            CornerGranularity::PermutationAndOrientation => {
                (CornerIndexer::SIZE * ORIENTATION_STATES) as usize
            }
        }
    }

    /// The length of the persisted file.
    #[must_use]
    pub const fn byte_len(self) -> usize {
        NibbleArray::byte_len_for(self.size())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GenerateError {
    #[error("Initial value {0} does not fit in a nibble")]
    InitialValueTooLarge(u8),
    #[error(
        "Initial value {initial_value} must be larger than the max depth {max_depth} so that every reached depth can be recorded"
    )]
    InitialValueNotAboveMaxDepth { initial_value: u8, max_depth: u8 },
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Pattern database file does not exist")]
    NotFound,
    #[error("Pattern database is corrupt: expected {expected} bytes but found {actual}")]
    Corrupt { expected: u64, actual: u64 },
    #[error("Failed to read pattern database")]
    Io(#[from] io::Error),
}

#[derive(Error, Debug)]
pub enum SaveError {
    #[error("Failed to write pattern database")]
    Io(#[from] io::Error),
}

/// How a corner pattern database should be built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternDatabaseGenerateMeta {
    granularity: CornerGranularity,
    max_depth: u8,
    initial_value: u8,
}

impl PatternDatabaseGenerateMeta {
    /// Build to `max_depth` with entries that were never reached left at
    /// `max_depth + 1`.
    ///
    /// # Errors
    ///
    /// If `max_depth` is so deep that no nibble value lies above it.
    pub fn new(granularity: CornerGranularity, max_depth: u8) -> Result<Self, GenerateError> {
        let initial_value = max_depth.saturating_add(1).min(MAX_NIBBLE);
        Self::new_with_initial_value(granularity, max_depth, initial_value)
    }

    /// Anything above `max_depth + 1` overestimates the entries a bounded
    /// search never reaches, unless the search runs to completion. See
    /// `is_admissible_when_cut_off`.
    ///
    /// # Errors
    ///
    /// If `initial_value` does not fit in a nibble or is not larger than
    /// `max_depth`. See `GenerateError`.
    pub fn new_with_initial_value(
        granularity: CornerGranularity,
        max_depth: u8,
        initial_value: u8,
    ) -> Result<Self, GenerateError> {
        if initial_value > MAX_NIBBLE {
            return Err(GenerateError::InitialValueTooLarge(initial_value));
        }
        if initial_value <= max_depth {
            return Err(GenerateError::InitialValueNotAboveMaxDepth {
                initial_value,
                max_depth,
            });
        }
        Ok(Self {
            granularity,
            max_depth,
            initial_value,
        })
    }

    #[must_use]
    pub fn granularity(&self) -> CornerGranularity {
        self.granularity
    }

    #[must_use]
    pub fn max_depth(&self) -> u8 {
        self.max_depth
    }

    #[must_use]
    pub fn initial_value(&self) -> u8 {
        self.initial_value
    }

    /// Whether entries left at the initial value are still a lower bound
    /// when the search stops at `max_depth` before exhausting the space.
    #[must_use]
    pub fn is_admissible_when_cut_off(&self) -> bool {
        self.initial_value <= self.max_depth + 1
    }
}

/// The exact number of moves needed to solve the corners of a cube, for
/// every corner configuration, stored as one nibble per configuration.
#[derive(Debug, Clone)]
pub struct CornerPatternDatabase {
    table: NibbleArray,
    granularity: CornerGranularity,
    initial_value: u8,
    filled: usize,
    indexer: CornerIndexer,
}

impl CornerPatternDatabase {
    /// An empty database where every entry holds `initial_value`.
    ///
    /// # Panics
    ///
    /// Panics if `initial_value` does not fit in a nibble.
    #[must_use]
    pub fn new(granularity: CornerGranularity, initial_value: u8) -> Self {
        assert!(
            initial_value <= MAX_NIBBLE,
            "initial value {initial_value} does not fit in a nibble"
        );
        CornerPatternDatabase {
            table: NibbleArray::new(granularity.size(), initial_value),
            granularity,
            initial_value,
            filled: 0,
            indexer: CornerIndexer::new(),
        }
    }

    /// Build a database by breadth first search from the solved cube.
    ///
    /// Only the first state found for a corner configuration is expanded,
    /// since the corners of its successors do not depend on the edges.
    pub fn generate<C: CubeState>(meta: &PatternDatabaseGenerateMeta) -> Self {
        info!(
            start!("Generating {:?} corner pattern database up to depth {}"),
            meta.granularity, meta.max_depth
        );
        let start = Instant::now();

        let mut db = Self::new(meta.granularity, meta.initial_value);
        let solved = C::solved();
        db.set_moves(db.index(&solved), 0);

        let mut frontier = vec![solved];
        let mut depth = 0;
        while depth < meta.max_depth && !frontier.is_empty() {
            depth += 1;
            let depth_start = Instant::now();
            let mut next_frontier = vec![];
            for state in &frontier {
                for move_ in Move::ALL {
                    let next = state.with_move(move_);
                    if db.set_moves(db.index(&next), depth) {
                        next_frontier.push(next);
                    }
                }
            }
            debug!(
                working!("Depth {} reached {} configurations in {:.3}s ({}/{} filled)"),
                depth,
                next_frontier.len(),
                depth_start.elapsed().as_secs_f64(),
                db.filled,
                db.size()
            );
            frontier = next_frontier;
        }

        if !frontier.is_empty() && !meta.is_admissible_when_cut_off() {
            warn!(
                "Search stopped at depth {} with {} entries unreached, which hold {} and may overestimate",
                meta.max_depth,
                db.size() - db.filled,
                meta.initial_value
            );
        }

        info!(
            success!("Corner pattern database generated in {:.3}s with {}/{} entries filled"),
            start.elapsed().as_secs_f64(),
            db.filled,
            db.size()
        );
        db
    }

    /// The index of the corner configuration of `state`. Cubes that only
    /// differ in their edges share an index.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn index<C: CubeState>(&self, state: &C) -> usize {
        let rank = self.indexer.rank(&state.corner_permutation());
        let index = match self.granularity {
            CornerGranularity::Permutation => rank,
            CornerGranularity::PermutationAndOrientation => {
                let twist = state.corner_orientations()[..CORNER_COUNT - 1]
                    .iter()
                    .fold(0, |acc, &orientation| acc * 3 + u64::from(orientation));
                rank * ORIENTATION_STATES + twist
            }
        };
        index as usize
    }

    /// The stored move count for the corners of `state`.
    #[must_use]
    pub fn moves<C: CubeState>(&self, state: &C) -> u8 {
        self.moves_at(self.index(state))
    }

    /// # Panics
    ///
    /// Panics if `index` is not smaller than `size()`.
    #[must_use]
    pub fn moves_at(&self, index: usize) -> u8 {
        self.table.get(index)
    }

    /// Record that the configuration at `index` can be solved in `moves`.
    /// Only ever lowers the stored value. Returns whether the entry changed.
    /// The fill count never exceeds `size()`, even for a loaded database whose
    /// entries may hold the initial value as a real count.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not smaller than `size()`.
    pub fn set_moves(&mut self, index: usize, moves: u8) -> bool {
        let current = self.table.get(index);
        if moves >= current {
            return false;
        }
        if current == self.initial_value && self.filled < self.size() {
            self.filled += 1;
        }
        self.table.set(index, moves);
        true
    }

    /// The number of entries that hold a move count.
    #[must_use]
    pub fn filled(&self) -> usize {
        self.filled
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.table.len()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.filled == self.size()
    }

    #[must_use]
    pub fn granularity(&self) -> CornerGranularity {
        self.granularity
    }

    #[must_use]
    pub fn initial_value(&self) -> u8 {
        self.initial_value
    }

    /// Forget every entry.
    pub fn reset(&mut self) {
        self.table.fill(self.initial_value);
        self.filled = 0;
    }

    /// Write the raw nibble buffer to `path`.
    ///
    /// # Errors
    ///
    /// If the file cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SaveError> {
        let path = path.as_ref();
        fs::write(path, self.table.as_bytes())?;
        info!(
            success!("Saved {} byte pattern database to {}"),
            self.table.byte_len(),
            path.display()
        );
        Ok(())
    }

    /// Read a database written by `save`. The file must be exactly as long
    /// as a database of `granularity`.
    ///
    /// # Errors
    ///
    /// `LoadError::NotFound` if there is no file at `path`, which callers
    /// are expected to handle by generating a database.
    /// `LoadError::Corrupt` if the file has the wrong length.
    pub fn load(
        path: impl AsRef<Path>,
        granularity: CornerGranularity,
    ) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let start = Instant::now();
        let mut file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(LoadError::NotFound),
            Err(e) => return Err(e.into()),
        };

        let expected = granularity.byte_len() as u64;
        let actual = file.metadata()?.len();
        if actual != expected {
            return Err(LoadError::Corrupt { expected, actual });
        }

        let mut db = Self::new(granularity, MAX_NIBBLE);
        file.read_exact(db.table.as_bytes_mut())?;
        db.filled = db.size();

        info!(
            success!("Loaded pattern database from {} in {:.3}s"),
            path.display(),
            start.elapsed().as_secs_f64()
        );
        Ok(db)
    }
}

impl<C: CubeState> AdmissibleHeuristic<C> for CornerPatternDatabase {
    fn admissible_heuristic(&self, state: &C) -> u8 {
        self.moves(state)
    }
}
