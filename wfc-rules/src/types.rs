use crate::grid::Grid;
use crate::LoadError;
use bitvec::prelude::*;
use std::fmt::Debug;
use std::hash::Hash;
use std::marker::PhantomData;

/// A closed alphabet of grid symbols with a single-character wire format.
///
/// `ALPHABET` fixes the order in which symbols are indexed by models and
/// possibility sets. Sentinel values that never appear in a grid (such as a
/// "none" variant) are left out of it.
pub trait Symbol: Copy + Eq + Hash + Debug + Send + Sync + 'static {
    /// Every trainable symbol, in index order.
    const ALPHABET: &'static [Self];

    /// Character written to corpus and export files.
    fn to_char(self) -> char;

    /// Parses a corpus character. Returns `None` for characters outside the alphabet.
    fn from_char(c: char) -> Option<Self>;

    /// Position of the symbol in `ALPHABET`.
    fn index(self) -> Option<usize> {
        Self::ALPHABET.iter().position(|&s| s == self)
    }

    /// Inverse of [`Symbol::index`].
    fn from_index(index: usize) -> Option<Self> {
        Self::ALPHABET.get(index).copied()
    }
}

/// The eight grid directions, clockwise from `Up`.
///
/// Row indices grow downward, so `Up` is `(-1, 0)` in `(row, col)` terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    Up,
    UpRight,
    Right,
    DownRight,
    Down,
    DownLeft,
    Left,
    UpLeft,
}

impl Direction {
    /// All directions in index order.
    pub const ALL: [Self; 8] = [
        Self::Up,
        Self::UpRight,
        Self::Right,
        Self::DownRight,
        Self::Down,
        Self::DownLeft,
        Self::Left,
        Self::UpLeft,
    ];

    /// The four axis-aligned directions.
    pub const CARDINAL: [Self; 4] = [Self::Up, Self::Right, Self::Down, Self::Left];

    /// Number of directions.
    pub const COUNT: usize = 8;

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::UpRight => Self::DownLeft,
            Self::Right => Self::Left,
            Self::DownRight => Self::UpLeft,
            Self::Down => Self::Up,
            Self::DownLeft => Self::UpRight,
            Self::Left => Self::Right,
            Self::UpLeft => Self::DownRight,
        }
    }

    /// `(row, col)` offset of the neighbor in this direction.
    pub const fn offset(self) -> (isize, isize) {
        match self {
            Self::Up => (-1, 0),
            Self::UpRight => (-1, 1),
            Self::Right => (0, 1),
            Self::DownRight => (1, 1),
            Self::Down => (1, 0),
            Self::DownLeft => (1, -1),
            Self::Left => (0, -1),
            Self::UpLeft => (-1, -1),
        }
    }

    pub const fn is_lateral(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

/// Co-occurrence statistics learned from example grids.
///
/// `weight(i, d, j)` is how many times symbol `j` was observed in direction
/// `d` of an occurrence of symbol `i`; `count(i)` is how many times `i`
/// occurred at all. Both are indexed by alphabet position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacencyModel<S: Symbol> {
    counts: Vec<u64>,
    /// Flattened `[symbol][direction][neighbor]`.
    weights: Vec<u32>,
    _alphabet: PhantomData<S>,
}

impl<S: Symbol> Default for AdjacencyModel<S> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<S: Symbol> AdjacencyModel<S> {
    /// A model with no observations.
    pub fn empty() -> Self {
        let n = S::ALPHABET.len();
        Self {
            counts: vec![0; n],
            weights: vec![0; n * Direction::COUNT * n],
            _alphabet: PhantomData,
        }
    }

    /// Builds a model from raw tables, validating their sizes.
    pub fn from_parts(counts: Vec<u64>, weights: Vec<u32>) -> Result<Self, LoadError> {
        let n = S::ALPHABET.len();
        if counts.len() != n {
            return Err(LoadError::InvalidData(format!(
                "Expected {n} symbol counts, found {}",
                counts.len()
            )));
        }
        let expected = n * Direction::COUNT * n;
        if weights.len() != expected {
            return Err(LoadError::InvalidData(format!(
                "Expected {expected} adjacency weights, found {}",
                weights.len()
            )));
        }
        Ok(Self {
            counts,
            weights,
            _alphabet: PhantomData,
        })
    }

    pub fn num_symbols(&self) -> usize {
        self.counts.len()
    }

    /// Raw occurrence totals in alphabet order.
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Raw flattened weight tensor.
    pub fn weights(&self) -> &[u32] {
        &self.weights
    }

    #[inline]
    fn flat_index(&self, symbol: usize, direction: Direction, neighbor: usize) -> usize {
        let n = self.num_symbols();
        (symbol * Direction::COUNT + direction.index()) * n + neighbor
    }

    /// Occurrence total for the symbol at `index`; zero when out of range.
    pub fn count_at(&self, index: usize) -> u64 {
        self.counts.get(index).copied().unwrap_or(0)
    }

    pub fn count(&self, symbol: S) -> u64 {
        symbol.index().map_or(0, |i| self.count_at(i))
    }

    /// Sum of all occurrence totals.
    pub fn total_count(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Weight by alphabet indices; zero when either index is out of range.
    pub fn weight_at(&self, symbol: usize, direction: Direction, neighbor: usize) -> u32 {
        let n = self.num_symbols();
        if symbol >= n || neighbor >= n {
            return 0;
        }
        self.weights[self.flat_index(symbol, direction, neighbor)]
    }

    pub fn weight(&self, symbol: S, direction: Direction, neighbor: S) -> u32 {
        match (symbol.index(), neighbor.index()) {
            (Some(i), Some(j)) => self.weight_at(i, direction, j),
            _ => 0,
        }
    }

    /// The set `{ j : weight(i, d, j) != 0 }` as a bit set over the alphabet.
    pub fn allowed_neighbors(&self, symbol: usize, direction: Direction) -> BitVec {
        let n = self.num_symbols();
        let mut allowed = bitvec![0; n];
        if symbol < n {
            let start = self.flat_index(symbol, direction, 0);
            for (j, &w) in self.weights[start..start + n].iter().enumerate() {
                if w != 0 {
                    allowed.set(j, true);
                }
            }
        }
        allowed
    }

    /// Adds every observation from one example grid.
    ///
    /// Cells on the border contribute nothing for directions that leave the
    /// grid.
    pub fn observe(&mut self, grid: &Grid<S>) {
        for row in 0..grid.rows() {
            for col in 0..grid.cols() {
                let Some(i) = grid.get(row, col).and_then(|s| s.index()) else {
                    continue;
                };
                self.counts[i] += 1;
                for direction in Direction::ALL {
                    let Some(j) = grid
                        .neighbor_value(row, col, direction)
                        .and_then(|s| s.index())
                    else {
                        continue;
                    };
                    let idx = self.flat_index(i, direction, j);
                    self.weights[idx] = self.weights[idx].saturating_add(1);
                }
            }
        }
    }

    /// Adds another model's observations into this one.
    pub fn merge(&mut self, other: &Self) {
        for (a, b) in self.counts.iter_mut().zip(&other.counts) {
            *a += b;
        }
        for (a, b) in self.weights.iter_mut().zip(&other.weights) {
            *a = a.saturating_add(*b);
        }
    }
}
