use bitvec::prelude::*;
use wfc_rules::Grid;

/// State of one cell during a collapse pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellState {
    /// A symbol has been assigned; the cell is not subject to collapse.
    Fixed(usize),
    /// Surviving candidates, indexed by alphabet position. May be empty.
    Open(BitVec),
}

impl CellState {
    /// An open cell whose candidates are exactly `indices`.
    pub fn open_with(num_symbols: usize, indices: impl IntoIterator<Item = usize>) -> Self {
        let mut bits = bitvec![0; num_symbols];
        for i in indices {
            if i < num_symbols {
                bits.set(i, true);
            }
        }
        Self::Open(bits)
    }

    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Open(_))
    }

    pub const fn fixed(&self) -> Option<usize> {
        match self {
            Self::Fixed(i) => Some(*i),
            Self::Open(_) => None,
        }
    }

    /// Number of surviving candidates, or `None` for fixed cells.
    pub fn candidate_count(&self) -> Option<usize> {
        match self {
            Self::Fixed(_) => None,
            Self::Open(bits) => Some(bits.count_ones()),
        }
    }

    /// Intersects an open cell with `allowed`. Returns whether anything was removed.
    pub fn restrict(&mut self, allowed: &BitSlice) -> bool {
        match self {
            Self::Fixed(_) => false,
            Self::Open(bits) => {
                let removed: Vec<usize> = bits
                    .iter_ones()
                    .filter(|&i| !allowed.get(i).map_or(false, |b| *b))
                    .collect();
                for &i in &removed {
                    bits.set(i, false);
                }
                !removed.is_empty()
            }
        }
    }
}

/// Grid storing one [`CellState`] per cell.
pub type PossibilityGrid = Grid<CellState>;

/// Number of cells still open.
pub fn open_cells(grid: &PossibilityGrid) -> usize {
    grid.iter_cells().filter(|(_, c)| c.is_open()).count()
}
