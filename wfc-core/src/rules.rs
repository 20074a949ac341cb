use bitvec::prelude::*;
use wfc_rules::{AdjacencyModel, Direction, Symbol};

/// Adjacency rules compiled from a trained [`AdjacencyModel`] for fast lookup.
///
/// Allowed-neighbor sets are precomputed per `(symbol, direction)` pair.
/// A symbol that was never observed during training imposes no constraint
/// on its neighbors.
#[derive(Debug, Clone)]
pub struct AdjacencyRules {
    num_symbols: usize,
    counts: Vec<u64>,
    /// Indexing: `symbol * 8 + direction`.
    allowed: Vec<BitVec>,
}

impl AdjacencyRules {
    pub fn from_model<S: Symbol>(model: &AdjacencyModel<S>) -> Self {
        let num_symbols = model.num_symbols();
        let mut allowed = Vec::with_capacity(num_symbols * Direction::COUNT);
        for symbol in 0..num_symbols {
            for direction in Direction::ALL {
                allowed.push(model.allowed_neighbors(symbol, direction));
            }
        }
        Self {
            num_symbols,
            counts: model.counts().to_vec(),
            allowed,
        }
    }

    /// Gets the number of symbols these rules apply to.
    pub const fn num_symbols(&self) -> usize {
        self.num_symbols
    }

    /// Global training frequency of the symbol, used as its draw weight.
    pub fn count(&self, symbol: usize) -> u64 {
        self.counts.get(symbol).copied().unwrap_or(0)
    }

    /// Whether the symbol was observed and therefore constrains its neighbors.
    ///
    /// An unobserved symbol has an all-zero weight row; intersecting with it
    /// literally would empty every neighbor, so it constrains nothing instead.
    pub fn constrains(&self, symbol: usize) -> bool {
        self.count(symbol) > 0
    }

    /// Neighbors allowed in `direction` of `symbol`, or `None` if the symbol
    /// imposes no constraint.
    #[inline]
    pub fn allowed(&self, symbol: usize, direction: Direction) -> Option<&BitVec> {
        if !self.constrains(symbol) {
            return None;
        }
        self.allowed
            .get(symbol * Direction::COUNT + direction.index())
    }

    /// Union of the allowed sets of every candidate in `candidates`.
    ///
    /// Returns `None` when any candidate is unconstrained, since the union is
    /// then the whole alphabet.
    pub fn support(&self, candidates: &BitSlice, direction: Direction) -> Option<BitVec> {
        let mut union = bitvec![0; self.num_symbols];
        for symbol in candidates.iter_ones() {
            let allowed = self.allowed(symbol, direction)?;
            for neighbor in allowed.iter_ones() {
                union.set(neighbor, true);
            }
        }
        Some(union)
    }
}
