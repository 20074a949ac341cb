use crate::grid::PossibilityGrid;
use crate::rules::AdjacencyRules;
use std::fmt::Debug;
use wfc_rules::Direction;

mod cascade;
pub use cascade::CascadePropagator;

/// Trait defining the interface for a constraint propagation algorithm.
///
/// Implementors narrow the open cells around a cell that was just fixed.
/// Propagation never fails: a cell whose candidates run out simply stays
/// open and empty, and the runner resolves it when it is selected.
pub trait ConstraintPropagator: Send + Sync + Debug {
    /// Propagates the consequences of fixing `origin` to `symbol`.
    fn propagate(
        &self,
        grid: &mut PossibilityGrid,
        origin: (usize, usize),
        symbol: usize,
        rules: &AdjacencyRules,
    );
}

/// Intersects each open neighbor of `origin` with what `symbol` allows in that
/// direction. Returns the number of cells that lost candidates.
pub fn narrow_neighbors(
    grid: &mut PossibilityGrid,
    origin: (usize, usize),
    symbol: usize,
    rules: &AdjacencyRules,
) -> usize {
    let mut changed = 0;
    for direction in Direction::ALL {
        let Some(allowed) = rules.allowed(symbol, direction) else {
            // Unconstrained symbol.
            return 0;
        };
        let Some((nr, nc)) = grid.neighbor(origin.0, origin.1, direction) else {
            continue;
        };
        if let Some(cell) = grid.get_mut(nr, nc) {
            if cell.restrict(allowed) {
                changed += 1;
            }
        }
    }
    changed
}
