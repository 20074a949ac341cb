use crate::grid::{CellState, PossibilityGrid};
use crate::propagator::{narrow_neighbors, ConstraintPropagator};
use crate::rules::AdjacencyRules;
use log::trace;
use wfc_rules::Direction;

/// One-hop propagation followed by a single cascade step.
///
/// After the direct neighbors of the fixed cell are narrowed, each of those
/// neighbors that is still open with at least one candidate restricts its own
/// open neighbors to the union of what its surviving candidates allow. The
/// cascade stops there; it does not iterate to a fixpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct CascadePropagator;

impl ConstraintPropagator for CascadePropagator {
    fn propagate(
        &self,
        grid: &mut PossibilityGrid,
        origin: (usize, usize),
        symbol: usize,
        rules: &AdjacencyRules,
    ) {
        let narrowed = narrow_neighbors(grid, origin, symbol, rules);
        let mut cascaded = 0;

        for direction in Direction::ALL {
            let Some((nr, nc)) = grid.neighbor(origin.0, origin.1, direction) else {
                continue;
            };
            let candidates = match grid.get(nr, nc) {
                Some(CellState::Open(bits)) if bits.any() => bits.clone(),
                _ => continue,
            };
            for outward in Direction::ALL {
                let Some((mr, mc)) = grid.neighbor(nr, nc, outward) else {
                    continue;
                };
                if !grid.get(mr, mc).is_some_and(CellState::is_open) {
                    continue;
                }
                let Some(support) = rules.support(&candidates, outward) else {
                    continue;
                };
                if let Some(cell) = grid.get_mut(mr, mc) {
                    if cell.restrict(&support) {
                        cascaded += 1;
                    }
                }
            }
        }
        trace!(
            "Propagated from ({}, {}): {} neighbors narrowed, {} cascade updates",
            origin.0,
            origin.1,
            narrowed,
            cascaded
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::CellState;
    use wfc_rules::{AdjacencyModel, Grid, Symbol};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Band {
        Top,
        Mid,
        Low,
    }

    impl Symbol for Band {
        const ALPHABET: &'static [Self] = &[Self::Top, Self::Mid, Self::Low];

        fn to_char(self) -> char {
            match self {
                Self::Top => 't',
                Self::Mid => 'm',
                Self::Low => 'l',
            }
        }

        fn from_char(c: char) -> Option<Self> {
            Self::ALPHABET.iter().copied().find(|s| s.to_char() == c)
        }
    }

    /// Rows of t, m, l stacked vertically, three columns wide.
    fn banded_rules() -> AdjacencyRules {
        let rows = vec![
            vec![Band::Top; 3],
            vec![Band::Mid; 3],
            vec![Band::Low; 3],
        ];
        let mut model = AdjacencyModel::empty();
        model.observe(&Grid::from_rows(rows).unwrap());
        AdjacencyRules::from_model(&model)
    }

    #[test]
    fn direct_neighbors_are_narrowed() {
        let rules = banded_rules();
        let mut grid = Grid::filled(3, 1, CellState::open_with(3, 0..3));
        grid.set(0, 0, CellState::Fixed(0));
        CascadePropagator.propagate(&mut grid, (0, 0), 0, &rules);
        // Below Top only Mid was observed.
        assert_eq!(grid.get(1, 0), Some(&CellState::open_with(3, [1])));
    }

    #[test]
    fn cascade_reaches_second_ring() {
        let rules = banded_rules();
        let mut grid = Grid::filled(3, 1, CellState::open_with(3, 0..3));
        grid.set(0, 0, CellState::Fixed(0));
        CascadePropagator.propagate(&mut grid, (0, 0), 0, &rules);
        // Mid (the only candidate at row 1) allows only Low below it.
        assert_eq!(grid.get(2, 0), Some(&CellState::open_with(3, [2])));
    }

    #[test]
    fn cascade_is_a_single_hop() {
        let rules = banded_rules();
        let mut grid = Grid::filled(4, 1, CellState::open_with(3, 0..3));
        grid.set(0, 0, CellState::Fixed(0));
        CascadePropagator.propagate(&mut grid, (0, 0), 0, &rules);
        // Row 3 is two hops from the origin's neighbor and stays untouched.
        assert_eq!(grid.get(3, 0), Some(&CellState::open_with(3, 0..3)));
    }

    #[test]
    fn empty_neighbors_do_not_cascade() {
        let rules = banded_rules();
        let mut grid = Grid::filled(3, 1, CellState::open_with(3, 0..3));
        grid.set(0, 0, CellState::Fixed(0));
        grid.set(1, 0, CellState::open_with(3, [2]));
        CascadePropagator.propagate(&mut grid, (0, 0), 0, &rules);
        assert_eq!(grid.get(1, 0), Some(&CellState::open_with(3, std::iter::empty())));
        assert_eq!(grid.get(2, 0), Some(&CellState::open_with(3, 0..3)));
    }

    #[test]
    fn unobserved_symbol_leaves_neighbors_alone() {
        let model = AdjacencyModel::<Band>::empty();
        let rules = AdjacencyRules::from_model(&model);
        let mut grid = Grid::filled(2, 2, CellState::open_with(3, 0..3));
        grid.set(0, 0, CellState::Fixed(1));
        CascadePropagator.propagate(&mut grid, (0, 0), 1, &rules);
        assert_eq!(grid.get(1, 1), Some(&CellState::open_with(3, 0..3)));
    }
}
