use crate::grid::PossibilityGrid;
use std::fmt::Debug;

/// Trait for choosing the next cell to collapse.
pub trait EntropyCalculator: Send + Sync + Debug {
    /// Returns the coordinates of the open cell to collapse next, or `None`
    /// once no open cell remains.
    fn select_lowest_entropy_cell(&self, grid: &PossibilityGrid) -> Option<(usize, usize)>;
}

/// Uses the number of surviving candidates as the entropy measure.
///
/// Ties go to the first cell in row-major scan order. Open cells with no
/// candidates left score zero and are therefore picked first.
#[derive(Debug, Clone, Copy, Default)]
pub struct CandidateCountEntropy;

impl EntropyCalculator for CandidateCountEntropy {
    fn select_lowest_entropy_cell(&self, grid: &PossibilityGrid) -> Option<(usize, usize)> {
        let mut best: Option<((usize, usize), usize)> = None;
        for (coords, cell) in grid.iter_cells() {
            let Some(count) = cell.candidate_count() else {
                continue;
            };
            if best.map_or(true, |(_, lowest)| count < lowest) {
                best = Some((coords, count));
                if count == 0 {
                    break;
                }
            }
        }
        best.map(|(coords, _)| coords)
    }
}
