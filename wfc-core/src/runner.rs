use crate::{
    entropy::{CandidateCountEntropy, EntropyCalculator},
    grid::{open_cells, CellState, PossibilityGrid},
    propagator::{narrow_neighbors, CascadePropagator, ConstraintPropagator},
    rules::AdjacencyRules,
    WfcError,
};
use log::{debug, error, info, warn};
use rand::distributions::{Distribution, WeightedIndex};
use rand::{Rng, RngCore};
use std::time::{Duration, Instant};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Information about the current state of a running pass.
#[derive(Debug, Clone, Copy)]
pub struct ProgressInfo {
    /// Cells collapsed so far in this pass.
    pub collapsed_cells: usize,
    /// Cells that were open when the pass started.
    pub total_cells: usize,
    /// Time elapsed since the pass started.
    pub elapsed_time: Duration,
    /// The number of iterations completed so far.
    pub iterations: u64,
}

/// Alias for the progress callback function type.
pub type ProgressCallback = Box<dyn Fn(ProgressInfo) -> Result<(), WfcError> + Send + Sync>;

/// Strategy for a cell whose candidate set became empty.
pub trait Fallback {
    /// Picks a symbol for the cell at `cell`, or `None` when nothing is legal.
    fn choose(&self, cell: (usize, usize), rng: &mut dyn RngCore) -> Option<usize>;
}

/// Fallback that never offers a symbol, making every empty cell fatal.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFallback;

impl Fallback for NoFallback {
    fn choose(&self, _cell: (usize, usize), _rng: &mut dyn RngCore) -> Option<usize> {
        None
    }
}

/// Summary of a completed pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CollapseReport {
    /// Cells assigned a symbol by this pass.
    pub collapsed: usize,
    /// Cells resolved through the fallback strategy.
    pub fallbacks: usize,
    /// Draws made uniformly because no surviving candidate had a training count.
    pub uniform_draws: usize,
    /// Loop iterations executed.
    pub iterations: u64,
}

/// Configuration options for the WFC runner.
pub struct WfcConfig {
    pub propagator: Box<dyn ConstraintPropagator>,
    pub entropy_calculator: Box<dyn EntropyCalculator>,
    pub progress_callback: Option<ProgressCallback>,
    pub max_iterations: Option<u64>,
}

impl WfcConfig {
    /// Creates a new builder for `WfcConfig`.
    pub fn builder() -> WfcConfigBuilder {
        WfcConfigBuilder::default()
    }
}

impl Default for WfcConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl std::fmt::Debug for WfcConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WfcConfig")
            .field("propagator", &self.propagator)
            .field("entropy_calculator", &self.entropy_calculator)
            .field("progress_callback", &self.progress_callback.is_some())
            .field("max_iterations", &self.max_iterations)
            .finish()
    }
}

/// Builder for `WfcConfig`.
///
/// Allows for a more ergonomic construction of `WfcConfig` instances.
#[derive(Default)]
pub struct WfcConfigBuilder {
    propagator: Option<Box<dyn ConstraintPropagator>>,
    entropy_calculator: Option<Box<dyn EntropyCalculator>>,
    progress_callback: Option<ProgressCallback>,
    max_iterations: Option<u64>,
}

impl WfcConfigBuilder {
    /// Replaces the default [`CascadePropagator`].
    #[must_use]
    pub fn propagator(mut self, propagator: Box<dyn ConstraintPropagator>) -> Self {
        self.propagator = Some(propagator);
        self
    }

    /// Replaces the default [`CandidateCountEntropy`] selection.
    #[must_use]
    pub fn entropy_calculator(mut self, calculator: Box<dyn EntropyCalculator>) -> Self {
        self.entropy_calculator = Some(calculator);
        self
    }

    /// Sets the progress callback function.
    #[must_use]
    pub fn progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Sets the maximum number of iterations allowed.
    #[must_use]
    pub fn max_iterations(mut self, max: u64) -> Self {
        self.max_iterations = Some(max);
        self
    }

    /// Builds the `WfcConfig` instance.
    pub fn build(self) -> WfcConfig {
        WfcConfig {
            propagator: self
                .propagator
                .unwrap_or_else(|| Box::new(CascadePropagator)),
            entropy_calculator: self
                .entropy_calculator
                .unwrap_or_else(|| Box::new(CandidateCountEntropy)),
            progress_callback: self.progress_callback,
            max_iterations: self.max_iterations,
        }
    }
}

/// Runs one Wave Function Collapse pass over `grid`.
///
/// 1. **Validation**: every cell must be sized for the alphabet of `rules`.
/// 2. **Initial propagation**: each fixed cell narrows its direct open neighbors.
/// 3. **Selection**: the configured [`EntropyCalculator`] picks the next open cell.
/// 4. **Draw**: a candidate is drawn with probability proportional to its
///    training count. An empty candidate set is handed to `fallback`.
/// 5. **Commit and propagate**: the cell is fixed and the configured
///    [`ConstraintPropagator`] narrows the cells around it.
///
/// The pass ends when no open cell remains. On success every cell of `grid`
/// is [`CellState::Fixed`].
pub fn run<R: Rng>(
    grid: &mut PossibilityGrid,
    rules: &AdjacencyRules,
    fallback: &dyn Fallback,
    rng: &mut R,
    config: &WfcConfig,
) -> Result<CollapseReport, WfcError> {
    let start_time = Instant::now();
    let num_symbols = rules.num_symbols();
    validate_grid(grid, num_symbols)?;

    let total_cells = open_cells(grid);
    info!(
        "Starting WFC pass: {}x{} grid, {} open cells, {} symbols",
        grid.rows(),
        grid.cols(),
        total_cells,
        num_symbols
    );

    // Fixed cells constrain their neighbors before anything is drawn.
    let fixed: Vec<((usize, usize), usize)> = grid
        .iter_cells()
        .filter_map(|(coords, cell)| cell.fixed().map(|s| (coords, s)))
        .collect();
    let narrowed: usize = fixed
        .iter()
        .map(|&(coords, symbol)| narrow_neighbors(grid, coords, symbol, rules))
        .sum();
    debug!(
        "Initial propagation from {} fixed cells narrowed {} neighbors",
        fixed.len(),
        narrowed
    );

    let iteration_limit = config
        .max_iterations
        .unwrap_or_else(|| (total_cells as u64).saturating_mul(10).max(1));
    let mut report = CollapseReport::default();

    while let Some((row, col)) = config.entropy_calculator.select_lowest_entropy_cell(grid) {
        report.iterations += 1;
        if report.iterations > iteration_limit {
            error!(
                "Maximum iterations ({}) exceeded with {} cells still open.",
                iteration_limit,
                open_cells(grid)
            );
            return Err(WfcError::MaxIterationsReached(iteration_limit));
        }

        let candidates = match grid.get(row, col) {
            Some(CellState::Open(bits)) => bits.clone(),
            other => {
                return Err(WfcError::InternalError(format!(
                    "Selected cell ({row}, {col}) is not open: {other:?}"
                )))
            }
        };

        let symbol = if candidates.any() {
            draw_weighted(&candidates, rules, rng, &mut report)?
        } else {
            let chosen = fallback.choose((row, col), &mut *rng).ok_or_else(|| {
                debug!("Fallback has no symbol for ({}, {})", row, col);
                WfcError::Unsatisfiable(row, col)
            })?;
            if chosen >= num_symbols {
                return Err(WfcError::ConfigurationError(format!(
                    "Fallback returned symbol {chosen} outside an alphabet of {num_symbols}"
                )));
            }
            warn!(
                "Cell ({}, {}) ran out of candidates; fallback chose symbol {}",
                row, col, chosen
            );
            report.fallbacks += 1;
            chosen
        };

        debug!(
            "Iter {}: Collapsing cell ({}, {}) to symbol {} ({} candidates)",
            report.iterations,
            row,
            col,
            symbol,
            candidates.count_ones()
        );
        grid.set(row, col, CellState::Fixed(symbol));
        config.propagator.propagate(grid, (row, col), symbol, rules);
        report.collapsed += 1;

        if let Some(ref callback) = config.progress_callback {
            callback(ProgressInfo {
                collapsed_cells: report.collapsed,
                total_cells,
                elapsed_time: start_time.elapsed(),
                iterations: report.iterations,
            })?;
        }
    }

    info!(
        "WFC pass finished in {:?}: {} collapsed, {} fallbacks, {} uniform draws.",
        start_time.elapsed(),
        report.collapsed,
        report.fallbacks,
        report.uniform_draws
    );
    Ok(report)
}

fn validate_grid(grid: &PossibilityGrid, num_symbols: usize) -> Result<(), WfcError> {
    for ((row, col), cell) in grid.iter_cells() {
        let ok = match cell {
            CellState::Fixed(symbol) => *symbol < num_symbols,
            CellState::Open(bits) => bits.len() == num_symbols,
        };
        if !ok {
            error!("Cell ({}, {}) does not match an alphabet of {}", row, col, num_symbols);
            return Err(WfcError::ConfigurationError(format!(
                "Cell ({row}, {col}) does not match an alphabet of {num_symbols} symbols"
            )));
        }
    }
    Ok(())
}

/// Draws one of the surviving candidates weighted by training count.
fn draw_weighted<R: Rng + ?Sized>(
    candidates: &bitvec::slice::BitSlice,
    rules: &AdjacencyRules,
    rng: &mut R,
    report: &mut CollapseReport,
) -> Result<usize, WfcError> {
    let indices: Vec<usize> = candidates.iter_ones().collect();
    let weights: Vec<u64> = indices.iter().map(|&i| rules.count(i)).collect();
    if weights.iter().all(|&w| w == 0) {
        report.uniform_draws += 1;
        return Ok(indices[rng.gen_range(0..indices.len())]);
    }
    let dist = WeightedIndex::new(&weights)?;
    Ok(indices[dist.sample(rng)])
}
