//! Core library for the Wave Function Collapse passes of the level generator.
//! Defines the possibility grid, cell selection, constraint propagation and
//! the runner loop shared by every symbol alphabet.

use rand::distributions::WeightedError;
use thiserror::Error;

/// Cell selection strategies.
pub mod entropy;
/// Possibility grid and per-cell state.
pub mod grid;
/// Constraint propagation logic and traits.
pub mod propagator;
/// Adjacency rules compiled from a trained model.
pub mod rules;
/// The core WFC algorithm runner.
pub mod runner;

// Re-export core public items

pub use crate::entropy::{CandidateCountEntropy, EntropyCalculator};
pub use crate::grid::{CellState, PossibilityGrid};
pub use crate::propagator::{CascadePropagator, ConstraintPropagator};
pub use crate::rules::AdjacencyRules;
/// The main function to execute the Wave Function Collapse algorithm.
pub use crate::runner::run;
pub use crate::runner::{
    CollapseReport, Fallback, NoFallback, ProgressCallback, ProgressInfo, WfcConfig,
};

/// Errors that can occur during the Wave Function Collapse algorithm.
#[derive(Error, Debug)]
pub enum WfcError {
    /// A cell ran out of candidates and the fallback strategy had nothing to offer.
    /// Includes the (row, col) coordinates of the cell.
    #[error("No legal symbol for cell ({0}, {1})")]
    Unsatisfiable(usize, usize),
    /// An error related to invalid configuration (e.g., mismatched alphabet sizes).
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    /// An unexpected internal error occurred.
    #[error("Internal error: {0}")]
    InternalError(String),
    /// WFC exceeded the configured maximum number of iterations.
    #[error("Maximum iterations ({0}) reached")]
    MaxIterationsReached(u64),
    /// Error occurred during weighted random selection.
    #[error("Weighted selection error: {0}")]
    WeightedChoiceError(#[from] WeightedError),
    /// The progress callback asked the run to stop.
    #[error("WFC run interrupted: {0}")]
    Interrupted(String),
}
