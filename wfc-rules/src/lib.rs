//! Symbol alphabets, grids and learned adjacency models for Wave Function Collapse.
//!
//! This crate owns everything that describes *what* may sit next to *what*:
//! the [`Symbol`] trait implemented by every tile alphabet, the 8-way
//! [`Direction`], the dense row-major [`Grid`], and the [`AdjacencyModel`]
//! trained from example grids. It also knows how to read example corpora and
//! persist trained models.

use thiserror::Error;

pub mod formats;
pub mod generator;
pub mod grid;
pub mod loader;
pub mod types;

pub use generator::train_model;
pub use grid::Grid;
pub use types::{AdjacencyModel, Direction, Symbol};

/// Errors raised while reading corpora or model artifacts.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The underlying file could not be read or written.
    #[error("I/O error reading file: {0}")]
    Io(#[from] std::io::Error),
    /// The file was not syntactically valid for its format.
    #[error("Failed to parse {format}: {message}")]
    ParseError {
        /// Human-readable name of the format being parsed.
        format: &'static str,
        /// Parser diagnostic.
        message: String,
    },
    /// The file parsed but its content is not usable.
    #[error("Invalid data: {0}")]
    InvalidData(String),
}
