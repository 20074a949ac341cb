//! Command-line front end for the level generator.
//!
//! `level-forge generate` writes a level, `restyle` redoes the tiles of an
//! existing level in another style and `train` turns corpora into model
//! artifacts.

pub mod config;
pub mod error;
pub mod logging;
pub mod main;
pub mod output;
pub mod progress;
pub mod visualization;

pub use crate::config::AppConfig;
pub use crate::error::AppError;
pub use crate::main::main;
