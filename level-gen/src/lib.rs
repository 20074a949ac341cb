//! Procedural platformer level generation.
//!
//! A level is produced in four phases that share one [`GenerationContext`]:
//!
//! 1. **Paths**: a randomized backtracking walk over the section grid picks a
//!    route from a top-row start section to a bottom-row end section and
//!    classifies each section by how the route passes through it.
//! 2. **Sections**: a prefab archetype grid is stamped into every section,
//!    optionally mirrored.
//! 3. **Special tiles**: wildcard cells are resolved with Wave Function
//!    Collapse over archetypes.
//! 4. **Style**: every archetype is mapped to a concrete tile type with a
//!    second collapse pass driven by a per-biome model.
//!
//! [`LevelGenerator`] runs the pipeline; [`GeneratorAssets`] supplies the
//! prefabs and trained models.

use thiserror::Error;
use wfc_core::WfcError;
use wfc_rules::LoadError;

pub mod assets;
pub mod config;
pub mod context;
pub mod export;
pub mod generator;
pub mod phases;
pub mod presets;
pub mod tiles;

pub use assets::{GeneratorAssets, PrefabLibrary};
pub use config::GeneratorConfig;
pub use context::{GenerationContext, SectionPlacement};
pub use generator::{LevelGenerator, LevelResult};
pub use presets::{LevelDimensions, SizePreset, StylePreset};
pub use tiles::{SectionType, TileArchetype, TileType};

/// Errors raised while preparing assets or generating a level.
#[derive(Error, Debug)]
pub enum GenerationError {
    /// Prefabs, corpora or models could not be loaded.
    #[error("Failed to load generator data: {0}")]
    Load(#[from] LoadError),
    /// A collapse pass failed in a way no restart can fix.
    #[error("Collapse failed: {0}")]
    Wfc(#[from] WfcError),
    /// No route from the top to the bottom row was found within the attempt budget.
    #[error("No path found after {attempts} attempts")]
    PathNotFound { attempts: u32 },
    /// The style pass stayed unsatisfiable for every allowed restart.
    #[error("Style pass unsatisfiable after {attempts} attempts")]
    StyleUnsatisfiable { attempts: u32 },
    /// A section type has no prefab to stamp.
    #[error("No prefab registered for section type {0:?}")]
    MissingPrefabs(SectionType),
    /// A prefab violates the prefab rules.
    #[error("Invalid prefab: {0}")]
    InvalidPrefab(String),
    /// The requested style has no trained model.
    #[error("No style model for preset {0}")]
    MissingStyleModel(StylePreset),
    /// The level geometry cannot host a start and an end section.
    #[error("Invalid level dimensions: {0}")]
    InvalidDimensions(String),
    /// A phase found the context in a state an earlier phase should have prevented.
    #[error("Invalid generation state: {0}")]
    InvalidState(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON export failed: {0}")]
    Json(#[from] serde_json::Error),
}
