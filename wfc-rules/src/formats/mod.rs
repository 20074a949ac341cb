//! Parsers for the on-disk formats read by the loader.

// Export the core parser trait
pub mod parser;
pub use parser::FormatParser;

// Format-specific implementations
pub mod grid_format;
pub mod ron_format;

pub use grid_format::GridTextParser;
pub use ron_format::{ModelArtifact, RonModelParser, MODEL_FORMAT_VERSION};
