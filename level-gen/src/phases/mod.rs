//! The four generation phases, in execution order.

pub mod paths;
pub mod sections;
pub mod special_tiles;
pub mod style;

pub use paths::generate_paths;
pub use sections::assemble_sections;
pub use special_tiles::place_special_tiles;
pub use style::{set_level_style, StyleOutcome};
