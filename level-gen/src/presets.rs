use crate::GenerationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tile rows in one section, shared by every size preset.
pub const SECTION_ROWS: usize = 8;
/// Tile columns in one section, shared by every size preset.
pub const SECTION_COLS: usize = 10;

/// Level size presets. Every preset uses 8x10 tile sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum SizePreset {
    /// 32x40 tiles, 4x4 sections.
    #[default]
    Small,
    /// 40x50 tiles, 5x5 sections.
    Medium,
    /// 48x60 tiles, 6x6 sections.
    Large,
    /// 64x80 tiles, 8x8 sections.
    Huge,
}

impl SizePreset {
    pub const ALL: [Self; 4] = [Self::Small, Self::Medium, Self::Large, Self::Huge];

    pub const fn dimensions(self) -> LevelDimensions {
        let sections = match self {
            Self::Small => 4,
            Self::Medium => 5,
            Self::Large => 6,
            Self::Huge => 8,
        };
        LevelDimensions {
            section_rows: SECTION_ROWS,
            section_cols: SECTION_COLS,
            section_grid_rows: sections,
            section_grid_cols: sections,
        }
    }
}

/// Biome selecting which trained style model the final pass uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum StylePreset {
    Cave,
    Grass,
    Dungeon,
    #[default]
    General,
}

impl StylePreset {
    pub const ALL: [Self; 4] = [Self::Cave, Self::Grass, Self::Dungeon, Self::General];

    /// Directory and file stem used for this style's corpus and model.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Cave => "cave",
            Self::Grass => "grass",
            Self::Dungeon => "dungeon",
            Self::General => "general",
        }
    }
}

impl fmt::Display for StylePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Concrete level geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LevelDimensions {
    /// Tile rows per section.
    pub section_rows: usize,
    /// Tile columns per section.
    pub section_cols: usize,
    /// Section rows in the level.
    pub section_grid_rows: usize,
    /// Section columns in the level.
    pub section_grid_cols: usize,
}

impl LevelDimensions {
    /// Checks that the geometry can hold a start and an end section.
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.section_rows == 0 || self.section_cols == 0 {
            return Err(GenerationError::InvalidDimensions(
                "sections must be at least 1x1 tiles".to_owned(),
            ));
        }
        if self.section_grid_rows < 2 || self.section_grid_cols == 0 {
            return Err(GenerationError::InvalidDimensions(format!(
                "need at least 2x1 sections, got {}x{}",
                self.section_grid_rows, self.section_grid_cols
            )));
        }
        Ok(())
    }

    pub const fn rows(&self) -> usize {
        self.section_rows * self.section_grid_rows
    }

    pub const fn cols(&self) -> usize {
        self.section_cols * self.section_grid_cols
    }

    pub const fn num_sections(&self) -> usize {
        self.section_grid_rows * self.section_grid_cols
    }
}
