//! Prefabs and trained adjacency models consumed by the generator.
//!
//! A data directory has this layout; every part except the prefabs may be
//! replaced by a model artifact under `models/`:
//!
//! ```text
//! prefabs/<section>.txt      archetype grids, one file per section type
//! archetypes/*.txt           archetype corpus for the special-tile pass
//! styles/<style>/*.txt       type corpus per style preset
//! models/archetypes.ron      trained archetype model (optional)
//! models/<style>.ron         trained style model (optional)
//! ```

use crate::presets::{StylePreset, SECTION_COLS, SECTION_ROWS};
use crate::tiles::{SectionType, TileArchetype, TileType};
use crate::GenerationError;
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use wfc_rules::formats::{FormatParser, GridTextParser};
use wfc_rules::loader::{load_corpus_dir, load_corpus_file, load_model, save_model, CORPUS_EXTENSION};
use wfc_rules::{train_model, AdjacencyModel, Grid, Symbol};

pub const PREFABS_DIR: &str = "prefabs";
pub const ARCHETYPES_DIR: &str = "archetypes";
pub const STYLES_DIR: &str = "styles";
pub const MODELS_DIR: &str = "models";
pub const ARCHETYPE_MODEL_FILE: &str = "archetypes.ron";

const BUILTIN_PREFABS: [(SectionType, &str); 7] = [
    (SectionType::Side, include_str!("../data/prefabs/side.txt")),
    (SectionType::Normal, include_str!("../data/prefabs/normal.txt")),
    (SectionType::Drop, include_str!("../data/prefabs/drop.txt")),
    (SectionType::Landing, include_str!("../data/prefabs/landing.txt")),
    (SectionType::Jump, include_str!("../data/prefabs/jump.txt")),
    (
        SectionType::JumpLanding,
        include_str!("../data/prefabs/jump_landing.txt"),
    ),
    (SectionType::Through, include_str!("../data/prefabs/through.txt")),
];

const BUILTIN_ARCHETYPE_CORPUS: &str = include_str!("../data/archetypes/corpus.txt");

const BUILTIN_STYLE_CORPORA: [(StylePreset, &str); 4] = [
    (StylePreset::Cave, include_str!("../data/styles/cave/corpus.txt")),
    (StylePreset::Grass, include_str!("../data/styles/grass/corpus.txt")),
    (
        StylePreset::Dungeon,
        include_str!("../data/styles/dungeon/corpus.txt"),
    ),
    (
        StylePreset::General,
        include_str!("../data/styles/general/corpus.txt"),
    ),
];

/// Model artifact file name for a style.
pub fn style_model_file(style: StylePreset) -> String {
    format!("{}.ron", style.name())
}

/// Prefab archetype grids grouped by section type.
///
/// Every registered prefab has the library's section size, exactly one
/// `Start` placeholder and no `End` or `None` cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefabLibrary {
    section_rows: usize,
    section_cols: usize,
    prefabs: Vec<Vec<Grid<TileArchetype>>>,
}

impl Default for PrefabLibrary {
    fn default() -> Self {
        Self::new(SECTION_ROWS, SECTION_COLS)
    }
}

impl PrefabLibrary {
    pub fn new(section_rows: usize, section_cols: usize) -> Self {
        Self {
            section_rows,
            section_cols,
            prefabs: vec![Vec::new(); SectionType::ALL.len()],
        }
    }

    pub const fn section_size(&self) -> (usize, usize) {
        (self.section_rows, self.section_cols)
    }

    /// Validates and registers one prefab.
    pub fn add(
        &mut self,
        section_type: SectionType,
        prefab: Grid<TileArchetype>,
    ) -> Result<(), GenerationError> {
        let Some(index) = section_type.index() else {
            return Err(GenerationError::InvalidPrefab(format!(
                "cannot register prefabs for section type {section_type:?}"
            )));
        };
        if (prefab.rows(), prefab.cols()) != self.section_size() {
            return Err(GenerationError::InvalidPrefab(format!(
                "{section_type:?} prefab is {}x{}, expected {}x{}",
                prefab.rows(),
                prefab.cols(),
                self.section_rows,
                self.section_cols
            )));
        }
        let placeholders = prefab
            .iter_cells()
            .filter(|(_, &archetype)| archetype == TileArchetype::Start)
            .count();
        if placeholders != 1 {
            return Err(GenerationError::InvalidPrefab(format!(
                "{section_type:?} prefab has {placeholders} '{}' placeholders, expected exactly 1",
                TileArchetype::Start.to_char()
            )));
        }
        if let Some(((row, col), archetype)) = prefab
            .iter_cells()
            .find(|(_, &a)| matches!(a, TileArchetype::End | TileArchetype::None))
        {
            return Err(GenerationError::InvalidPrefab(format!(
                "{section_type:?} prefab has {archetype:?} at ({row}, {col})"
            )));
        }
        self.prefabs[index].push(prefab);
        Ok(())
    }

    /// Parses a prefab file's content and registers every grid in it.
    /// Returns the number of prefabs added.
    pub fn add_text(
        &mut self,
        section_type: SectionType,
        content: &str,
    ) -> Result<usize, GenerationError> {
        let grids = GridTextParser::<TileArchetype>::new().parse(content)?;
        let added = grids.len();
        for grid in grids {
            self.add(section_type, grid)?;
        }
        Ok(added)
    }

    /// Prefabs registered for `section_type`; empty for `None`.
    pub fn prefabs(&self, section_type: SectionType) -> &[Grid<TileArchetype>] {
        section_type
            .index()
            .and_then(|i| self.prefabs.get(i))
            .map_or(&[], Vec::as_slice)
    }

    /// Total number of registered prefabs.
    pub fn len(&self) -> usize {
        self.prefabs.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fails with [`GenerationError::MissingPrefabs`] for the first section type
    /// without prefabs.
    pub fn validate_complete(&self) -> Result<(), GenerationError> {
        match SectionType::ALL
            .into_iter()
            .find(|&t| self.prefabs(t).is_empty())
        {
            Some(missing) => Err(GenerationError::MissingPrefabs(missing)),
            None => Ok(()),
        }
    }
}

/// Everything the generator needs besides the request itself.
#[derive(Debug, Clone)]
pub struct GeneratorAssets {
    pub prefabs: PrefabLibrary,
    /// Model for the special-tile pass.
    pub archetype_model: AdjacencyModel<TileArchetype>,
    /// Model for the style pass, per preset.
    pub style_models: BTreeMap<StylePreset, AdjacencyModel<TileType>>,
}

impl GeneratorAssets {
    /// Prefabs and corpora compiled into the crate, trained on the spot.
    pub fn builtin() -> Result<Self, GenerationError> {
        let mut prefabs = PrefabLibrary::default();
        for (section_type, content) in BUILTIN_PREFABS {
            prefabs.add_text(section_type, content)?;
        }
        prefabs.validate_complete()?;

        let archetype_corpus =
            GridTextParser::<TileArchetype>::new().parse(BUILTIN_ARCHETYPE_CORPUS)?;
        let archetype_model = train_model(&archetype_corpus);

        let mut style_models = BTreeMap::new();
        for (style, content) in BUILTIN_STYLE_CORPORA {
            let corpus = GridTextParser::<TileType>::new().parse(content)?;
            style_models.insert(style, train_model(&corpus));
        }

        debug!(
            "Built-in assets: {} prefabs, {} style models",
            prefabs.len(),
            style_models.len()
        );
        Ok(Self {
            prefabs,
            archetype_model,
            style_models,
        })
    }

    /// Loads a data directory, preferring model artifacts over corpora.
    pub fn from_dir(dir: &Path) -> Result<Self, GenerationError> {
        Self::load_dir(dir, true)
    }

    /// Loads a data directory and trains every model from its corpora,
    /// ignoring existing artifacts.
    pub fn train_dir(dir: &Path) -> Result<Self, GenerationError> {
        Self::load_dir(dir, false)
    }

    fn load_dir(dir: &Path, use_artifacts: bool) -> Result<Self, GenerationError> {
        info!("Loading generator data from {}", dir.display());
        let mut prefabs = PrefabLibrary::default();
        for section_type in SectionType::ALL {
            let path = dir
                .join(PREFABS_DIR)
                .join(format!("{}.{CORPUS_EXTENSION}", section_type.file_stem()));
            if !path.is_file() {
                continue;
            }
            for grid in load_corpus_file::<TileArchetype>(&path)? {
                prefabs.add(section_type, grid).map_err(|e| match e {
                    GenerationError::InvalidPrefab(msg) => {
                        GenerationError::InvalidPrefab(format!("{}: {msg}", path.display()))
                    }
                    other => other,
                })?;
            }
        }
        prefabs.validate_complete()?;

        let models_dir = dir.join(MODELS_DIR);
        let artifact = models_dir.join(ARCHETYPE_MODEL_FILE);
        let archetype_model = if use_artifacts && artifact.is_file() {
            load_model(&artifact)?
        } else {
            train_model(&load_corpus_dir::<TileArchetype>(&dir.join(ARCHETYPES_DIR))?)
        };

        let mut style_models = BTreeMap::new();
        for style in StylePreset::ALL {
            let artifact = models_dir.join(style_model_file(style));
            let corpus_dir = dir.join(STYLES_DIR).join(style.name());
            let model = if use_artifacts && artifact.is_file() {
                load_model(&artifact)?
            } else if corpus_dir.is_dir() {
                train_model(&load_corpus_dir::<TileType>(&corpus_dir)?)
            } else {
                warn!(
                    "No corpus or model for style '{}' in {}; the style is unavailable",
                    style,
                    dir.display()
                );
                continue;
            };
            style_models.insert(style, model);
        }

        info!(
            "Loaded {} prefabs and {} style models from {}",
            prefabs.len(),
            style_models.len(),
            dir.display()
        );
        Ok(Self {
            prefabs,
            archetype_model,
            style_models,
        })
    }

    /// The style pass model for `style`.
    pub fn style_model(
        &self,
        style: StylePreset,
    ) -> Result<&AdjacencyModel<TileType>, GenerationError> {
        self.style_models
            .get(&style)
            .ok_or(GenerationError::MissingStyleModel(style))
    }

    /// Writes every model as an artifact into `dir` and returns the written paths.
    pub fn write_models(&self, dir: &Path) -> Result<Vec<PathBuf>, GenerationError> {
        let mut written = Vec::with_capacity(self.style_models.len() + 1);
        let path = dir.join(ARCHETYPE_MODEL_FILE);
        save_model(&self.archetype_model, &path)?;
        written.push(path);
        for (&style, model) in &self.style_models {
            let path = dir.join(style_model_file(style));
            save_model(model, &path)?;
            written.push(path);
        }
        Ok(written)
    }
}
