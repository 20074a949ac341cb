use crate::assets::GeneratorAssets;
use crate::config::GeneratorConfig;
use crate::context::{GenerationContext, SectionPlacement};
use crate::phases::{assemble_sections, generate_paths, place_special_tiles, set_level_style};
use crate::presets::{LevelDimensions, SizePreset, StylePreset};
use crate::tiles::{SectionType, TileArchetype, TileType};
use crate::GenerationError;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;
use wfc_core::{AdjacencyRules, CollapseReport, ProgressCallback, WfcConfig};
use wfc_rules::Grid;

/// A finished level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelResult {
    /// Seed of the path and section phases.
    pub seed: u64,
    /// Seed of the collapse phases; equal to `seed` unless restyled.
    pub style_seed: u64,
    pub size: SizePreset,
    pub style: StylePreset,
    pub dimensions: LevelDimensions,
    /// Final archetypes, wildcards resolved.
    pub archetype_grid: Grid<TileArchetype>,
    /// Final tile types; always legal for the archetype at the same cell.
    pub type_grid: Grid<TileType>,
    pub section_grid: Grid<SectionType>,
    /// Section IDs from start to end.
    pub section_path: Vec<usize>,
    pub start_section: usize,
    pub end_section: usize,
    /// `(row, col)` of the `Start` tile.
    pub start_tile: (usize, usize),
    /// `(row, col)` of the `End` tile.
    pub end_tile: (usize, usize),
    pub placements: Vec<SectionPlacement>,
    /// Archetype grid as stamped by section assembly, before wildcards resolve.
    pub assembled_grid: Grid<TileArchetype>,
    pub special_report: CollapseReport,
    pub style_report: CollapseReport,
    pub style_attempts: u32,
}

/// The most recent `generate_level` arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelRequest {
    pub seed: u64,
    pub size: SizePreset,
    pub style: StylePreset,
}

/// Runs the four phases against a fixed set of assets.
///
/// Adjacency rules are compiled once at construction and shared by every
/// level generated afterwards.
#[derive(Debug)]
pub struct LevelGenerator {
    assets: GeneratorAssets,
    config: GeneratorConfig,
    wfc_config: WfcConfig,
    archetype_rules: AdjacencyRules,
    style_rules: BTreeMap<StylePreset, AdjacencyRules>,
    last_request: Option<LevelRequest>,
}

impl LevelGenerator {
    pub fn new(assets: GeneratorAssets, config: GeneratorConfig) -> Self {
        let archetype_rules = AdjacencyRules::from_model(&assets.archetype_model);
        let style_rules = assets
            .style_models
            .iter()
            .map(|(&style, model)| (style, AdjacencyRules::from_model(model)))
            .collect();
        Self {
            assets,
            wfc_config: config.wfc_config(None),
            config,
            archetype_rules,
            style_rules,
            last_request: None,
        }
    }

    /// Uses `config.data_dir` when set, the built-in assets otherwise.
    pub fn from_config(config: GeneratorConfig) -> Result<Self, GenerationError> {
        let assets = match &config.data_dir {
            Some(dir) => GeneratorAssets::from_dir(dir)?,
            None => GeneratorAssets::builtin()?,
        };
        Ok(Self::new(assets, config))
    }

    pub const fn assets(&self) -> &GeneratorAssets {
        &self.assets
    }

    pub const fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub const fn last_request(&self) -> Option<LevelRequest> {
        self.last_request
    }

    /// Installs a callback invoked after every collapsed cell of both passes.
    pub fn set_progress_callback(&mut self, callback: ProgressCallback) {
        self.wfc_config = self.config.wfc_config(Some(callback));
    }

    /// Generates a level from one random stream seeded with `seed`.
    ///
    /// Identical arguments always produce an identical level.
    pub fn generate_level(
        &mut self,
        seed: u64,
        size: SizePreset,
        style: StylePreset,
    ) -> Result<LevelResult, GenerationError> {
        let result = self.build(seed, None, size, style)?;
        self.last_request = Some(LevelRequest { seed, size, style });
        Ok(result)
    }

    /// Restyles a level skeleton.
    ///
    /// Paths and sections come from `path_seed` exactly as `generate_level`
    /// would produce them; the collapse phases draw from `style_seed` with the
    /// model of `style`. The size of the last `generate_level` call is used,
    /// [`SizePreset::Small`] if there was none. The remembered request is
    /// left untouched.
    pub fn change_preset(
        &self,
        path_seed: u64,
        style_seed: u64,
        style: StylePreset,
    ) -> Result<LevelResult, GenerationError> {
        let size = self.last_request.map_or_else(SizePreset::default, |r| r.size);
        self.build(path_seed, Some(style_seed), size, style)
    }

    fn build(
        &self,
        seed: u64,
        style_seed: Option<u64>,
        size: SizePreset,
        style: StylePreset,
    ) -> Result<LevelResult, GenerationError> {
        let style_rules = self
            .style_rules
            .get(&style)
            .ok_or(GenerationError::MissingStyleModel(style))?;
        let start_time = Instant::now();
        info!(
            "Generating {:?} level in style '{}' (seed {}, style seed {})",
            size,
            style,
            seed,
            style_seed.unwrap_or(seed)
        );

        let mut ctx = GenerationContext::new(size.dimensions(), seed);
        generate_paths(&mut ctx, &self.config)?;
        assemble_sections(&mut ctx, &self.assets.prefabs)?;
        let assembled_grid = ctx.archetype_grid.clone();
        debug!("Skeleton ready after {:?}", start_time.elapsed());

        if let Some(style_seed) = style_seed {
            ctx.reseed(style_seed);
        }
        let special_report = place_special_tiles(&mut ctx, &self.archetype_rules, &self.wfc_config)?;
        let outcome = set_level_style(
            &mut ctx,
            style_rules,
            &self.wfc_config,
            self.config.max_style_attempts,
        )?;

        let missing = |what: &str| GenerationError::InvalidState(format!("{what} was never set"));
        let result = LevelResult {
            seed,
            style_seed: style_seed.unwrap_or(seed),
            size,
            style,
            dimensions: ctx.dims,
            start_section: ctx.start_section.ok_or_else(|| missing("start section"))?,
            end_section: ctx.end_section.ok_or_else(|| missing("end section"))?,
            start_tile: ctx.start_tile.ok_or_else(|| missing("start tile"))?,
            end_tile: ctx.end_tile.ok_or_else(|| missing("end tile"))?,
            archetype_grid: ctx.archetype_grid,
            type_grid: ctx.type_grid,
            section_grid: ctx.section_grid,
            section_path: ctx.path,
            placements: ctx.placements,
            assembled_grid,
            special_report,
            style_report: outcome.report,
            style_attempts: outcome.attempts,
        };
        info!(
            "Level generation completed in {:?}: {} path sections, {} style attempts",
            start_time.elapsed(),
            result.section_path.len(),
            result.style_attempts
        );
        Ok(result)
    }
}
