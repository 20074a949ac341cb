use crate::presets::LevelDimensions;
use crate::tiles::{SectionType, TileArchetype, TileType};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use wfc_rules::{Direction, Grid};

/// Where a prefab was stamped during section assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionPlacement {
    pub section: usize,
    /// Index into the prefab list of the section's type.
    pub prefab: usize,
    pub mirrored: bool,
}

/// All state of one generation run, threaded through the phases.
#[derive(Debug, Clone)]
pub struct GenerationContext {
    pub dims: LevelDimensions,
    pub rng: StdRng,
    pub section_grid: Grid<SectionType>,
    pub archetype_grid: Grid<TileArchetype>,
    pub type_grid: Grid<TileType>,
    pub path: Vec<usize>,
    pub start_section: Option<usize>,
    pub end_section: Option<usize>,
    pub start_tile: Option<(usize, usize)>,
    pub end_tile: Option<(usize, usize)>,
    pub placements: Vec<SectionPlacement>,
}

impl GenerationContext {
    pub fn new(dims: LevelDimensions, seed: u64) -> Self {
        Self {
            dims,
            rng: StdRng::seed_from_u64(seed),
            section_grid: Grid::new(dims.section_grid_rows, dims.section_grid_cols),
            archetype_grid: Grid::new(dims.rows(), dims.cols()),
            type_grid: Grid::new(dims.rows(), dims.cols()),
            path: Vec::new(),
            start_section: None,
            end_section: None,
            start_tile: None,
            end_tile: None,
            placements: Vec::with_capacity(dims.num_sections()),
        }
    }

    /// Replaces the random stream for the remaining phases.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Row-major section ID.
    pub const fn section_id(&self, row: usize, col: usize) -> usize {
        row * self.dims.section_grid_cols + col
    }

    /// `(row, col)` of a section ID.
    pub const fn section_coords(&self, id: usize) -> (usize, usize) {
        (
            id / self.dims.section_grid_cols,
            id % self.dims.section_grid_cols,
        )
    }

    /// Section adjacent to `id` in `direction`, if any.
    pub fn section_neighbor(&self, id: usize, direction: Direction) -> Option<usize> {
        let (row, col) = self.section_coords(id);
        self.section_grid
            .neighbor(row, col, direction)
            .map(|(r, c)| self.section_id(r, c))
    }

    pub const fn is_bottom_section_row(&self, id: usize) -> bool {
        self.section_coords(id).0 + 1 == self.dims.section_grid_rows
    }

    pub fn section_type(&self, id: usize) -> SectionType {
        let (row, col) = self.section_coords(id);
        self.section_grid.get(row, col).copied().unwrap_or_default()
    }

    pub fn set_section_type(&mut self, id: usize, section_type: SectionType) {
        let (row, col) = self.section_coords(id);
        self.section_grid.set(row, col, section_type);
    }

    /// Top-left tile of a section.
    pub const fn section_origin(&self, id: usize) -> (usize, usize) {
        let (row, col) = self.section_coords(id);
        (row * self.dims.section_rows, col * self.dims.section_cols)
    }
}
