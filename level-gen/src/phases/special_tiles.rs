//! Phase 3: resolve wildcard cells with an archetype collapse pass.

use crate::context::GenerationContext;
use crate::tiles::TileArchetype;
use crate::GenerationError;
use log::info;
use rand::{Rng, RngCore};
use wfc_core::{run, AdjacencyRules, CellState, CollapseReport, Fallback, WfcConfig};
use wfc_rules::Symbol;

/// Picks uniformly among the wildcard candidates.
#[derive(Debug, Clone)]
struct WildcardFallback {
    symbols: Vec<usize>,
}

impl Fallback for WildcardFallback {
    fn choose(&self, _cell: (usize, usize), rng: &mut dyn RngCore) -> Option<usize> {
        if self.symbols.is_empty() {
            return None;
        }
        self.symbols.get(rng.gen_range(0..self.symbols.len())).copied()
    }
}

fn wildcard_candidates() -> Vec<usize> {
    TileArchetype::WILDCARD_CANDIDATES
        .iter()
        .filter_map(|a| a.index())
        .collect()
}

/// Replaces every `Wildcard` in the archetype grid.
///
/// Non-wildcard cells are fixed and constrain their neighbors; wildcard cells
/// start open over [`TileArchetype::WILDCARD_CANDIDATES`]. `rules` must be
/// compiled from a `TileArchetype` model.
pub fn place_special_tiles(
    ctx: &mut GenerationContext,
    rules: &AdjacencyRules,
    wfc_config: &WfcConfig,
) -> Result<CollapseReport, GenerationError> {
    let num_symbols = TileArchetype::ALPHABET.len();
    let candidates = wildcard_candidates();

    let mut grid = ctx.archetype_grid.try_map(|&archetype| match archetype {
        TileArchetype::Wildcard => Ok(CellState::open_with(num_symbols, candidates.iter().copied())),
        TileArchetype::None => Err(GenerationError::InvalidState(
            "archetype grid has unassigned cells before the special-tile pass".to_owned(),
        )),
        other => other.index().map(CellState::Fixed).ok_or_else(|| {
            GenerationError::InvalidState(format!("{other:?} is not in the archetype alphabet"))
        }),
    })?;

    let fallback = WildcardFallback {
        symbols: candidates,
    };
    let report = run(&mut grid, rules, &fallback, &mut ctx.rng, wfc_config)?;

    for ((row, col), cell) in grid.iter_cells() {
        let archetype = cell
            .fixed()
            .and_then(TileArchetype::from_index)
            .ok_or_else(|| {
                GenerationError::InvalidState(format!(
                    "cell ({row}, {col}) left unresolved by the special-tile pass"
                ))
            })?;
        ctx.archetype_grid.set(row, col, archetype);
    }

    info!(
        "Special tiles placed: {} wildcards resolved, {} by fallback",
        report.collapsed, report.fallbacks
    );
    Ok(report)
}
