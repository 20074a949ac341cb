//! Phase 4: map every archetype to a concrete tile type.

use crate::context::GenerationContext;
use crate::tiles::{TileArchetype, TileType};
use crate::GenerationError;
use log::{debug, error, info, warn};
use rand::{Rng, RngCore};
use wfc_core::{
    run, AdjacencyRules, CellState, CollapseReport, Fallback, PossibilityGrid, WfcConfig,
    WfcError,
};
use wfc_rules::{Grid, Symbol};

/// Result of the style pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleOutcome {
    /// Report of the attempt that succeeded.
    pub report: CollapseReport,
    /// Attempts used, including the successful one.
    pub attempts: u32,
}

/// Picks uniformly among the types legal for the cell's archetype.
struct LegalTypeFallback<'a> {
    archetypes: &'a Grid<TileArchetype>,
}

impl Fallback for LegalTypeFallback<'_> {
    fn choose(&self, cell: (usize, usize), rng: &mut dyn RngCore) -> Option<usize> {
        let legal = self.archetypes.get(cell.0, cell.1)?.legal_types();
        if legal.is_empty() {
            return None;
        }
        legal[rng.gen_range(0..legal.len())].index()
    }
}

fn seed_grid(archetypes: &Grid<TileArchetype>) -> Result<PossibilityGrid, GenerationError> {
    let num_symbols = TileType::ALPHABET.len();
    archetypes.try_map(|&archetype| {
        let legal = archetype.legal_types();
        if legal.is_empty() {
            return Err(GenerationError::InvalidState(format!(
                "{archetype:?} cell reached the style pass"
            )));
        }
        Ok(CellState::open_with(
            num_symbols,
            legal.iter().filter_map(|t| t.index()),
        ))
    })
}

/// Collapses the type grid from the archetype grid.
///
/// Every cell starts open over the legal types of its archetype. A cell whose
/// candidates run out takes a uniformly drawn legal type instead. Only when a
/// cell has no legal type at all is the attempt thrown away and the pass
/// restarted from fresh candidate sets, at most `max_attempts` times.
pub fn set_level_style(
    ctx: &mut GenerationContext,
    rules: &AdjacencyRules,
    wfc_config: &WfcConfig,
    max_attempts: u32,
) -> Result<StyleOutcome, GenerationError> {
    let fallback = LegalTypeFallback {
        archetypes: &ctx.archetype_grid,
    };

    for attempt in 1..=max_attempts {
        let mut grid = seed_grid(&ctx.archetype_grid)?;
        match run(&mut grid, rules, &fallback, &mut ctx.rng, wfc_config) {
            Ok(report) => {
                ctx.type_grid = grid.try_map(|cell| {
                    cell.fixed().and_then(TileType::from_index).ok_or_else(|| {
                        GenerationError::InvalidState(
                            "style pass left a cell unresolved".to_owned(),
                        )
                    })
                })?;
                info!(
                    "Style applied on attempt {} ({} cells, {} by fallback)",
                    attempt, report.collapsed, report.fallbacks
                );
                return Ok(StyleOutcome {
                    report,
                    attempts: attempt,
                });
            }
            Err(WfcError::Unsatisfiable(row, col)) => {
                warn!(
                    "Style attempt {} found no legal type for ({}, {}); restarting",
                    attempt, row, col
                );
                debug!("Archetype at that cell: {:?}", ctx.archetype_grid.get(row, col));
            }
            Err(e) => return Err(e.into()),
        }
    }

    error!("Style pass unsatisfiable after {} attempts", max_attempts);
    Err(GenerationError::StyleUnsatisfiable {
        attempts: max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets::LevelDimensions;
    use rand::SeedableRng;
    use wfc_rules::formats::{FormatParser, GridTextParser};
    use wfc_rules::train_model;

    fn context_with(grid: &str, seed: u64) -> GenerationContext {
        let archetypes = GridTextParser::<TileArchetype>::new()
            .parse_single(grid)
            .unwrap();
        let dims = LevelDimensions {
            section_rows: archetypes.rows(),
            section_cols: archetypes.cols(),
            section_grid_rows: 1,
            section_grid_cols: 1,
        };
        let mut ctx = GenerationContext::new(dims, seed);
        ctx.archetype_grid = archetypes;
        ctx
    }

    fn rules_from(corpus: &str) -> AdjacencyRules {
        let grids = GridTextParser::<TileType>::new().parse(corpus).unwrap();
        AdjacencyRules::from_model(&train_model(&grids))
    }

    fn assert_legal(ctx: &GenerationContext) {
        for ((row, col), ty) in ctx.type_grid.iter_cells() {
            let archetype = ctx.archetype_grid.get(row, col).copied().unwrap();
            assert!(
                archetype.legal_types().contains(ty),
                "({row}, {col}): {ty:?} is not legal for {archetype:?}"
            );
        }
    }

    #[test]
    fn every_cell_gets_a_legal_type() {
        let mut ctx = context_with("S000X\n0!0@0\n11211", 2);
        let rules = rules_from("HaaaF\na#aca\nggogg\n\nHwwwF\nwaaGa\nsd^sd");
        let outcome = set_level_style(&mut ctx, &rules, &WfcConfig::default(), 16).unwrap();
        assert_eq!(outcome.report.collapsed, 15);
        assert_legal(&ctx);
        assert_eq!(ctx.type_grid.get(0, 0), Some(&TileType::House));
        assert_eq!(ctx.type_grid.get(0, 4), Some(&TileType::Flag));
    }

    #[test]
    fn empty_cells_fall_back_without_restarting() {
        // Air only ever touches dirt and vice versa, so side-by-side air empties out.
        let mut ctx = context_with("0000\n1111", 9);
        let rules = rules_from("adad\ndada");
        let outcome = set_level_style(&mut ctx, &rules, &WfcConfig::default(), 16).unwrap();
        assert_eq!(outcome.attempts, 1);
        assert!(outcome.report.fallbacks > 0);
        assert_legal(&ctx);
    }

    #[test]
    fn fallback_draws_a_legal_type_or_nothing() {
        let archetypes = GridTextParser::<TileArchetype>::new()
            .parse_single("2!")
            .unwrap();
        let fallback = LegalTypeFallback {
            archetypes: &archetypes,
        };
        let mut rng = rand::rngs::StdRng::seed_from_u64(3);
        for _ in 0..30 {
            let trap = TileType::from_index(fallback.choose((0, 0), &mut rng).unwrap()).unwrap();
            assert_eq!(trap.archetype(), TileArchetype::Trap);
        }
        assert_eq!(
            fallback.choose((0, 1), &mut rng).and_then(TileType::from_index),
            Some(TileType::Skeleton)
        );
        assert_eq!(fallback.choose((5, 5), &mut rng), None);
    }

    #[test]
    fn zero_attempts_is_unsatisfiable() {
        let mut ctx = context_with("01", 0);
        let rules = rules_from("ad");
        assert!(matches!(
            set_level_style(&mut ctx, &rules, &WfcConfig::default(), 0),
            Err(GenerationError::StyleUnsatisfiable { attempts: 0 })
        ));
    }

    #[test]
    fn wildcards_may_not_reach_the_style_pass() {
        let mut ctx = context_with("0*", 0);
        let rules = rules_from("aa");
        let err = set_level_style(&mut ctx, &rules, &WfcConfig::default(), 16).unwrap_err();
        assert!(matches!(err, GenerationError::InvalidState(_)), "{err}");
    }
}
