//! Phase 2: stamp prefabs into the archetype grid.

use crate::assets::PrefabLibrary;
use crate::context::{GenerationContext, SectionPlacement};
use crate::tiles::TileArchetype;
use crate::GenerationError;
use log::{debug, info};
use rand::Rng;

/// Fills the archetype grid section by section in row-major order.
///
/// Each section gets a prefab drawn uniformly from those of its type,
/// mirrored horizontally half of the time. The prefab's start placeholder
/// becomes `Start` in the start section, `End` in the end section and `Air`
/// everywhere else.
pub fn assemble_sections(
    ctx: &mut GenerationContext,
    prefabs: &PrefabLibrary,
) -> Result<(), GenerationError> {
    let (Some(start), Some(end)) = (ctx.start_section, ctx.end_section) else {
        return Err(GenerationError::InvalidState(
            "section assembly requires a path".to_owned(),
        ));
    };
    let section_size = (ctx.dims.section_rows, ctx.dims.section_cols);
    if prefabs.section_size() != section_size {
        return Err(GenerationError::InvalidPrefab(format!(
            "prefab library holds {}x{} sections, level needs {}x{}",
            prefabs.section_size().0,
            prefabs.section_size().1,
            section_size.0,
            section_size.1
        )));
    }

    ctx.placements.clear();
    ctx.start_tile = None;
    ctx.end_tile = None;
    let last_col = ctx.dims.section_cols - 1;

    for section in 0..ctx.dims.num_sections() {
        let section_type = ctx.section_type(section);
        let candidates = prefabs.prefabs(section_type);
        if candidates.is_empty() {
            return Err(GenerationError::MissingPrefabs(section_type));
        }
        let prefab = ctx.rng.gen_range(0..candidates.len());
        let mirrored = ctx.rng.gen_bool(0.5);
        let (origin_row, origin_col) = ctx.section_origin(section);

        for ((r, c), &archetype) in candidates[prefab].iter_cells() {
            let row = origin_row + r;
            let col = origin_col + if mirrored { last_col - c } else { c };
            let resolved = match archetype {
                TileArchetype::Start if section == start => {
                    ctx.start_tile = Some((row, col));
                    TileArchetype::Start
                }
                TileArchetype::Start if section == end => {
                    ctx.end_tile = Some((row, col));
                    TileArchetype::End
                }
                TileArchetype::Start => TileArchetype::Air,
                other => other,
            };
            ctx.archetype_grid.set(row, col, resolved);
        }

        debug!(
            "Section {} ({:?}): prefab {}{}",
            section,
            section_type,
            prefab,
            if mirrored { " mirrored" } else { "" }
        );
        ctx.placements.push(SectionPlacement {
            section,
            prefab,
            mirrored,
        });
    }

    match (ctx.start_tile, ctx.end_tile) {
        (Some(start_tile), Some(end_tile)) => {
            info!(
                "Assembled {} sections; start tile {:?}, end tile {:?}",
                ctx.placements.len(),
                start_tile,
                end_tile
            );
            Ok(())
        }
        _ => Err(GenerationError::InvalidState(
            "start or end section produced no placeholder tile".to_owned(),
        )),
    }
}
