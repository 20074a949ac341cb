//! Text and JSON renderings of a [`LevelResult`] for external consumers.

use crate::generator::LevelResult;
use crate::tiles::SectionType;
use crate::GenerationError;
use std::io::Write;
use wfc_rules::{Grid, Symbol};

/// Writes the final level as CSV, one record per row.
///
/// Each field is the two-character pair of the cell's archetype char and
/// type char, e.g. `1g` for grass ground.
pub fn write_tile_pairs<W: Write>(result: &LevelResult, writer: W) -> Result<(), GenerationError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    for (archetypes, types) in result
        .archetype_grid
        .iter_rows()
        .zip(result.type_grid.iter_rows())
    {
        let record = archetypes
            .iter()
            .zip(types)
            .map(|(a, t)| format!("{}{}", a.to_char(), t.to_char()));
        csv_writer.write_record(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// [`write_tile_pairs`] into a string.
pub fn tile_pairs_csv(result: &LevelResult) -> Result<String, GenerationError> {
    let mut buffer = Vec::new();
    write_tile_pairs(result, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|e| GenerationError::InvalidState(format!("tile pair export is not UTF-8: {e}")))
}

/// Section IDs joined with commas.
pub fn path_string(path: &[usize]) -> String {
    path.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// One line of section digits per section row.
pub fn section_grid_string(grid: &Grid<SectionType>) -> String {
    grid.iter_rows()
        .map(|row| row.iter().map(|t| t.to_char()).collect::<String>() + "\n")
        .collect()
}

/// One line of symbol chars per grid row, in corpus file format.
pub fn symbol_grid_string<S: Symbol>(grid: &Grid<S>) -> String {
    grid.iter_rows()
        .map(|row| row.iter().map(|s| s.to_char()).collect::<String>() + "\n")
        .collect()
}

/// Writes the whole result as pretty-printed JSON.
pub fn write_json<W: Write>(result: &LevelResult, writer: W) -> Result<(), GenerationError> {
    serde_json::to_writer_pretty(writer, result)?;
    Ok(())
}
