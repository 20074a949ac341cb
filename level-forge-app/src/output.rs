//! Level files written by the `generate` and `restyle` commands.

use anyhow::{Context, Result};
use level_gen::export::{
    path_string, section_grid_string, symbol_grid_string, write_json, write_tile_pairs,
};
use level_gen::LevelResult;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const LEVEL_CSV: &str = "level.csv";
pub const PATH_TXT: &str = "path.txt";
pub const LEVEL_JSON: &str = "level.json";

/// Intermediate grids written by `--dump-phases`, in phase order.
pub const PHASE_FILES: [&str; 4] = ["sections.txt", "assembled.txt", "archetypes.txt", "types.txt"];

fn create(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {:?}", path))?;
    Ok(BufWriter::new(file))
}

fn write_text(path: &Path, text: &str) -> Result<()> {
    let mut writer = create(path)?;
    writer
        .write_all(text.as_bytes())
        .and_then(|()| writer.flush())
        .with_context(|| format!("Failed to write {:?}", path))
}

/// Writes the tile-pair CSV and the section path, plus JSON when asked.
pub fn write_level(level: &LevelResult, dir: &Path, json: bool) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create directory {:?}", dir))?;
    let mut written = Vec::new();

    let csv_path = dir.join(LEVEL_CSV);
    write_tile_pairs(level, create(&csv_path)?)
        .with_context(|| format!("Failed to write {:?}", csv_path))?;
    written.push(csv_path);

    let path_txt = dir.join(PATH_TXT);
    write_text(&path_txt, &(path_string(&level.section_path) + "\n"))?;
    written.push(path_txt);

    if json {
        let json_path = dir.join(LEVEL_JSON);
        let mut writer = create(&json_path)?;
        write_json(level, &mut writer)
            .and_then(|()| writer.flush().map_err(Into::into))
            .with_context(|| format!("Failed to write {:?}", json_path))?;
        written.push(json_path);
    }

    log::info!("Level written to {:?}", dir);
    Ok(written)
}

/// Writes the grid left behind by each phase.
pub fn write_phase_dumps(level: &LevelResult, dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create directory {:?}", dir))?;
    let contents = [
        section_grid_string(&level.section_grid),
        symbol_grid_string(&level.assembled_grid),
        symbol_grid_string(&level.archetype_grid),
        symbol_grid_string(&level.type_grid),
    ];
    PHASE_FILES
        .iter()
        .zip(contents)
        .map(|(name, text)| {
            let path = dir.join(name);
            write_text(&path, &text)?;
            Ok(path)
        })
        .collect()
}
