use crate::formats::{FormatParser, GridTextParser, RonModelParser};
use crate::grid::Grid;
use crate::types::{AdjacencyModel, Symbol};
use crate::LoadError;
use log::{debug, info};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Extension of corpus files inside a corpus directory.
pub const CORPUS_EXTENSION: &str = "txt";

fn with_path(path: &Path, err: LoadError) -> LoadError {
    match err {
        LoadError::InvalidData(msg) => LoadError::InvalidData(format!("{}: {msg}", path.display())),
        LoadError::ParseError { format, message } => LoadError::ParseError {
            format,
            message: format!("{}: {message}", path.display()),
        },
        other => other,
    }
}

/// Loads every grid stored in one corpus file.
pub fn load_corpus_file<S: Symbol>(path: &Path) -> Result<Vec<Grid<S>>, LoadError> {
    let content = fs::read_to_string(path)?;
    let grids = GridTextParser::<S>::new()
        .parse(&content)
        .map_err(|e| with_path(path, e))?;
    debug!("Loaded {} grids from {}", grids.len(), path.display());
    Ok(grids)
}

/// Lists corpus files in `dir`, sorted by file name.
pub fn corpus_files(dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == CORPUS_EXTENSION) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Loads every corpus file in `dir`.
///
/// Files are parsed in parallel; the returned grids keep file-name order.
/// A directory without corpus files is an error.
pub fn load_corpus_dir<S: Symbol>(dir: &Path) -> Result<Vec<Grid<S>>, LoadError> {
    let files = corpus_files(dir)?;
    if files.is_empty() {
        return Err(LoadError::InvalidData(format!(
            "No .{CORPUS_EXTENSION} corpus files found in {}",
            dir.display()
        )));
    }
    let per_file = files
        .par_iter()
        .map(|path| load_corpus_file::<S>(path))
        .collect::<Result<Vec<_>, LoadError>>()?;
    let grids: Vec<Grid<S>> = per_file.into_iter().flatten().collect();
    info!(
        "Loaded corpus of {} grids from {} files in {}",
        grids.len(),
        files.len(),
        dir.display()
    );
    Ok(grids)
}

/// Reads a model artifact.
pub fn load_model<S: Symbol>(path: &Path) -> Result<AdjacencyModel<S>, LoadError> {
    let content = fs::read_to_string(path)?;
    RonModelParser::<S>::new()
        .parse(&content)
        .map_err(|e| with_path(path, e))
}

/// Writes a model artifact, creating parent directories as needed.
pub fn save_model<S: Symbol>(model: &AdjacencyModel<S>, path: &Path) -> Result<(), LoadError> {
    let text = RonModelParser::<S>::new().serialize_model(model)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, text)?;
    info!("Saved adjacency model to {}", path.display());
    Ok(())
}
