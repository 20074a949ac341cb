use crate::formats::FormatParser;
use crate::grid::Grid;
use crate::types::Symbol;
use crate::LoadError;
use std::marker::PhantomData;

/// Parser for plain-text symbol grids.
///
/// One character per cell, one line per row. A file may hold several grids
/// separated by blank lines; every row of a grid must have the same width.
/// Trailing whitespace is ignored.
#[derive(Debug, Clone, Copy)]
pub struct GridTextParser<S> {
    _alphabet: PhantomData<S>,
}

impl<S: Symbol> Default for GridTextParser<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Symbol> GridTextParser<S> {
    pub const fn new() -> Self {
        Self {
            _alphabet: PhantomData,
        }
    }

    /// Parses content that must contain exactly one grid.
    pub fn parse_single(&self, content: &str) -> Result<Grid<S>, LoadError> {
        let mut grids = self.parse(content)?;
        if grids.len() != 1 {
            return Err(LoadError::InvalidData(format!(
                "Expected exactly one grid, found {}",
                grids.len()
            )));
        }
        grids
            .pop()
            .ok_or_else(|| LoadError::InvalidData("No grid found".to_owned()))
    }
}

impl<S: Symbol> FormatParser for GridTextParser<S> {
    type Output = Vec<Grid<S>>;

    fn format_name(&self) -> &'static str {
        "text grid"
    }

    fn parse(&self, content: &str) -> Result<Vec<Grid<S>>, LoadError> {
        let mut grids = Vec::new();
        let mut rows: Vec<Vec<S>> = Vec::new();
        let mut block_start = 1;

        for (line_no, raw) in content.lines().enumerate() {
            let line = raw.trim_end();
            if line.is_empty() {
                if !rows.is_empty() {
                    grids.push(finish_block(std::mem::take(&mut rows), block_start)?);
                }
                continue;
            }
            if rows.is_empty() {
                block_start = line_no + 1;
            }
            let row = line
                .chars()
                .enumerate()
                .map(|(col, c)| {
                    S::from_char(c).ok_or_else(|| {
                        LoadError::InvalidData(format!(
                            "Unknown symbol '{c}' at line {}, column {}",
                            line_no + 1,
                            col + 1
                        ))
                    })
                })
                .collect::<Result<Vec<S>, LoadError>>()?;
            rows.push(row);
        }
        if !rows.is_empty() {
            grids.push(finish_block(rows, block_start)?);
        }
        Ok(grids)
    }
}

fn finish_block<S: Symbol>(rows: Vec<Vec<S>>, block_start: usize) -> Result<Grid<S>, LoadError> {
    Grid::from_rows(rows).map_err(|e| match e {
        LoadError::InvalidData(msg) => {
            LoadError::InvalidData(format!("{msg} (grid starting at line {block_start})"))
        }
        other => other,
    })
}
