//! Previews of a finished level: colored terminal output and PNG images.

use crate::error::AppError;
use clap::ValueEnum;
use colored::{Color, Colorize};
use image::{Rgba, RgbaImage};
use level_gen::{LevelResult, TileArchetype, TileType};
use std::io::Write;
use std::path::PathBuf;
use wfc_rules::Symbol;

/// Where to preview a generated level.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VisualizationMode {
    /// No preview.
    #[default]
    None,
    /// Colored tile chars on stdout.
    Terminal,
}

/// Presents a finished level to the user.
pub trait Visualizer {
    fn display_level(&mut self, level: &LevelResult) -> Result<(), AppError>;
}

/// Prints tile-type chars, colored by archetype.
#[derive(Debug)]
pub struct TerminalVisualizer<W: Write> {
    out: W,
}

impl TerminalVisualizer<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self {
            out: std::io::stdout(),
        }
    }
}

impl<W: Write> TerminalVisualizer<W> {
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

const fn archetype_color(archetype: TileArchetype) -> Color {
    match archetype {
        TileArchetype::Air | TileArchetype::None => Color::BrightBlack,
        TileArchetype::Ground => Color::Yellow,
        TileArchetype::Trap => Color::Red,
        TileArchetype::Wildcard => Color::Magenta,
        TileArchetype::Treasure => Color::BrightYellow,
        TileArchetype::Enemy => Color::BrightRed,
        TileArchetype::Start => Color::BrightGreen,
        TileArchetype::End => Color::BrightBlue,
    }
}

impl<W: Write> Visualizer for TerminalVisualizer<W> {
    fn display_level(&mut self, level: &LevelResult) -> Result<(), AppError> {
        writeln!(
            self.out,
            "{} level, style {}, seed {}",
            format!("{:?}", level.size).bold(),
            level.style,
            level.seed
        )?;
        for (archetypes, types) in level
            .archetype_grid
            .iter_rows()
            .zip(level.type_grid.iter_rows())
        {
            for (&archetype, &ty) in archetypes.iter().zip(types) {
                write!(
                    self.out,
                    "{}",
                    ty.to_char().to_string().color(archetype_color(archetype))
                )?;
            }
            writeln!(self.out)?;
        }
        self.out.flush()?;
        Ok(())
    }
}

/// RGBA color of a tile in the PNG preview.
pub const fn tile_color(ty: TileType) -> [u8; 4] {
    match ty {
        TileType::Dirt => [121, 85, 58, 255],
        TileType::Stone => [128, 128, 128, 255],
        TileType::Grass => [76, 153, 0, 255],
        TileType::Brick => [165, 42, 42, 255],
        TileType::Weeds => [170, 210, 150, 255],
        TileType::Mushrooms => [200, 170, 210, 255],
        TileType::Flowers => [235, 200, 215, 255],
        TileType::NormalAir => [190, 225, 250, 255],
        TileType::BlackRose => [30, 10, 30, 255],
        TileType::Boulder => [90, 90, 100, 255],
        TileType::Spikes => [220, 20, 60, 255],
        TileType::Chest => [160, 110, 30, 255],
        TileType::Gold => [255, 215, 0, 255],
        TileType::Skeleton => [240, 240, 230, 255],
        TileType::House => [0, 200, 0, 255],
        TileType::Flag => [0, 0, 230, 255],
        TileType::None => [0, 0, 0, 0],
    }
}

/// Renders the type grid with `scale` x `scale` pixels per tile.
pub fn level_image(level: &LevelResult, scale: u32) -> RgbaImage {
    let grid = &level.type_grid;
    let to_u32 = |n: usize| u32::try_from(n).unwrap_or(u32::MAX);
    let mut img = RgbaImage::new(
        to_u32(grid.cols()).saturating_mul(scale),
        to_u32(grid.rows()).saturating_mul(scale),
    );
    for ((row, col), &ty) in grid.iter_cells() {
        let pixel = Rgba(tile_color(ty));
        let (x0, y0) = (to_u32(col) * scale, to_u32(row) * scale);
        for dy in 0..scale {
            for dx in 0..scale {
                img.put_pixel(x0 + dx, y0 + dy, pixel);
            }
        }
    }
    img
}

/// Saves a PNG preview to `path`.
#[derive(Debug, Clone)]
pub struct PngVisualizer {
    pub path: PathBuf,
    pub scale: u32,
}

impl Visualizer for PngVisualizer {
    fn display_level(&mut self, level: &LevelResult) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        level_image(level, self.scale).save(&self.path)?;
        log::info!("Saved PNG preview to {:?}", self.path);
        Ok(())
    }
}
