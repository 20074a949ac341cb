use crate::error::AppError;
use crate::visualization::VisualizationMode;
use clap::{Args, Parser, Subcommand, ValueEnum};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use level_gen::{GeneratorConfig, SizePreset, StylePreset};
use log::LevelFilter;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Prefix of environment variables overriding generator settings,
/// e.g. `LEVEL_FORGE_MAX_STYLE_ATTEMPTS=4`.
pub const ENV_PREFIX: &str = "LEVEL_FORGE_";

/// Log verbosity accepted on the command line.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub const fn to_filter(self) -> LevelFilter {
        match self {
            Self::Trace => LevelFilter::Trace,
            Self::Debug => LevelFilter::Debug,
            Self::Info => LevelFilter::Info,
            Self::Warn => LevelFilter::Warn,
            Self::Error => LevelFilter::Error,
        }
    }
}

/// Configuration for the Level Forge application.
#[derive(Parser, Debug)]
#[command(name = "level-forge", author, version, about, long_about = None)]
pub struct AppConfig {
    #[command(subcommand)]
    pub command: Command,

    /// TOML file with generator settings.
    #[arg(long, global = true, value_name = "FILE", env = "LEVEL_FORGE_CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Data directory with prefabs, corpora and models. Overrides the settings file.
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Global log level.
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log level for the collapse engine; defaults to the global level.
    #[arg(long, global = true, value_enum)]
    pub wfc_log_level: Option<LogLevel>,

    /// Report collapse progress every specified interval (e.g., "1s", "500ms").
    #[arg(long, global = true, value_name = "DURATION", value_parser = humantime::parse_duration)]
    pub report_progress_interval: Option<Duration>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a level.
    Generate(GenerateArgs),
    /// Keep a level's path and sections, redo its tiles in another style.
    Restyle(RestyleArgs),
    /// Train adjacency models and write them as artifacts.
    Train(TrainArgs),
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Seed for the random number generator; random when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, value_enum, default_value_t = SizePreset::Small)]
    pub size: SizePreset,

    #[arg(long, value_enum, default_value_t = StylePreset::General)]
    pub style: StylePreset,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct RestyleArgs {
    /// Seed of the level whose path and sections are kept.
    #[arg(long)]
    pub path_seed: u64,

    /// Seed for the new tiles.
    #[arg(long)]
    pub style_seed: u64,

    #[arg(long, value_enum, default_value_t = SizePreset::Small)]
    pub size: SizePreset,

    /// Style of the original level.
    #[arg(long, value_enum, default_value_t = StylePreset::General)]
    pub base_style: StylePreset,

    /// Style to apply.
    #[arg(long, value_enum)]
    pub style: StylePreset,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct OutputArgs {
    /// Directory receiving the level files.
    #[arg(short, long, value_name = "DIR", default_value = "output")]
    pub output_dir: PathBuf,

    /// Also write the whole result as JSON.
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Write the intermediate grid of every phase.
    #[arg(long, default_value_t = false)]
    pub dump_phases: bool,

    /// Choose the visualization mode.
    #[arg(long, value_enum, default_value_t = VisualizationMode::None)]
    pub visualization_mode: VisualizationMode,

    /// Save a color-coded PNG preview of the level.
    #[arg(long, value_name = "FILE")]
    pub png: Option<PathBuf>,

    /// Pixels per tile in the PNG preview.
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u32).range(1..=64))]
    pub png_scale: u32,
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Directory receiving the model artifacts; defaults to `<data-dir>/models`.
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

/// Layers generator settings: defaults, then the settings file, then
/// `LEVEL_FORGE_*` variables, then `--data-dir`.
pub fn load_generator_config(config: &AppConfig) -> Result<GeneratorConfig, AppError> {
    let mut figment = Figment::from(Serialized::defaults(GeneratorConfig::default()));
    if let Some(path) = &config.config {
        figment = figment.merge(Toml::file(existing(path)?));
    }
    let mut settings: GeneratorConfig = figment.merge(Env::prefixed(ENV_PREFIX)).extract()?;
    if let Some(dir) = &config.data_dir {
        settings.data_dir = Some(dir.clone());
    }
    log::debug!("Generator settings: {:?}", settings);
    Ok(settings)
}

fn existing(path: &Path) -> Result<&Path, AppError> {
    if path.is_file() {
        Ok(path)
    } else {
        Err(AppError::Config(format!(
            "Settings file not found: {}",
            path.display()
        )))
    }
}
