//! Command dispatch.

use crate::config::{
    load_generator_config, AppConfig, Command, GenerateArgs, OutputArgs, RestyleArgs, TrainArgs,
};
use crate::logging::init_logger;
use crate::output::{write_level, write_phase_dumps};
use crate::progress::progress_callback;
use crate::visualization::{PngVisualizer, TerminalVisualizer, VisualizationMode, Visualizer};
use anyhow::{Context, Result};
use clap::Parser;
use level_gen::assets::MODELS_DIR;
use level_gen::{GeneratorAssets, GeneratorConfig, LevelGenerator, LevelResult};
use std::path::PathBuf;
use std::time::Instant;

/// Parses the command line and runs the selected command.
pub fn main() -> Result<()> {
    let config = AppConfig::parse();
    init_logger(&config);
    log::info!("Level Forge starting");
    log::debug!("Loaded Config: {:?}", config);

    let settings = load_generator_config(&config)?;
    match &config.command {
        Command::Generate(args) => generate(&config, settings, args),
        Command::Restyle(args) => restyle(&config, settings, args),
        Command::Train(args) => train(&settings, args),
    }
}

fn generator(config: &AppConfig, settings: GeneratorConfig) -> Result<LevelGenerator> {
    let mut generator =
        LevelGenerator::from_config(settings).context("Failed to load generator data")?;
    if let Some(interval) = config.report_progress_interval {
        generator.set_progress_callback(progress_callback(interval));
    }
    Ok(generator)
}

fn generate(config: &AppConfig, settings: GeneratorConfig, args: &GenerateArgs) -> Result<()> {
    let mut generator = generator(config, settings)?;
    let seed = args.seed.unwrap_or_else(rand::random);
    let start_time = Instant::now();
    let level = generator.generate_level(seed, args.size, args.style)?;
    log::info!(
        "Level generation completed successfully. Seed {} in {:?}",
        seed,
        start_time.elapsed()
    );
    emit(&level, &args.output)
}

fn restyle(config: &AppConfig, settings: GeneratorConfig, args: &RestyleArgs) -> Result<()> {
    let mut generator = generator(config, settings)?;
    // Remembers the size for change_preset.
    generator.generate_level(args.path_seed, args.size, args.base_style)?;
    let level = generator.change_preset(args.path_seed, args.style_seed, args.style)?;
    log::info!(
        "Restyle completed successfully. Path seed {}, style seed {}, style {}",
        args.path_seed,
        args.style_seed,
        args.style
    );
    emit(&level, &args.output)
}

fn emit(level: &LevelResult, output: &OutputArgs) -> Result<()> {
    write_level(level, &output.output_dir, output.json)?;
    if output.dump_phases {
        write_phase_dumps(level, &output.output_dir)?;
    }
    if output.visualization_mode == VisualizationMode::Terminal {
        TerminalVisualizer::stdout().display_level(level)?;
    }
    if let Some(path) = &output.png {
        PngVisualizer {
            path: path.clone(),
            scale: output.png_scale,
        }
        .display_level(level)?;
    }
    Ok(())
}

fn train(settings: &GeneratorConfig, args: &TrainArgs) -> Result<()> {
    let assets = match &settings.data_dir {
        Some(dir) => GeneratorAssets::train_dir(dir)
            .with_context(|| format!("Failed to train from {:?}", dir))?,
        None => GeneratorAssets::builtin()?,
    };
    let output_dir = args.output_dir.clone().unwrap_or_else(|| {
        settings
            .data_dir
            .as_ref()
            .map_or_else(|| PathBuf::from(MODELS_DIR), |dir| dir.join(MODELS_DIR))
    });
    let written = assets.write_models(&output_dir)?;
    log::info!(
        "Training completed successfully. {} models written to {:?}",
        written.len(),
        output_dir
    );
    Ok(())
}
