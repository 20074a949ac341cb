//! Logging setup for the application.

use crate::config::AppConfig;
use env_logger::{Builder, Env};

/// Initializes the logger from the application settings.
///
/// `RUST_LOG` is read first; `--log-level` then sets the global level and
/// `--wfc-log-level` the level of the collapse engine and progress reports.
/// A second call is a no-op.
pub fn init_logger(config: &AppConfig) {
    let global_level = config.log_level.to_filter();
    let wfc_level = config.wfc_log_level.unwrap_or(config.log_level).to_filter();

    let env = Env::default().filter_or("RUST_LOG", "info");
    let mut builder = Builder::from_env(env);
    builder.filter_level(global_level);
    builder.filter_module("wfc_core", wfc_level);
    builder.filter_module("level_forge_app::progress", wfc_level);

    if builder.try_init().is_ok() {
        log::debug!(
            "Logger initialized with global log level: {:?}, collapse log level: {:?}",
            global_level,
            wfc_level
        );
    }
}
