//! Error handling for the Level Forge application.

use level_gen::GenerationError;
use thiserror::Error;

/// Custom error types for the application.
#[derive(Error, Debug)]
pub enum AppError {
    /// Errors in command-line arguments or settings files.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Settings could not be merged or extracted.
    #[error("Settings error: {0}")]
    Settings(#[from] figment::Error),

    /// Errors during file I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors raised by the level generator.
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    /// The PNG preview could not be encoded or saved.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_errors_keep_their_message() {
        let err = AppError::from(GenerationError::StyleUnsatisfiable { attempts: 0 });
        assert_eq!(
            err.to_string(),
            "Generation error: Style pass unsatisfiable after 0 attempts"
        );
    }
}
