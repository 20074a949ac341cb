use crate::LoadError;

/// Trait defining the interface for format-specific parsers.
///
/// Implementors turn the textual content of one file into a typed value,
/// reporting syntax problems as [`LoadError::ParseError`] and semantic ones as
/// [`LoadError::InvalidData`].
pub trait FormatParser {
    /// The value produced by a successful parse.
    type Output;

    /// Parses `content` into [`Self::Output`].
    fn parse(&self, content: &str) -> Result<Self::Output, LoadError>;

    /// Returns a descriptive name for this parser format.
    ///
    /// This can be used for debugging, logging, or user-facing error messages.
    fn format_name(&self) -> &'static str;
}
