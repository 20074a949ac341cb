use crate::formats::FormatParser;
use crate::types::{AdjacencyModel, Symbol};
use crate::LoadError;
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// Version written into every model artifact.
pub const MODEL_FORMAT_VERSION: u32 = 1;

/// On-disk representation of a trained [`AdjacencyModel`].
///
/// The alphabet is stored as the string of symbol characters in index order
/// so that an artifact trained for one alphabet cannot be loaded as another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub version: u32,
    pub alphabet: String,
    pub counts: Vec<u64>,
    pub weights: Vec<u32>,
}

impl ModelArtifact {
    pub fn from_model<S: Symbol>(model: &AdjacencyModel<S>) -> Self {
        Self {
            version: MODEL_FORMAT_VERSION,
            alphabet: alphabet_string::<S>(),
            counts: model.counts().to_vec(),
            weights: model.weights().to_vec(),
        }
    }

    pub fn into_model<S: Symbol>(self) -> Result<AdjacencyModel<S>, LoadError> {
        if self.version != MODEL_FORMAT_VERSION {
            return Err(LoadError::InvalidData(format!(
                "Unsupported model version {} (expected {MODEL_FORMAT_VERSION})",
                self.version
            )));
        }
        let expected = alphabet_string::<S>();
        if self.alphabet != expected {
            return Err(LoadError::InvalidData(format!(
                "Model alphabet {:?} does not match {:?}",
                self.alphabet, expected
            )));
        }
        AdjacencyModel::from_parts(self.counts, self.weights)
    }
}

fn alphabet_string<S: Symbol>() -> String {
    S::ALPHABET.iter().map(|s| s.to_char()).collect()
}

/// A parser for model artifacts stored as RON (Rusty Object Notation).
#[derive(Debug, Clone, Copy)]
pub struct RonModelParser<S> {
    _alphabet: PhantomData<S>,
}

impl<S: Symbol> Default for RonModelParser<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Symbol> RonModelParser<S> {
    pub const fn new() -> Self {
        Self {
            _alphabet: PhantomData,
        }
    }

    /// Serializes a model into the RON artifact format.
    pub fn serialize_model(&self, model: &AdjacencyModel<S>) -> Result<String, LoadError> {
        let artifact = ModelArtifact::from_model(model);
        ron::ser::to_string_pretty(&artifact, ron::ser::PrettyConfig::default()).map_err(|e| {
            LoadError::ParseError {
                format: self.format_name(),
                message: format!("RON serialization failed: {e}"),
            }
        })
    }
}

impl<S: Symbol> FormatParser for RonModelParser<S> {
    type Output = AdjacencyModel<S>;

    fn format_name(&self) -> &'static str {
        "Rusty Object Notation (RON)"
    }

    fn parse(&self, content: &str) -> Result<AdjacencyModel<S>, LoadError> {
        let artifact: ModelArtifact =
            ron::from_str(content).map_err(|e| LoadError::ParseError {
                format: self.format_name(),
                message: format!("RON deserialization failed: {e}"),
            })?;
        artifact.into_model()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Ab {
        A,
        B,
    }

    impl Symbol for Ab {
        const ALPHABET: &'static [Self] = &[Self::A, Self::B];

        fn to_char(self) -> char {
            match self {
                Self::A => 'a',
                Self::B => 'b',
            }
        }

        fn from_char(c: char) -> Option<Self> {
            match c {
                'a' => Some(Self::A),
                'b' => Some(Self::B),
                _ => None,
            }
        }
    }

    fn sample_model() -> AdjacencyModel<Ab> {
        let grid = Grid::from_rows(vec![vec![Ab::A, Ab::B], vec![Ab::B, Ab::B]]).unwrap();
        let mut model = AdjacencyModel::empty();
        model.observe(&grid);
        model
    }

    #[test]
    fn artifact_preserves_model() {
        let parser = RonModelParser::<Ab>::new();
        let model = sample_model();
        let text = parser.serialize_model(&model).unwrap();
        assert!(text.contains("alphabet"));
        assert_eq!(parser.parse(&text).unwrap(), model);
    }

    #[test]
    fn alphabet_mismatch_is_rejected() {
        let mut artifact = ModelArtifact::from_model(&sample_model());
        artifact.alphabet = "ba".to_owned();
        match artifact.into_model::<Ab>() {
            Err(LoadError::InvalidData(msg)) => assert!(msg.contains("alphabet"), "{msg}"),
            other => panic!("Expected InvalidData for alphabet mismatch, got {other:?}"),
        }
    }

    #[test]
    fn unsupported_version_is_rejected() {
        let mut artifact = ModelArtifact::from_model(&sample_model());
        artifact.version = MODEL_FORMAT_VERSION + 1;
        assert!(matches!(
            artifact.into_model::<Ab>(),
            Err(LoadError::InvalidData(_))
        ));
    }

    #[test]
    fn malformed_ron_is_a_parse_error() {
        let parser = RonModelParser::<Ab>::new();
        match parser.parse("(version: 1, alphabet: ") {
            Err(LoadError::ParseError { message, .. }) => {
                assert!(message.contains("RON deserialization failed"), "{message}");
            }
            other => panic!("Expected ParseError for malformed RON, got {other:?}"),
        }
    }
}
