use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The three persisted artifacts the inference context is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Classifier,
    Scaler,
    GenderEncoder,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArtifactKind::Classifier => "classifier",
            ArtifactKind::Scaler => "scaler",
            ArtifactKind::GenderEncoder => "gender encoder",
        };
        f.write_str(name)
    }
}

/// Top-level error surfaced to the presentation shells
#[derive(Debug, Error)]
pub enum ChurnError {
    #[error("Failed to load {artifact} artifact from {}: {reason}", path.display())]
    ArtifactLoad {
        artifact: ArtifactKind,
        path: PathBuf,
        reason: String,
    },

    #[error(transparent)]
    InvalidInput(#[from] InvalidInputError),

    #[error("Inference failed in {backend}: {reason}")]
    Inference { backend: String, reason: String },
}

impl ChurnError {
    pub fn artifact_load(
        artifact: ArtifactKind,
        path: impl Into<PathBuf>,
        reason: impl fmt::Display,
    ) -> Self {
        ChurnError::ArtifactLoad {
            artifact,
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn inference(backend: &str, reason: impl fmt::Display) -> Self {
        ChurnError::Inference {
            backend: backend.to_string(),
            reason: reason.to_string(),
        }
    }

    /// True when the request can be corrected and resubmitted
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ChurnError::InvalidInput(_))
    }
}

/// A single request was rejected; the process keeps serving
#[derive(Debug, Error)]
pub enum InvalidInputError {
    #[error("Invalid input: {field} = {value} is outside {domain}")]
    OutOfDomain {
        field: &'static str,
        value: String,
        domain: &'static str,
    },

    #[error("Invalid input: {field} = {value:?} is not one of {allowed}")]
    UnknownCategory {
        field: &'static str,
        value: String,
        allowed: &'static str,
    },

    #[error(transparent)]
    Encoding(#[from] EncodingError),
}

/// The fitted encoder was handed a category it never saw at training time
#[derive(Debug, Clone, Error)]
#[error("Encoding error: category {category:?} was not seen when the encoder was fitted (known: {})", known.join(", "))]
pub struct EncodingError {
    pub category: String,
    pub known: Vec<String>,
}

impl From<EncodingError> for ChurnError {
    fn from(err: EncodingError) -> Self {
        ChurnError::InvalidInput(InvalidInputError::Encoding(err))
    }
}
