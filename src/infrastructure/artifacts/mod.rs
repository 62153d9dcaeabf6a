//! Loading of the externally trained model artifacts.
//!
//! Each artifact is read once at startup. Anything missing, unreadable or of the
//! wrong shape becomes `ChurnError::ArtifactLoad` naming the artifact and path.

pub mod label_encoder;
pub mod logistic;
pub mod onnx_classifier;
pub mod scaler;
pub mod tree_ensemble;

pub use label_encoder::LabelEncoder;
pub use logistic::LogisticClassifier;
pub use onnx_classifier::OnnxClassifier;
pub use scaler::{FittedScaler, ScalerArtifact};
pub use tree_ensemble::TreeEnsembleClassifier;

use crate::application::ml::InferenceContext;
use crate::domain::errors::{ArtifactKind, ChurnError};
use crate::domain::ml::feature_registry::FEATURE_COUNT;
use crate::domain::ports::{CategoryEncoder, ChurnClassifier, FeatureScaler};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::info;

/// Resolved file locations of the three artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub classifier: PathBuf,
    pub scaler: PathBuf,
    pub gender_encoder: PathBuf,
}

/// Serialized form of a JSON classifier, tagged by `kind`
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierArtifact {
    GradientBoostedTrees(tree_ensemble::TreeEnsembleArtifact),
    LogisticRegression(logistic::LogisticArtifact),
}

/// Loads all three artifacts and assembles the inference context.
pub fn load_artifacts(paths: &ArtifactPaths) -> Result<InferenceContext, ChurnError> {
    let scaler = load_scaler(&paths.scaler)?;
    let gender_encoder = load_gender_encoder(&paths.gender_encoder)?;
    let classifier = load_classifier(&paths.classifier)?;

    info!(
        "Loaded model artifacts: classifier={} ({:?}), scaler={} ({:?}), gender encoder classes={:?}",
        classifier.name(),
        paths.classifier,
        scaler.kind(),
        paths.scaler,
        gender_encoder.classes()
    );

    Ok(InferenceContext::new(
        classifier,
        Box::new(scaler),
        Box::new(gender_encoder),
    ))
}

pub fn load_scaler(path: &Path) -> Result<FittedScaler, ChurnError> {
    let artifact: ScalerArtifact = read_json(ArtifactKind::Scaler, path)?;
    FittedScaler::try_from(artifact)
        .map_err(|reason| ChurnError::artifact_load(ArtifactKind::Scaler, path, reason))
}

pub fn load_gender_encoder(path: &Path) -> Result<LabelEncoder, ChurnError> {
    let artifact: label_encoder::LabelEncoderArtifact =
        read_json(ArtifactKind::GenderEncoder, path)?;
    LabelEncoder::new(artifact.classes)
        .map_err(|reason| ChurnError::artifact_load(ArtifactKind::GenderEncoder, path, reason))
}

/// `*.onnx` files go to ONNX Runtime; everything else is parsed as a JSON artifact.
pub fn load_classifier(path: &Path) -> Result<Box<dyn ChurnClassifier>, ChurnError> {
    let is_onnx = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("onnx"))
        .unwrap_or(false);
    if is_onnx {
        return Ok(Box::new(OnnxClassifier::load(path)?));
    }

    let artifact: ClassifierArtifact = read_json(ArtifactKind::Classifier, path)?;
    let classifier: Box<dyn ChurnClassifier> = match artifact {
        ClassifierArtifact::GradientBoostedTrees(trees) => Box::new(
            TreeEnsembleClassifier::try_from(trees)
                .map_err(|r| ChurnError::artifact_load(ArtifactKind::Classifier, path, r))?,
        ),
        ClassifierArtifact::LogisticRegression(model) => Box::new(
            LogisticClassifier::try_from(model)
                .map_err(|r| ChurnError::artifact_load(ArtifactKind::Classifier, path, r))?,
        ),
    };
    Ok(classifier)
}

fn read_json<T: DeserializeOwned>(kind: ArtifactKind, path: &Path) -> Result<T, ChurnError> {
    let file = File::open(path).map_err(|e| ChurnError::artifact_load(kind, path, e))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| ChurnError::artifact_load(kind, path, e))
}

/// Shared shape check for per-feature parameter vectors
pub(crate) fn check_feature_params(name: &str, values: &[f64]) -> Result<(), String> {
    if values.len() != FEATURE_COUNT {
        return Err(format!(
            "{} has {} values, expected {}",
            name,
            values.len(),
            FEATURE_COUNT
        ));
    }
    if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
        return Err(format!("{}[{}] is not finite", name, pos));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_feature_params() {
        assert!(check_feature_params("mean", &[0.0; FEATURE_COUNT]).is_ok());

        let err = check_feature_params("mean", &[0.0; 3]).unwrap_err();
        assert!(err.contains("3 values"));

        let mut values = [1.0; FEATURE_COUNT];
        values[4] = f64::INFINITY;
        let err = check_feature_params("scale", &values).unwrap_err();
        assert_eq!(err, "scale[4] is not finite");
    }

    #[test]
    fn test_classifier_artifact_tagging() {
        let json = r#"{
            "kind": "logistic_regression",
            "coefficients": [0,0,0,0,0,0,0,0,0,0,0],
            "intercept": 0.0
        }"#;
        let artifact: ClassifierArtifact = serde_json::from_str(json).unwrap();
        assert!(matches!(artifact, ClassifierArtifact::LogisticRegression(_)));

        let unknown = r#"{"kind": "svm"}"#;
        assert!(serde_json::from_str::<ClassifierArtifact>(unknown).is_err());
    }
}
