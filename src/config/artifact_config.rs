//! Artifact location parsing from a config file and environment variables.

use crate::infrastructure::artifacts::ArtifactPaths;
use serde::Deserialize;
use std::path::PathBuf;

/// Where the fitted artifacts live
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArtifactEnvConfig {
    pub model_dir: PathBuf,
    pub classifier: String,
    pub scaler: String,
    pub gender_encoder: String,
}

impl Default for ArtifactEnvConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("model"),
            classifier: "xgb_model.json".to_string(),
            scaler: "scaler.json".to_string(),
            gender_encoder: "gender_encoder.json".to_string(),
        }
    }
}

impl ArtifactEnvConfig {
    pub fn apply_env(&mut self, lookup: &impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup("CHURN_MODEL_DIR") {
            self.model_dir = PathBuf::from(dir);
        }
        if let Some(file) = lookup("CHURN_CLASSIFIER_FILE") {
            self.classifier = file;
        }
        if let Some(file) = lookup("CHURN_SCALER_FILE") {
            self.scaler = file;
        }
        if let Some(file) = lookup("CHURN_GENDER_ENCODER_FILE") {
            self.gender_encoder = file;
        }
    }

    /// File names are joined onto `model_dir`; absolute names are kept as-is.
    pub fn paths(&self) -> ArtifactPaths {
        ArtifactPaths {
            classifier: self.model_dir.join(&self.classifier),
            scaler: self.model_dir.join(&self.scaler),
            gender_encoder: self.model_dir.join(&self.gender_encoder),
        }
    }
}
