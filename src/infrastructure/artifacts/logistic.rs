use super::check_feature_params;
use crate::domain::errors::ChurnError;
use crate::domain::ml::feature_registry::{FEATURE_COUNT, FeatureVector};
use crate::domain::ports::ChurnClassifier;
use crate::domain::prediction::{ChurnLabel, PredictionResult};
use serde::{Deserialize, Serialize};

fn default_threshold() -> f64 {
    0.5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticArtifact {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

/// Binary logistic regression over the scaled registry features
#[derive(Debug, Clone, PartialEq)]
pub struct LogisticClassifier {
    coefficients: [f64; FEATURE_COUNT],
    intercept: f64,
    threshold: f64,
}

pub(crate) fn sigmoid(margin: f64) -> f64 {
    1.0 / (1.0 + (-margin).exp())
}

pub(crate) fn check_threshold(threshold: f64) -> Result<(), String> {
    if (0.0..=1.0).contains(&threshold) {
        Ok(())
    } else {
        Err(format!("threshold {} outside [0, 1]", threshold))
    }
}

impl TryFrom<LogisticArtifact> for LogisticClassifier {
    type Error = String;

    fn try_from(artifact: LogisticArtifact) -> Result<Self, Self::Error> {
        check_feature_params("coefficients", &artifact.coefficients)?;
        if !artifact.intercept.is_finite() {
            return Err("intercept is not finite".to_string());
        }
        check_threshold(artifact.threshold)?;

        let mut coefficients = [0.0; FEATURE_COUNT];
        coefficients.copy_from_slice(&artifact.coefficients);
        Ok(Self {
            coefficients,
            intercept: artifact.intercept,
            threshold: artifact.threshold,
        })
    }
}

impl LogisticClassifier {
    pub fn decision_function(&self, scaled: &FeatureVector) -> f64 {
        self.coefficients
            .iter()
            .zip(scaled.as_slice())
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept
    }
}

impl ChurnClassifier for LogisticClassifier {
    fn predict(&self, scaled: &FeatureVector) -> Result<PredictionResult, ChurnError> {
        let probability = sigmoid(self.decision_function(scaled));
        let label = if probability > self.threshold {
            ChurnLabel::Churned
        } else {
            ChurnLabel::Retained
        };
        Ok(PredictionResult::new(label, probability))
    }

    fn name(&self) -> &str {
        "Logistic Regression"
    }
}
