use super::check_feature_params;
use crate::domain::ml::feature_registry::{FEATURE_COUNT, FeatureVector};
use crate::domain::ports::FeatureScaler;
use serde::{Deserialize, Serialize};

/// Persisted scaler parameters, as exported from the training run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScalerArtifact {
    /// z-score: (x - mean) / scale
    Standard { mean: Vec<f64>, scale: Vec<f64> },
    /// (x - data_min) / (data_max - data_min)
    MinMax {
        data_min: Vec<f64>,
        data_max: Vec<f64>,
    },
}

/// A validated `(x - center) / spread` transform over the 11 registry features
#[derive(Debug, Clone, PartialEq)]
pub struct FittedScaler {
    kind: &'static str,
    center: [f64; FEATURE_COUNT],
    spread: [f64; FEATURE_COUNT],
}

impl FittedScaler {
    pub fn center(&self) -> &[f64; FEATURE_COUNT] {
        &self.center
    }
}

impl TryFrom<ScalerArtifact> for FittedScaler {
    type Error = String;

    fn try_from(artifact: ScalerArtifact) -> Result<Self, Self::Error> {
        let (kind, center, spread) = match artifact {
            ScalerArtifact::Standard { mean, scale } => {
                check_feature_params("mean", &mean)?;
                check_feature_params("scale", &scale)?;
                if let Some(pos) = scale.iter().position(|s| *s < 0.0) {
                    return Err(format!("scale[{}] is negative", pos));
                }
                ("standard", mean, scale)
            }
            ScalerArtifact::MinMax { data_min, data_max } => {
                check_feature_params("data_min", &data_min)?;
                check_feature_params("data_max", &data_max)?;
                let range: Vec<f64> = data_min
                    .iter()
                    .zip(&data_max)
                    .map(|(lo, hi)| hi - lo)
                    .collect();
                if let Some(pos) = range.iter().position(|r| *r < 0.0) {
                    return Err(format!("data_max[{}] is below data_min", pos));
                }
                ("min_max", data_min, range)
            }
        };

        let mut fitted = FittedScaler {
            kind,
            center: [0.0; FEATURE_COUNT],
            spread: [1.0; FEATURE_COUNT],
        };
        fitted.center.copy_from_slice(&center);
        for (dst, src) in fitted.spread.iter_mut().zip(spread) {
            // constant training column: offset only
            *dst = if src == 0.0 { 1.0 } else { src };
        }
        Ok(fitted)
    }
}

impl FeatureScaler for FittedScaler {
    fn transform(&self, features: &FeatureVector) -> FeatureVector {
        features.map_indexed(|i, x| (x - self.center[i]) / self.spread[i])
    }

    fn kind(&self) -> &str {
        self.kind
    }
}
