use crate::domain::errors::{ChurnError, EncodingError};
use crate::domain::ml::feature_registry::FeatureVector;
use crate::domain::prediction::PredictionResult;

/// Fitted per-feature linear transform
pub trait FeatureScaler: Send + Sync {
    fn transform(&self, features: &FeatureVector) -> FeatureVector;

    /// Short description (e.g. "standard", "min_max")
    fn kind(&self) -> &str;
}

/// Fitted mapping from a category to its training-time integer code
pub trait CategoryEncoder: Send + Sync {
    /// Fails on any category the encoder was not fitted on.
    fn transform(&self, category: &str) -> Result<f64, EncodingError>;

    fn classes(&self) -> &[String];
}

/// Interface for the trained churn classifier.
///
/// The classifier decides both the label and the class-1 probability; callers
/// never re-derive one from the other.
pub trait ChurnClassifier: Send + Sync {
    fn predict(&self, scaled: &FeatureVector) -> Result<PredictionResult, ChurnError>;

    /// Get model name/type
    fn name(&self) -> &str;
}
