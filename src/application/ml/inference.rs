//! Feature encoding and inference contract.
//!
//! `InferenceContext` owns the three fitted artifacts for the lifetime of the
//! process. Every operation takes `&self`, so one context can be shared across
//! threads without locking.

use crate::domain::customer::{CustomerProfile, Gender};
use crate::domain::errors::ChurnError;
use crate::domain::ml::feature_registry::{FeatureVector, features_to_vector};
use crate::domain::ports::{CategoryEncoder, ChurnClassifier, FeatureScaler};
use crate::domain::prediction::PredictionResult;
use tracing::{debug, warn};

/// The loaded model artifacts, ready to serve requests
pub struct InferenceContext {
    classifier: Box<dyn ChurnClassifier>,
    scaler: Box<dyn FeatureScaler>,
    gender_encoder: Box<dyn CategoryEncoder>,
}

impl InferenceContext {
    pub fn new(
        classifier: Box<dyn ChurnClassifier>,
        scaler: Box<dyn FeatureScaler>,
        gender_encoder: Box<dyn CategoryEncoder>,
    ) -> Self {
        Self {
            classifier,
            scaler,
            gender_encoder,
        }
    }

    pub fn classifier(&self) -> &dyn ChurnClassifier {
        self.classifier.as_ref()
    }

    pub fn scaler(&self) -> &dyn FeatureScaler {
        self.scaler.as_ref()
    }

    pub fn gender_encoder(&self) -> &dyn CategoryEncoder {
        self.gender_encoder.as_ref()
    }

    /// Builds the raw 11-element vector.
    ///
    /// Gender goes through the fitted encoder first, so a category the model was
    /// never trained on surfaces as an encoding error rather than a domain error.
    pub fn encode(&self, profile: &CustomerProfile) -> Result<FeatureVector, ChurnError> {
        let gender_code = self.gender_encoder.transform(&profile.gender)?;
        profile.gender.parse::<Gender>()?;
        profile.validate()?;

        Ok(features_to_vector(profile, gender_code))
    }

    pub fn scale(&self, features: &FeatureVector) -> FeatureVector {
        self.scaler.transform(features)
    }

    pub fn predict(&self, scaled: &FeatureVector) -> Result<PredictionResult, ChurnError> {
        let result = self.classifier.predict(scaled)?;
        if !(0.0..=1.0).contains(&result.probability) {
            return Err(ChurnError::inference(
                self.classifier.name(),
                format!("probability {} outside [0, 1]", result.probability),
            ));
        }
        Ok(result)
    }

    /// End-to-end: `predict(scale(encode(profile)))`
    pub fn predict_profile(&self, profile: &CustomerProfile) -> Result<PredictionResult, ChurnError> {
        let raw = self.encode(profile).inspect_err(|e| {
            warn!("Rejected customer profile: {}", e);
        })?;
        let scaled = self.scale(&raw);
        let result = self.predict(&scaled)?;

        debug!(
            label = result.label.class(),
            probability = result.probability,
            "Churn prediction computed"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::{EncodingError, InvalidInputError};
    use crate::domain::prediction::ChurnLabel;

    struct IdentityScaler;

    impl FeatureScaler for IdentityScaler {
        fn transform(&self, features: &FeatureVector) -> FeatureVector {
            *features
        }

        fn kind(&self) -> &str {
            "identity"
        }
    }

    struct FixedEncoder {
        classes: Vec<String>,
    }

    impl FixedEncoder {
        fn new() -> Self {
            Self {
                classes: vec!["Female".to_string(), "Male".to_string()],
            }
        }
    }

    impl CategoryEncoder for FixedEncoder {
        fn transform(&self, category: &str) -> Result<f64, EncodingError> {
            self.classes
                .iter()
                .position(|c| c == category)
                .map(|i| i as f64)
                .ok_or_else(|| EncodingError {
                    category: category.to_string(),
                    known: self.classes.clone(),
                })
        }

        fn classes(&self) -> &[String] {
            &self.classes
        }
    }

    /// Uses a 0.7 cut-off on age/100 as probability, so its label disagrees
    /// with a naive 0.5 threshold between 0.5 and 0.7.
    struct StrictAgeClassifier;

    impl ChurnClassifier for StrictAgeClassifier {
        fn predict(&self, scaled: &FeatureVector) -> Result<PredictionResult, ChurnError> {
            let probability = scaled[2] / 100.0;
            let label = if probability > 0.7 {
                ChurnLabel::Churned
            } else {
                ChurnLabel::Retained
            };
            Ok(PredictionResult::new(label, probability))
        }

        fn name(&self) -> &str {
            "strict-age"
        }
    }

    struct BrokenClassifier;

    impl ChurnClassifier for BrokenClassifier {
        fn predict(&self, _scaled: &FeatureVector) -> Result<PredictionResult, ChurnError> {
            Ok(PredictionResult::new(ChurnLabel::Churned, 1.5))
        }

        fn name(&self) -> &str {
            "broken"
        }
    }

    fn context(classifier: Box<dyn ChurnClassifier>) -> InferenceContext {
        InferenceContext::new(
            classifier,
            Box::new(IdentityScaler),
            Box::new(FixedEncoder::new()),
        )
    }

    #[test]
    fn test_encode_reference_profile() {
        let ctx = context(Box::new(StrictAgeClassifier));
        let profile = CustomerProfile {
            gender: "Female".to_string(),
            ..Default::default()
        };

        let vec = ctx.encode(&profile).unwrap();
        assert_eq!(
            vec.values(),
            &[650.0, 0.0, 35.0, 5.0, 50000.0, 1.0, 1.0, 1.0, 100000.0, 0.0, 0.0]
        );
    }

    #[test]
    fn test_unseen_gender_is_encoding_error() {
        let ctx = context(Box::new(StrictAgeClassifier));
        let profile = CustomerProfile {
            gender: "Other".to_string(),
            ..Default::default()
        };

        let err = ctx.predict_profile(&profile).unwrap_err();
        assert!(matches!(
            err,
            ChurnError::InvalidInput(InvalidInputError::Encoding(_))
        ));
    }

    #[test]
    fn test_out_of_domain_rejected_before_prediction() {
        let ctx = context(Box::new(BrokenClassifier));
        let profile = CustomerProfile {
            age: 101,
            ..Default::default()
        };

        let err = ctx.predict_profile(&profile).unwrap_err();
        assert!(matches!(
            err,
            ChurnError::InvalidInput(InvalidInputError::OutOfDomain { field: "age", .. })
        ));
    }

    #[test]
    fn test_label_is_taken_from_classifier() {
        let ctx = context(Box::new(StrictAgeClassifier));
        let profile = CustomerProfile {
            age: 60,
            ..Default::default()
        };

        let result = ctx.predict_profile(&profile).unwrap();
        // 0.6 would be churn under a 0.5 threshold; the classifier says otherwise
        assert_eq!(result.probability, 0.6);
        assert_eq!(result.label, ChurnLabel::Retained);
    }

    #[test]
    fn test_prediction_is_deterministic() {
        let ctx = context(Box::new(StrictAgeClassifier));
        let profile = CustomerProfile {
            age: 88,
            country: "Germany".to_string(),
            ..Default::default()
        };

        let first = ctx.predict_profile(&profile).unwrap();
        let second = ctx.predict_profile(&profile).unwrap();
        assert_eq!(first.label, second.label);
        assert_eq!(first.probability.to_bits(), second.probability.to_bits());
    }

    #[test]
    fn test_probability_outside_unit_interval_rejected() {
        let ctx = context(Box::new(BrokenClassifier));
        let err = ctx.predict_profile(&CustomerProfile::default()).unwrap_err();
        assert!(matches!(err, ChurnError::Inference { .. }));
    }
}
