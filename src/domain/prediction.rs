use serde::{Deserialize, Serialize};
use std::fmt;

/// Class decided by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChurnLabel {
    Retained,
    Churned,
}

impl ChurnLabel {
    pub fn from_class(class: i64) -> Option<Self> {
        match class {
            0 => Some(ChurnLabel::Retained),
            1 => Some(ChurnLabel::Churned),
            _ => None,
        }
    }

    pub fn class(&self) -> u8 {
        match self {
            ChurnLabel::Retained => 0,
            ChurnLabel::Churned => 1,
        }
    }
}

/// Classifier output for a single customer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub label: ChurnLabel,
    /// Probability of the churn class, in [0, 1]
    pub probability: f64,
}

impl PredictionResult {
    pub fn new(label: ChurnLabel, probability: f64) -> Self {
        Self { label, probability }
    }

    pub fn is_churn(&self) -> bool {
        self.label == ChurnLabel::Churned
    }

    pub fn headline(&self) -> &'static str {
        if self.is_churn() {
            "The customer is likely to churn."
        } else {
            "The customer is not likely to churn."
        }
    }
}

impl fmt::Display for PredictionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} Churn Probability: {:.2}%",
            self.headline(),
            self.probability * 100.0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_formatting() {
        let churned = PredictionResult::new(ChurnLabel::Churned, 0.71234);
        assert_eq!(
            churned.to_string(),
            "The customer is likely to churn. Churn Probability: 71.23%"
        );

        let retained = PredictionResult::new(ChurnLabel::Retained, 0.05);
        assert_eq!(
            retained.to_string(),
            "The customer is not likely to churn. Churn Probability: 5.00%"
        );
    }

    #[test]
    fn test_label_classes() {
        assert_eq!(ChurnLabel::from_class(1), Some(ChurnLabel::Churned));
        assert_eq!(ChurnLabel::from_class(0).map(|l| l.class()), Some(0));
        assert_eq!(ChurnLabel::from_class(2), None);
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_string(&PredictionResult::new(ChurnLabel::Churned, 0.5)).unwrap();
        assert_eq!(json, r#"{"label":"churned","probability":0.5}"#);
    }
}
