use super::inference::InferenceContext;
use crate::domain::customer::CustomerProfile;
use crate::domain::prediction::PredictionResult;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{error, info};

/// Outcome of scoring a single input row
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
    /// 1-based data row number in the input
    pub row: usize,
    pub result: Result<PredictionResult, String>,
}

/// Flat CSV record written for every input row
#[derive(Debug, Clone, Serialize)]
pub struct BatchRecord {
    pub row: usize,
    pub label: Option<u8>,
    pub probability: Option<f64>,
    pub error: Option<String>,
}

impl From<&BatchOutcome> for BatchRecord {
    fn from(outcome: &BatchOutcome) -> Self {
        match &outcome.result {
            Ok(prediction) => BatchRecord {
                row: outcome.row,
                label: Some(prediction.label.class()),
                probability: Some(prediction.probability),
                error: None,
            },
            Err(e) => BatchRecord {
                row: outcome.row,
                label: None,
                probability: None,
                error: Some(e.clone()),
            },
        }
    }
}

/// Summary counts for a finished batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub scored: usize,
    pub churned: usize,
    pub failed: usize,
}

/// Scores every row independently and in parallel.
///
/// Rows that could not be parsed arrive as `Err` and are passed through. Output
/// order always matches input order; one bad row never aborts the batch.
pub fn score_batch(
    context: &InferenceContext,
    rows: Vec<Result<CustomerProfile, String>>,
) -> Vec<BatchOutcome> {
    let outcomes: Vec<BatchOutcome> = rows
        .into_par_iter()
        .enumerate()
        .map(|(idx, row)| {
            let result = row.and_then(|profile| {
                context
                    .predict_profile(&profile)
                    .map_err(|e| e.to_string())
            });
            if let Err(e) = &result {
                error!("Batch row {} failed: {}", idx + 1, e);
            }
            BatchOutcome {
                row: idx + 1,
                result,
            }
        })
        .collect();

    let summary = summarize(&outcomes);
    info!(
        "Batch scored: {} ok ({} churn), {} failed",
        summary.scored, summary.churned, summary.failed
    );
    outcomes
}

pub fn summarize(outcomes: &[BatchOutcome]) -> BatchSummary {
    outcomes
        .iter()
        .fold(BatchSummary::default(), |mut acc, outcome| {
            match &outcome.result {
                Ok(prediction) => {
                    acc.scored += 1;
                    if prediction.is_churn() {
                        acc.churned += 1;
                    }
                }
                Err(_) => acc.failed += 1,
            }
            acc
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::{ChurnError, EncodingError};
    use crate::domain::ml::feature_registry::FeatureVector;
    use crate::domain::ports::{CategoryEncoder, ChurnClassifier, FeatureScaler};
    use crate::domain::prediction::ChurnLabel;

    struct PassThrough;

    impl FeatureScaler for PassThrough {
        fn transform(&self, features: &FeatureVector) -> FeatureVector {
            *features
        }

        fn kind(&self) -> &str {
            "identity"
        }
    }

    struct MaleOnly(Vec<String>);

    impl CategoryEncoder for MaleOnly {
        fn transform(&self, category: &str) -> Result<f64, EncodingError> {
            if category == "Male" {
                Ok(0.0)
            } else {
                Err(EncodingError {
                    category: category.to_string(),
                    known: self.0.clone(),
                })
            }
        }

        fn classes(&self) -> &[String] {
            &self.0
        }
    }

    /// Churn iff the customer is not an active member
    struct ActivityClassifier;

    impl ChurnClassifier for ActivityClassifier {
        fn predict(&self, scaled: &FeatureVector) -> Result<PredictionResult, ChurnError> {
            if scaled[7] == 0.0 {
                Ok(PredictionResult::new(ChurnLabel::Churned, 0.9))
            } else {
                Ok(PredictionResult::new(ChurnLabel::Retained, 0.1))
            }
        }

        fn name(&self) -> &str {
            "activity"
        }
    }

    fn context() -> InferenceContext {
        InferenceContext::new(
            Box::new(ActivityClassifier),
            Box::new(PassThrough),
            Box::new(MaleOnly(vec!["Male".to_string()])),
        )
    }

    #[test]
    fn test_batch_preserves_order_and_reports_errors() {
        let ctx = context();
        let rows = vec![
            Ok(CustomerProfile::default()),
            Ok(CustomerProfile {
                active_member: 0,
                ..Default::default()
            }),
            Ok(CustomerProfile {
                gender: "Female".to_string(),
                ..Default::default()
            }),
            Err("CSV deserialize error: field `age`".to_string()),
        ];

        let outcomes = score_batch(&ctx, rows);

        assert_eq!(
            outcomes.iter().map(|o| o.row).collect::<Vec<_>>(),
            vec![1, 2, 3, 4]
        );
        assert_eq!(
            outcomes[0].result.as_ref().unwrap().label,
            ChurnLabel::Retained
        );
        assert_eq!(
            outcomes[1].result.as_ref().unwrap().label,
            ChurnLabel::Churned
        );
        assert!(outcomes[2].result.as_ref().unwrap_err().contains("Female"));
        assert!(outcomes[3].result.as_ref().unwrap_err().contains("age"));

        assert_eq!(
            summarize(&outcomes),
            BatchSummary {
                scored: 2,
                churned: 1,
                failed: 2
            }
        );
    }

    #[test]
    fn test_batch_record_flattening() {
        let ok = BatchOutcome {
            row: 7,
            result: Ok(PredictionResult::new(ChurnLabel::Churned, 0.8)),
        };
        let record = BatchRecord::from(&ok);
        assert_eq!(record.label, Some(1));
        assert_eq!(record.probability, Some(0.8));
        assert!(record.error.is_none());

        let failed = BatchOutcome {
            row: 8,
            result: Err("bad".to_string()),
        };
        let record = BatchRecord::from(&failed);
        assert_eq!(record.row, 8);
        assert!(record.label.is_none());
        assert_eq!(record.error.as_deref(), Some("bad"));
    }
}
