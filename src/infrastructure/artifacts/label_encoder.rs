use crate::domain::errors::EncodingError;
use crate::domain::ports::CategoryEncoder;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelEncoderArtifact {
    pub classes: Vec<String>,
}

/// Category -> index in the fitted `classes` list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn new(classes: Vec<String>) -> Result<Self, String> {
        if classes.is_empty() {
            return Err("encoder has no classes".to_string());
        }
        let mut seen = HashSet::new();
        if let Some(dup) = classes.iter().find(|c| !seen.insert(c.as_str())) {
            return Err(format!("class {:?} appears more than once", dup));
        }
        Ok(Self { classes })
    }
}

impl CategoryEncoder for LabelEncoder {
    fn transform(&self, category: &str) -> Result<f64, EncodingError> {
        self.classes
            .iter()
            .position(|c| c == category)
            .map(|code| code as f64)
            .ok_or_else(|| EncodingError {
                category: category.to_string(),
                known: self.classes.clone(),
            })
    }

    fn classes(&self) -> &[String] {
        &self.classes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoder() -> LabelEncoder {
        LabelEncoder::new(vec!["Female".to_string(), "Male".to_string()]).unwrap()
    }

    #[test]
    fn test_codes_follow_fitted_order() {
        let enc = encoder();
        assert_eq!(enc.transform("Female").unwrap(), 0.0);
        assert_eq!(enc.transform("Male").unwrap(), 1.0);
    }

    #[test]
    fn test_unseen_category_never_defaults() {
        let err = encoder().transform("Other").unwrap_err();
        assert_eq!(err.category, "Other");
        assert_eq!(err.known, vec!["Female", "Male"]);

        // case matters, like the fitted encoder
        assert!(encoder().transform("male").is_err());
    }

    #[test]
    fn test_invalid_class_lists() {
        assert!(LabelEncoder::new(vec![]).is_err());
        let err = LabelEncoder::new(vec!["Male".into(), "Male".into()]).unwrap_err();
        assert!(err.contains("Male"));
    }
}
