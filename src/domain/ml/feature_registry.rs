use crate::domain::customer::{Country, CustomerProfile};
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// Ordered list of feature names.
/// This order MUST match exactly with the column order the artifacts were fitted on.
/// Any change here is a breaking change for every scaler and classifier.
pub const FEATURE_NAMES: &[&str] = &[
    "credit_score",
    "gender",
    "age",
    "tenure",
    "balance",
    "products_number",
    "credit_card",
    "active_member",
    "estimated_salary",
    "country_Germany",
    "country_Spain",
];

pub const FEATURE_COUNT: usize = 11;

const _: () = assert!(FEATURE_NAMES.len() == FEATURE_COUNT);

/// Fixed-order numeric model input, before or after scaling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        FEATURE_COUNT
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Applies `f(index, value)` to every element, keeping the order
    pub fn map_indexed(&self, f: impl Fn(usize, f64) -> f64) -> Self {
        let mut out = self.0;
        for (i, v) in out.iter_mut().enumerate() {
            *v = f(i, *v);
        }
        Self(out)
    }
}

impl Index<usize> for FeatureVector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}

/// Index of a registry feature by name, or by the positional `f<index>` alias
/// used in tree dumps.
pub fn feature_index(name: &str) -> Option<usize> {
    if let Some(pos) = FEATURE_NAMES.iter().position(|n| *n == name) {
        return Some(pos);
    }
    name.strip_prefix('f')
        .and_then(|idx| idx.parse::<usize>().ok())
        .filter(|idx| *idx < FEATURE_COUNT)
}

/// One-hot flags (germany, spain) with France as baseline
pub fn country_flags(country: &str) -> (f64, f64) {
    let germany = if country == Country::Germany.as_str() { 1.0 } else { 0.0 };
    let spain = if country == Country::Spain.as_str() { 1.0 } else { 0.0 };
    (germany, spain)
}

/// Assembles the raw (unscaled) vector from a validated profile and its gender code.
pub fn features_to_vector(profile: &CustomerProfile, gender_code: f64) -> FeatureVector {
    let (country_germany, country_spain) = country_flags(&profile.country);

    FeatureVector([
        profile.credit_score as f64,
        gender_code,
        profile.age as f64,
        profile.tenure as f64,
        profile.balance,
        profile.products_number as f64,
        profile.credit_card as f64,
        profile.active_member as f64,
        profile.estimated_salary,
        country_germany,
        country_spain,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_vector_length() {
        let vec = features_to_vector(&CustomerProfile::default(), 1.0);
        assert_eq!(vec.as_slice().len(), FEATURE_NAMES.len());
    }

    #[test]
    fn test_feature_consistency() {
        let profile = CustomerProfile {
            credit_score: 720,
            estimated_salary: 42000.0,
            country: "Spain".to_string(),
            ..Default::default()
        };

        let vec = features_to_vector(&profile, 0.0);
        // credit_score is index 0
        assert_eq!(vec[0], 720.0);
        // estimated_salary is index 8
        assert_eq!(vec[8], 42000.0);
        // country_Spain is last index (10)
        assert_eq!(vec[10], 1.0);
    }

    #[test]
    fn test_country_one_hot() {
        assert_eq!(country_flags("France"), (0.0, 0.0));
        assert_eq!(country_flags("Germany"), (1.0, 0.0));
        assert_eq!(country_flags("Spain"), (0.0, 1.0));
    }

    #[test]
    fn test_feature_index_lookup() {
        assert_eq!(feature_index("age"), Some(2));
        assert_eq!(feature_index("f9"), Some(9));
        assert_eq!(feature_index("country_Spain"), Some(10));
        assert_eq!(feature_index("f11"), None);
        assert_eq!(feature_index("surname"), None);
    }
}
