use crate::domain::errors::InvalidInputError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

pub const CREDIT_SCORE_RANGE: RangeInclusive<i64> = 300..=850;
pub const AGE_RANGE: RangeInclusive<i64> = 18..=100;
pub const TENURE_RANGE: RangeInclusive<i64> = 0..=10;
pub const PRODUCTS_RANGE: RangeInclusive<i64> = 1..=4;
pub const FLAG_RANGE: RangeInclusive<i64> = 0..=1;

/// Gender categories offered by the input form.
///
/// The numeric code is NOT derived from this enum; it comes from the fitted encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = InvalidInputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Gender::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| InvalidInputError::UnknownCategory {
                field: "gender",
                value: s.to_string(),
                allowed: "{Male, Female}",
            })
    }
}

/// Country of residence. France is the one-hot baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Country {
    France,
    Germany,
    Spain,
}

impl Country {
    pub const ALL: [Country; 3] = [Country::France, Country::Germany, Country::Spain];

    pub fn as_str(&self) -> &'static str {
        match self {
            Country::France => "France",
            Country::Germany => "Germany",
            Country::Spain => "Spain",
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Country {
    type Err = InvalidInputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Country::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| InvalidInputError::UnknownCategory {
                field: "country",
                value: s.to_string(),
                allowed: "{France, Germany, Spain}",
            })
    }
}

/// Raw attributes of one bank customer, as entered by an operator.
///
/// `gender` and `country` stay as entered text: the fitted encoder is the
/// authority on which gender categories exist, and a CSV row may hold anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub credit_score: i64,
    pub gender: String,
    pub age: i64,
    pub tenure: i64,
    pub balance: f64,
    pub products_number: i64,
    pub credit_card: i64,
    pub active_member: i64,
    pub estimated_salary: f64,
    pub country: String,
}

impl Default for CustomerProfile {
    fn default() -> Self {
        Self {
            credit_score: 650,
            gender: Gender::Male.to_string(),
            age: 35,
            tenure: 5,
            balance: 50000.0,
            products_number: 1,
            credit_card: 1,
            active_member: 1,
            estimated_salary: 100000.0,
            country: Country::France.to_string(),
        }
    }
}

impl CustomerProfile {
    /// Checks every numeric field against its declared domain.
    ///
    /// Gender is left to the encoder; country is parsed and returned.
    pub fn validate(&self) -> Result<Country, InvalidInputError> {
        check_range("credit_score", self.credit_score, CREDIT_SCORE_RANGE, "[300, 850]")?;
        check_range("age", self.age, AGE_RANGE, "[18, 100]")?;
        check_range("tenure", self.tenure, TENURE_RANGE, "[0, 10]")?;
        check_non_negative("balance", self.balance)?;
        check_range(
            "products_number",
            self.products_number,
            PRODUCTS_RANGE,
            "{1, 2, 3, 4}",
        )?;
        check_range("credit_card", self.credit_card, FLAG_RANGE, "{0, 1}")?;
        check_range("active_member", self.active_member, FLAG_RANGE, "{0, 1}")?;
        check_non_negative("estimated_salary", self.estimated_salary)?;

        self.country.parse()
    }
}

fn check_range(
    field: &'static str,
    value: i64,
    range: RangeInclusive<i64>,
    domain: &'static str,
) -> Result<(), InvalidInputError> {
    if range.contains(&value) {
        return Ok(());
    }

    Err(InvalidInputError::OutOfDomain {
        field,
        value: value.to_string(),
        domain,
    })
}

fn check_non_negative(field: &'static str, value: f64) -> Result<(), InvalidInputError> {
    // NaN fails both comparisons
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(InvalidInputError::OutOfDomain {
            field,
            value: value.to_string(),
            domain: "finite values >= 0",
        })
    }
}
