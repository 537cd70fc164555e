//! Hair attribute profile returned by the analysis gateway
//!
//! All enumerated attributes are closed sets; a response value outside the
//! set is a deserialization failure, never a default. The wire format uses
//! the camelCase field names of the analysis service contract.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Natural hair type / pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HairType {
    Straight,
    Wavy,
    Curly,
}

/// Current hair length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HairLength {
    Short,
    Medium,
    Long,
}

/// Strands per area, judged primarily from the top view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HairDensity {
    Low,
    Medium,
    High,
}

/// Individual strand thickness, judged from the close-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HairThickness {
    Thin,
    Medium,
    Thick,
}

/// Scalp visibility through the hair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalpVisibility {
    Visible,
    PartiallyVisible,
    NotVisible,
}

/// Hairline condition from the front view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HairlineCondition {
    Receding,
    Normal,
    Mature,
}

impl std::fmt::Display for HairType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HairType::Straight => write!(f, "straight"),
            HairType::Wavy => write!(f, "wavy"),
            HairType::Curly => write!(f, "curly"),
        }
    }
}

impl std::fmt::Display for HairLength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HairLength::Short => write!(f, "short"),
            HairLength::Medium => write!(f, "medium"),
            HairLength::Long => write!(f, "long"),
        }
    }
}

impl std::fmt::Display for HairDensity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HairDensity::Low => write!(f, "low"),
            HairDensity::Medium => write!(f, "medium"),
            HairDensity::High => write!(f, "high"),
        }
    }
}

/// Valid overall score range (inclusive)
pub const SCORE_RANGE: (f64, f64) = (1.0, 5.0);

/// Profile validation errors
#[derive(Debug, Error, PartialEq)]
pub enum ProfileError {
    #[error("overall score {0} outside range [{min}, {max}]", min = SCORE_RANGE.0, max = SCORE_RANGE.1)]
    ScoreOutOfRange(f64),
}

/// Structured hair analysis for one customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HairProfile {
    pub hair_type: HairType,
    pub hair_length: HairLength,
    /// Free-text descriptor, e.g. "dark brown"
    pub hair_color: String,
    pub hair_density: HairDensity,
    pub hair_thickness: HairThickness,
    pub scalp_visibility: ScalpVisibility,
    pub hairline_condition: HairlineCondition,
    /// Overall hair health/condition score, 1.0 to 5.0
    pub overall_score: f64,
}

impl HairProfile {
    /// Validate range constraints not expressible in the type system
    pub fn validate(&self) -> Result<(), ProfileError> {
        let (min, max) = SCORE_RANGE;
        if !self.overall_score.is_finite() || self.overall_score < min || self.overall_score > max {
            return Err(ProfileError::ScoreOutOfRange(self.overall_score));
        }
        Ok(())
    }
}
