use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(transparent)]
pub struct RecipeId(pub i64);

// Searches with no explicit cap still filter above this many minutes; the
// cutoff is observable and callers depend on it, so it stays literal.
pub const DEFAULT_MAX_TIME_MINUTES: i64 = 999;

pub const MAX_RESULTS: usize = 5;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Recipe {
    pub id: RecipeId,
    pub name: String,
    pub ingredients: Vec<String>,
    pub dietary: String,
    pub difficulty: String,
    pub cook_time: i64,
    pub servings: i64,
    pub nutrition: BTreeMap<String, f64>,
    pub substitutions: BTreeMap<String, Vec<String>>,
    pub rating: f64,
    pub rating_count: i64,
}

fn default_max_time() -> i64 {
    DEFAULT_MAX_TIME_MINUTES
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub dietary: String,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default = "default_max_time")]
    pub max_time: i64,
    #[serde(default)]
    pub servings: i64,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            ingredients: Vec::new(),
            dietary: String::new(),
            difficulty: String::new(),
            max_time: DEFAULT_MAX_TIME_MINUTES,
            servings: 0,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ScoredRecipe {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub match_score: f64,
    pub matched_count: usize,
    pub total_ingredients: usize,
    pub missing_ingredients: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serving_ratio: Option<f64>,
}

#[derive(Debug, Serialize, Clone)]
pub struct SearchReport {
    pub results: Vec<ScoredRecipe>,
    pub total_filtered: usize,
    pub total_scored: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Error, Debug)]
pub enum LarderError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Recipe not found (id {0})")]
    NotFound(i64),

    #[error("Rating must be between 1 and 5 (got {0})")]
    InvalidRating(i64),

    #[error("Catalog storage unavailable: {0}")]
    StorageUnavailable(#[from] sqlx::Error),

    #[error("File system error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config parsing error: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Recipe encoding error: {0}")]
    EncodeError(#[from] serde_json::Error),
}

// Rounds half away from zero: 66.666 -> 66.7, 4.25 -> 4.3.
pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// Running-average update for a new 1-5 star vote.
pub fn adjust_rating_average(
    old_avg: f64,
    old_count: i64,
    new_rating: i64,
) -> Result<(f64, i64), LarderError> {
    if !(1..=5).contains(&new_rating) {
        return Err(LarderError::InvalidRating(new_rating));
    }

    let new_count = old_count + 1;
    let new_avg = round_tenth((old_avg * old_count as f64 + new_rating as f64) / new_count as f64);

    Ok((new_avg, new_count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_tenth_truncates_to_one_decimal() {
        assert_eq!(round_tenth(2.0 / 3.0 * 100.0), 66.7);
        assert_eq!(round_tenth(100.0), 100.0);
        assert_eq!(round_tenth(0.04), 0.0);
    }

    #[test]
    fn round_tenth_rounds_halves_away_from_zero() {
        assert_eq!(round_tenth(4.25), 4.3);
        assert_eq!(round_tenth(0.05), 0.1);
        assert_eq!(round_tenth(-4.25), -4.3);
    }

    #[test]
    fn rating_average_folds_in_new_vote() {
        let (avg, count) = adjust_rating_average(4.0, 1, 5).unwrap();
        assert_eq!(avg, 4.5);
        assert_eq!(count, 2);
    }

    #[test]
    fn rating_average_first_vote_stands_alone() {
        let (avg, count) = adjust_rating_average(0.0, 0, 3).unwrap();
        assert_eq!(avg, 3.0);
        assert_eq!(count, 1);
    }

    #[test]
    fn rating_average_rounds_to_one_decimal() {
        // (4.0 * 2 + 5) / 3 = 4.333...
        let (avg, count) = adjust_rating_average(4.0, 2, 5).unwrap();
        assert_eq!(avg, 4.3);
        assert_eq!(count, 3);
    }

    #[test]
    fn rating_outside_range_is_rejected() {
        assert!(matches!(
            adjust_rating_average(4.0, 1, 0),
            Err(LarderError::InvalidRating(0))
        ));
        assert!(matches!(
            adjust_rating_average(4.0, 1, 6),
            Err(LarderError::InvalidRating(6))
        ));
    }
}
