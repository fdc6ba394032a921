use std::collections::HashMap;

use thiserror::Error;

use crate::models::Resort;

/// Errors building a desirability table
#[derive(Debug, Error, PartialEq)]
pub enum DesirabilityError {
    #[error("Desirability for {resort} must be within [0, 1], got {score}")]
    OutOfRange { resort: String, score: f64 },

    #[error("Positional table has {scores} scores for {resorts} resorts")]
    LengthMismatch { scores: usize, resorts: usize },
}

/// Static, externally calibrated quality rating per resort
///
/// Scores are keyed by resort name so reordering or extending the catalog
/// cannot shift a score onto the wrong resort.
#[derive(Debug, Clone, Default)]
pub struct DesirabilityTable {
    scores: HashMap<String, f64>,
}

impl DesirabilityTable {
    pub fn new(scores: HashMap<String, f64>) -> Result<Self, DesirabilityError> {
        for (resort, &score) in &scores {
            if !(0.0..=1.0).contains(&score) {
                return Err(DesirabilityError::OutOfRange {
                    resort: resort.clone(),
                    score,
                });
            }
        }
        Ok(Self { scores })
    }

    /// Build from a score list aligned with `resorts` by position
    pub fn from_positions(resorts: &[Resort], scores: &[f64]) -> Result<Self, DesirabilityError> {
        if resorts.len() != scores.len() {
            return Err(DesirabilityError::LengthMismatch {
                scores: scores.len(),
                resorts: resorts.len(),
            });
        }

        Self::new(
            resorts
                .iter()
                .zip(scores)
                .map(|(resort, &score)| (resort.name.clone(), score))
                .collect(),
        )
    }

    /// Score for `resort`, 0 when the table does not rate it
    #[inline]
    pub fn score(&self, resort: &Resort) -> f64 {
        self.scores.get(&resort.name).copied().unwrap_or(0.0)
    }

    /// Names of catalog resorts the table does not rate
    pub fn unrated<'a>(&self, resorts: &'a [Resort]) -> Vec<&'a str> {
        resorts
            .iter()
            .filter(|r| !self.scores.contains_key(&r.name))
            .map(|r| r.name.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}
