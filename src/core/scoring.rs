use crate::core::desirability::DesirabilityTable;
use crate::models::{
    RoutedListing, RoutedResort, ScoredListing, ScoredResort, ScoringBounds, ScoringWeights,
};

/// Scores routed resorts and aggregates them per listing
///
/// Scoring formula per resort:
/// composite = (
///     drive_time_score * 0.4 +     # Shorter drive = higher
///     desirability_score * 0.4 +   # Static resort rating
///     price_score * 0.2            # Cheaper season pass = higher
/// )
///
/// Per listing:
/// final = best_composite * 0.85 + sum(drive_time * desirability) * 0.15
#[derive(Debug, Clone)]
pub struct ResortScorer {
    weights: ScoringWeights,
    bounds: ScoringBounds,
    desirability: DesirabilityTable,
}

impl ResortScorer {
    pub fn new(weights: ScoringWeights, bounds: ScoringBounds, desirability: DesirabilityTable) -> Self {
        Self {
            weights,
            bounds,
            desirability,
        }
    }

    pub fn with_defaults(desirability: DesirabilityTable) -> Self {
        Self::new(ScoringWeights::default(), ScoringBounds::default(), desirability)
    }

    /// Score one routed resort
    ///
    /// Returns `None` when the resort has no season pass or routing failed.
    pub fn score_resort(&self, routed: &RoutedResort) -> Option<ScoredResort> {
        let resort = &routed.candidate.resort;
        let season_pass = resort.season_pass?;
        let drive = routed.driving.drive()?;

        let drive_time_score = drive_time_score(drive.duration_secs(), &self.bounds);
        let desirability_score = self.desirability.score(resort);
        let price_score = price_score(season_pass, &self.bounds);

        Some(ScoredResort {
            name: resort.name.clone(),
            distance_m: routed.candidate.distance_m,
            season_pass,
            drive_duration_text: drive.duration.text.clone(),
            drive_duration_secs: drive.duration_secs(),
            drive_distance_m: drive.distance.value,
            drive_time_score,
            desirability_score,
            price_score,
            composite_score: self.composite(drive_time_score, desirability_score, price_score),
        })
    }

    /// Weighted combination of the three sub-scores
    #[inline]
    pub fn composite(&self, drive_time: f64, desirability: f64, price: f64) -> f64 {
        self.weights.drive_time * drive_time
            + self.weights.desirability * desirability
            + self.weights.price * price
    }

    /// Qualifying resorts of a listing, best first
    ///
    /// Ties keep routing order.
    pub fn score_resorts(&self, resorts: &[RoutedResort]) -> Vec<ScoredResort> {
        let mut scored: Vec<ScoredResort> =
            resorts.iter().filter_map(|r| self.score_resort(r)).collect();

        scored.sort_by(|a, b| {
            b.composite_score
                .partial_cmp(&a.composite_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        scored
    }

    /// Breadth score: rewards listings near many good resorts
    ///
    /// Sums `drive_time * desirability` over every routeable resort, with or
    /// without a season pass.
    pub fn rest_score(&self, resorts: &[RoutedResort]) -> f64 {
        resorts
            .iter()
            .filter_map(|r| {
                r.driving.drive().map(|drive| {
                    drive_time_score(drive.duration_secs(), &self.bounds)
                        * self.desirability.score(&r.candidate.resort)
                })
            })
            .sum()
    }

    /// Combine the best resort with the breadth score
    #[inline]
    pub fn final_score(&self, best: f64, rest: f64) -> f64 {
        self.weights.best * best + self.weights.rest * rest
    }

    /// Score a routed listing end to end
    pub fn score_listing(&self, routed: RoutedListing) -> ScoredListing {
        let resorts = self.score_resorts(&routed.resorts);
        let best_score = resorts.first().map(|r| r.composite_score).unwrap_or(0.0);
        let rest_score = self.rest_score(&routed.resorts);

        ScoredListing {
            listing: routed.listing,
            resorts,
            best_score,
            rest_score,
            final_score: self.final_score(best_score, rest_score),
        }
    }
}

/// Drive-time score (0-1)
///
/// Full score under the lower bound, nothing over the upper bound, linear in
/// between. With the default 20/120 minute bounds this is `1.2 - minutes / 100`.
#[inline]
pub fn drive_time_score(duration_secs: f64, bounds: &ScoringBounds) -> f64 {
    let minutes = duration_secs / 60.0;
    let full = bounds.drive_full_score_min;
    let zero = bounds.drive_zero_score_min;

    if minutes < full {
        1.0
    } else if minutes > zero {
        0.0
    } else {
        (zero - minutes) / (zero - full)
    }
}

/// Price score, linear against the calibration range
///
/// Not clamped: passes cheaper than the floor score above 1, dearer than the
/// ceiling below 0.
#[inline]
pub fn price_score(season_pass: f64, bounds: &ScoringBounds) -> f64 {
    1.0 - (season_pass - bounds.price_floor) / (bounds.price_ceiling - bounds.price_floor)
}
