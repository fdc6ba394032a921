use crate::core::{
    candidates::{select_candidates, DEFAULT_CANDIDATE_RADIUS_KM},
    filters::filter_listings,
    ranking::rank_listings,
    scoring::ResortScorer,
};
use crate::models::{Listing, Resort, ScoredListing};
use crate::services::{Clock, DistanceMatrixProvider, RoutingClient};

/// Counts and score statistics for one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub raw: usize,
    pub filtered: usize,
    pub with_candidates: usize,
    pub scored: usize,
    pub api_calls: u64,
    pub mean_score: f64,
    pub min_score: f64,
    pub max_score: f64,
}

impl RunSummary {
    fn log(&self) {
        tracing::info!(
            "Listings: {} raw, {} filtered, {} near a resort, {} scored",
            self.raw,
            self.filtered,
            self.with_candidates,
            self.scored
        );
        tracing::info!(
            "Scores: mean {:.4}, min {:.4}, max {:.4} ({} API calls)",
            self.mean_score,
            self.min_score,
            self.max_score,
            self.api_calls
        );
    }
}

/// Result of the ranking run
#[derive(Debug)]
pub struct PipelineResult {
    /// Sorted by descending final score
    pub listings: Vec<ScoredListing>,
    pub summary: RunSummary,
}

/// Main ranking orchestrator
///
/// # Pipeline Stages
/// 1. Deduplication and eligibility filtering
/// 2. Candidate resort selection by great-circle distance
/// 3. Rate-limited driving routes, one listing at a time
/// 4. Resort scoring and listing aggregation
/// 5. Ranking
#[derive(Debug, Clone)]
pub struct Pipeline {
    scorer: ResortScorer,
    radius_km: f64,
}

impl Pipeline {
    pub fn new(scorer: ResortScorer, radius_km: f64) -> Self {
        Self { scorer, radius_km }
    }

    pub fn with_default_radius(scorer: ResortScorer) -> Self {
        Self::new(scorer, DEFAULT_CANDIDATE_RADIUS_KM)
    }

    /// Rank `listings` as ski-trip bases against `resorts`
    ///
    /// Listings are routed sequentially in input order; a routing failure
    /// only removes the affected pairings from scoring.
    pub async fn run<P, C>(
        &self,
        listings: Vec<Listing>,
        resorts: &[Resort],
        router: &RoutingClient<P, C>,
    ) -> PipelineResult
    where
        P: DistanceMatrixProvider,
        C: Clock,
    {
        let raw = listings.len();

        // Stage 1: Dedup + eligibility
        let filtered = filter_listings(listings);
        let filtered_count = filtered.len();
        tracing::info!("Filtered: {}", filtered_count);

        // Stage 2: Candidate resorts within the radius
        let candidates = select_candidates(filtered, resorts, self.radius_km);
        let with_candidates = candidates.len();
        tracing::info!("Near a resort: {}", with_candidates);

        // Stage 3 & 4: Route and score, one listing at a time
        let mut scored = Vec::with_capacity(with_candidates);
        for candidate in candidates {
            let routed = router.route(candidate).await;
            scored.push(self.scorer.score_listing(routed));
        }

        // Stage 5: Rank
        let listings = rank_listings(scored);

        let summary = summarize(raw, filtered_count, with_candidates, router.calls(), &listings);
        summary.log();

        PipelineResult { listings, summary }
    }
}

fn summarize(
    raw: usize,
    filtered: usize,
    with_candidates: usize,
    api_calls: u64,
    listings: &[ScoredListing],
) -> RunSummary {
    let scores: Vec<f64> = listings.iter().map(|l| l.final_score).collect();
    let (mean_score, min_score, max_score) = if scores.is_empty() {
        (0.0, 0.0, 0.0)
    } else {
        (
            scores.iter().sum::<f64>() / scores.len() as f64,
            scores.iter().copied().fold(f64::INFINITY, f64::min),
            scores.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        )
    };

    RunSummary {
        raw,
        filtered,
        with_candidates,
        scored: listings.len(),
        api_calls,
        mean_score,
        min_score,
        max_score,
    }
}
