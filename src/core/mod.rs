// Core algorithm exports
pub mod candidates;
pub mod desirability;
pub mod distance;
pub mod filters;
pub mod ranking;
pub mod scoring;

pub use candidates::{candidate_resorts, select_candidates, DEFAULT_CANDIDATE_RADIUS_KM};
pub use desirability::{DesirabilityError, DesirabilityTable};
pub use distance::great_circle_distance;
pub use filters::{dedup_by_identity, filter_listings, is_eligible};
pub use ranking::{listing_url, rank_listings, RecordFormatter};
pub use scoring::{drive_time_score, price_score, ResortScorer};
