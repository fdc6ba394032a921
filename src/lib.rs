//! Ski Stay - ranks farm-stay listings as bases for a ski trip
//!
//! Listings from HelpX, Workaway and WWOOF are deduplicated, paired with
//! nearby resorts, routed through a rate-limited driving-distance service and
//! scored on drive time, resort desirability and season-pass price.

pub mod config;
pub mod core;
pub mod job;
pub mod models;
pub mod pipeline;
pub mod services;

// Re-export commonly used types
pub use self::core::{great_circle_distance, DesirabilityTable, RecordFormatter, ResortScorer};
pub use models::{Coordinates, Listing, ListingRecord, Resort, ScoredListing, ScoringWeights};
pub use pipeline::{Pipeline, PipelineResult, RunSummary};
