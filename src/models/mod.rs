// Model exports
pub mod domain;
pub mod output;

pub use domain::{
    CandidateListing, CandidateResort, Coordinates, Drive, DrivingResult, DrivingStatus,
    IdentityField, Listing, Resort, RoutedListing, RoutedResort, ScoredListing, ScoredResort,
    ScoringBounds, ScoringWeights, TextValue,
};
pub use output::{ListingRecord, ResortRecord};
