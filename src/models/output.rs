use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One ranked listing in the output document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingRecord {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    /// Estimated number of visitors the host accepts, or "?"
    pub visitors: String,
    pub city: String,
    pub region: String,
    /// `true` when internet access is known, otherwise "?"
    pub internet: Value,
    #[serde(rename = "numReviews")]
    pub num_reviews: Value,
    #[serde(rename = "averageRating")]
    pub average_rating: Value,
    #[serde(rename = "totalScore")]
    pub total_score: f64,
    #[serde(rename = "bestScore")]
    pub best_score: f64,
    #[serde(rename = "restScore")]
    pub rest_score: f64,
    #[serde(rename = "numResorts")]
    pub num_resorts: usize,
    #[serde(rename = "resortOne", skip_serializing_if = "Option::is_none", default)]
    pub resort_one: Option<ResortRecord>,
    #[serde(rename = "resortTwo", skip_serializing_if = "Option::is_none", default)]
    pub resort_two: Option<ResortRecord>,
    #[serde(rename = "resortThree", skip_serializing_if = "Option::is_none", default)]
    pub resort_three: Option<ResortRecord>,
}

/// Detail for one of a listing's top resorts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResortRecord {
    pub name: String,
    #[serde(rename = "driveDurationText")]
    pub drive_duration_text: String,
    #[serde(rename = "driveDistanceKM")]
    pub drive_distance_km: f64,
    #[serde(rename = "driveDurationMin")]
    pub drive_duration_min: f64,
    #[serde(rename = "driveScore")]
    pub drive_score: f64,
    #[serde(rename = "desirabilityScore")]
    pub desirability_score: f64,
    #[serde(rename = "priceScore")]
    pub price_score: f64,
    #[serde(rename = "totalScore")]
    pub total_score: f64,
}
