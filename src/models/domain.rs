use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A point on the globe in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// Raw listing as read from a HelpX, Workaway or WWOOF feed
///
/// Each platform fills a different identity field; the eligibility fields are
/// only present on the platform that publishes them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Listing {
    #[serde(rename = "listingId", default, deserialize_with = "string_or_number")]
    pub listing_id: Option<String>,
    #[serde(rename = "friendlyUrl", default)]
    pub friendly_url: Option<String>,
    #[serde(rename = "detailsUrl", default)]
    pub details_url: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub uid: Option<String>,

    /// NaN when the feed has no usable value
    #[serde(default = "missing_coordinate", deserialize_with = "f64_from_string_or_number")]
    pub latitude: f64,
    #[serde(default = "missing_coordinate", deserialize_with = "f64_from_string_or_number")]
    pub longitude: f64,

    #[serde(default, deserialize_with = "string_or_number")]
    pub host_internet_access: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub host_max_wwoofers: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub host_winter_wwoofing_: Option<String>,
    #[serde(rename = "listingAccommodation", default, deserialize_with = "string_or_number")]
    pub listing_accommodation: Option<String>,

    #[serde(rename = "listingName", default)]
    pub listing_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(rename = "regionName", default)]
    pub region_name: Option<String>,
    #[serde(rename = "reviewsReceived", default)]
    pub reviews_received: Option<Value>,
    #[serde(rename = "averageRating", default)]
    pub average_rating: Option<Value>,
}

/// Identity fields a listing can be deduplicated on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentityField {
    ListingId,
    DetailsUrl,
    Uid,
}

impl Listing {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// Whether both coordinates were present and numeric in the feed
    pub fn has_coordinates(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }

    /// All identity values this listing carries, tagged with their field
    pub fn identities(&self) -> impl Iterator<Item = (IdentityField, &str)> {
        [
            (IdentityField::ListingId, self.listing_id.as_deref()),
            (IdentityField::DetailsUrl, self.details_url.as_deref()),
            (IdentityField::Uid, self.uid.as_deref()),
        ]
        .into_iter()
        .filter_map(|(field, value)| present(value).map(|v| (field, v)))
    }

    /// Display name, preferring the HelpX title over the Workaway and WWOOF ones
    pub fn display(&self) -> Option<&str> {
        present(self.listing_name.as_deref())
            .or_else(|| present(self.name.as_deref()))
            .or_else(|| present(self.display_name.as_deref()))
    }
}

/// Treat empty strings the same as missing fields
pub fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Ski resort from the fixed catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resort {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// `None` when the resort sells no season pass
    #[serde(rename = "seasonPass")]
    pub season_pass: Option<f64>,
}

impl Resort {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

/// A resort within the candidate radius of a listing
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateResort {
    pub resort: Resort,
    /// Great-circle distance in meters
    pub distance_m: f64,
}

/// A listing paired with its candidate resorts
#[derive(Debug, Clone)]
pub struct CandidateListing {
    pub listing: Listing,
    pub resorts: Vec<CandidateResort>,
}

impl CandidateListing {
    pub fn destinations(&self) -> Vec<Coordinates> {
        self.resorts.iter().map(|c| c.resort.coordinates()).collect()
    }
}

/// Status of one origin/destination element in a routing response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DrivingStatus {
    Ok,
    NotFound,
    ZeroResults,
    MaxRouteLengthExceeded,
    /// The request for this pairing never produced a usable answer
    RequestFailed,
    #[serde(other)]
    Unknown,
}

/// A value with its human readable rendering, as the routing API reports it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextValue {
    pub text: String,
    pub value: f64,
}

/// Routing outcome for one (listing, resort) pairing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrivingResult {
    pub status: DrivingStatus,
    /// Seconds
    #[serde(default)]
    pub duration: Option<TextValue>,
    /// Meters
    #[serde(default)]
    pub distance: Option<TextValue>,
}

impl DrivingResult {
    pub fn failed() -> Self {
        Self {
            status: DrivingStatus::RequestFailed,
            duration: None,
            distance: None,
        }
    }

    /// The drive, if routing succeeded and reported both duration and distance
    pub fn drive(&self) -> Option<Drive<'_>> {
        if self.status != DrivingStatus::Ok {
            return None;
        }
        match (&self.duration, &self.distance) {
            (Some(duration), Some(distance)) => Some(Drive { duration, distance }),
            _ => None,
        }
    }
}

/// Borrowed view over a successful driving result
#[derive(Debug, Clone, Copy)]
pub struct Drive<'a> {
    pub duration: &'a TextValue,
    pub distance: &'a TextValue,
}

impl Drive<'_> {
    pub fn duration_secs(&self) -> f64 {
        self.duration.value
    }

    pub fn duration_min(&self) -> f64 {
        self.duration.value / 60.0
    }

    pub fn distance_km(&self) -> f64 {
        self.distance.value / 1000.0
    }
}

/// Candidate resort with its routing result attached
#[derive(Debug, Clone)]
pub struct RoutedResort {
    pub candidate: CandidateResort,
    pub driving: DrivingResult,
}

/// Listing with every candidate resort routed
#[derive(Debug, Clone)]
pub struct RoutedListing {
    pub listing: Listing,
    pub resorts: Vec<RoutedResort>,
}

/// Resort that passed the season-pass and routing checks, with its scores
#[derive(Debug, Clone)]
pub struct ScoredResort {
    pub name: String,
    pub distance_m: f64,
    pub season_pass: f64,
    pub drive_duration_text: String,
    pub drive_duration_secs: f64,
    pub drive_distance_m: f64,
    pub drive_time_score: f64,
    pub desirability_score: f64,
    pub price_score: f64,
    pub composite_score: f64,
}

/// Final per-listing result
#[derive(Debug, Clone)]
pub struct ScoredListing {
    pub listing: Listing,
    /// Sorted by descending composite score
    pub resorts: Vec<ScoredResort>,
    pub best_score: f64,
    pub rest_score: f64,
    pub final_score: f64,
}

/// Scoring weights
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub drive_time: f64,
    pub desirability: f64,
    pub price: f64,
    pub best: f64,
    pub rest: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            drive_time: 0.4,
            desirability: 0.4,
            price: 0.2,
            best: 0.85,
            rest: 0.15,
        }
    }
}

/// Calibration points for the piecewise sub-scores
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringBounds {
    /// Drives shorter than this get a full score
    pub drive_full_score_min: f64,
    /// Drives longer than this get nothing
    pub drive_zero_score_min: f64,
    /// Season pass price scoring 1.0
    pub price_floor: f64,
    /// Season pass price scoring 0.0
    pub price_ceiling: f64,
}

impl Default for ScoringBounds {
    fn default() -> Self {
        Self {
            drive_full_score_min: 20.0,
            drive_zero_score_min: 120.0,
            price_floor: 900.0,
            price_ceiling: 3777.90,
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(match n.as_f64().filter(|f| f.fract() == 0.0) {
            // 1.0 and 1 must compare the same
            Some(whole) if n.is_f64() => format!("{}", whole as i64),
            _ => n.to_string(),
        }),
        Some(Value::Bool(b)) => Some(if b { "1" } else { "0" }.to_string()),
        _ => None,
    })
}

fn missing_coordinate() -> f64 {
    f64::NAN
}

/// Lenient coordinate: null, empty or unparseable values become NaN so that
/// one bad record is dropped later instead of failing the whole feed
fn f64_from_string_or_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => s.trim().parse().unwrap_or(f64::NAN),
        _ => f64::NAN,
    })
}
