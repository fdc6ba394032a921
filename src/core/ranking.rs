use std::collections::HashSet;

use serde_json::Value;

use crate::models::{domain::present, Listing, ListingRecord, ResortRecord, ScoredListing, ScoredResort};

const UNKNOWN: &str = "?";

/// Sort listings by descending final score
///
/// The sort is stable: equal scores keep their relative order.
pub fn rank_listings(mut listings: Vec<ScoredListing>) -> Vec<ScoredListing> {
    listings.sort_by(|a, b| {
        b.final_score
            .partial_cmp(&a.final_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    listings
}

/// Projects scored listings into output records
#[derive(Debug, Clone, Default)]
pub struct RecordFormatter {
    /// Workaway detail URLs of hosts that accept couples
    couple_friendly: HashSet<String>,
}

impl RecordFormatter {
    pub fn new(couple_friendly: HashSet<String>) -> Self {
        Self { couple_friendly }
    }

    pub fn format_all(&self, listings: &[ScoredListing]) -> Vec<ListingRecord> {
        listings.iter().map(|l| self.format(l)).collect()
    }

    pub fn format(&self, scored: &ScoredListing) -> ListingRecord {
        let listing = &scored.listing;
        let mut top = scored.resorts.iter().take(3).map(format_resort);

        ListingRecord {
            url: listing_url(listing),
            name: listing.display().map(str::to_string),
            latitude: listing.latitude,
            longitude: listing.longitude,
            visitors: self.visitors(listing),
            city: or_unknown(listing.city.as_deref()),
            region: or_unknown(listing.region_name.as_deref()),
            internet: internet(listing),
            num_reviews: value_or_unknown(&listing.reviews_received),
            average_rating: value_or_unknown(&listing.average_rating),
            total_score: scored.final_score,
            best_score: scored.best_score,
            rest_score: scored.rest_score,
            num_resorts: scored.resorts.len(),
            resort_one: top.next(),
            resort_two: top.next(),
            resort_three: top.next(),
        }
    }

    /// Estimated visitor count
    ///
    /// WWOOF and HelpX publish it; Workaway hosts count as two when they appear
    /// in the couple-friendly feed.
    fn visitors(&self, listing: &Listing) -> String {
        if let Some(max) = present(listing.host_max_wwoofers.as_deref()) {
            return max.to_string();
        }
        if let Some(accommodation) = present(listing.listing_accommodation.as_deref()) {
            return accommodation.to_string();
        }
        match present(listing.details_url.as_deref()) {
            Some(url) if self.couple_friendly.contains(url) => "2".to_string(),
            _ => UNKNOWN.to_string(),
        }
    }
}

/// Canonical listing URL, by platform precedence: HelpX, Workaway, WWOOF
pub fn listing_url(listing: &Listing) -> String {
    if let Some(friendly) = present(listing.friendly_url.as_deref()) {
        format!("https://helpx.net/host/{}", friendly)
    } else if let Some(details) = present(listing.details_url.as_deref()) {
        format!("https://workaway.info{}", details)
    } else if let Some(uid) = present(listing.uid.as_deref()) {
        format!("https://wwoof.ca/user/{}", uid)
    } else {
        UNKNOWN.to_string()
    }
}

fn internet(listing: &Listing) -> Value {
    let wwoof_online = listing.host_internet_access.as_deref() == Some("1");
    let workaway = listing.details_url.is_some();
    if wwoof_online || workaway {
        Value::Bool(true)
    } else {
        Value::from(UNKNOWN)
    }
}

fn format_resort(resort: &ScoredResort) -> ResortRecord {
    ResortRecord {
        name: resort.name.clone(),
        drive_duration_text: resort.drive_duration_text.clone(),
        drive_distance_km: resort.drive_distance_m / 1000.0,
        drive_duration_min: resort.drive_duration_secs / 60.0,
        drive_score: resort.drive_time_score,
        desirability_score: resort.desirability_score,
        price_score: resort.price_score,
        total_score: resort.composite_score,
    }
}

fn or_unknown(value: Option<&str>) -> String {
    present(value).unwrap_or(UNKNOWN).to_string()
}

fn value_or_unknown(value: &Option<Value>) -> Value {
    match value {
        Some(Value::Null) | None => Value::from(UNKNOWN),
        Some(Value::String(s)) if s.is_empty() => Value::from(UNKNOWN),
        Some(v) => v.clone(),
    }
}
