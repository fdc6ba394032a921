use crate::core::distance::great_circle_distance;
use crate::models::{CandidateListing, CandidateResort, Listing, Resort};

/// Default radius for candidate resorts
pub const DEFAULT_CANDIDATE_RADIUS_KM: f64 = 150.0;

/// Resorts strictly closer than `radius_km` to `listing`, in catalog order
pub fn candidate_resorts(listing: &Listing, resorts: &[Resort], radius_km: f64) -> Vec<CandidateResort> {
    if !listing.has_coordinates() {
        tracing::debug!("Listing {:?} has no usable coordinates", listing.display());
        return Vec::new();
    }

    let origin = listing.coordinates();
    let cutoff_m = radius_km * 1000.0;

    resorts
        .iter()
        .filter_map(|resort| {
            let distance_m = great_circle_distance(origin, resort.coordinates());
            (distance_m < cutoff_m).then(|| CandidateResort {
                resort: resort.clone(),
                distance_m,
            })
        })
        .collect()
}

/// Pair every listing with its candidate resorts
///
/// Listings left without any candidate are dropped, not scored as zero.
pub fn select_candidates(
    listings: Vec<Listing>,
    resorts: &[Resort],
    radius_km: f64,
) -> Vec<CandidateListing> {
    listings
        .into_iter()
        .filter_map(|listing| {
            let candidates = candidate_resorts(&listing, resorts, radius_km);
            if candidates.is_empty() {
                None
            } else {
                Some(CandidateListing {
                    listing,
                    resorts: candidates,
                })
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Kilometers per degree of latitude under the law-of-cosines conversion
    const KM_PER_DEGREE: f64 = 60.0 * 1.1515 * 1.609344;

    fn listing_at(lat: f64, lon: f64) -> Listing {
        Listing {
            uid: Some("1".to_string()),
            latitude: lat,
            longitude: lon,
            ..Default::default()
        }
    }

    fn resort_north_of(name: &str, origin_lat: f64, km: f64) -> Resort {
        Resort {
            name: name.to_string(),
            latitude: origin_lat + km / KM_PER_DEGREE,
            longitude: -120.0,
            season_pass: Some(1000.0),
        }
    }

    #[test]
    fn test_cutoff_keeps_close_resorts() {
        let listing = listing_at(45.0, -120.0);
        let resorts = vec![
            resort_north_of("ten", 45.0, 10.0),
            resort_north_of("two hundred", 45.0, 200.0),
            resort_north_of("fifty", 45.0, 50.0),
        ];

        let candidates = candidate_resorts(&listing, &resorts, DEFAULT_CANDIDATE_RADIUS_KM);

        let names: Vec<_> = candidates.iter().map(|c| c.resort.name.as_str()).collect();
        assert_eq!(names, vec!["ten", "fifty"]);
        assert!((candidates[0].distance_m - 10_000.0).abs() < 1.0);
        assert!((candidates[1].distance_m - 50_000.0).abs() < 1.0);
    }

    #[test]
    fn test_listing_without_candidates_dropped() {
        let resorts = vec![resort_north_of("near", 45.0, 20.0)];
        let listings = vec![listing_at(45.0, -120.0), listing_at(10.0, 10.0)];

        let selected = select_candidates(listings, &resorts, DEFAULT_CANDIDATE_RADIUS_KM);

        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].listing.latitude, 45.0);
        assert_eq!(selected[0].resorts.len(), 1);
    }

    #[test]
    fn test_listing_without_coordinates_dropped() {
        let resorts = vec![resort_north_of("near", 45.0, 20.0)];
        let listings: Vec<Listing> = serde_json::from_str(
            r#"[
                {"uid": "1", "latitude": 45.0, "longitude": -120.0},
                {"uid": "2", "latitude": null, "longitude": null},
                {"uid": "3", "latitude": 45.0}
            ]"#,
        )
        .unwrap();

        let selected = select_candidates(listings, &resorts, DEFAULT_CANDIDATE_RADIUS_KM);

        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].listing.uid.as_deref(), Some("1"));
    }
}
