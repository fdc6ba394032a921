use crate::models::{CandidateListing, DrivingResult, RoutedListing, RoutedResort};
use crate::services::distance_matrix::DistanceMatrixProvider;
use crate::services::rate_limit::{Clock, RateLimiter, TokioClock};

/// Routes listings to their candidate resorts under the API rate limit
///
/// One batched request per listing, dispatched one at a time and no sooner
/// than the limiter's minimum interval after the previous one. Failures are
/// reported per pairing and never abort the run.
pub struct RoutingClient<P, C: Clock = TokioClock> {
    provider: P,
    limiter: RateLimiter<C>,
}

impl<P: DistanceMatrixProvider, C: Clock> RoutingClient<P, C> {
    pub fn new(provider: P, limiter: RateLimiter<C>) -> Self {
        Self { provider, limiter }
    }

    /// Driving results for every candidate resort, in candidate order
    ///
    /// Suspends until this call's turn in the rate schedule arrives. When the
    /// external call fails, every pairing carries a `REQUEST_FAILED` status.
    pub async fn route_listing(&self, listing: &CandidateListing) -> Vec<DrivingResult> {
        let destinations = listing.destinations();
        let permit = self.limiter.acquire().await;

        tracing::info!("Distance matrix API called {} times", permit.call);

        let result = self
            .provider
            .driving_matrix(listing.listing.coordinates(), &destinations)
            .await;
        drop(permit);

        match result {
            Ok(results) if results.len() == destinations.len() => results,
            Ok(results) => {
                tracing::warn!(
                    "Routing returned {} results for {} resorts, marking listing as failed",
                    results.len(),
                    destinations.len()
                );
                vec![DrivingResult::failed(); destinations.len()]
            }
            Err(e) => {
                tracing::warn!(
                    "Routing failed for listing at ({}, {}): {}",
                    listing.listing.latitude,
                    listing.listing.longitude,
                    e
                );
                vec![DrivingResult::failed(); destinations.len()]
            }
        }
    }

    /// Route a listing and attach each result to its candidate resort
    pub async fn route(&self, listing: CandidateListing) -> RoutedListing {
        let results = self.route_listing(&listing).await;

        RoutedListing {
            resorts: listing
                .resorts
                .into_iter()
                .zip(results)
                .map(|(candidate, driving)| RoutedResort { candidate, driving })
                .collect(),
            listing: listing.listing,
        }
    }

    /// Number of external calls dispatched so far
    pub fn calls(&self) -> u64 {
        self.limiter.calls()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CandidateResort, Coordinates, DrivingStatus, Listing, Resort, TextValue};
    use crate::services::distance_matrix::RoutingError;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::time::Instant;

    /// Records dispatch times and answers with fixed durations
    #[derive(Default)]
    struct RecordingProvider {
        dispatched: Mutex<Vec<Instant>>,
        fail: bool,
    }

    impl DistanceMatrixProvider for RecordingProvider {
        async fn driving_matrix(
            &self,
            _origin: Coordinates,
            destinations: &[Coordinates],
        ) -> Result<Vec<DrivingResult>, RoutingError> {
            self.dispatched.lock().unwrap().push(Instant::now());
            tokio::time::sleep(Duration::from_millis(500)).await;

            if self.fail {
                return Err(RoutingError::ApiError("OVER_QUERY_LIMIT".to_string()));
            }

            Ok(destinations
                .iter()
                .enumerate()
                .map(|(i, _)| DrivingResult {
                    status: DrivingStatus::Ok,
                    duration: Some(TextValue { text: format!("{} mins", i), value: i as f64 * 60.0 }),
                    distance: Some(TextValue { text: format!("{} km", i), value: i as f64 * 1000.0 }),
                })
                .collect())
        }
    }

    fn candidate_listing(resorts: usize) -> CandidateListing {
        CandidateListing {
            listing: Listing {
                uid: Some("1".to_string()),
                latitude: 50.0,
                longitude: -122.0,
                ..Default::default()
            },
            resorts: (0..resorts)
                .map(|i| CandidateResort {
                    resort: Resort {
                        name: format!("resort {}", i),
                        latitude: 50.1,
                        longitude: -122.1,
                        season_pass: Some(1000.0),
                    },
                    distance_m: 10_000.0,
                })
                .collect(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_results_in_candidate_order() {
        let client = RoutingClient::new(
            RecordingProvider::default(),
            RateLimiter::new(Duration::from_secs(3)),
        );

        let routed = client.route(candidate_listing(3)).await;

        let names: Vec<_> = routed.resorts.iter().map(|r| r.candidate.resort.name.as_str()).collect();
        assert_eq!(names, vec!["resort 0", "resort 1", "resort 2"]);
        assert_eq!(routed.resorts[2].driving.duration.as_ref().unwrap().value, 120.0);
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispatches_spaced_by_interval() {
        let client = RoutingClient::new(
            RecordingProvider::default(),
            RateLimiter::new(Duration::from_secs(3)),
        );

        for _ in 0..4 {
            client.route_listing(&candidate_listing(2)).await;
        }

        let dispatched = client.provider.dispatched.lock().unwrap().clone();
        assert_eq!(dispatched.len(), 4);
        for pair in dispatched.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_secs(3));
        }
        assert_eq!(client.calls(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_callers_stay_sequential() {
        let client = RoutingClient::new(
            RecordingProvider::default(),
            RateLimiter::new(Duration::from_millis(100)),
        );
        let a = candidate_listing(1);
        let b = candidate_listing(1);

        tokio::join!(client.route_listing(&a), client.route_listing(&b));

        let dispatched = client.provider.dispatched.lock().unwrap().clone();
        // The second dispatch waits for the first 500ms call to finish
        assert!(dispatched[1] - dispatched[0] >= Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_becomes_error_status() {
        let client = RoutingClient::new(
            RecordingProvider { fail: true, ..Default::default() },
            RateLimiter::new(Duration::from_secs(3)),
        );

        let results = client.route_listing(&candidate_listing(2)).await;

        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.status == DrivingStatus::RequestFailed));
        assert_eq!(client.calls(), 1);
    }
}
