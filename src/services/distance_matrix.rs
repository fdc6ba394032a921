use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::models::{Coordinates, DrivingResult};

/// Default endpoint of the Google Maps web services
pub const DEFAULT_ENDPOINT: &str = "https://maps.googleapis.com";

/// Errors that can occur when requesting a driving matrix
#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Source of driving durations and distances from one origin to many destinations
pub trait DistanceMatrixProvider: Send + Sync {
    /// One result per destination, in destination order
    fn driving_matrix(
        &self,
        origin: Coordinates,
        destinations: &[Coordinates],
    ) -> impl Future<Output = Result<Vec<DrivingResult>, RoutingError>> + Send;
}

/// Distance Matrix API response
///
/// Top-level `status` is `OK` when the request itself was accepted; each
/// element carries its own status.
#[derive(Debug, Deserialize)]
struct MatrixResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    rows: Vec<MatrixRow>,
}

#[derive(Debug, Deserialize)]
struct MatrixRow {
    elements: Vec<DrivingResult>,
}

/// Google Distance Matrix API client
pub struct GoogleDistanceMatrix {
    base_url: String,
    api_key: String,
    client: Client,
}

impl GoogleDistanceMatrix {
    /// Create a new client with the given request timeout
    pub fn new(base_url: String, api_key: String, timeout: Duration) -> Result<Self, RoutingError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            api_key,
            client,
        })
    }

    fn url(&self) -> String {
        format!(
            "{}/maps/api/distancematrix/json",
            self.base_url.trim_end_matches('/')
        )
    }
}

fn format_point(point: &Coordinates) -> String {
    format!("{},{}", point.latitude, point.longitude)
}

impl DistanceMatrixProvider for GoogleDistanceMatrix {
    async fn driving_matrix(
        &self,
        origin: Coordinates,
        destinations: &[Coordinates],
    ) -> Result<Vec<DrivingResult>, RoutingError> {
        let origins = format_point(&origin);
        let destinations_param = destinations
            .iter()
            .map(format_point)
            .collect::<Vec<_>>()
            .join("|");

        tracing::debug!(
            "Requesting driving matrix from {} to {} destinations",
            origins,
            destinations.len()
        );

        let response = self
            .client
            .get(self.url())
            .query(&[
                ("origins", origins.as_str()),
                ("destinations", destinations_param.as_str()),
                ("mode", "driving"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RoutingError::ApiError(format!(
                "Distance matrix request failed: {}",
                response.status()
            )));
        }

        let body: MatrixResponse = response.json().await?;

        if body.status != "OK" {
            return Err(RoutingError::ApiError(match body.error_message {
                Some(message) => format!("{}: {}", body.status, message),
                None => body.status,
            }));
        }

        let row = body
            .rows
            .into_iter()
            .next()
            .ok_or_else(|| RoutingError::InvalidResponse("Missing rows".into()))?;

        if row.elements.len() != destinations.len() {
            return Err(RoutingError::InvalidResponse(format!(
                "Expected {} elements, got {}",
                destinations.len(),
                row.elements.len()
            )));
        }

        Ok(row.elements)
    }
}
