use std::collections::HashSet;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::Settings;
use crate::core::{RecordFormatter, ResortScorer};
use crate::pipeline::{Pipeline, RunSummary};
use crate::services::{
    snapshot, GoogleDistanceMatrix, RateLimiter, RoutingClient, RoutingError, SnapshotError,
};

/// Errors that abort a batch run
#[derive(Debug, Error)]
pub enum JobError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Input error: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("Routing client error: {0}")]
    Routing(#[from] RoutingError),
}

/// Outcome of a completed run
#[derive(Debug)]
pub struct JobReport {
    pub output: PathBuf,
    pub summary: RunSummary,
}

/// Run the whole batch: load the snapshot, rank, write the output document
///
/// Nothing is written unless every stage succeeds.
pub async fn run(settings: &Settings) -> Result<JobReport, JobError> {
    let resorts = snapshot::load_resorts(&settings.input.resorts)?;
    let desirability = snapshot::load_desirability(&settings.input.desirability)?;
    if desirability.is_empty() {
        tracing::warn!("Desirability table is empty, every resort scores 0 on desirability");
    } else {
        tracing::info!("Desirability scores: {}", desirability.len());
    }

    let unrated = desirability.unrated(&resorts);
    if !unrated.is_empty() {
        tracing::warn!("No desirability score for {} resorts, scoring them 0: {:?}", unrated.len(), unrated);
    }

    let listings = snapshot::load_listings(&settings.input.listings)?;
    let couple_friendly = match &settings.input.couple_feed {
        Some(path) => snapshot::load_couple_friendly(path)?,
        None => HashSet::new(),
    };

    let provider = GoogleDistanceMatrix::new(
        settings.routing.endpoint.clone(),
        settings.routing.api_key.clone(),
        settings.routing.timeout(),
    )?;
    let router = RoutingClient::new(provider, RateLimiter::new(settings.routing.min_interval()));

    let scorer = ResortScorer::new(
        settings.scoring.weights.into(),
        settings.scoring.bounds(),
        desirability,
    );
    let pipeline = Pipeline::new(scorer, settings.scoring.candidate_radius_km);

    let result = pipeline.run(listings, &resorts, &router).await;

    let records = RecordFormatter::new(couple_friendly).format_all(&result.listings);
    let output = snapshot::write_output(&settings.output.dir, &records)?;

    Ok(JobReport {
        output,
        summary: result.summary,
    })
}
