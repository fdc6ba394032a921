use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::core::desirability::{DesirabilityError, DesirabilityTable};
use crate::models::{Listing, ListingRecord, Resort};

/// Errors reading the input snapshot or writing the output document
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Resort catalog lists {0} more than once")]
    DuplicateResort(String),

    #[error("Invalid desirability table: {0}")]
    Desirability(#[from] DesirabilityError),
}

/// Read and parse one JSON file
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, SnapshotError> {
    let file = File::open(path).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_reader(BufReader::new(file)).map_err(|source| SnapshotError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the resort catalog, rejecting duplicate names
pub fn load_resorts(path: &Path) -> Result<Vec<Resort>, SnapshotError> {
    let resorts: Vec<Resort> = read_json(path)?;

    let mut names = HashSet::new();
    for resort in &resorts {
        if !names.insert(resort.name.as_str()) {
            return Err(SnapshotError::DuplicateResort(resort.name.clone()));
        }
    }

    tracing::info!("Resorts: {}", resorts.len());
    Ok(resorts)
}

/// Load the name-to-score desirability table
pub fn load_desirability(path: &Path) -> Result<DesirabilityTable, SnapshotError> {
    let scores: HashMap<String, f64> = read_json(path)?;
    Ok(DesirabilityTable::new(scores)?)
}

/// Load every listing feed and concatenate them in the given order
pub fn load_listings<P: AsRef<Path>>(feeds: &[P]) -> Result<Vec<Listing>, SnapshotError> {
    let mut listings = Vec::new();

    for feed in feeds {
        let batch: Vec<Listing> = read_json(feed.as_ref())?;
        tracing::debug!("Loaded {} listings from {}", batch.len(), feed.as_ref().display());
        listings.extend(batch);
    }

    tracing::info!("Raw listings: {}", listings.len());
    Ok(listings)
}

/// Workaway detail URLs from the couple-friendly feed
pub fn load_couple_friendly(path: &Path) -> Result<HashSet<String>, SnapshotError> {
    let listings: Vec<Listing> = read_json(path)?;
    Ok(listings.into_iter().filter_map(|l| l.details_url).collect())
}

/// Write pretty-printed JSON to `path`
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), SnapshotError> {
    let file = File::create(path).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value).map_err(|source| SnapshotError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    writer.flush().map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Write the ranked records to `<dir>/sorted-<unix millis>.json`
pub fn write_output(dir: &Path, records: &[ListingRecord]) -> Result<PathBuf, SnapshotError> {
    std::fs::create_dir_all(dir).map_err(|source| SnapshotError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let path = dir.join(format!("sorted-{}.json", chrono::Utc::now().timestamp_millis()));
    write_json(&path, records)?;

    tracing::info!("Saved {} listings to {}", records.len(), path.display());
    Ok(path)
}
