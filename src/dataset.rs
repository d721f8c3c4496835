use crate::station::{RawFeatureCollection, Station, normalize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid station dataset: {0}")]
    Json(#[from] serde_json::Error),
    #[error("station dataset has no features")]
    Empty,
}

pub fn parse_feature_collection(input: &str) -> Result<RawFeatureCollection, DatasetError> {
    let collection: RawFeatureCollection = serde_json::from_str(input)?;
    if collection.features.is_empty() {
        return Err(DatasetError::Empty);
    }
    Ok(collection)
}

pub fn parse_stations(input: &str) -> Result<Vec<Station>, DatasetError> {
    let collection = parse_feature_collection(input)?;
    let stations = normalize(&collection);
    tracing::debug!(features = stations.len(), "stations loaded");
    Ok(stations)
}

pub fn load_stations(path: &Path) -> Result<Vec<Station>, DatasetError> {
    let input = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_stations(&input)
}
