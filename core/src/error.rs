//! Error types for dataset loading and lookups.
//!
//! Nothing here is fatal: a malformed dataset is replaced by the built-in
//! sample, and a lookup miss turns the requested operation into a no-op.

use thiserror::Error;

use crate::entry::EntryId;

/// The dataset payload could not be used at all.
#[derive(Error, Debug)]
pub enum MalformedDatasetError {
    #[error("dataset is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("dataset must be an object with an `entries` array")]
    MissingEntries,

    #[error("dataset contains no entries")]
    Empty,

    #[error("none of the {0} entries in the dataset are well-formed")]
    NoValidEntries(usize),
}

/// A single entry was rejected while loading; the rest of the dataset survives.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EntryError {
    #[error("entry #{index} is not a well-formed record: {reason}")]
    Shape { index: usize, reason: String },

    #[error("entry #{index} has non-positive id {id}")]
    InvalidId { index: usize, id: i64 },

    #[error("entry {id} has unknown region {region:?}")]
    UnknownRegion { id: EntryId, region: String },

    #[error("entry {id} has out-of-range coordinate ({lat}, {lng})")]
    InvalidCoordinate { id: EntryId, lat: f64, lng: f64 },

    #[error("entry {0} duplicates an earlier id")]
    DuplicateId(EntryId),
}

/// A selection or lookup referenced something the dataset does not contain.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NotFoundWarning {
    #[error("no entry with id {0}")]
    Id(EntryId),

    #[error("no entry at ({lat}, {lng})")]
    Coordinate { lat: f64, lng: f64 },

    #[error("unknown region {0:?}")]
    Region(String),
}
