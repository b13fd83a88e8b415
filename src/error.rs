//! Errors surfaced by one sync invocation.

use document::bson::spec::ElementType;
use document::{Document, DocumentError};
use enrich::EnrichmentFailed;
use thiserror::Error;

/// Why an event could not be turned into a search document.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum SyncError {
    /// The asset id could not be read. Nothing else ran.
    #[error("invalid asset document: {0}")]
    InvalidDocument(#[from] DocumentError),

    /// The asset id was read but its organization could not be. Nothing
    /// else ran.
    #[error("syncing asset with ID {asset_id} failed: no routing key: {source}")]
    InvalidRouting {
        asset_id: String,
        #[source]
        source: DocumentError,
    },

    /// At least one reference join failed. The document is returned as
    /// projected and transformed, without any enrichment.
    #[error("{failure}")]
    Enrichment {
        failure: EnrichmentFailed,
        routing: String,
        document: Document,
    },

    /// Processing panicked.
    #[error("syncing asset with ID {asset_id} failed with an unknown error: {message}")]
    Fault { asset_id: String, message: String },
}

impl SyncError {
    /// The asset this error is about, when it could be read.
    pub fn asset_id(&self) -> Option<&str> {
        match self {
            SyncError::InvalidDocument(_) => None,
            SyncError::InvalidRouting { asset_id, .. } => Some(asset_id),
            SyncError::Enrichment { failure, .. } => Some(&failure.asset_id),
            SyncError::Fault { asset_id, .. } => Some(asset_id),
        }
    }

    /// Routing key of the asset, when it was derived before the failure.
    pub fn routing(&self) -> Option<&str> {
        match self {
            SyncError::Enrichment { routing, .. } => Some(routing),
            SyncError::InvalidDocument(_)
            | SyncError::InvalidRouting { .. }
            | SyncError::Fault { .. } => None,
        }
    }
}

/// A change-event line that could not be decoded.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EventError {
    #[error("malformed event JSON: {0}")]
    Json(String),
    #[error("malformed extended JSON in document: {0}")]
    ExtendedJson(String),
    #[error("event document must be an object, found {0:?}")]
    NotADocument(ElementType),
}
