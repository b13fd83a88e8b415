//! Error types produced by reference-store queries and the enrichment joins.
//!
//! [`StoreError`] is what a backend returns; [`LookupError`] is what one join
//! reports for one asset. Lookup errors are cloneable so the enricher can
//! collect all of them and hand back a single aggregated failure.

use document::DocumentError;
use std::fmt;
use thiserror::Error;

/// Failures raised by a [`ReferenceStore`](crate::ReferenceStore) backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreError {
    /// The query could not be issued or the server rejected it.
    #[error("query failed: {0}")]
    Query(String),
    /// The query started but iterating its cursor failed.
    #[error("cursor iteration failed: {0}")]
    Cursor(String),
    /// A returned document did not decode into the expected record.
    #[error("decode failed: {0}")]
    Decode(String),
    /// Backend is misconfigured or unavailable.
    #[error("backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn backend<S: Into<String>>(msg: S) -> Self {
        StoreError::Backend(msg.into())
    }
}

/// Why a single-entity lookup produced nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupFailure {
    NotFound,
    Store(StoreError),
}

impl fmt::Display for LookupFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupFailure::NotFound => write!(f, "no matching document"),
            LookupFailure::Store(err) => write!(f, "{err}"),
        }
    }
}

impl From<StoreError> for LookupFailure {
    fn from(value: StoreError) -> Self {
        LookupFailure::Store(value)
    }
}

/// The three enrichment joins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupKind {
    FileType,
    Tags,
    Users,
}

impl LookupKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LookupKind::FileType => "filetype",
            LookupKind::Tags => "tags",
            LookupKind::Users => "users",
        }
    }
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A hard failure of one enrichment join for one asset.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LookupError {
    #[error("failed to look up filetype {file_type_id} for asset {asset_id}: {reason}")]
    FileType {
        asset_id: String,
        file_type_id: String,
        reason: LookupFailure,
    },

    #[error("failed to look up category {category_id} for filetype {file_type_id}: {reason}")]
    Category {
        asset_id: String,
        file_type_id: String,
        category_id: String,
        reason: LookupFailure,
    },

    #[error("failed to retrieve tags for asset {asset_id}: {source}")]
    Tags {
        asset_id: String,
        #[source]
        source: StoreError,
    },

    #[error("failed to retrieve users for asset {asset_id}: {source}")]
    Users {
        asset_id: String,
        #[source]
        source: StoreError,
    },

    #[error(
        "attempted to retrieve {requested} users for asset {asset_id} but only retrieved {retrieved} with IDs {retrieved_ids:?}"
    )]
    MissingUsers {
        asset_id: String,
        requested: usize,
        retrieved: usize,
        retrieved_ids: Vec<String>,
    },

    #[error("asset {asset_id} has an unusable {kind} reference: {source}")]
    Shape {
        asset_id: String,
        kind: LookupKind,
        #[source]
        source: DocumentError,
    },
}

impl LookupError {
    /// The join this error belongs to.
    pub fn kind(&self) -> LookupKind {
        match self {
            LookupError::FileType { .. } | LookupError::Category { .. } => LookupKind::FileType,
            LookupError::Tags { .. } => LookupKind::Tags,
            LookupError::Users { .. } | LookupError::MissingUsers { .. } => LookupKind::Users,
            LookupError::Shape { kind, .. } => *kind,
        }
    }

    pub fn asset_id(&self) -> &str {
        match self {
            LookupError::FileType { asset_id, .. }
            | LookupError::Category { asset_id, .. }
            | LookupError::Tags { asset_id, .. }
            | LookupError::Users { asset_id, .. }
            | LookupError::MissingUsers { asset_id, .. }
            | LookupError::Shape { asset_id, .. } => asset_id,
        }
    }
}
