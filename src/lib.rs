//! Workspace umbrella crate for asset search sync.
//!
//! Turns asset change events into self-contained search documents: events
//! that touch nothing search-relevant are skipped, the rest are projected,
//! have their identifiers rewritten, and are enriched with file type, tag
//! and user data joined from the reference store.
//!
//! ```
//! use std::sync::Arc;
//!
//! use asset_sync::{AssetSync, ChangeEvent, InMemoryReferenceStore, SyncOutcome};
//! use asset_sync::document::bson::{doc, oid::ObjectId};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let sync = AssetSync::new(Arc::new(InMemoryReferenceStore::new()));
//! let event = ChangeEvent::update(
//!     doc! { "_id": ObjectId::new(), "org": "org-1" },
//!     ["last_accessed"],
//! );
//!
//! assert_eq!(sync.handle(event).await.unwrap(), SyncOutcome::Skip);
//! # }
//! ```

pub mod config;
mod error;
pub mod event;
pub mod output;
mod pipeline;

pub use document;
pub use enrich;
pub use lookup;

pub use document::{project, transform, Document, DocumentError};
pub use enrich::{Enricher, Enrichment, EnrichmentFailed};
pub use lookup::{
    InMemoryReferenceStore, LookupError, LookupObserver, RecordingObserver, ReferenceStore,
    StoreConfig, StoreError, TracingObserver,
};

pub use crate::config::{ConfigLoadError, SyncConfig};
pub use crate::error::{EventError, SyncError};
pub use crate::event::{ChangeEvent, Operation};
pub use crate::output::OutputLine;
pub use crate::pipeline::{AssetSync, IndexedAsset, SyncOutcome};
