//! Concurrent enrichment of asset documents.
//!
//! [`Enricher::enrich`] runs the filetype, tag and user joins at the same time
//! against one asset and always waits for all three. The result is an
//! [`Enrichment`]: the fragments that succeeded plus every error that
//! occurred. [`Enrichment::merge_into`] then applies it all-or-nothing. If
//! any join failed, the document is left untouched and a single
//! [`EnrichmentFailed`] names every cause.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use document::bson::doc;
//! use enrich::Enricher;
//! use lookup::InMemoryReferenceStore;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let enricher = Enricher::new(Arc::new(InMemoryReferenceStore::new()));
//! let mut asset = doc! { "id": "a1" };
//!
//! // No filetype reference, so the filetype join fails and nothing is merged.
//! let result = enricher.enrich("a1", &asset).await.merge_into(&mut asset, "a1");
//! assert!(result.is_err());
//! assert!(!asset.contains_key("tags"));
//! # }
//! ```

mod error;

use std::sync::Arc;
use std::time::Instant;

use document::Document;
use lookup::{
    file_type_fragment, tag_fragment, user_fragment, Fragment, LookupError, LookupObserver,
    ReferenceStore, TracingObserver,
};
use tracing::{debug, warn};

pub use crate::error::{EnrichmentFailed, CAUSE_SEPARATOR};

/// Runs the three reference joins for one asset at a time.
///
/// Cheap to clone; the store and observer are shared.
#[derive(Clone)]
pub struct Enricher {
    store: Arc<dyn ReferenceStore>,
    observer: Arc<dyn LookupObserver>,
}

impl Enricher {
    /// Enricher that reports soft conditions through `tracing`.
    pub fn new(store: Arc<dyn ReferenceStore>) -> Self {
        Self::with_observer(store, Arc::new(TracingObserver))
    }

    pub fn with_observer(store: Arc<dyn ReferenceStore>, observer: Arc<dyn LookupObserver>) -> Self {
        Self { store, observer }
    }

    /// Run all joins concurrently and collect every outcome.
    ///
    /// Never short-circuits: a failing join does not cancel the others.
    pub async fn enrich(&self, asset_id: &str, doc: &Document) -> Enrichment {
        let started = Instant::now();
        let store = self.store.as_ref();

        let (file_type, tags, users) = tokio::join!(
            file_type_fragment(store, asset_id, doc),
            tag_fragment(store, self.observer.as_ref(), asset_id, doc),
            user_fragment(store, asset_id, doc),
        );

        let mut enrichment = Enrichment::default();
        for outcome in [file_type, tags, users] {
            match outcome {
                Ok(fragment) => enrichment.fragments.push(fragment),
                Err(err) => enrichment.errors.push(err),
            }
        }

        debug!(
            asset_id,
            fragments = enrichment.fragments.len(),
            errors = enrichment.errors.len(),
            elapsed_micros = started.elapsed().as_micros() as u64,
            "enrichment_complete"
        );
        enrichment
    }
}

/// Outcome of one [`Enricher::enrich`] call.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Enrichment {
    pub fragments: Vec<Fragment>,
    pub errors: Vec<LookupError>,
}

impl Enrichment {
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }

    /// Copy every fragment's fields into `doc`, or nothing at all.
    ///
    /// Fragment fields overwrite same-named document fields.
    pub fn merge_into(self, doc: &mut Document, asset_id: &str) -> Result<(), EnrichmentFailed> {
        if !self.errors.is_empty() {
            warn!(
                asset_id,
                errors = self.errors.len(),
                discarded_fragments = self.fragments.len(),
                "enrichment_failed"
            );
            return Err(EnrichmentFailed {
                asset_id: asset_id.to_string(),
                causes: self.errors,
            });
        }

        for fragment in self.fragments {
            for (key, value) in fragment {
                doc.insert(key, value);
            }
        }
        Ok(())
    }
}
