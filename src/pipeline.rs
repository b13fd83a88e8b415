//! Per-event orchestration.
//!
//! For one change event:
//!
//! 1. decide whether the event can affect the search document at all
//! 2. read the asset id and derive the routing key from `org`
//! 3. project to the asset allow-list, then rewrite identifiers
//! 4. run the reference joins concurrently
//! 5. merge their fragments all-or-nothing
//!
//! Steps 3 to 5 run inside a panic boundary so a fault in any of them is
//! reported as a failure for that asset instead of tearing down the host.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use document::{asset_id, project, routing_key, transform, Document};
use enrich::Enricher;
use futures::stream::{self, StreamExt};
use futures::FutureExt;
use lookup::{LookupObserver, ReferenceStore};
use tracing::{debug, info, info_span, warn, Instrument};

use crate::error::SyncError;
use crate::event::ChangeEvent;

/// What happened to one change event.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    /// Nothing search-relevant changed; no lookups were made.
    Skip,
    Indexed(IndexedAsset),
}

/// A search-ready document and the key it must be routed by.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedAsset {
    /// String form of the asset's organization.
    pub routing: String,
    pub document: Document,
}

/// Turns asset change events into search documents.
///
/// Holds no per-event state, so one instance can serve any number of
/// concurrent events.
#[derive(Clone)]
pub struct AssetSync {
    enricher: Enricher,
}

impl AssetSync {
    pub fn new(store: Arc<dyn ReferenceStore>) -> Self {
        Self::from_enricher(Enricher::new(store))
    }

    pub fn with_observer(store: Arc<dyn ReferenceStore>, observer: Arc<dyn LookupObserver>) -> Self {
        Self::from_enricher(Enricher::with_observer(store, observer))
    }

    pub fn from_enricher(enricher: Enricher) -> Self {
        Self { enricher }
    }

    /// Handle one change event.
    pub async fn handle(&self, event: ChangeEvent) -> Result<SyncOutcome, SyncError> {
        if !event.should_process() {
            debug!(
                updated_fields = ?event.updated_fields,
                "skipping event without search-relevant changes"
            );
            return Ok(SyncOutcome::Skip);
        }
        self.process(event.document).await.map(SyncOutcome::Indexed)
    }

    /// Handle many events, at most `concurrency` at a time.
    ///
    /// Results come back in input order.
    pub async fn handle_all<I>(
        &self,
        events: I,
        concurrency: usize,
    ) -> Vec<Result<SyncOutcome, SyncError>>
    where
        I: IntoIterator<Item = ChangeEvent>,
    {
        stream::iter(events)
            .map(|event| self.handle(event))
            .buffered(concurrency.max(1))
            .collect()
            .await
    }

    /// Project, transform and enrich one asset snapshot unconditionally.
    pub async fn process(&self, doc: Document) -> Result<IndexedAsset, SyncError> {
        let asset_id = asset_id(&doc)?;
        let routing = routing_key(&doc).map_err(|source| SyncError::InvalidRouting {
            asset_id: asset_id.clone(),
            source,
        })?;
        let span = info_span!("asset_sync.process", asset_id = %asset_id, routing = %routing);

        let outcome = AssertUnwindSafe(self.process_document(asset_id.clone(), routing, doc))
            .catch_unwind()
            .instrument(span)
            .await;

        match outcome {
            Ok(result) => result,
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                warn!(asset_id = %asset_id, message = %message, "sync_fault");
                Err(SyncError::Fault { asset_id, message })
            }
        }
    }

    async fn process_document(
        &self,
        asset_id: String,
        routing: String,
        mut doc: Document,
    ) -> Result<IndexedAsset, SyncError> {
        let started = Instant::now();
        project(&mut doc);
        transform(&mut doc);

        let enrichment = self.enricher.enrich(&asset_id, &doc).await;
        match enrichment.merge_into(&mut doc, &asset_id) {
            Ok(()) => {
                info!(
                    asset_id = %asset_id,
                    fields = doc.len(),
                    elapsed_micros = started.elapsed().as_micros() as u64,
                    "sync_success"
                );
                Ok(IndexedAsset {
                    routing,
                    document: doc,
                })
            }
            Err(failure) => {
                warn!(
                    asset_id = %asset_id,
                    error = %failure,
                    elapsed_micros = started.elapsed().as_micros() as u64,
                    "sync_failure"
                );
                Err(SyncError::Enrichment {
                    failure,
                    routing,
                    document: doc,
                })
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
