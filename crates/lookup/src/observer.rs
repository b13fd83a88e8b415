use std::sync::Mutex;

use tracing::warn;

/// Receives soft conditions noticed by the joins.
///
/// Injected into the enricher rather than reached through a global so the
/// hosting process decides where warnings go.
pub trait LookupObserver: Send + Sync {
    /// Fewer tags came back than the asset references.
    fn partial_tags(&self, asset_id: &str, requested: usize, retrieved_ids: &[String]);
}

/// Emits observations as `tracing` warnings.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl LookupObserver for TracingObserver {
    fn partial_tags(&self, asset_id: &str, requested: usize, retrieved_ids: &[String]) {
        warn!(
            asset_id,
            requested,
            retrieved = retrieved_ids.len(),
            retrieved_ids = ?retrieved_ids,
            "partial_tag_retrieval"
        );
    }
}

/// One partial tag retrieval, as seen by [`RecordingObserver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialTags {
    pub asset_id: String,
    pub requested: usize,
    pub retrieved_ids: Vec<String>,
}

/// Keeps every observation in memory. Handy in tests and dry runs.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    partial_tags: Mutex<Vec<PartialTags>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Partial tag retrievals seen so far, oldest first.
    pub fn recorded(&self) -> Vec<PartialTags> {
        self.partial_tags
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl LookupObserver for RecordingObserver {
    fn partial_tags(&self, asset_id: &str, requested: usize, retrieved_ids: &[String]) {
        self.partial_tags
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(PartialTags {
                asset_id: asset_id.to_string(),
                requested,
                retrieved_ids: retrieved_ids.to_vec(),
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_observer_keeps_observations() {
        let observer = RecordingObserver::new();
        observer.partial_tags("a1", 3, &["t1".to_string()]);

        let seen = observer.recorded();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].asset_id, "a1");
        assert_eq!(seen[0].requested, 3);
        assert_eq!(seen[0].retrieved_ids, vec!["t1".to_string()]);
    }
}
