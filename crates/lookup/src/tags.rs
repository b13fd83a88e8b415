use document::access::object_id_list;
use document::fields::TAGS;
use document::Document;
use tracing::debug;

use crate::backend::ReferenceStore;
use crate::error::{LookupError, LookupKind};
use crate::observer::LookupObserver;
use crate::Fragment;

/// Resolve the asset's tag ids into lower-cased tag names.
///
/// Tags can be renamed or deleted after an asset references them, so a short
/// result is reported to `observer` and the names that were found are kept.
/// Only a failed query or a malformed `tags` field is an error.
pub async fn tag_fragment(
    store: &dyn ReferenceStore,
    observer: &dyn LookupObserver,
    asset_id: &str,
    doc: &Document,
) -> Result<Fragment, LookupError> {
    let ids = object_id_list(doc, TAGS).map_err(|source| LookupError::Shape {
        asset_id: asset_id.to_string(),
        kind: LookupKind::Tags,
        source,
    })?;

    let mut fragment = Fragment::new();
    if ids.is_empty() {
        fragment.insert(TAGS, Vec::<String>::new());
        return Ok(fragment);
    }

    let tags = store
        .tags(&ids)
        .await
        .map_err(|source| LookupError::Tags {
            asset_id: asset_id.to_string(),
            source,
        })?;

    if tags.len() < ids.len() {
        let retrieved_ids: Vec<String> = tags.iter().map(|tag| tag.id.to_hex()).collect();
        observer.partial_tags(asset_id, ids.len(), &retrieved_ids);
    }
    debug!(asset_id, requested = ids.len(), retrieved = tags.len(), "resolved tags");

    let names: Vec<String> = tags.into_iter().map(|tag| tag.name.to_lowercase()).collect();
    fragment.insert(TAGS, names);
    Ok(fragment)
}
