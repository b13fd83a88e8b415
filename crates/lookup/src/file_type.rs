use document::access::object_id;
use document::fields::{FILETYPE, FILETYPE_TYPE_AHEAD, ID};
use document::Document;
use tracing::debug;

use crate::backend::ReferenceStore;
use crate::error::{LookupError, LookupFailure, LookupKind};
use crate::type_ahead::type_ahead;
use crate::Fragment;

/// Resolve the asset's file type and its category.
///
/// Produces
/// `filetype: { id, extension, category: <category name> }` and
/// `filetype_type_ahead: "<id>|<extension>|<category name>"`.
/// A missing file type or category fails the whole join.
pub async fn file_type_fragment(
    store: &dyn ReferenceStore,
    asset_id: &str,
    doc: &Document,
) -> Result<Fragment, LookupError> {
    let file_type_id = object_id(doc, FILETYPE).map_err(|source| LookupError::Shape {
        asset_id: asset_id.to_string(),
        kind: LookupKind::FileType,
        source,
    })?;
    let file_type_hex = file_type_id.to_hex();

    let file_type_failure = |reason: LookupFailure| LookupError::FileType {
        asset_id: asset_id.to_string(),
        file_type_id: file_type_hex.clone(),
        reason,
    };
    let file_type = store
        .file_type(file_type_id)
        .await
        .map_err(|e| file_type_failure(e.into()))?
        .ok_or_else(|| file_type_failure(LookupFailure::NotFound))?;

    let category_failure = |reason: LookupFailure| LookupError::Category {
        asset_id: asset_id.to_string(),
        file_type_id: file_type_hex.clone(),
        category_id: file_type.category.to_hex(),
        reason,
    };
    let category = store
        .category(file_type.category)
        .await
        .map_err(|e| category_failure(e.into()))?
        .ok_or_else(|| category_failure(LookupFailure::NotFound))?;

    debug!(
        asset_id,
        file_type_id = %file_type_hex,
        category = %category.name,
        "resolved filetype"
    );

    let suggestion = type_ahead(&[&file_type_hex, &file_type.extension, &category.name]);

    let mut resolved = Document::new();
    resolved.insert(ID, file_type_hex);
    resolved.insert("extension", file_type.extension);
    resolved.insert("category", category.name);

    let mut fragment = Fragment::new();
    fragment.insert(FILETYPE, resolved);
    fragment.insert(FILETYPE_TYPE_AHEAD, suggestion);
    Ok(fragment)
}
