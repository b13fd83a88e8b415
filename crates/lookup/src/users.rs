use document::access::string_list;
use document::fields::{USERS, USERS_TYPE_AHEAD};
use document::{bson::doc, Document};
use tracing::debug;

use crate::backend::ReferenceStore;
use crate::error::{LookupError, LookupKind};
use crate::type_ahead::type_ahead;
use crate::Fragment;

/// Resolve the asset's user emails into `{email, name}` objects.
///
/// Produces `users: [{email, name}, ..]` and a parallel
/// `users_type_ahead: ["name|email", ..]`. Every referenced user must exist;
/// a short result fails the join.
pub async fn user_fragment(
    store: &dyn ReferenceStore,
    asset_id: &str,
    doc: &Document,
) -> Result<Fragment, LookupError> {
    let emails = string_list(doc, USERS).map_err(|source| LookupError::Shape {
        asset_id: asset_id.to_string(),
        kind: LookupKind::Users,
        source,
    })?;

    let users = if emails.is_empty() {
        Vec::new()
    } else {
        store
            .users(&emails)
            .await
            .map_err(|source| LookupError::Users {
                asset_id: asset_id.to_string(),
                source,
            })?
    };

    if users.len() < emails.len() {
        return Err(LookupError::MissingUsers {
            asset_id: asset_id.to_string(),
            requested: emails.len(),
            retrieved: users.len(),
            retrieved_ids: users.iter().map(|user| user.email.clone()).collect(),
        });
    }
    debug!(asset_id, retrieved = users.len(), "resolved users");

    let mut resolved = Vec::with_capacity(users.len());
    let mut suggestions = Vec::with_capacity(users.len());
    for user in users {
        suggestions.push(type_ahead(&[&user.name, &user.email]));
        resolved.push(doc! { "email": user.email, "name": user.name });
    }

    let mut fragment = Fragment::new();
    fragment.insert(USERS, resolved);
    fragment.insert(USERS_TYPE_AHEAD, suggestions);
    Ok(fragment)
}
