use bson::{Bson, Document};

use crate::access::string_form;
use crate::fields;

/// Rewrite store-native identifiers into plain strings.
///
/// - `_id` is renamed to `id` in string form
/// - `org` is replaced by its string form
/// - `remote.source`, when present, is lifted to `remote_source` and `remote`
///   is dropped; a `remote` without `source` is left alone
pub fn transform(doc: &mut Document) {
    if let Some(native) = doc.remove(fields::NATIVE_ID) {
        doc.insert(fields::ID, string_form(&native));
    }

    if let Some(org) = doc.get(fields::ORG).map(string_form) {
        doc.insert(fields::ORG, org);
    }

    let source = match doc.get(fields::REMOTE) {
        Some(Bson::Document(remote)) => remote.get(fields::SOURCE).map(string_form),
        _ => None,
    };
    if let Some(source) = source {
        doc.insert(fields::REMOTE_SOURCE, source);
        doc.remove(fields::REMOTE);
    }
}
