use bson::Document;
use tracing::trace;

use crate::fields::is_asset_field;

/// Drop every field not in [`crate::ASSET_FIELDS`].
///
/// Key order of the surviving fields is preserved.
pub fn project(doc: &mut Document) {
    let dropped: Vec<String> = doc
        .keys()
        .filter(|key| !is_asset_field(key))
        .cloned()
        .collect();

    for key in &dropped {
        doc.remove(key);
    }

    if !dropped.is_empty() {
        trace!(dropped = ?dropped, "projected asset document");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::ASSET_FIELDS;
    use bson::{doc, oid::ObjectId};

    #[test]
    fn removes_unlisted_fields() {
        let mut d = doc! {
            "_id": ObjectId::new(),
            "org": ObjectId::new(),
            "filename": "report.pdf",
            "last_accessed": "yesterday",
            "internal": { "flag": true },
        };
        project(&mut d);

        assert!(d.contains_key("filename"));
        assert!(!d.contains_key("last_accessed"));
        assert!(!d.contains_key("internal"));
        assert!(d.keys().all(|k| ASSET_FIELDS.contains(&k.as_str())));
    }

    #[test]
    fn keeps_every_listed_field() {
        let mut d = bson::Document::new();
        for field in ASSET_FIELDS {
            d.insert(field, "x");
        }
        project(&mut d);
        assert_eq!(d.len(), ASSET_FIELDS.len());
    }

    #[test]
    fn empty_document_stays_empty() {
        let mut d = doc! {};
        project(&mut d);
        assert!(d.is_empty());
    }
}
