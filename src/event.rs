//! Change events as delivered by the change-stream mapper.
//!
//! Each event carries an operation code, a full snapshot of the asset and,
//! for updates, the names of the fields the update touched. The
//! [`ChangeEvent::should_process`] check decides whether any of those
//! changes can show up in the search document at all.

use std::collections::BTreeSet;

use document::bson::{Bson, Document};
use document::is_search_update_field;
use serde::Deserialize;

use crate::error::EventError;

/// Kind of change that produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Insert,
    /// Any non-insert code (update, replace and so on).
    Update,
}

impl Operation {
    /// Map a change-stream operation code. `i` is an insert; every other
    /// code is treated as update-like.
    pub fn from_code(code: &str) -> Self {
        match code {
            "i" => Operation::Insert,
            _ => Operation::Update,
        }
    }
}

/// One change event for one asset.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent {
    pub operation: Operation,
    pub document: Document,
    /// Fields changed by an update. `None` when unknown.
    pub updated_fields: Option<BTreeSet<String>>,
}

impl ChangeEvent {
    pub fn insert(document: Document) -> Self {
        Self {
            operation: Operation::Insert,
            document,
            updated_fields: None,
        }
    }

    pub fn update<I, S>(document: Document, updated_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            operation: Operation::Update,
            document,
            updated_fields: Some(updated_fields.into_iter().map(Into::into).collect()),
        }
    }

    /// An update whose changed fields were not reported.
    pub fn update_unknown(document: Document) -> Self {
        Self {
            operation: Operation::Update,
            document,
            updated_fields: None,
        }
    }

    /// Whether this event can change the search document.
    ///
    /// Inserts and updates with an unknown field set always proceed. An
    /// update proceeds only if it touched a search-relevant field, so an
    /// empty field set skips.
    pub fn should_process(&self) -> bool {
        if self.operation == Operation::Insert {
            return true;
        }
        match &self.updated_fields {
            None => true,
            Some(fields) => fields.iter().any(|f| is_search_update_field(f)),
        }
    }

    /// Parse one JSON line of the form
    /// `{"operation": "u", "document": {..}, "updated_fields": [..]}`.
    ///
    /// The document is read as MongoDB extended JSON, so `{"$oid": ".."}`
    /// becomes an object id.
    pub fn from_json_line(line: &str) -> Result<Self, EventError> {
        let wire: WireEvent =
            serde_json::from_str(line).map_err(|e| EventError::Json(e.to_string()))?;

        let document = match Bson::try_from(wire.document) {
            Ok(Bson::Document(doc)) => doc,
            Ok(other) => return Err(EventError::NotADocument(other.element_type())),
            Err(e) => return Err(EventError::ExtendedJson(e.to_string())),
        };

        Ok(Self {
            operation: Operation::from_code(&wire.operation),
            document,
            updated_fields: wire.updated_fields.map(|f| f.into_iter().collect()),
        })
    }
}

#[derive(Deserialize)]
struct WireEvent {
    operation: String,
    document: serde_json::Value,
    #[serde(default)]
    updated_fields: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use document::bson::doc;

    #[test]
    fn insert_always_proceeds() {
        let event = ChangeEvent {
            operation: Operation::Insert,
            document: doc! {},
            updated_fields: Some(BTreeSet::new()),
        };
        assert!(event.should_process());
    }

    #[test]
    fn update_with_unknown_fields_proceeds() {
        assert!(ChangeEvent::update_unknown(doc! {}).should_process());
    }

    #[test]
    fn update_of_bookkeeping_fields_skips() {
        let event = ChangeEvent::update(doc! {}, ["last_accessed", "org"]);
        assert!(!event.should_process());
    }

    #[test]
    fn empty_update_set_skips() {
        let event = ChangeEvent::update(doc! {}, Vec::<String>::new());
        assert!(!event.should_process());
    }

    #[test]
    fn any_relevant_field_proceeds() {
        assert!(ChangeEvent::update(doc! {}, ["last_accessed", "tags"]).should_process());
        assert!(ChangeEvent::update(doc! {}, ["forceSync"]).should_process());
        assert!(ChangeEvent::update(doc! {}, ["counters.views"]).should_process());
    }

    #[test]
    fn operation_codes() {
        assert_eq!(Operation::from_code("i"), Operation::Insert);
        assert_eq!(Operation::from_code("u"), Operation::Update);
        assert_eq!(Operation::from_code("r"), Operation::Update);
        assert_eq!(Operation::from_code("d"), Operation::Update);
    }

    #[test]
    fn parses_extended_json_line() {
        let line = r#"{"operation":"u","document":{"_id":{"$oid":"65a1b2c3d4e5f60718293a4b"},"org":"o1"},"updated_fields":["filename"]}"#;
        let event = ChangeEvent::from_json_line(line).unwrap();

        assert_eq!(event.operation, Operation::Update);
        assert_eq!(
            event.document.get_object_id("_id").unwrap().to_hex(),
            "65a1b2c3d4e5f60718293a4b"
        );
        assert!(event.updated_fields.unwrap().contains("filename"));
    }

    #[test]
    fn missing_updated_fields_is_unknown() {
        let event = ChangeEvent::from_json_line(r#"{"operation":"u","document":{}}"#).unwrap();
        assert!(event.updated_fields.is_none());
        assert!(event.should_process());
    }

    #[test]
    fn non_object_document_is_rejected() {
        let err = ChangeEvent::from_json_line(r#"{"operation":"i","document":[1,2]}"#).unwrap_err();
        assert!(matches!(err, EventError::NotADocument(_)));
    }
}
