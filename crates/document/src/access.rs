//! Typed accessors over the dynamically-typed asset document.
//!
//! Every accessor names the field it reads so a shape mismatch surfaces as a
//! [`DocumentError`] the caller can attribute, never as a panic.

use bson::oid::ObjectId;
use bson::{Bson, Document};

use crate::error::DocumentError;
use crate::fields;

/// Render a value in the string form written to the search document.
///
/// Object ids become their 24-character hex, strings are kept verbatim and
/// anything else goes through its display form.
pub fn string_form(value: &Bson) -> String {
    match value {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn present<'a>(doc: &'a Document, field: &str) -> Option<&'a Bson> {
    match doc.get(field) {
        None | Some(Bson::Null) => None,
        Some(value) => Some(value),
    }
}

/// Read an identifier field (object id or string) as its string form.
pub fn identifier(doc: &Document, field: &str) -> Result<String, DocumentError> {
    match present(doc, field) {
        Some(Bson::ObjectId(oid)) => Ok(oid.to_hex()),
        Some(Bson::String(s)) if !s.is_empty() => Ok(s.clone()),
        Some(other) => Err(DocumentError::unexpected(
            field,
            "an object id or non-empty string",
            other,
        )),
        None => Err(DocumentError::MissingField(field.to_string())),
    }
}

/// The asset identifier of an untransformed document (`_id`).
pub fn asset_id(doc: &Document) -> Result<String, DocumentError> {
    identifier(doc, fields::NATIVE_ID)
}

/// The routing key handed to the indexer: the organization id in string form.
pub fn routing_key(doc: &Document) -> Result<String, DocumentError> {
    identifier(doc, fields::ORG)
}

pub fn object_id(doc: &Document, field: &str) -> Result<ObjectId, DocumentError> {
    match present(doc, field) {
        Some(Bson::ObjectId(oid)) => Ok(*oid),
        Some(other) => Err(DocumentError::unexpected(field, "an object id", other)),
        None => Err(DocumentError::MissingField(field.to_string())),
    }
}

fn list<'a>(doc: &'a Document, field: &str) -> Result<&'a [Bson], DocumentError> {
    match present(doc, field) {
        Some(Bson::Array(items)) => Ok(items.as_slice()),
        Some(other) => Err(DocumentError::unexpected(field, "an array", other)),
        None => Ok(&[]),
    }
}

/// Read a list of object ids. A missing or null field is an empty list.
pub fn object_id_list(doc: &Document, field: &str) -> Result<Vec<ObjectId>, DocumentError> {
    list(doc, field)?
        .iter()
        .enumerate()
        .map(|(index, item)| match item {
            Bson::ObjectId(oid) => Ok(*oid),
            other => Err(DocumentError::unexpected(
                &format!("{field}.{index}"),
                "an object id",
                other,
            )),
        })
        .collect()
}

/// Read a list of strings. A missing or null field is an empty list.
pub fn string_list(doc: &Document, field: &str) -> Result<Vec<String>, DocumentError> {
    list(doc, field)?
        .iter()
        .enumerate()
        .map(|(index, item)| match item {
            Bson::String(s) => Ok(s.clone()),
            other => Err(DocumentError::unexpected(
                &format!("{field}.{index}"),
                "a string",
                other,
            )),
        })
        .collect()
}
