use thiserror::Error;

/// Errors raised when an asset document does not have the shape the sync
/// pipeline reads from it.
///
/// Accessors in [`crate::access`] return these instead of panicking on a
/// missing field or an unexpected value type, so callers can decide whether
/// the problem fails the whole invocation or a single lookup.
///
/// # Examples
///
/// ```rust
/// use document::DocumentError;
///
/// let err = DocumentError::MissingField("filetype".into());
/// assert_eq!(err.to_string(), "missing field `filetype`");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DocumentError {
    /// The field is absent (or explicitly null).
    #[error("missing field `{0}`")]
    MissingField(String),

    /// The field is present but holds a value of another type.
    #[error("field `{field}` should be {expected} but is {found}")]
    UnexpectedType {
        field: String,
        expected: &'static str,
        found: String,
    },
}

impl DocumentError {
    pub(crate) fn unexpected(field: &str, expected: &'static str, found: &bson::Bson) -> Self {
        DocumentError::UnexpectedType {
            field: field.to_string(),
            expected,
            found: format!("{:?}", found.element_type()),
        }
    }

    /// Name of the field the error refers to.
    pub fn field(&self) -> &str {
        match self {
            DocumentError::MissingField(field) => field,
            DocumentError::UnexpectedType { field, .. } => field,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::Bson;

    #[test]
    fn missing_field_message() {
        let err = DocumentError::MissingField("org".into());
        assert_eq!(err.field(), "org");
        assert!(err.to_string().contains("`org`"));
    }

    #[test]
    fn unexpected_type_names_element_type() {
        let err = DocumentError::unexpected("tags", "an array", &Bson::Int32(4));
        assert_eq!(err.field(), "tags");
        let msg = err.to_string();
        assert!(msg.contains("an array"));
        assert!(msg.contains("Int32"));
    }
}
