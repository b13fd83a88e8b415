/// Separator between the components of a type-ahead string.
pub const TYPE_AHEAD_DELIMITER: &str = "|";

/// Join components into a type-ahead string.
///
/// ```
/// assert_eq!(lookup::type_ahead(&["Ann", "a@x.com"]), "Ann|a@x.com");
/// ```
pub fn type_ahead(parts: &[&str]) -> String {
    parts.join(TYPE_AHEAD_DELIMITER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_with_delimiter() {
        assert_eq!(type_ahead(&["F", "pdf", "Docs"]), "F|pdf|Docs");
    }

    #[test]
    fn single_component_has_no_delimiter() {
        assert_eq!(type_ahead(&["solo"]), "solo");
    }
}
