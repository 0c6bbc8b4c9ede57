//! Default error-message tables, one per field class.
//!
//! Tables are built on first use and never change afterwards. Templates use
//! `{name}` placeholders filled from the context passed to
//! [`ErrorMessages::fail`].
//!
//! Presence and nullability are checked by the host before a field is asked
//! to parse, so the tables carry no `required` or `null` entries.

use std::{collections::HashMap, sync::LazyLock};

use common::ValidationError;
use tracing::warn;

pub const DOES_NOT_EXIST: &str = "does_not_exist";
pub const INCORRECT_TYPE: &str = "incorrect_type";
pub const INCORRECT_TYPE_ENCRYPTED_LOOKUP: &str = "incorrect_type_encrypted_lookup";
pub const NO_MATCH: &str = "no_match";
pub const INCORRECT_MATCH: &str = "incorrect_match";

const PRIMARY_KEY_RELATED_DEFAULTS: &[(&str, &str)] = &[
    (DOES_NOT_EXIST, "Invalid pk \"{pk_value}\" - object does not exist."),
    (INCORRECT_TYPE, "Incorrect type. Expected pk value, received {data_type}."),
];

const HYPERLINKED_RELATED_DEFAULTS: &[(&str, &str)] = &[
    (NO_MATCH, "Invalid hyperlink - No URL match."),
    (INCORRECT_MATCH, "Invalid hyperlink - Incorrect URL match."),
    (DOES_NOT_EXIST, "Invalid hyperlink - Object does not exist."),
    (INCORRECT_TYPE, "Incorrect type. Expected URL string, received {data_type}."),
];

/// Messages of [`crate::EncryptedLookupRelatedField`]: the primary-key
/// relation defaults plus `incorrect_type_encrypted_lookup`.
pub static RELATED_FIELD_MESSAGES: LazyLock<ErrorMessages> = LazyLock::new(|| {
    ErrorMessages::from_table(PRIMARY_KEY_RELATED_DEFAULTS).extend(&[(
            INCORRECT_TYPE_ENCRYPTED_LOOKUP,
            "Incorrect type. Expected json encoded string value, received {data_type}.",
        )])
});

/// Messages of [`crate::EncryptedLookupHyperlinkedRelatedField`].
pub static HYPERLINKED_FIELD_MESSAGES: LazyLock<ErrorMessages> = LazyLock::new(|| {
    ErrorMessages::from_table(HYPERLINKED_RELATED_DEFAULTS)
});

/// A field class's table of message templates keyed by error code.
#[derive(Debug, Clone, Default)]
pub struct ErrorMessages {
    templates: HashMap<&'static str, &'static str>,
}

impl ErrorMessages {
    /// Build a table from `(code, template)` pairs.
    pub fn from_table(entries: &[(&'static str, &'static str)]) -> Self {
        Self::default().extend(entries)
    }

    /// Add or override entries.
    pub fn extend(mut self, entries: &[(&'static str, &'static str)]) -> Self {
        self.templates.extend(entries.iter().copied());
        self
    }

    /// Look up the raw template for `code`.
    pub fn template(&self, code: &str) -> Option<&'static str> {
        self.templates.get(code).copied()
    }

    /// Render the `code` template with `context` into a [`ValidationError`].
    ///
    /// An unknown code is a programming error in the calling field; it is
    /// logged and the code itself is used as the message.
    pub fn fail(&self, code: &str, context: &[(&str, String)]) -> ValidationError {
        let Some(template) = self.template(code) else {
            warn!(code, "no error message registered for code");
            return ValidationError::new(code, code);
        };
        let message = context
            .iter()
            .fold(template.to_owned(), |msg, (name, value)| {
                msg.replace(&format!("{{{name}}}"), value)
            });
        ValidationError::new(code, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn related_table_carries_encrypted_lookup_message() {
        let err = RELATED_FIELD_MESSAGES.fail(
            INCORRECT_TYPE_ENCRYPTED_LOOKUP,
            &[("data_type", "int".into())],
        );
        assert_eq!(err.code, INCORRECT_TYPE_ENCRYPTED_LOOKUP);
        assert_eq!(
            err.message,
            "Incorrect type. Expected json encoded string value, received int."
        );
    }

    #[test]
    fn related_table_keeps_defaults() {
        let err = RELATED_FIELD_MESSAGES.fail(DOES_NOT_EXIST, &[("pk_value", "999".into())]);
        assert_eq!(err.message, "Invalid pk \"999\" - object does not exist.");
        assert!(RELATED_FIELD_MESSAGES.template(INCORRECT_TYPE).is_some());
        assert!(RELATED_FIELD_MESSAGES.template("required").is_none());
        assert!(HYPERLINKED_FIELD_MESSAGES.template("null").is_none());
    }

    #[test]
    fn hyperlinked_table_has_no_encrypted_lookup_entry() {
        assert!(HYPERLINKED_FIELD_MESSAGES
            .template(INCORRECT_TYPE_ENCRYPTED_LOOKUP)
            .is_none());
        assert_eq!(
            HYPERLINKED_FIELD_MESSAGES.fail(NO_MATCH, &[]).message,
            "Invalid hyperlink - No URL match."
        );
    }

    #[test]
    fn extend_overrides_existing_code() {
        let table = ErrorMessages::from_table(&[("a", "first")]).extend(&[("a", "second")]);
        assert_eq!(table.template("a"), Some("second"));
    }

    #[test]
    fn unknown_code_falls_back_to_code() {
        let err = ErrorMessages::default().fail("mystery", &[]);
        assert_eq!(err.code, "mystery");
        assert_eq!(err.message, "mystery");
    }
}
