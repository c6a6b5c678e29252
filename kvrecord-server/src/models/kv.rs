//! Key-value entry validation

use serde_json::Value as JsonValue;

use super::ValidationError;

/// Width of the `key` column
pub const MAX_KEY_LEN: usize = 255;

/// Validated key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryKey(String);

impl EntryKey {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.chars().count() > MAX_KEY_LEN {
            return Err(ValidationError::KeyTooLong { max: MAX_KEY_LEN });
        }
        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Value to store, taken from the request body.
///
/// Strings are stored verbatim; any other JSON value is stored as its JSON
/// text. Missing, `null` and `""` are rejected.
pub fn stored_value(raw: Option<JsonValue>) -> Result<String, ValidationError> {
    match raw {
        None | Some(JsonValue::Null) => Err(ValidationError::MissingValue),
        Some(JsonValue::String(s)) if s.is_empty() => Err(ValidationError::MissingValue),
        Some(JsonValue::String(s)) => Ok(s),
        Some(other) => Ok(other.to_string()),
    }
}

/// What an upsert did to the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

impl UpsertOutcome {
    pub fn from_inserted(inserted: bool) -> Self {
        if inserted {
            Self::Inserted
        } else {
            Self::Updated
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::Inserted => "Key-value pair stored successfully.",
            Self::Updated => "Key-value pair updated successfully.",
        }
    }
}
