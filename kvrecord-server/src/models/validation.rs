//! Validation error types

use std::fmt;

/// Validation error for request input.
///
/// The `Display` output is the exact message returned to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// `value` missing or empty in a store request
    MissingValue,

    /// Key longer than the column allows
    KeyTooLong { max: usize },

    /// One of `name`, `score`, `created_at` missing from a record body
    MissingRecordFields,

    /// `start-time` or `end-time` missing from a range query
    MissingRange,

    /// `name` missing from a name query
    MissingName,

    /// Date not in strict `dd-mm-yyyy` form (query bounds)
    InvalidDate,

    /// Date not in strict `dd-mm-yyyy` form (`created_at` body field)
    InvalidCreatedAt,

    /// `score` not an integer
    InvalidScore,

    /// Query string or path segment the router could not decode
    Malformed(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingValue => write!(f, "Missing 'value' in request body."),
            Self::KeyTooLong { max } => {
                write!(f, "Key exceeds maximum length of {} characters.", max)
            }
            Self::MissingRecordFields => write!(
                f,
                "Invalid JSON body. Required fields: 'name', 'score', 'created_at'."
            ),
            Self::MissingRange => write!(f, "Missing 'start-time' or 'end-time' parameters."),
            Self::MissingName => write!(f, "Missing 'name' parameter."),
            Self::InvalidDate => write!(f, "Invalid date format. Please use 'dd-mm-yyyy'."),
            Self::InvalidCreatedAt => write!(
                f,
                "Invalid 'created_at' date format. Please use 'dd-mm-yyyy'."
            ),
            Self::InvalidScore => write!(f, "'score' must be an integer."),
            Self::Malformed(reason) => write!(f, "{}", reason),
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(
            ValidationError::KeyTooLong { max: 255 }.to_string(),
            "Key exceeds maximum length of 255 characters."
        );
        assert_eq!(
            ValidationError::InvalidScore.to_string(),
            "'score' must be an integer."
        );
    }
}
