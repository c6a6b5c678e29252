//! Scored records
//!
//! Record bodies are checked in a fixed order: required fields, then the
//! date, then the score.

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::{RecordDate, ValidationError};

/// Record row as stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: i64,
    pub name: String,
    pub score: i32,
    pub created_at: NaiveDate,
}

/// Record body before validation.
///
/// Fields are loose JSON so that type mismatches become validation errors
/// instead of deserialization rejections.
#[derive(Debug, Default, Deserialize)]
pub struct RawRecord {
    pub name: Option<JsonValue>,
    pub score: Option<JsonValue>,
    pub created_at: Option<JsonValue>,
}

/// Validated record ready for insertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    pub name: String,
    pub score: i32,
    pub created_at: RecordDate,
}

impl NewRecord {
    pub fn from_raw(raw: RawRecord) -> Result<Self, ValidationError> {
        let name = match raw.name {
            Some(JsonValue::String(name)) if !name.is_empty() => name,
            _ => return Err(ValidationError::MissingRecordFields),
        };

        let score = match raw.score {
            None | Some(JsonValue::Null) => return Err(ValidationError::MissingRecordFields),
            Some(score) => score,
        };

        let created_at = match raw.created_at {
            None | Some(JsonValue::Null) => return Err(ValidationError::MissingRecordFields),
            Some(JsonValue::String(s)) if s.is_empty() => {
                return Err(ValidationError::MissingRecordFields)
            }
            Some(JsonValue::String(s)) => {
                RecordDate::parse(&s).ok_or(ValidationError::InvalidCreatedAt)?
            }
            Some(_) => return Err(ValidationError::InvalidCreatedAt),
        };

        let score = parse_score(&score).ok_or(ValidationError::InvalidScore)?;

        Ok(Self {
            name,
            score,
            created_at,
        })
    }
}

/// Accept JSON integers and strings holding an integer.
fn parse_score(value: &JsonValue) -> Option<i32> {
    match value {
        JsonValue::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(body: JsonValue) -> RawRecord {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn valid_record() {
        let record = NewRecord::from_raw(raw(json!({
            "name": "Ann",
            "score": 42,
            "created_at": "05-05-2024"
        })))
        .unwrap();

        assert_eq!(record.name, "Ann");
        assert_eq!(record.score, 42);
        assert_eq!(record.created_at.to_string(), "2024-05-05");
    }

    #[test]
    fn score_as_numeric_string() {
        let record = NewRecord::from_raw(raw(json!({
            "name": "Bo",
            "score": " 7 ",
            "created_at": "01-01-2024"
        })))
        .unwrap();
        assert_eq!(record.score, 7);
    }

    #[test]
    fn missing_fields() {
        for body in [
            json!({"score": 1, "created_at": "01-01-2024"}),
            json!({"name": "", "score": 1, "created_at": "01-01-2024"}),
            json!({"name": "a", "created_at": "01-01-2024"}),
            json!({"name": "a", "score": null, "created_at": "01-01-2024"}),
            json!({"name": "a", "score": 1}),
            json!({}),
        ] {
            assert_eq!(
                NewRecord::from_raw(raw(body.clone())),
                Err(ValidationError::MissingRecordFields),
                "body {body}"
            );
        }
    }

    #[test]
    fn date_checked_before_score() {
        let err = NewRecord::from_raw(raw(json!({
            "name": "a",
            "score": "abc",
            "created_at": "2024-05-05"
        })))
        .unwrap_err();
        assert_eq!(err, ValidationError::InvalidCreatedAt);
    }

    #[test]
    fn bad_scores() {
        for score in [json!("abc"), json!(1.5), json!(true), json!(i64::MAX), json!("")] {
            let err = NewRecord::from_raw(raw(json!({
                "name": "a",
                "score": score,
                "created_at": "01-01-2024"
            })))
            .unwrap_err();
            assert_eq!(err, ValidationError::InvalidScore);
        }
    }
}
