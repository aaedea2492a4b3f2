//! Translation between wire records and stored documents.
//!
//! Calendar dates are stored as the native datetime at midnight UTC and
//! identifiers as native `ObjectId`s. Everything else passes through.

pub mod clock_in;
pub mod item;

use crate::db::ID_FIELD;
use crate::models::parse_timestamp;
use bson::{Bson, Document};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CodecError {
    #[error("stored document is missing field `{0}`")]
    MissingField(String),

    #[error("stored field `{field}` has unexpected type, expected {expected}")]
    UnexpectedType {
        field: String,
        expected: &'static str,
    },
}

/// Midnight UTC of `date` in the store's datetime type.
pub fn date_to_bson(date: NaiveDate) -> bson::DateTime {
    bson::DateTime::from_chrono(date.and_time(NaiveTime::MIN).and_utc())
}

pub fn timestamp_to_bson(timestamp: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_chrono(timestamp)
}

fn unexpected(field: &str, expected: &'static str) -> CodecError {
    CodecError::UnexpectedType {
        field: field.to_string(),
        expected,
    }
}

pub(crate) fn read_id(document: &Document) -> Result<String, CodecError> {
    match document.get(ID_FIELD) {
        Some(Bson::ObjectId(id)) => Ok(id.to_hex()),
        Some(Bson::String(id)) => Ok(id.clone()),
        Some(_) => Err(unexpected(ID_FIELD, "ObjectId")),
        None => Err(CodecError::MissingField(ID_FIELD.to_string())),
    }
}

pub(crate) fn read_string(document: &Document, field: &str) -> Result<String, CodecError> {
    match document.get(field) {
        Some(Bson::String(value)) => Ok(value.clone()),
        Some(_) => Err(unexpected(field, "string")),
        None => Err(CodecError::MissingField(field.to_string())),
    }
}

pub(crate) fn read_integer(document: &Document, field: &str) -> Result<i64, CodecError> {
    match document.get(field) {
        Some(Bson::Int64(value)) => Ok(*value),
        Some(Bson::Int32(value)) => Ok(i64::from(*value)),
        Some(Bson::Double(value)) if value.fract() == 0.0 => Ok(*value as i64),
        Some(_) => Err(unexpected(field, "integer")),
        None => Err(CodecError::MissingField(field.to_string())),
    }
}

/// Reads a calendar date; a missing or null field yields `None`.
pub(crate) fn read_optional_date(
    document: &Document,
    field: &str,
) -> Result<Option<NaiveDate>, CodecError> {
    match document.get(field) {
        None | Some(Bson::Null) => Ok(None),
        Some(Bson::DateTime(value)) => Ok(Some(value.to_chrono().date_naive())),
        Some(Bson::String(raw)) => parse_timestamp(raw)
            .map(|timestamp| Some(timestamp.date_naive()))
            .ok_or_else(|| unexpected(field, "date")),
        Some(_) => Err(unexpected(field, "date")),
    }
}

/// Reads a timestamp; a missing or null field yields `None`.
pub(crate) fn read_optional_timestamp(
    document: &Document,
    field: &str,
) -> Result<Option<DateTime<Utc>>, CodecError> {
    match document.get(field) {
        None | Some(Bson::Null) => Ok(None),
        Some(Bson::DateTime(value)) => Ok(Some(value.to_chrono())),
        Some(Bson::String(raw)) => parse_timestamp(raw)
            .map(Some)
            .ok_or_else(|| unexpected(field, "datetime")),
        Some(_) => Err(unexpected(field, "datetime")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use chrono::TimeZone;

    #[test]
    fn dates_are_stored_at_midnight_utc() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        let stored = date_to_bson(date);
        assert_eq!(
            stored.to_chrono(),
            Utc.with_ymd_and_hms(2024, 12, 31, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn optional_dates_tolerate_absence_and_legacy_strings() {
        let document = doc! {
            "missing_is_fine": Bson::Null,
            "legacy": "2024-12-31",
            "broken": "soon",
            "numeric": 5,
        };
        assert_eq!(read_optional_date(&document, "absent"), Ok(None));
        assert_eq!(read_optional_date(&document, "missing_is_fine"), Ok(None));
        assert_eq!(
            read_optional_date(&document, "legacy"),
            Ok(NaiveDate::from_ymd_opt(2024, 12, 31))
        );
        assert!(read_optional_date(&document, "broken").is_err());
        assert!(read_optional_date(&document, "numeric").is_err());
    }

    #[test]
    fn integers_accept_both_widths() {
        let document = doc! { "small": 3_i32, "wide": 3_i64, "text": "3" };
        assert_eq!(read_integer(&document, "small"), Ok(3));
        assert_eq!(read_integer(&document, "wide"), Ok(3));
        assert_eq!(
            read_integer(&document, "text"),
            Err(CodecError::UnexpectedType {
                field: "text".into(),
                expected: "integer"
            })
        );
        assert_eq!(
            read_integer(&document, "gone"),
            Err(CodecError::MissingField("gone".into()))
        );
    }
}
