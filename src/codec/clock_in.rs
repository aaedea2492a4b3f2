use super::{read_id, read_optional_timestamp, read_string, timestamp_to_bson, CodecError};
use crate::models::{ClockIn, CreateClockInRequest, UpdateClockInRequest};
use bson::{doc, Document};
use chrono::{DateTime, Utc};

pub const EMAIL: &str = "email";
pub const LOCATION: &str = "location";
pub const INSERT_DATETIME: &str = "insert_datetime";

pub fn encode_new(request: &CreateClockInRequest, now: DateTime<Utc>) -> Document {
    doc! {
        EMAIL: request.email.as_str(),
        LOCATION: request.location.as_str(),
        INSERT_DATETIME: timestamp_to_bson(now),
    }
}

pub fn encode_update(request: &UpdateClockInRequest) -> Document {
    let mut fields = Document::new();
    if let Some(email) = &request.email {
        fields.insert(EMAIL, email.as_str());
    }
    if let Some(location) = &request.location {
        fields.insert(LOCATION, location.as_str());
    }
    fields
}

pub fn decode(document: &Document) -> Result<ClockIn, CodecError> {
    Ok(ClockIn {
        id: read_id(document)?,
        email: read_string(document, EMAIL)?,
        location: read_string(document, LOCATION)?,
        insert_datetime: read_optional_timestamp(document, INSERT_DATETIME)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::ID_FIELD;
    use bson::oid::ObjectId;
    use chrono::TimeZone;

    #[test]
    fn round_trips_through_the_stored_form() {
        // The store keeps millisecond precision.
        let now = Utc.with_ymd_and_hms(2024, 3, 4, 8, 59, 12).unwrap();
        let request = CreateClockInRequest {
            email: "a@x.com".into(),
            location: "NYC".into(),
        };
        let id = ObjectId::new();
        let mut document = encode_new(&request, now);
        document.insert(ID_FIELD, id);

        let record = decode(&document).unwrap();
        assert_eq!(record.id, id.to_hex());
        assert_eq!(record.email, "a@x.com");
        assert_eq!(record.location, "NYC");
        assert_eq!(record.insert_datetime, Some(now));
    }

    #[test]
    fn update_skips_absent_fields() {
        let fields = encode_update(&UpdateClockInRequest {
            email: None,
            location: Some("Boston".into()),
        });
        assert_eq!(fields, doc! { LOCATION: "Boston" });
    }

    #[test]
    fn missing_timestamp_is_tolerated() {
        let document = doc! { ID_FIELD: ObjectId::new(), EMAIL: "a@x.com", LOCATION: "NYC" };
        assert_eq!(decode(&document).unwrap().insert_datetime, None);
    }
}
