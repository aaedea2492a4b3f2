use super::{
    date_to_bson, read_id, read_integer, read_optional_date, read_string, CodecError,
};
use crate::models::{CreateItemRequest, Item, UpdateItemRequest};
use bson::{doc, Document};
use chrono::{DateTime, Utc};

pub const NAME: &str = "name";
pub const EMAIL: &str = "email";
pub const QUANTITY: &str = "quantity";
pub const EXPIRY_DATE: &str = "expiry_date";
pub const INSERT_DATE: &str = "insert_date";

/// Stored form of a new item, stamped with the creation date of `now`.
pub fn encode_new(request: &CreateItemRequest, now: DateTime<Utc>) -> Document {
    doc! {
        NAME: request.name.as_str(),
        EMAIL: request.email.as_str(),
        QUANTITY: request.quantity,
        EXPIRY_DATE: date_to_bson(request.expiry_date),
        INSERT_DATE: date_to_bson(now.date_naive()),
    }
}

/// Only the fields the client actually supplied.
pub fn encode_update(request: &UpdateItemRequest) -> Document {
    let mut fields = Document::new();
    if let Some(name) = &request.name {
        fields.insert(NAME, name.as_str());
    }
    if let Some(email) = &request.email {
        fields.insert(EMAIL, email.as_str());
    }
    if let Some(quantity) = request.quantity {
        fields.insert(QUANTITY, quantity);
    }
    if let Some(expiry_date) = request.expiry_date {
        fields.insert(EXPIRY_DATE, date_to_bson(expiry_date));
    }
    fields
}

pub fn decode(document: &Document) -> Result<Item, CodecError> {
    Ok(Item {
        id: read_id(document)?,
        name: read_string(document, NAME)?,
        email: read_string(document, EMAIL)?,
        quantity: read_integer(document, QUANTITY)?,
        expiry_date: read_optional_date(document, EXPIRY_DATE)?,
        insert_date: read_optional_date(document, INSERT_DATE)?,
    })
}
