//! Create-payload validation.
//!
//! Rules run in a fixed order and the first failure wins, so callers always
//! see the same message for the same payload.

use chrono::NaiveDate;
use serde_json::Value;

use crate::models::NewEvent;
use crate::{Error, Result};

/// Required fields, in the order they are checked.
pub const REQUIRED_FIELDS: [&str; 5] = ["title", "description", "date", "time", "location"];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// JSON truthiness: null, false, zero, and empty strings/arrays/objects are falsy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

/// `YYYY-M[M]-D[D]` with a four-digit year, no sign and no padding.
///
/// chrono's `%Y` alone also accepts short, signed and space-prefixed years.
fn has_date_shape(date: &str) -> bool {
    let digits = |part: &str, lens: std::ops::RangeInclusive<usize>| {
        lens.contains(&part.len()) && part.bytes().all(|b| b.is_ascii_digit())
    };
    let mut parts = date.split('-');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(year), Some(month), Some(day), None) => {
            digits(year, 4..=4) && digits(month, 1..=2) && digits(day, 1..=2)
        }
        _ => false,
    }
}

/// Validate a create payload and return the trimmed event fields.
pub fn validate_event_payload(payload: &Value) -> Result<NewEvent> {
    let empty = serde_json::Map::new();
    let fields = payload.as_object().unwrap_or(&empty);

    let mut values: [&str; 5] = [""; 5];
    for (slot, name) in values.iter_mut().zip(REQUIRED_FIELDS) {
        let value = fields
            .get(name)
            .filter(|v| is_truthy(v))
            .ok_or_else(|| Error::Validation(format!("Missing required field: {}", name)))?;
        *slot = value
            .as_str()
            .ok_or_else(|| Error::Validation(format!("Field must be a string: {}", name)))?;
    }
    let [title, description, date, time, location] = values;

    if !has_date_shape(date) || NaiveDate::parse_from_str(date, DATE_FORMAT).is_err() {
        return Err(Error::Validation(
            "Invalid date format. Use YYYY-MM-DD".to_string(),
        ));
    }

    if time.trim().is_empty() {
        return Err(Error::Validation("Time field cannot be empty".to_string()));
    }

    let link = match fields.get("link") {
        None | Some(Value::Null) => "",
        Some(Value::String(link)) => link.trim(),
        Some(other) if !is_truthy(other) => "",
        Some(_) => return Err(invalid_link()),
    };
    if !link.is_empty() && !(link.starts_with("http://") || link.starts_with("https://")) {
        return Err(invalid_link());
    }

    for (name, value) in [("title", title), ("description", description), ("location", location)] {
        if value.trim().is_empty() {
            return Err(Error::Validation(format!("Field cannot be blank: {}", name)));
        }
    }

    Ok(NewEvent {
        title: title.trim().to_string(),
        description: description.trim().to_string(),
        date: date.trim().to_string(),
        time: time.trim().to_string(),
        location: location.trim().to_string(),
        link: link.to_string(),
    })
}

fn invalid_link() -> Error {
    Error::Validation(
        "Link must be a valid URL starting with http:// or https://".to_string(),
    )
}
