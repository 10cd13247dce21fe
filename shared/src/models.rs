//! Event data model.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Prefix of every generated event id.
pub const EVENT_ID_PREFIX: &str = "event_";

/// Number of hex characters following the prefix.
pub const EVENT_ID_HEX_LEN: usize = 12;

/// A stored calendar event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Calendar date, `YYYY-MM-DD`
    pub date: String,
    /// Free text, e.g. "2:00 PM - 4:00 PM"
    pub time: String,
    pub location: String,
    /// Empty when the event has no link
    pub link: String,
    pub created_at: String,
    pub updated_at: String,
}

/// A validated, trimmed create payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub link: String,
}

impl Event {
    /// Assign identity and timestamps to a validated payload.
    pub fn create(new: NewEvent, id: String, now: DateTime<Utc>) -> Self {
        let timestamp = now.to_rfc3339_opts(SecondsFormat::Micros, true);
        Self {
            id,
            title: new.title,
            description: new.description,
            date: new.date,
            time: new.time,
            location: new.location,
            link: new.link,
            created_at: timestamp.clone(),
            updated_at: timestamp,
        }
    }
}

/// Generate a fresh id: `event_` followed by 12 lowercase hex characters.
pub fn generate_event_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("{}{}", EVENT_ID_PREFIX, &hex[..EVENT_ID_HEX_LEN])
}

/// Whether `id` has the shape produced by [`generate_event_id`].
#[cfg(test)]
pub(crate) fn is_generated_event_id(id: &str) -> bool {
    id.strip_prefix(EVENT_ID_PREFIX).is_some_and(|hex| {
        hex.len() == EVENT_ID_HEX_LEN
            && hex.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn sample() -> NewEvent {
        NewEvent {
            title: "Board game night".to_string(),
            description: "Bring snacks".to_string(),
            date: "2025-12-25".to_string(),
            time: "7:00 PM".to_string(),
            location: "Library, PA".to_string(),
            link: String::new(),
        }
    }

    proptest! {
        #[test]
        fn prop_generated_ids_are_well_formed_and_unique(count in 1usize..200) {
            let ids: HashSet<String> = (0..count).map(|_| generate_event_id()).collect();
            prop_assert_eq!(ids.len(), count);
            for id in &ids {
                prop_assert!(is_generated_event_id(id), "malformed id {}", id);
            }
        }
    }

    #[test]
    fn test_is_generated_event_id() {
        assert!(is_generated_event_id("event_0123456789ab"));
        assert!(!is_generated_event_id("event_0123456789AB"));
        assert!(!is_generated_event_id("event_0123456789a"));
        assert!(!is_generated_event_id("evt_0123456789ab"));
    }

    #[test]
    fn test_create_stamps_both_timestamps() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap();
        let event = Event::create(sample(), "event_0123456789ab".to_string(), now);
        assert_eq!(event.created_at, "2025-03-01T09:30:00.000000Z");
        assert_eq!(event.created_at, event.updated_at);
        assert_eq!(event.id, "event_0123456789ab");
    }

    #[test]
    fn test_serializes_snake_case_fields() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap();
        let event = Event::create(sample(), "event_0123456789ab".to_string(), now);
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["created_at"], "2025-03-01T09:30:00.000000Z");
        assert_eq!(value["link"], "");
        assert_eq!(value["date"], "2025-12-25");
    }
}
