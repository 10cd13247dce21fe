//! Event persistence.
//!
//! [`EventStore`] is the only seam between request handling and storage. The
//! Lambda uses [`DynamoEventStore`]; tests swap in an in-memory table.

use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoClient;
use std::collections::HashMap;
use std::future::Future;
use thiserror::Error;

use crate::models::Event;

/// A DynamoDB item.
pub type Item = HashMap<String, AttributeValue>;

/// Errors raised by an [`EventStore`].
#[derive(Error, Debug)]
pub enum StoreError {
    /// The DynamoDB call itself failed
    #[error("DynamoDB request failed: {0}")]
    Dynamo(String),

    /// An item could not be read back as an event
    #[error("Malformed item: {0}")]
    MalformedItem(String),
}

/// Key-value table of events addressed by `id`.
pub trait EventStore: Send + Sync {
    /// Insert or replace the event.
    fn put_event(&self, event: &Event) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Point lookup by id.
    fn get_event(&self, id: &str)
        -> impl Future<Output = Result<Option<Event>, StoreError>> + Send;

    /// Point delete by id. Deleting a missing id is not an error.
    fn delete_event(&self, id: &str) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Every stored event, in no particular order.
    fn scan_events(&self) -> impl Future<Output = Result<Vec<Event>, StoreError>> + Send;
}

/// DynamoDB-backed event table.
#[derive(Debug, Clone)]
pub struct DynamoEventStore {
    client: DynamoClient,
    table_name: String,
}

impl DynamoEventStore {
    pub fn new(client: DynamoClient, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

fn dynamo_error<E>(err: E) -> StoreError
where
    E: std::error::Error + Send + Sync + 'static,
{
    StoreError::Dynamo(DisplayErrorContext(err).to_string())
}

fn id_key(id: &str) -> AttributeValue {
    AttributeValue::S(id.to_string())
}

impl EventStore for DynamoEventStore {
    async fn put_event(&self, event: &Event) -> Result<(), StoreError> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(event_to_item(event)))
            .send()
            .await
            .map_err(dynamo_error)?;
        Ok(())
    }

    async fn get_event(&self, id: &str) -> Result<Option<Event>, StoreError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("id", id_key(id))
            .send()
            .await
            .map_err(dynamo_error)?;

        output.item.as_ref().map(item_to_event).transpose()
    }

    async fn delete_event(&self, id: &str) -> Result<(), StoreError> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key("id", id_key(id))
            .send()
            .await
            .map_err(dynamo_error)?;
        Ok(())
    }

    async fn scan_events(&self) -> Result<Vec<Event>, StoreError> {
        let items: Vec<Item> = self
            .client
            .scan()
            .table_name(&self.table_name)
            .into_paginator()
            .items()
            .send()
            .try_collect()
            .await
            .map_err(dynamo_error)?;

        items.iter().map(item_to_event).collect()
    }
}

/// Encode an event as a string-attribute item.
pub fn event_to_item(event: &Event) -> Item {
    [
        ("id", &event.id),
        ("title", &event.title),
        ("description", &event.description),
        ("date", &event.date),
        ("time", &event.time),
        ("location", &event.location),
        ("link", &event.link),
        ("created_at", &event.created_at),
        ("updated_at", &event.updated_at),
    ]
    .into_iter()
    .map(|(name, value)| (name.to_string(), AttributeValue::S(value.clone())))
    .collect()
}

/// Decode an item. Only `id` is mandatory; other attributes default to empty.
pub fn item_to_event(item: &Item) -> Result<Event, StoreError> {
    let text = |name: &str| -> String {
        match item.get(name) {
            Some(AttributeValue::S(value)) => value.clone(),
            Some(AttributeValue::N(value)) => value.clone(),
            _ => String::new(),
        }
    };

    let id = text("id");
    if id.is_empty() {
        return Err(StoreError::MalformedItem("item has no string id".to_string()));
    }

    Ok(Event {
        id,
        title: text("title"),
        description: text("description"),
        date: text("date"),
        time: text("time"),
        location: text("location"),
        link: text("link"),
        created_at: text("created_at"),
        updated_at: text("updated_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event() -> Event {
        Event {
            id: "event_0123456789ab".to_string(),
            title: "Test Event".to_string(),
            description: "Desc".to_string(),
            date: "2025-12-25".to_string(),
            time: "2:00 PM".to_string(),
            location: "Somewhere".to_string(),
            link: String::new(),
            created_at: "2025-01-01T00:00:00.000000Z".to_string(),
            updated_at: "2025-01-01T00:00:00.000000Z".to_string(),
        }
    }

    #[test]
    fn test_item_keeps_every_attribute() {
        let event = sample_event();
        let item = event_to_item(&event);
        assert_eq!(item.len(), 9);
        assert_eq!(item["id"], AttributeValue::S("event_0123456789ab".to_string()));
        assert_eq!(item["link"], AttributeValue::S(String::new()));
        assert_eq!(item_to_event(&item).unwrap(), event);
    }

    #[test]
    fn test_item_without_id_is_malformed() {
        let mut item = event_to_item(&sample_event());
        item.remove("id");
        assert!(matches!(
            item_to_event(&item),
            Err(StoreError::MalformedItem(_))
        ));
    }

    #[test]
    fn test_sparse_item_defaults_to_empty_strings() {
        let item: Item = [
            ("id".to_string(), AttributeValue::S("event_legacy".to_string())),
            ("date".to_string(), AttributeValue::S("2024-06-01".to_string())),
        ]
        .into_iter()
        .collect();

        let event = item_to_event(&item).unwrap();
        assert_eq!(event.id, "event_legacy");
        assert_eq!(event.date, "2024-06-01");
        assert_eq!(event.link, "");
        assert_eq!(event.created_at, "");
    }
}
