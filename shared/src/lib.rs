//! Shared library for the event calendar Lambda.
//!
//! This crate provides the event model, payload validation, the DynamoDB store
//! and the API Gateway request router used by the `events` function.

pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod models;
pub mod router;
pub mod validation;

pub use config::Config;
pub use db::{DynamoEventStore, EventStore, StoreError};
pub use error::{Error, Result};
pub use http::{ApiGatewayRequest, ApiGatewayResponse};
pub use models::{Event, NewEvent};
pub use router::{normalize_path, EventsApi, Route};
pub use validation::validate_event_payload;
