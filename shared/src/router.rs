//! Request routing for the events API.
//!
//! Routes:
//! - OPTIONS (any path) - CORS preflight
//! - POST /events - Create an event
//! - GET /events - List events
//! - GET /events?id={id} - Get a single event
//! - DELETE /events?id={id} - Delete an event (id may also be sent in the body)
//!
//! `/eventcalendar` is accepted wherever `/events` is.

use chrono::Utc;
use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::db::EventStore;
use crate::http::{ApiGatewayRequest, ApiGatewayResponse};
use crate::models::{generate_event_id, Event};
use crate::validation::validate_event_payload;
use crate::{Error, Result};

/// Gateway stages that may prefix the resource path.
pub const STAGE_PREFIXES: [&str; 3] = ["prod", "dev", "test"];

/// Resource suffixes served by this function.
pub const EVENT_RESOURCES: [&str; 2] = ["/events", "/eventcalendar"];

/// Strip a leading stage segment such as `/prod` from `path`.
///
/// Only stripped when another segment follows, so `/prod` alone is kept.
pub fn normalize_path(path: &str) -> String {
    let mut segments = path.splitn(3, '/');
    if let (Some(""), Some(stage), Some(rest)) = (segments.next(), segments.next(), segments.next())
    {
        if STAGE_PREFIXES.contains(&stage) {
            return format!("/{}", rest);
        }
    }
    path.to_string()
}

fn is_event_resource(path: &str) -> bool {
    EVENT_RESOURCES.iter().any(|suffix| path.ends_with(suffix))
}

/// Operation selected for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Preflight,
    Create,
    List,
    Get(String),
    Delete,
    NotFound { method: String, path: String },
}

impl Route {
    /// Select the operation for a method and normalized path.
    pub fn resolve(request: &ApiGatewayRequest, path: &str) -> Self {
        let method = request.http_method.as_str();
        if method == "OPTIONS" {
            return Route::Preflight;
        }

        match method {
            "POST" if is_event_resource(path) => Route::Create,
            "GET" if is_event_resource(path) => match request.query_param("id") {
                Some(id) => Route::Get(id.to_string()),
                None => Route::List,
            },
            "DELETE" if is_event_resource(path) => Route::Delete,
            _ => Route::NotFound {
                method: method.to_string(),
                path: path.to_string(),
            },
        }
    }
}

/// The events API over an injected store.
pub struct EventsApi<S> {
    store: S,
}

impl<S: EventStore> EventsApi<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    #[cfg(test)]
    fn store(&self) -> &S {
        &self.store
    }

    /// Serve a raw invocation payload. A malformed envelope gets the generic 500.
    pub async fn handle_event(&self, event: &Value) -> ApiGatewayResponse {
        match ApiGatewayRequest::from_event(event) {
            Ok(request) => self.handle(&request).await,
            Err(err) => {
                error!("Handler error: {}", err);
                error!(event = %event, "Event data");
                err.into_response()
            }
        }
    }

    /// Serve one gateway request. Failures become error responses; this never fails.
    pub async fn handle(&self, request: &ApiGatewayRequest) -> ApiGatewayResponse {
        info!(
            event = %serde_json::to_string(request).unwrap_or_default(),
            "Received event"
        );

        match self.dispatch(request).await {
            Ok(response) => response,
            Err(err) if err.status_code() < 500 => {
                warn!(status = err.status_code(), "{}", err);
                err.into_response()
            }
            Err(err @ Error::Database { .. }) => {
                error!("{}", err);
                err.into_response()
            }
            Err(err) => {
                error!("Handler error: {}", err);
                error!(
                    event = %serde_json::to_string(request).unwrap_or_default(),
                    "Event data"
                );
                err.into_response()
            }
        }
    }

    async fn dispatch(&self, request: &ApiGatewayRequest) -> Result<ApiGatewayResponse> {
        let path = normalize_path(&request.path);
        info!(method = %request.http_method, path = %path, "Processing request");
        info!(query = ?request.query_string_parameters, "Query params");
        info!(headers = ?request.headers, "Headers");

        match Route::resolve(request, &path) {
            Route::Preflight => Ok(ApiGatewayResponse::json(
                200,
                &json!({"message": "CORS preflight successful"}),
            )),
            Route::Create => {
                let payload = create_payload(request)?;
                self.create_event(&payload).await
            }
            Route::List => self.list_events().await,
            Route::Get(id) => self.get_event(&id).await,
            Route::Delete => {
                let id = delete_target(request)?;
                info!(event_id = %id, "Deleting event");
                self.delete_event(&id).await
            }
            Route::NotFound { method, path } => Err(Error::RouteNotFound { method, path }),
        }
    }

    /// Validate and persist a new event.
    pub async fn create_event(&self, payload: &Value) -> Result<ApiGatewayResponse> {
        let new_event = validate_event_payload(payload)?;
        let event = Event::create(new_event, generate_event_id(), Utc::now());

        self.store
            .put_event(&event)
            .await
            .map_err(|source| Error::Database {
                message: "Failed to save event to database",
                source,
            })?;

        info!(event_id = %event.id, "Event created successfully");

        Ok(ApiGatewayResponse::json(
            201,
            &json!({
                "success": true,
                "message": "Event created successfully",
                "event": serde_json::to_value(&event)?,
            }),
        ))
    }

    /// All events, ascending by `date`.
    pub async fn list_events(&self) -> Result<ApiGatewayResponse> {
        let mut events = self
            .store
            .scan_events()
            .await
            .map_err(|source| Error::Database {
                message: "Failed to retrieve events from database",
                source,
            })?;
        events.sort_by(|a, b| a.date.cmp(&b.date));

        info!(count = events.len(), "Retrieved events");

        Ok(ApiGatewayResponse::json(
            200,
            &json!({
                "success": true,
                "count": events.len(),
                "events": serde_json::to_value(&events)?,
            }),
        ))
    }

    pub async fn get_event(&self, id: &str) -> Result<ApiGatewayResponse> {
        let event = self.find_event(id, "Failed to retrieve event from database").await?;

        Ok(ApiGatewayResponse::json(
            200,
            &json!({
                "success": true,
                "event": serde_json::to_value(&event)?,
            }),
        ))
    }

    /// Delete an existing event. Missing ids are reported, not ignored.
    pub async fn delete_event(&self, id: &str) -> Result<ApiGatewayResponse> {
        let message = "Failed to delete event from database";
        self.find_event(id, message).await?;

        self.store
            .delete_event(id)
            .await
            .map_err(|source| Error::Database { message, source })?;

        info!(event_id = %id, "Event deleted successfully");

        Ok(ApiGatewayResponse::json(
            200,
            &json!({
                "success": true,
                "message": format!("Event {} deleted successfully", id),
            }),
        ))
    }

    async fn find_event(&self, id: &str, failure: &'static str) -> Result<Event> {
        self.store
            .get_event(id)
            .await
            .map_err(|source| Error::Database {
                message: failure,
                source,
            })?
            .ok_or_else(|| Error::EventNotFound(id.to_string()))
    }
}

/// Parse the create body. An absent body reads as `{}`.
fn create_payload(request: &ApiGatewayRequest) -> Result<Value> {
    let body = request.decoded_body().map_err(|e| {
        error!("Error processing POST request: {}", e);
        Error::BadRequest("Error processing request body".to_string())
    })?;

    let payload: Value = match body {
        Some(text) => serde_json::from_str(&text).map_err(|e| {
            error!("JSON decode error: {}", e);
            Error::InvalidJson(e)
        })?,
        None => json!({}),
    };
    info!(body = %payload, "Request body");
    Ok(payload)
}

/// Resolve the id to delete: query `id` first, then the body's `id` field.
fn delete_target(request: &ApiGatewayRequest) -> Result<String> {
    if let Some(id) = request.query_param("id") {
        return Ok(id.to_string());
    }

    let body = request.decoded_body().map_err(|e| {
        error!("Error processing DELETE request: {}", e);
        Error::BadRequest("Error processing delete request".to_string())
    })?;

    body.filter(|text| !text.is_empty())
        .and_then(|text| serde_json::from_str::<Value>(&text).ok())
        .and_then(|payload| match payload.get("id") {
            Some(Value::String(id)) if !id.is_empty() => Some(id.clone()),
            _ => None,
        })
        .ok_or_else(|| {
            Error::BadRequest(
                r#"Event ID is required for deletion. Provide it as query parameter ?id=eventId or in request body {"id": "eventId"}"#
                    .to_string(),
            )
        })
}
