//! Error types for the events Lambda.

use thiserror::Error;

use crate::http::ApiGatewayResponse;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while serving an events request.
#[derive(Error, Debug)]
pub enum Error {
    /// Payload failed a field rule
    #[error("Validation error: {0}")]
    Validation(String),

    /// Request body was not valid JSON
    #[error("Invalid JSON: {0}")]
    InvalidJson(serde_json::Error),

    /// Request could not be interpreted
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// No event stored under the given id
    #[error("Event not found: {0}")]
    EventNotFound(String),

    /// No operation matches the method and path
    #[error("No route for {method} {path}")]
    RouteNotFound { method: String, path: String },

    /// Store call failed; `message` is safe to show to callers
    #[error("Database error: {message}: {source}")]
    Database {
        message: &'static str,
        #[source]
        source: crate::db::StoreError,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Validation(_) | Error::InvalidJson(_) | Error::BadRequest(_) => 400,
            Error::EventNotFound(_) | Error::RouteNotFound { .. } => 404,
            _ => 500,
        }
    }

    /// Short label returned in the `error` field of the response body.
    pub fn label(&self) -> &'static str {
        match self {
            Error::Validation(_) => "Validation failed",
            Error::InvalidJson(_) => "Invalid JSON",
            Error::BadRequest(_) => "Bad Request",
            Error::EventNotFound(_) => "Event not found",
            Error::RouteNotFound { .. } => "Not found",
            Error::Database { .. } => "Database error",
            Error::Serialization(_) | Error::Internal(_) => "Internal server error",
        }
    }

    /// Human-readable message. Never includes internal causes.
    pub fn public_message(&self) -> String {
        match self {
            Error::Validation(message) | Error::BadRequest(message) => message.clone(),
            Error::InvalidJson(_) => "Request body must be valid JSON".to_string(),
            Error::EventNotFound(id) => format!("No event found with ID: {}", id),
            Error::RouteNotFound { method, path } => format!("{} {} is not supported", method, path),
            Error::Database { message, .. } => (*message).to_string(),
            Error::Serialization(_) | Error::Internal(_) => {
                "An unexpected error occurred".to_string()
            }
        }
    }

    /// Convert into the gateway response carrying `{error, message}`.
    pub fn into_response(self) -> ApiGatewayResponse {
        ApiGatewayResponse::error(self.status_code(), self.label(), self.public_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::StoreError;

    #[test]
    fn test_status_codes() {
        assert_eq!(Error::Validation("x".into()).status_code(), 400);
        assert_eq!(Error::BadRequest("x".into()).status_code(), 400);
        assert_eq!(Error::EventNotFound("event_1".into()).status_code(), 404);
        assert_eq!(
            Error::RouteNotFound { method: "PUT".into(), path: "/events".into() }.status_code(),
            404
        );
        assert_eq!(Error::Internal("boom".into()).status_code(), 500);
    }

    #[test]
    fn test_database_error_hides_cause() {
        let err = Error::Database {
            message: "Failed to save event to database",
            source: StoreError::Dynamo("ResourceNotFoundException: table missing".into()),
        };
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.label(), "Database error");
        assert_eq!(err.public_message(), "Failed to save event to database");
    }

    #[test]
    fn test_invalid_json_message() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err = Error::InvalidJson(parse_err);
        assert_eq!(err.label(), "Invalid JSON");
        assert_eq!(err.public_message(), "Request body must be valid JSON");
    }
}
