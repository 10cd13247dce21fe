//! Events Lambda - CRUD operations for calendar events behind API Gateway.
//!
//! Endpoints (stage prefix optional, `/eventcalendar` accepted as an alias):
//! - OPTIONS * - CORS preflight
//! - POST /events - Create an event
//! - GET /events - List events, or get one with `?id=`
//! - DELETE /events - Delete by `?id=` or `{"id": ...}` body

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde_json::Value;
use shared::{ApiGatewayResponse, Config, DynamoEventStore, EventsApi};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Application state, built once per cold start.
struct AppState {
    api: EventsApi<DynamoEventStore>,
}

impl AppState {
    async fn new() -> Result<Self, Error> {
        let config = Config::from_env();
        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let client = aws_sdk_dynamodb::Client::new(&aws_config);

        let store = DynamoEventStore::new(client, config.table_name);
        info!(table = %store.table_name(), "Using DynamoDB table");

        Ok(Self {
            api: EventsApi::new(store),
        })
    }
}

async fn handler(
    state: Arc<AppState>,
    event: LambdaEvent<Value>,
) -> Result<ApiGatewayResponse, Error> {
    Ok(state.api.handle_event(&event.payload).await)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let state = Arc::new(AppState::new().await?);

    run(service_fn(move |event| {
        let state = Arc::clone(&state);
        async move { handler(state, event).await }
    }))
    .await
}
