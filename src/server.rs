//! HTTP invocation surface — one route mirroring the platform's
//! function-invocation contract.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;

use crate::handler::{Forwarder, InvocationResponse};

/// Build the invocation router: `POST /invoke` takes the receipt event JSON
/// and returns the `{statusCode, body}` response.
pub fn invoke_routes(forwarder: Arc<Forwarder>) -> Router {
    Router::new()
        .route("/invoke", post(invoke))
        .with_state(forwarder)
}

async fn invoke(
    State(forwarder): State<Arc<Forwarder>>,
    Json(event): Json<Value>,
) -> Json<InvocationResponse> {
    Json(forwarder.process_event(event).await)
}
