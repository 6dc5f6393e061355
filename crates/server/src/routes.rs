use std::sync::Arc;
use std::time::Duration;

use axum::{
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;
use service::context::OpContext;
use service::subscription::{repository::SubscriptionRepository, SubscriptionService};

use crate::openapi::ApiDoc;

pub mod subscriptions;

#[derive(Clone)]
pub struct ServerState {
    pub subscriptions: Arc<SubscriptionService>,
    pub request_timeout: Duration,
}

impl ServerState {
    pub fn new(repo: Arc<dyn SubscriptionRepository>, request_timeout: Duration) -> Self {
        Self { subscriptions: Arc::new(SubscriptionService::new(repo)), request_timeout }
    }

    /// Context for one request; dropping the handler future aborts the store call too.
    pub fn op_context(&self) -> OpContext {
        OpContext::with_timeout(self.request_timeout)
    }
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn metrics() -> impl IntoResponse {
    common::metrics::encode_metrics()
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the application router
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let ops = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/api-docs/openapi.json", get(openapi_json));

    let api = Router::new()
        .route(
            "/subscription",
            post(subscriptions::create)
                .put(subscriptions::update)
                .delete(subscriptions::delete),
        )
        .route("/subscription/users", get(subscriptions::list_by_user))
        .route("/subscription/total-price", post(subscriptions::total_price))
        .with_state(state);

    ops.merge(api)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
