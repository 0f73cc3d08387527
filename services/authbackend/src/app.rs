//! Auth backend HTTP application wiring.
//!
//! # Purpose
//! Builds the Axum router and defines the shared application state injected
//! into handlers.
//!
//! # Notes
//! The route table is the single place paths and methods are bound to
//! handlers; every plugin endpoint accepts GET and POST.
use crate::api;
use axum::Router;
use axum::routing::get;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use warren_authz::PolicyEvaluator;

#[derive(Clone)]
pub struct AppState {
    pub evaluator: Arc<dyn PolicyEvaluator>,
}

impl AppState {
    pub fn new(evaluator: impl PolicyEvaluator + 'static) -> Self {
        Self {
            evaluator: Arc::new(evaluator),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let trace_layer =
        TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
            // Query strings carry credentials; record the path only.
            tracing::info_span!(
                "http.request",
                method = %request.method(),
                path = %request.uri().path(),
                version = ?request.version()
            )
        });

    Router::new()
        .route("/auth/user", get(api::auth::user).post(api::auth::user))
        .route("/auth/vhost", get(api::auth::vhost).post(api::auth::vhost))
        .route("/auth/resource", get(api::auth::resource).post(api::auth::resource))
        .route("/auth/topic", get(api::auth::topic).post(api::auth::topic))
        .route("/health", get(api::system::health))
        .route("/openapi.json", get(api::system::openapi_json))
        .layer(trace_layer)
        .with_state(state)
}
