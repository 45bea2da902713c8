//! HTTP API Layer
//!
//! REST surface over the claims billing pipeline using Axum.
//!
//! # Routes
//!
//! - `POST /api/v1/claims` — create a draft claim
//! - `GET /api/v1/claims` — list claims
//! - `GET /api/v1/claims/:id` — claim with payments and denials
//! - `POST /api/v1/claims/:id/submit` — submit to the clearinghouse
//! - `POST /api/v1/eras` — ingest a raw 835
//! - `GET /api/v1/eras/:id`
//! - `POST /api/v1/eras/:id/process`
//! - `GET /health`, `GET /health/ready`

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use domain_claims::{
    ClaimLifecycle, ClaimLocks, ClaimsStore, ClearinghouseGateway, DenialManager,
    PaymentReconciler, RemittanceProcessor,
};

use crate::handlers::{claims, eras, health};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ClaimsStore>,
    pub lifecycle: Arc<ClaimLifecycle>,
    pub processor: Arc<RemittanceProcessor>,
}

impl AppState {
    /// Wires the billing services over a store and gateway
    pub fn new(store: Arc<dyn ClaimsStore>, gateway: Arc<dyn ClearinghouseGateway>) -> Self {
        let locks = Arc::new(ClaimLocks::new());
        let lifecycle = ClaimLifecycle::new(store.clone(), gateway, locks.clone());
        let reconciler = PaymentReconciler::new(store.clone());
        let denials = DenialManager::new(store.clone());
        let processor = RemittanceProcessor::new(store.clone(), reconciler, denials, locks);

        Self {
            store,
            lifecycle: Arc::new(lifecycle),
            processor: Arc::new(processor),
        }
    }

    pub fn with_gateway_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.lifecycle = Arc::new(
            self.lifecycle
                .as_ref()
                .clone()
                .with_gateway_timeout(timeout),
        );
        self
    }
}

/// Creates the main API router
pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let claims_routes = Router::new()
        .route("/", post(claims::create_claim))
        .route("/", get(claims::list_claims))
        .route("/:id", get(claims::get_claim))
        .route("/:id/submit", post(claims::submit_claim));

    let eras_routes = Router::new()
        .route("/", post(eras::ingest_era))
        .route("/:id", get(eras::get_era))
        .route("/:id/process", post(eras::process_era));

    let api_routes = Router::new()
        .nest("/claims", claims_routes)
        .nest("/eras", eras_routes);

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
