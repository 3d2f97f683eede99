pub mod adapters;
pub mod cli;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod ports;
pub mod schemas;
pub mod services;
pub mod simulation;
pub mod utils;
pub mod validation;

use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::time::Instant;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::AdminCredentials;
use crate::services::PaymentService;

#[derive(Clone)]
pub struct AppState {
    pub payments: PaymentService,
    pub admin_credentials: Option<AdminCredentials>,
    pub cors_allowed_origins: Vec<String>,
    pub log_request_body: bool,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(payments: PaymentService) -> Self {
        Self {
            payments,
            admin_credentials: None,
            cors_allowed_origins: Vec::new(),
            log_request_body: false,
            started_at: Instant::now(),
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    let admin_routes = Router::new()
        .route("/admin/cache/clear", post(handlers::admin::clear_cache))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::admin_auth,
        ));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api-docs/openapi.json", get(handlers::openapi))
        .route("/api/payments/authorize", post(handlers::payments::authorize))
        .route("/api/payments/capture", post(handlers::payments::capture))
        .route("/api/payments/refund", post(handlers::payments::refund))
        .route("/api/payments/history", get(handlers::payments::history))
        .route("/api/payments/:id", get(handlers::payments::get_transaction))
        .merge(admin_routes)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::request_logger::request_logger_middleware,
        ))
        .layer(cors_layer(&state.cors_allowed_origins))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(
            origins
                .iter()
                .filter_map(|o| HeaderValue::from_str(o).ok()),
        )
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
