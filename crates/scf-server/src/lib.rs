//! # scf-server
//!
//! axum router over [`ScfService`]:
//!
//! - `POST {prefix}/org/{org_id}/project/from-scf-config` → 201 + bootstrap stats
//! - `GET {prefix}/org/{org_id}/project/{project_id}/document/{document_id}/full`
//! - `GET {prefix}/org/{org_id}/project/{project_id}/document/tree`
//! - `GET /healthz`
//!
//! Authentication is expected upstream; the path organization is trusted.

pub mod error;
mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use scf_db::service::ScfService;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ScfService>,
}

impl AppState {
    #[must_use]
    pub fn new(service: ScfService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

/// Build the application router. `api_prefix` is already normalized: empty
/// or `/segment`.
#[must_use]
pub fn build_router(state: AppState, api_prefix: &str) -> Router {
    let api = Router::new()
        .route(
            "/org/{org_id}/project/from-scf-config",
            post(routes::bootstrap_project),
        )
        .route(
            "/org/{org_id}/project/{project_id}/document/{document_id}/full",
            get(routes::document_full),
        )
        .route(
            "/org/{org_id}/project/{project_id}/document/tree",
            get(routes::document_tree),
        );

    let root = Router::new().route("/healthz", get(routes::healthz));
    let app = if api_prefix.is_empty() {
        root.merge(api)
    } else {
        root.nest(api_prefix, api)
    };

    app.layer(TraceLayer::new_for_http()).with_state(state)
}
