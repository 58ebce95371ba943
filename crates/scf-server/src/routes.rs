//! Request handlers.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use scf_core::input::ScfConfigV1;
use scf_core::responses::{
    BootstrapResponse, DocumentFullResponse, DocumentTreeResponse, HealthResponse,
};

use crate::AppState;
use crate::error::ApiError;

pub async fn bootstrap_project(
    State(state): State<AppState>,
    Path(org_id): Path<String>,
    body: Result<Json<ScfConfigV1>, JsonRejection>,
) -> Result<(StatusCode, Json<BootstrapResponse>), ApiError> {
    let Json(config) = body?;
    let response = state.service.bootstrap_project(&org_id, &config).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn document_full(
    State(state): State<AppState>,
    Path((org_id, project_id, document_id)): Path<(String, String, String)>,
) -> Result<Json<DocumentFullResponse>, ApiError> {
    let response = state
        .service
        .document_full(&org_id, &project_id, &document_id)
        .await?;
    Ok(Json(response))
}

pub async fn document_tree(
    State(state): State<AppState>,
    Path((org_id, project_id)): Path<(String, String)>,
) -> Result<Json<DocumentTreeResponse>, ApiError> {
    let response = state.service.document_tree(&org_id, &project_id).await?;
    Ok(Json(response))
}

pub async fn healthz(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    state
        .service
        .health()
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
    }))
}
