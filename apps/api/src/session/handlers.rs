use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::advice::decoder::AdviceView;
use crate::errors::AppError;
use crate::models::profile::ProfileInput;
use crate::session::context::SessionSummary;
use crate::session::{flow, SessionContext};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub session_id: Uuid,
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ChecklistToggle {
    pub label: String,
    pub completed: bool,
}

#[derive(Debug, Deserialize)]
pub struct RoadmapToggle {
    pub title: String,
    pub completed: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<(StatusCode, Json<LoginResponse>), AppError> {
    let session = SessionContext::start(&req.username, &req.email)?;
    let user_id = session.user_id.clone();
    let session_id = state.sessions.insert(session).await;
    info!("Session {session_id} started for user {user_id}");
    Ok((
        StatusCode::CREATED,
        Json(LoginResponse {
            session_id,
            user_id,
        }),
    ))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSummary>, AppError> {
    Ok(Json(state.sessions.read(id, |s| s.summary()).await?))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_logout(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .sessions
        .remove(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;
    info!("Session {id} ended");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/:id/profile
pub async fn handle_submit_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(profile): Json<ProfileInput>,
) -> Result<Json<AdviceView>, AppError> {
    Ok(Json(flow::submit_profile(&state, id, profile).await?))
}

/// GET /api/v1/sessions/:id/advice
pub async fn handle_get_advice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AdviceView>, AppError> {
    Ok(Json(flow::current_view(&state, id).await?))
}

/// PUT /api/v1/sessions/:id/checklist
pub async fn handle_toggle_checklist(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ChecklistToggle>,
) -> Result<Json<AdviceView>, AppError> {
    Ok(Json(
        flow::toggle_checklist_item(&state, id, &req.label, req.completed).await?,
    ))
}

/// PUT /api/v1/sessions/:id/roadmap
pub async fn handle_toggle_roadmap(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<RoadmapToggle>,
) -> Result<Json<AdviceView>, AppError> {
    Ok(Json(
        flow::toggle_roadmap_step(&state, id, &req.title, req.completed).await?,
    ))
}

/// GET /api/v1/sessions/:id/roadmap.dot
pub async fn handle_roadmap_dot(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let dot = flow::roadmap_dot(&state, id).await?;
    Ok(([(header::CONTENT_TYPE, "text/vnd.graphviz")], dot))
}
