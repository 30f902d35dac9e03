use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::analysis::form::{PaperField, ResearcherForm};
use crate::errors::AppError;
use crate::session::machine::{ComparisonDraft, Session, SessionSnapshot};
use crate::session::store::{start_analysis, start_comparison};
use crate::state::AppState;

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionSnapshot>) {
    (StatusCode::CREATED, Json(state.sessions.create().await))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    Ok(Json(state.sessions.snapshot(id).await?))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct PaperPatch {
    pub title: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
}

/// PUT /api/v1/sessions/:id/form
pub async fn handle_replace_form(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(mut form): Json<ResearcherForm>,
) -> Result<Json<SessionSnapshot>, AppError> {
    form.ensure_one_paper();
    let (_, snapshot) = state
        .sessions
        .update(id, |session| session.edit_form(|current| *current = form))
        .await?;
    Ok(Json(snapshot))
}

/// POST /api/v1/sessions/:id/form/papers
pub async fn handle_add_paper(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<SessionSnapshot>), AppError> {
    let (_, snapshot) = state
        .sessions
        .update(id, |session| session.edit_form(ResearcherForm::add_paper))
        .await?;
    Ok((StatusCode::CREATED, Json(snapshot)))
}

/// DELETE /api/v1/sessions/:id/form/papers/:paper_id
///
/// Removing the only remaining paper is a no-op, not an error.
pub async fn handle_remove_paper(
    State(state): State<AppState>,
    Path((id, paper_id)): Path<(Uuid, String)>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let (_, snapshot) = state
        .sessions
        .update(id, |session| {
            session.edit_form(|form| form.remove_paper(&paper_id))
        })
        .await?;
    Ok(Json(snapshot))
}

/// PATCH /api/v1/sessions/:id/form/papers/:paper_id
pub async fn handle_update_paper(
    State(state): State<AppState>,
    Path((id, paper_id)): Path<(Uuid, String)>,
    Json(patch): Json<PaperPatch>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let (_, snapshot) = state
        .sessions
        .update(id, |session| {
            let found = session.edit_form(|form| {
                let mut found = form.papers.iter().any(|p| p.id == paper_id);
                if let Some(title) = patch.title {
                    found &= form.update_paper(&paper_id, PaperField::Title, title);
                }
                if let Some(text) = patch.abstract_text {
                    found &= form.update_paper(&paper_id, PaperField::Abstract, text);
                }
                found
            })?;
            if found {
                Ok(())
            } else {
                Err(AppError::NotFound(format!("paper {paper_id} not found")))
            }
        })
        .await?;
    Ok(Json(snapshot))
}

/// POST /api/v1/sessions/:id/analysis
///
/// Validates the session's form, flips the session to LOADING and returns
/// immediately. Poll the session for the outcome.
pub async fn handle_submit_analysis(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<SessionSnapshot>), AppError> {
    let (snapshot, _) = start_analysis(&state.sessions, state.llm.clone(), id).await?;
    Ok((StatusCode::ACCEPTED, Json(snapshot)))
}

/// POST /api/v1/sessions/:id/reset
pub async fn handle_reset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let (_, snapshot) = state
        .sessions
        .update(id, |session| {
            session.reset();
            Ok(())
        })
        .await?;
    Ok(Json(snapshot))
}

/// POST /api/v1/sessions/:id/comparison/open
pub async fn handle_open_comparison(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let (_, snapshot) = state.sessions.update(id, Session::open_comparison).await?;
    Ok(Json(snapshot))
}

/// POST /api/v1/sessions/:id/comparison/cancel
pub async fn handle_cancel_comparison(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let (_, snapshot) = state
        .sessions
        .update(id, Session::cancel_comparison)
        .await?;
    Ok(Json(snapshot))
}

/// POST /api/v1/sessions/:id/comparison/modify
pub async fn handle_modify_comparison(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let (_, snapshot) = state
        .sessions
        .update(id, Session::modify_comparison)
        .await?;
    Ok(Json(snapshot))
}

/// POST /api/v1/sessions/:id/comparison
pub async fn handle_submit_comparison(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(draft): Json<ComparisonDraft>,
) -> Result<(StatusCode, Json<SessionSnapshot>), AppError> {
    let (snapshot, _) = start_comparison(&state.sessions, state.llm.clone(), id, draft).await?;
    Ok((StatusCode::ACCEPTED, Json(snapshot)))
}
