//! Stateless Axum handlers: one model call per request, no session involved.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::analysis::analyzer::analyze_research;
use crate::analysis::form::ResearcherForm;
use crate::comparison::comparator::{compare_with_user, UserProfile, UserProfileRequest};
use crate::errors::AppError;
use crate::models::research::{AnalysisResult, ComparisonResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    pub target: AnalysisResult,
    pub profile: UserProfileRequest,
}

/// POST /api/v1/analyze
///
/// Runs one analysis call and returns the structured dossier data.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(form): Json<ResearcherForm>,
) -> Result<Json<AnalysisResult>, AppError> {
    let submission = form.into_submission()?;
    let result = analyze_research(state.llm.as_ref(), &submission).await?;
    Ok(Json(result))
}

/// POST /api/v1/compare
///
/// Compares a user profile against a previously returned analysis.
pub async fn handle_compare(
    State(state): State<AppState>,
    Json(request): Json<CompareRequest>,
) -> Result<Json<ComparisonResult>, AppError> {
    let profile = UserProfile::try_from(request.profile)?;
    let result = compare_with_user(state.llm.as_ref(), &request.target, &profile).await?;
    Ok(Json(result))
}
