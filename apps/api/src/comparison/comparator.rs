use serde::Deserialize;
use tracing::{error, info};

use crate::analysis::failure::AnalysisFailure;
use crate::contract::prompts::build_comparison_prompt;
use crate::contract::schema::comparison_response_schema;
use crate::errors::AppError;
use crate::llm_client::{call_json, ModelBackend, ModelRequest};
use crate::models::research::{AnalysisResult, ComparisonResult, ResearchPaper};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub history: String,
    #[serde(default)]
    pub papers: Vec<ResearchPaper>,
}

/// The "you" side of a self-comparison. Requires a name and at least one
/// titled paper.
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    name: String,
    history: String,
    papers: Vec<ResearchPaper>,
}

impl UserProfile {
    pub fn try_new(
        name: &str,
        history: &str,
        papers: Vec<ResearchPaper>,
    ) -> Result<Self, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("name cannot be empty".to_string()));
        }

        let papers: Vec<ResearchPaper> = papers.into_iter().filter(|p| p.has_title()).collect();
        if papers.is_empty() {
            return Err(AppError::Validation(
                "at least one paper title is required".to_string(),
            ));
        }

        Ok(Self {
            name: name.to_string(),
            history: history.trim().to_string(),
            papers,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl TryFrom<UserProfileRequest> for UserProfile {
    type Error = AppError;

    fn try_from(request: UserProfileRequest) -> Result<Self, Self::Error> {
        Self::try_new(&request.name, &request.history, request.papers)
    }
}

pub fn comparison_request(target: &AnalysisResult, profile: &UserProfile) -> ModelRequest {
    ModelRequest {
        prompt: build_comparison_prompt(target, &profile.name, &profile.history, &profile.papers),
        system: None,
        response_schema: comparison_response_schema(),
        web_search: false,
    }
}

/// Runs the comparison call. Failures are logged here and returned to the
/// caller, which decides how to surface them.
pub async fn compare_with_user(
    backend: &dyn ModelBackend,
    target: &AnalysisResult,
    profile: &UserProfile,
) -> Result<ComparisonResult, AnalysisFailure> {
    info!(
        "Requesting comparison of '{}' against '{}'",
        profile.name, target.researcher_name
    );

    let request = comparison_request(target, profile);
    let (result, _) = call_json::<ComparisonResult>(backend, &request)
        .await
        .map_err(|e| {
            error!("Comparison call failed: {e}");
            AnalysisFailure::from(e)
        })?;

    info!("Comparison complete: overlap {}", result.overlap_score);
    Ok(result)
}
