//! Analysis Client: one schema-constrained, web-grounded model call per
//! submission. No retries and no caching: the same input re-submitted is a
//! fresh call.

use tracing::{error, info, warn};

use crate::analysis::failure::AnalysisFailure;
use crate::analysis::grounding::{extract_sources, reconcile_related_papers};
use crate::contract::prompts::{analysis_system, build_analysis_prompt};
use crate::contract::schema::analysis_response_schema;
use crate::errors::AppError;
use crate::llm_client::{call_json, ModelBackend, ModelRequest};
use crate::models::research::{AnalysisResult, ResearchPaper};

/// A validated submission: trimmed non-empty name, only titled papers,
/// history `None` when blank.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSubmission {
    researcher_name: String,
    papers: Vec<ResearchPaper>,
    history: Option<String>,
}

impl AnalysisSubmission {
    pub fn try_new(
        researcher_name: &str,
        papers: Vec<ResearchPaper>,
        history: Option<String>,
    ) -> Result<Self, AppError> {
        let researcher_name = researcher_name.trim();
        if researcher_name.is_empty() {
            return Err(AppError::Validation(
                "researcherName cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            researcher_name: researcher_name.to_string(),
            papers: papers.into_iter().filter(|p| p.has_title()).collect(),
            history: history.filter(|h| !h.trim().is_empty()),
        })
    }

    pub fn researcher_name(&self) -> &str {
        &self.researcher_name
    }

    pub fn papers(&self) -> &[ResearchPaper] {
        &self.papers
    }

    pub fn history(&self) -> Option<&str> {
        self.history.as_deref()
    }
}

pub fn analysis_request(submission: &AnalysisSubmission) -> ModelRequest {
    ModelRequest {
        prompt: build_analysis_prompt(
            submission.researcher_name(),
            submission.papers(),
            submission.history(),
        ),
        system: Some(analysis_system()),
        response_schema: analysis_response_schema(),
        web_search: true,
    }
}

/// Runs the analysis call and shapes the answer into an `AnalysisResult`.
pub async fn analyze_research(
    backend: &dyn ModelBackend,
    submission: &AnalysisSubmission,
) -> Result<AnalysisResult, AnalysisFailure> {
    info!(
        "Requesting analysis for '{}' ({} papers)",
        submission.researcher_name(),
        submission.papers().len()
    );

    let request = analysis_request(submission);
    let (mut result, response) = call_json::<AnalysisResult>(backend, &request)
        .await
        .map_err(|e| {
            error!("Analysis call failed: {e}");
            AnalysisFailure::from(e)
        })?;

    let dropped = reconcile_related_papers(&mut result, submission.papers());
    if dropped > 0 {
        warn!(
            "Analysis for '{}': dropped {dropped} related paper(s) not among the supplied titles",
            submission.researcher_name()
        );
    }

    if let Some(grounding) = response.grounding() {
        result.sources = Some(extract_sources(grounding));
    }

    info!(
        "Analysis complete for '{}': {} topics, {} peers",
        result.researcher_name,
        result.topic_distribution.len(),
        result.peer_comparison.len()
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::failure::FailureKind;
    use crate::analysis::grounding::DEFAULT_SOURCE_TITLE;
    use crate::llm_client::testing::{web_chunk, ScriptedBackend};
    use crate::llm_client::{LlmError, ModelResponse};
    use crate::models::research::fixtures;

    fn submission() -> AnalysisSubmission {
        AnalysisSubmission::try_new(
            "Dr. Elena Vance",
            vec![
                ResearchPaper::new("", "x"),
                ResearchPaper::new("Stochastic Flocks", "y"),
            ],
            Some("Group lead".to_string()),
        )
        .unwrap()
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let err = AnalysisSubmission::try_new("   ", vec![], None).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_submission_drops_blank_titles_and_blank_history() {
        let submission = AnalysisSubmission::try_new(
            " Ada ",
            vec![ResearchPaper::new(" ", "x"), ResearchPaper::new("A", "y")],
            Some("  ".to_string()),
        )
        .unwrap();
        assert_eq!(submission.researcher_name(), "Ada");
        assert_eq!(submission.papers().len(), 1);
        assert_eq!(submission.papers()[0].title, "A");
        assert_eq!(submission.history(), None);
    }

    #[test]
    fn test_analysis_request_enables_web_search_and_schema() {
        let request = analysis_request(&submission());
        assert!(request.web_search);
        assert!(request.system.is_some());
        assert_eq!(request.response_schema["type"], "OBJECT");
        assert!(request.prompt.contains("Paper 1: Title: Stochastic Flocks"));
        assert!(!request.prompt.contains("Abstract: x"));
    }

    #[tokio::test]
    async fn test_analyze_returns_result_with_sources() {
        let response = ModelResponse::from_text(fixtures::analysis_json("Dr. Elena Vance"))
            .with_grounding(vec![
                web_chunk(Some("Faculty page"), Some("https://uni.example.org/vance")),
                web_chunk(None, Some("https://scholar.example.org/vance")),
            ]);
        let backend = ScriptedBackend::answering(Ok(response));

        let result = analyze_research(&backend, &submission()).await.unwrap();

        assert_eq!(result.researcher_name, "Dr. Elena Vance");
        let sources = result.sources.unwrap();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[1].title, DEFAULT_SOURCE_TITLE);
        assert_eq!(backend.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_analyze_drops_related_papers_not_supplied() {
        let mut json: serde_json::Value =
            serde_json::from_str(&fixtures::analysis_json("X")).unwrap();
        json["topicDistribution"][0]["relatedPapers"] =
            serde_json::json!(["stochastic flocks ", "Invented Paper"]);
        let backend = ScriptedBackend::answering(Ok(ModelResponse::from_text(json.to_string())));

        let result = analyze_research(&backend, &submission()).await.unwrap();

        assert_eq!(
            result.topic_distribution[0].related_papers,
            vec!["Stochastic Flocks".to_string()]
        );
    }

    #[tokio::test]
    async fn test_analyze_without_grounding_leaves_sources_absent() {
        let backend = ScriptedBackend::answering(Ok(ModelResponse::from_text(
            fixtures::analysis_json("X"),
        )));
        let result = analyze_research(&backend, &submission()).await.unwrap();
        assert!(result.sources.is_none());
    }

    #[tokio::test]
    async fn test_analyze_malformed_json_is_schema_violation() {
        let backend =
            ScriptedBackend::answering(Ok(ModelResponse::from_text("{\"researcherName\": 1")));
        let failure = analyze_research(&backend, &submission()).await.unwrap_err();
        assert_eq!(failure.kind(), FailureKind::SchemaViolation);
    }

    #[tokio::test]
    async fn test_analyze_missing_field_is_schema_violation() {
        let backend = ScriptedBackend::answering(Ok(ModelResponse::from_text(
            r#"{"researcherName": "X"}"#,
        )));
        let failure = analyze_research(&backend, &submission()).await.unwrap_err();
        assert_eq!(failure.kind(), FailureKind::SchemaViolation);
    }

    #[tokio::test]
    async fn test_analyze_does_not_retry() {
        let backend = ScriptedBackend::answering(Err(LlmError::Api {
            status: 503,
            message: "overloaded".to_string(),
        }));
        backend.push(Ok(ModelResponse::from_text(fixtures::analysis_json("X"))));

        let failure = analyze_research(&backend, &submission()).await.unwrap_err();

        assert_eq!(failure.kind(), FailureKind::NetworkFailure);
        assert_eq!(backend.requests().len(), 1);
    }
}
