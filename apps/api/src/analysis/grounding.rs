//! Post-processing of a decoded analysis: citation sources and the
//! `relatedPapers` cross-field check.

use std::collections::HashSet;

use tracing::debug;

use crate::llm_client::GroundingMetadata;
use crate::models::research::{titled_papers, AnalysisResult, GroundingSource, ResearchPaper};

/// Title used when a web citation arrives without one.
pub const DEFAULT_SOURCE_TITLE: &str = "Academic Source";

/// Keeps only web citations that carry a URI.
pub fn extract_sources(metadata: &GroundingMetadata) -> Vec<GroundingSource> {
    metadata
        .grounding_chunks
        .iter()
        .filter_map(|chunk| chunk.web.as_ref())
        .filter_map(|web| {
            let uri = web.uri.as_deref().map(str::trim).filter(|u| !u.is_empty())?;
            let title = web
                .title
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .unwrap_or(DEFAULT_SOURCE_TITLE);
            Some(GroundingSource {
                title: title.to_string(),
                uri: uri.to_string(),
            })
        })
        .collect()
}

/// Restricts every topic's `relatedPapers` to titles the user supplied.
///
/// Matching ignores case and surrounding whitespace; kept entries take the
/// supplied spelling. Duplicates collapse to their first occurrence.
/// Returns how many entries were dropped.
pub fn reconcile_related_papers(result: &mut AnalysisResult, supplied: &[ResearchPaper]) -> usize {
    let known: Vec<(String, &str)> = titled_papers(supplied)
        .map(|p| (normalize(&p.title), p.title.trim()))
        .collect();

    let mut dropped = 0;
    for topic in &mut result.topic_distribution {
        let mut seen = HashSet::new();
        let mut kept = Vec::with_capacity(topic.related_papers.len());

        for title in &topic.related_papers {
            let key = normalize(title);
            match known.iter().find(|(k, _)| *k == key) {
                Some((_, canonical)) => {
                    if seen.insert(key) {
                        kept.push(canonical.to_string());
                    }
                }
                None => {
                    debug!(
                        "Dropping related paper '{}' for topic '{}': not among supplied titles",
                        title, topic.topic
                    );
                    dropped += 1;
                }
            }
        }

        topic.related_papers = kept;
    }
    dropped
}

fn normalize(title: &str) -> String {
    title.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::web_chunk;
    use crate::llm_client::GroundingChunk;
    use crate::models::research::fixtures;

    #[test]
    fn test_extract_sources_filters_non_web_and_defaults_title() {
        let metadata = GroundingMetadata {
            grounding_chunks: vec![
                web_chunk(Some("Lab page"), Some("https://lab.example.org")),
                GroundingChunk { web: None },
                web_chunk(None, Some("https://scholar.example.org")),
                web_chunk(Some("  "), Some("https://blank-title.example.org")),
                web_chunk(Some("No link"), None),
            ],
        };

        let sources = extract_sources(&metadata);

        assert_eq!(
            sources,
            vec![
                GroundingSource {
                    title: "Lab page".to_string(),
                    uri: "https://lab.example.org".to_string(),
                },
                GroundingSource {
                    title: DEFAULT_SOURCE_TITLE.to_string(),
                    uri: "https://scholar.example.org".to_string(),
                },
                GroundingSource {
                    title: DEFAULT_SOURCE_TITLE.to_string(),
                    uri: "https://blank-title.example.org".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_extract_sources_empty_metadata() {
        assert!(extract_sources(&GroundingMetadata::default()).is_empty());
    }

    #[test]
    fn test_reconcile_keeps_supplied_titles_with_canonical_spelling() {
        let mut result = fixtures::analysis_result("X");
        result.topic_distribution[0].related_papers = vec![
            "stochastic flocks ".to_string(),
            "Invented Paper".to_string(),
            "STOCHASTIC FLOCKS".to_string(),
        ];
        let supplied = vec![
            ResearchPaper::new("Stochastic Flocks", "abs"),
            ResearchPaper::new("", "ignored"),
        ];

        let dropped = reconcile_related_papers(&mut result, &supplied);

        assert_eq!(dropped, 1);
        assert_eq!(
            result.topic_distribution[0].related_papers,
            vec!["Stochastic Flocks".to_string()]
        );
    }

    #[test]
    fn test_reconcile_with_no_papers_clears_everything() {
        let mut result = fixtures::analysis_result("X");
        let dropped = reconcile_related_papers(&mut result, &[]);
        assert_eq!(dropped, 1);
        assert!(result
            .topic_distribution
            .iter()
            .all(|t| t.related_papers.is_empty()));
    }
}
