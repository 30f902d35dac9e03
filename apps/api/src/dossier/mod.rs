//! Dossier view model: a read-only projection of an `AnalysisResult` for
//! rendering. Nothing here calls the model or changes the result.

use serde::Serialize;

use crate::models::research::{AnalysisResult, ComparisonResult, GroundingSource};

/// Upper bound of every displayed score.
pub const FULL_MARK: u8 = 100;

/// Clamps a raw model score into the displayable 0-100 range.
/// The stored result keeps the raw value.
pub fn display_percent(raw: i64) -> u8 {
    raw.clamp(0, FULL_MARK as i64) as u8
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileHeader {
    pub researcher_name: String,
    pub specialized_title: String,
    pub current_affiliation: String,
    pub brief_bio: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Narrative {
    pub executive_summary: String,
    pub deep_technical_summary: String,
    pub suggested_niche: String,
    pub methodological_focus: Vec<String>,
    pub interdisciplinary_links: Vec<String>,
}

/// One expandable topic card. `internalLogic` and `relatedPapers` are the
/// expanded part.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicCard {
    pub topic: String,
    pub raw_strength: i64,
    pub display_percent: u8,
    pub reasoning: String,
    pub internal_logic: String,
    pub related_papers: Vec<String>,
}

/// One spoke of the radial strength chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub topic: String,
    pub value: u8,
    pub full_mark: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerCard {
    pub name: String,
    pub relationship_tag: &'static str,
    pub core_research_focus: String,
    pub linkage_reasoning: String,
    pub distinctive_edge: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DossierView {
    pub header: ProfileHeader,
    pub narrative: Narrative,
    pub topics: Vec<TopicCard>,
    pub chart: Vec<ChartPoint>,
    pub peers: Vec<PeerCard>,
    pub sources: Vec<GroundingSource>,
}

impl DossierView {
    pub fn from_result(result: &AnalysisResult) -> Self {
        let topics = result
            .topic_distribution
            .iter()
            .map(|t| TopicCard {
                topic: t.topic.clone(),
                raw_strength: t.strength,
                display_percent: display_percent(t.strength),
                reasoning: t.reasoning.clone(),
                internal_logic: t.internal_logic.clone(),
                related_papers: t.related_papers.clone(),
            })
            .collect();

        let chart = result
            .topic_distribution
            .iter()
            .map(|t| ChartPoint {
                topic: t.topic.clone(),
                value: display_percent(t.strength),
                full_mark: FULL_MARK,
            })
            .collect();

        let peers = result
            .peer_comparison
            .iter()
            .map(|p| PeerCard {
                name: p.name.clone(),
                relationship_tag: p.relationship_type.as_str(),
                core_research_focus: p.core_research_focus.clone(),
                linkage_reasoning: p.linkage_reasoning.clone(),
                distinctive_edge: p.distinctive_edge.clone(),
            })
            .collect();

        Self {
            header: ProfileHeader {
                researcher_name: result.researcher_name.clone(),
                specialized_title: result.specialized_title.clone(),
                current_affiliation: result.current_affiliation.clone(),
                brief_bio: result.brief_bio.clone(),
            },
            narrative: Narrative {
                executive_summary: result.executive_summary.clone(),
                deep_technical_summary: result.deep_technical_summary.clone(),
                suggested_niche: result.suggested_niche.clone(),
                methodological_focus: result.methodological_focus.clone(),
                interdisciplinary_links: result.interdisciplinary_links.clone(),
            },
            topics,
            chart,
            peers,
            sources: result.sources.clone().unwrap_or_default(),
        }
    }
}

/// The synergy report shown once a self-comparison has finished.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonView {
    pub target_name: String,
    pub raw_overlap_score: i64,
    pub overlap_percent: u8,
    pub thematic_synergy: String,
    pub competitive_advantages: Vec<String>,
    pub collaborative_potential: String,
    pub niche_differentiation: String,
}

impl ComparisonView {
    pub fn new(target_name: &str, result: &ComparisonResult) -> Self {
        Self {
            target_name: target_name.to_string(),
            raw_overlap_score: result.overlap_score,
            overlap_percent: display_percent(result.overlap_score),
            thematic_synergy: result.thematic_synergy.clone(),
            competitive_advantages: result.competitive_advantages.clone(),
            collaborative_potential: result.collaborative_potential.clone(),
            niche_differentiation: result.niche_differentiation.clone(),
        }
    }
}
