use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// A single publication supplied by the user. Ids only need to be unique
/// within one submission; one is generated when the caller omits it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchPaper {
    #[serde(default = "new_paper_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub r#abstract: String,
}

fn new_paper_id() -> String {
    Uuid::new_v4().to_string()
}

impl ResearchPaper {
    pub fn new(title: impl Into<String>, r#abstract: impl Into<String>) -> Self {
        Self {
            id: new_paper_id(),
            title: title.into(),
            r#abstract: r#abstract.into(),
        }
    }

    pub fn blank() -> Self {
        Self::new("", "")
    }

    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }
}

/// Papers that will actually be sent to the model: blank titles are dropped.
pub fn titled_papers(papers: &[ResearchPaper]) -> impl Iterator<Item = &ResearchPaper> {
    papers.iter().filter(|p| p.has_title())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicInsight {
    pub topic: String,
    /// Requested as 0-100, stored exactly as returned (no clamping).
    #[serde(deserialize_with = "lenient_integer")]
    pub strength: i64,
    pub reasoning: String,
    pub internal_logic: String,
    pub related_papers: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelationshipType {
    Complementary,
    Competing,
    Pioneer,
    Contemporary,
}

impl RelationshipType {
    pub const ALL: [RelationshipType; 4] = [
        RelationshipType::Complementary,
        RelationshipType::Competing,
        RelationshipType::Pioneer,
        RelationshipType::Contemporary,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipType::Complementary => "Complementary",
            RelationshipType::Competing => "Competing",
            RelationshipType::Pioneer => "Pioneer",
            RelationshipType::Contemporary => "Contemporary",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerResearcher {
    pub name: String,
    pub core_research_focus: String,
    pub relationship_type: RelationshipType,
    pub linkage_reasoning: String,
    pub distinctive_edge: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundingSource {
    pub title: String,
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    #[serde(deserialize_with = "lenient_integer")]
    pub overlap_score: i64,
    pub thematic_synergy: String,
    pub competitive_advantages: Vec<String>,
    pub collaborative_potential: String,
    pub niche_differentiation: String,
}

/// Full dossier returned by the analysis call. Only `sources` is attached
/// after decoding; everything else comes straight from the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub researcher_name: String,
    pub current_affiliation: String,
    pub brief_bio: String,
    pub specialized_title: String,
    pub executive_summary: String,
    pub deep_technical_summary: String,
    pub topic_distribution: Vec<TopicInsight>,
    pub methodological_focus: Vec<String>,
    pub interdisciplinary_links: Vec<String>,
    pub suggested_niche: String,
    pub peer_comparison: Vec<PeerResearcher>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<GroundingSource>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_comparison: Option<ComparisonResult>,
}

/// Accepts any JSON number and rounds it to the nearest integer.
/// The schema asks for INTEGER but models occasionally emit `87.0`.
fn lenient_integer<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if !value.is_finite() {
        return Err(serde::de::Error::custom("score must be a finite number"));
    }
    Ok(value.round() as i64)
}
