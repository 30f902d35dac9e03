//! Declared response schemas, in the OpenAPI subset Gemini accepts.
//!
//! The field lists here must stay in step with `models::research`; the tests
//! decode a schema-shaped sample to catch drift.

use serde_json::{json, Value};

use crate::models::research::RelationshipType;

pub const TOPIC_REQUIRED: &[&str] = &[
    "topic",
    "strength",
    "reasoning",
    "internalLogic",
    "relatedPapers",
];

pub const PEER_REQUIRED: &[&str] = &[
    "name",
    "coreResearchFocus",
    "relationshipType",
    "linkageReasoning",
    "distinctiveEdge",
];

pub const ANALYSIS_REQUIRED: &[&str] = &[
    "researcherName",
    "currentAffiliation",
    "briefBio",
    "specializedTitle",
    "executiveSummary",
    "deepTechnicalSummary",
    "topicDistribution",
    "methodologicalFocus",
    "interdisciplinaryLinks",
    "suggestedNiche",
    "peerComparison",
];

pub const COMPARISON_REQUIRED: &[&str] = &[
    "overlapScore",
    "thematicSynergy",
    "competitiveAdvantages",
    "collaborativePotential",
    "nicheDifferentiation",
];

fn string() -> Value {
    json!({ "type": "STRING" })
}

fn integer() -> Value {
    json!({ "type": "INTEGER" })
}

fn string_array() -> Value {
    json!({ "type": "ARRAY", "items": string() })
}

pub fn analysis_response_schema() -> Value {
    let relationship_values: Vec<&str> =
        RelationshipType::ALL.iter().map(|r| r.as_str()).collect();

    let topic = json!({
        "type": "OBJECT",
        "properties": {
            "topic": string(),
            "strength": integer(),
            "reasoning": string(),
            "internalLogic": string(),
            "relatedPapers": string_array(),
        },
        "required": TOPIC_REQUIRED,
    });

    let peer = json!({
        "type": "OBJECT",
        "properties": {
            "name": string(),
            "coreResearchFocus": string(),
            "relationshipType": { "type": "STRING", "enum": relationship_values },
            "linkageReasoning": string(),
            "distinctiveEdge": string(),
        },
        "required": PEER_REQUIRED,
    });

    json!({
        "type": "OBJECT",
        "properties": {
            "researcherName": string(),
            "currentAffiliation": string(),
            "briefBio": string(),
            "specializedTitle": string(),
            "executiveSummary": string(),
            "deepTechnicalSummary": string(),
            "topicDistribution": { "type": "ARRAY", "items": topic },
            "methodologicalFocus": string_array(),
            "interdisciplinaryLinks": string_array(),
            "suggestedNiche": string(),
            "peerComparison": { "type": "ARRAY", "items": peer },
        },
        "required": ANALYSIS_REQUIRED,
    })
}

pub fn comparison_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "overlapScore": integer(),
            "thematicSynergy": string(),
            "competitiveAdvantages": string_array(),
            "collaborativePotential": string(),
            "nicheDifferentiation": string(),
        },
        "required": COMPARISON_REQUIRED,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::research::{fixtures, AnalysisResult, ComparisonResult};

    fn assert_required_are_declared(schema: &Value) {
        let properties = schema["properties"].as_object().unwrap();
        for field in schema["required"].as_array().unwrap() {
            let field = field.as_str().unwrap();
            assert!(properties.contains_key(field), "{field} is required but not declared");
        }
    }

    #[test]
    fn test_analysis_schema_required_fields_are_declared() {
        let schema = analysis_response_schema();
        assert_required_are_declared(&schema);
        assert_required_are_declared(&schema["properties"]["topicDistribution"]["items"]);
        assert_required_are_declared(&schema["properties"]["peerComparison"]["items"]);
    }

    #[test]
    fn test_comparison_schema_required_fields_are_declared() {
        assert_required_are_declared(&comparison_response_schema());
    }

    #[test]
    fn test_relationship_enum_is_closed_set_of_four() {
        let schema = analysis_response_schema();
        let values = &schema["properties"]["peerComparison"]["items"]["properties"]
            ["relationshipType"]["enum"];
        assert_eq!(
            values,
            &json!(["Complementary", "Competing", "Pioneer", "Contemporary"])
        );
    }

    #[test]
    fn test_scores_are_declared_as_integers() {
        let analysis = analysis_response_schema();
        assert_eq!(
            analysis["properties"]["topicDistribution"]["items"]["properties"]["strength"]["type"],
            "INTEGER"
        );
        let comparison = comparison_response_schema();
        assert_eq!(comparison["properties"]["overlapScore"]["type"], "INTEGER");
    }

    #[test]
    fn test_fixture_with_exactly_required_fields_decodes() {
        let value: Value = serde_json::from_str(&fixtures::analysis_json("X")).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        for key in ANALYSIS_REQUIRED {
            assert!(keys.contains(key));
        }
        assert!(serde_json::from_value::<AnalysisResult>(value).is_ok());

        let comparison: Value =
            serde_json::from_str(&fixtures::comparison_json(json!(10))).unwrap();
        assert_eq!(comparison.as_object().unwrap().len(), COMPARISON_REQUIRED.len());
        assert!(serde_json::from_value::<ComparisonResult>(comparison).is_ok());
    }
}
