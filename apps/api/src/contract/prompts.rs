//! Prompt text for the two model calls.

use crate::llm_client::prompts::{
    fill_template, INTEGER_PERCENT_INSTRUCTION, NO_CAREER_CONTEXT, SUPPLIED_TITLES_ONLY,
};
use crate::models::research::{titled_papers, AnalysisResult, ResearchPaper};

/// System instruction for the analysis call. Replace `{titles_rule}` and
/// `{integer_rule}` via `analysis_system()`.
const ANALYSIS_SYSTEM_TEMPLATE: &str = "You are a senior academic strategist. \
    Your goal is to uncover the 'hidden architecture' of a researcher's mind. \
    {titles_rule} {integer_rule}";

/// Analysis prompt template.
/// Replace: {researcher_name}, {career_context}, {papers_context}
const ANALYSIS_PROMPT_TEMPLATE: &str = r#"Perform a high-level structural analysis of the academic and professional profile for: "{researcher_name}".

Professional Context:
{career_context}

Scientific/Technical Output (The Source Material):
{papers_context}

Your tasks:
1. USE GOOGLE SEARCH to verify "{researcher_name}"'s current role, affiliation, and notable career milestones.
2. Synthesize their "Specialized Title": a unique academic brand merging career path with research.
3. Generate a "Deep Technical Summary" (approx 200 words) focusing on methodological evolution.
4. For each research topic identified in the pattern density analysis:
   - Provide an "accurate strength" score as an INTEGER percentage (0-100).
   - Provide "reasoning" (the objective finding).
   - Provide "internalLogic" (the "Way of Thinking"). Detail the pattern recognition steps used.
   - Provide "relatedPapers": an array of titles from the "Scientific/Technical Output" list above that directly support or manifest this topic.
5. Map 3-4 global peer researchers and define the "Distinctive Edge" for {researcher_name}."#;

/// Comparison prompt template.
/// Replace: {target_name}, {target_title}, {target_summary}, {target_focus},
///          {user_name}, {user_background}, {user_papers}
const COMPARISON_PROMPT_TEMPLATE: &str = r#"Compare the following two researchers for synergy and differentiation:

TARGET RESEARCHER:
Name: {target_name}
Title: {target_title}
Core Summary: {target_summary}
Technical Focus: {target_focus}

USER (YOU):
Name: {user_name}
Background: {user_background}
Research Output:
{user_papers}

Provide a JSON object comparing the two. Focus on:
1. Overlap Score (0-100 integer).
2. Thematic Synergy (How well do your topics complement each other?).
3. Competitive Advantages (What do you have that they don't, and vice versa?).
4. Collaborative Potential (Specific project ideas).
5. Niche Differentiation (Where do you diverge?).
{integer_rule}"#;

pub fn analysis_system() -> String {
    fill_template(
        ANALYSIS_SYSTEM_TEMPLATE,
        &[
            ("titles_rule", SUPPLIED_TITLES_ONLY),
            ("integer_rule", INTEGER_PERCENT_INSTRUCTION),
        ],
    )
}

/// Builds the analysis prompt. Papers with blank titles are left out and the
/// remaining ones are numbered from 1.
pub fn build_analysis_prompt(
    researcher_name: &str,
    papers: &[ResearchPaper],
    history: Option<&str>,
) -> String {
    let career_context = match history.map(str::trim).filter(|h| !h.is_empty()) {
        Some(history) => format!("Researcher's Career Background/Roles:\n{history}"),
        None => NO_CAREER_CONTEXT.to_string(),
    };

    let papers_context = titled_papers(papers)
        .enumerate()
        .map(|(i, p)| {
            format!(
                "Paper {}: Title: {}\nAbstract: {}",
                i + 1,
                p.title,
                p.r#abstract
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    fill_template(
        ANALYSIS_PROMPT_TEMPLATE,
        &[
            ("researcher_name", researcher_name.trim()),
            ("career_context", career_context.as_str()),
            ("papers_context", papers_context.as_str()),
        ],
    )
}

pub fn build_comparison_prompt(
    target: &AnalysisResult,
    user_name: &str,
    user_history: &str,
    user_papers: &[ResearchPaper],
) -> String {
    let papers = titled_papers(user_papers)
        .enumerate()
        .map(|(i, p)| format!("User Paper {}: {}\nAbstract: {}", i + 1, p.title, p.r#abstract))
        .collect::<Vec<_>>()
        .join("\n\n");
    let focus = target.methodological_focus.join(", ");

    fill_template(
        COMPARISON_PROMPT_TEMPLATE,
        &[
            ("target_name", target.researcher_name.as_str()),
            ("target_title", target.specialized_title.as_str()),
            ("target_summary", target.executive_summary.as_str()),
            ("target_focus", focus.as_str()),
            ("user_name", user_name.trim()),
            ("user_background", user_history.trim()),
            ("user_papers", papers.as_str()),
            ("integer_rule", INTEGER_PERCENT_INSTRUCTION),
        ],
    )
}
