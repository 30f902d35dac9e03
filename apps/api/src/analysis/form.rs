use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::AnalysisSubmission;
use crate::errors::AppError;
use crate::models::research::ResearchPaper;

/// The researcher form: a name, optional career history and an ordered list
/// of papers. A fresh form holds one blank paper, and the list never shrinks
/// below one entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearcherForm {
    #[serde(default)]
    pub researcher_name: String,
    #[serde(default)]
    pub history: String,
    #[serde(default = "one_blank_paper")]
    pub papers: Vec<ResearchPaper>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaperField {
    Title,
    Abstract,
}

fn one_blank_paper() -> Vec<ResearchPaper> {
    vec![ResearchPaper::blank()]
}

impl Default for ResearcherForm {
    fn default() -> Self {
        Self {
            researcher_name: String::new(),
            history: String::new(),
            papers: one_blank_paper(),
        }
    }
}

impl ResearcherForm {
    /// Appends a blank paper and returns its id.
    pub fn add_paper(&mut self) -> String {
        let paper = ResearchPaper::blank();
        let id = paper.id.clone();
        self.papers.push(paper);
        id
    }

    /// Removes a paper by id. Does nothing when it is the last one left.
    pub fn remove_paper(&mut self, id: &str) -> bool {
        if self.papers.len() <= 1 {
            return false;
        }
        let before = self.papers.len();
        self.papers.retain(|p| p.id != id);
        self.papers.len() != before
    }

    pub fn update_paper(&mut self, id: &str, field: PaperField, value: impl Into<String>) -> bool {
        let Some(paper) = self.papers.iter_mut().find(|p| p.id == id) else {
            return false;
        };
        match field {
            PaperField::Title => paper.title = value.into(),
            PaperField::Abstract => paper.r#abstract = value.into(),
        }
        true
    }

    /// Restores the one-paper minimum after the list was replaced wholesale.
    pub fn ensure_one_paper(&mut self) {
        if self.papers.is_empty() {
            self.papers = one_blank_paper();
        }
    }

    /// Validates the form. Fails when the name is blank.
    pub fn into_submission(self) -> Result<AnalysisSubmission, AppError> {
        let history = Some(self.history);
        AnalysisSubmission::try_new(&self.researcher_name, self.papers, history)
    }
}
