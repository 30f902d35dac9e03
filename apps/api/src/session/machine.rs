//! Per-session view state machine.
//!
//! Top level: `Idle -> Loading -> Success | Error`, back to `Idle` on reset.
//! Nested in `Success`: the comparison flow
//! `Teaser -> Collecting -> Loading -> Ready`, with failures returning to
//! `Collecting` and `modify` clearing the report.
//!
//! Every move into a loading state hands out a `Ticket`. A completion is only
//! applied when its ticket is still current, so a reset while a call is in
//! flight makes the late answer a no-op.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use uuid::Uuid;

use crate::analysis::analyzer::AnalysisSubmission;
use crate::analysis::failure::{AnalysisFailure, FailureKind};
use crate::analysis::form::ResearcherForm;
use crate::comparison::comparator::UserProfile;
use crate::dossier::{ComparisonView, DossierView};
use crate::errors::AppError;
use crate::models::research::{AnalysisResult, ComparisonResult, ResearchPaper};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnalysisStatus {
    Idle,
    Loading,
    Success,
    Error,
}

/// What the user sees after a failed call: the fixed message plus its kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorView {
    pub kind: FailureKind,
    pub message: String,
}

impl From<&AnalysisFailure> for ErrorView {
    fn from(failure: &AnalysisFailure) -> Self {
        Self {
            kind: failure.kind(),
            message: failure.user_message().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Idle,
    Loading,
    Success(Box<AnalysisResult>),
    Error(ErrorView),
}

impl ViewState {
    pub fn status(&self) -> AnalysisStatus {
        match self {
            ViewState::Idle => AnalysisStatus::Idle,
            ViewState::Loading => AnalysisStatus::Loading,
            ViewState::Success(_) => AnalysisStatus::Success,
            ViewState::Error(_) => AnalysisStatus::Error,
        }
    }
}

/// Input of the self-comparison form: one name and one paper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub history: String,
    #[serde(default = "ResearchPaper::blank")]
    pub paper: ResearchPaper,
}

impl Default for ComparisonDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            history: String::new(),
            paper: ResearchPaper::blank(),
        }
    }
}

impl ComparisonDraft {
    pub fn to_profile(&self) -> Result<UserProfile, AppError> {
        UserProfile::try_new(&self.name, &self.history, vec![self.paper.clone()])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ComparisonFlow {
    Teaser,
    Collecting {
        draft: ComparisonDraft,
        last_error: Option<ErrorView>,
    },
    Loading {
        draft: ComparisonDraft,
    },
    Ready {
        draft: ComparisonDraft,
        result: ComparisonResult,
    },
}

impl ComparisonFlow {
    fn collecting(draft: ComparisonDraft) -> Self {
        ComparisonFlow::Collecting {
            draft,
            last_error: None,
        }
    }

    fn draft(&self) -> Option<&ComparisonDraft> {
        match self {
            ComparisonFlow::Teaser => None,
            ComparisonFlow::Collecting { draft, .. }
            | ComparisonFlow::Loading { draft }
            | ComparisonFlow::Ready { draft, .. } => Some(draft),
        }
    }
}

/// Identifies the in-flight call a completion belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    form: ResearcherForm,
    state: ViewState,
    comparison: ComparisonFlow,
    /// Comparison input kept while the sub-flow is folded back to the teaser.
    parked_draft: ComparisonDraft,
    analysis_epoch: u64,
    comparison_epoch: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    last_active: Instant,
}

impl Session {
    pub fn new(id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id,
            form: ResearcherForm::default(),
            state: ViewState::Idle,
            comparison: ComparisonFlow::Teaser,
            parked_draft: ComparisonDraft::default(),
            analysis_epoch: 0,
            comparison_epoch: 0,
            created_at: now,
            updated_at: now,
            last_active: Instant::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
        self.last_active = Instant::now();
    }

    /// Time since the last successful change.
    pub fn idle_for(&self) -> Duration {
        self.last_active.elapsed()
    }

    // ── analysis ────────────────────────────────────────────────────────────

    /// Edits the researcher form. The form is only editable while idle.
    pub fn edit_form<T>(
        &mut self,
        edit: impl FnOnce(&mut ResearcherForm) -> T,
    ) -> Result<T, AppError> {
        match self.state {
            ViewState::Idle => Ok(edit(&mut self.form)),
            _ => Err(AppError::Conflict(
                "the form can only be edited before an analysis starts".to_string(),
            )),
        }
    }

    /// `idle -> loading` with the current form. Only one analysis may be
    /// outstanding, and a shown result or error must be reset before the
    /// next submission. An invalid form leaves the session idle.
    pub fn begin_analysis(&mut self) -> Result<(Ticket, AnalysisSubmission), AppError> {
        match self.state {
            ViewState::Idle => {
                let submission = self.form.clone().into_submission()?;
                self.analysis_epoch += 1;
                self.state = ViewState::Loading;
                Ok((Ticket(self.analysis_epoch), submission))
            }
            ViewState::Loading => Err(AppError::Conflict(
                "an analysis is already in progress".to_string(),
            )),
            ViewState::Success(_) | ViewState::Error(_) => Err(AppError::Conflict(
                "reset the session before starting a new analysis".to_string(),
            )),
        }
    }

    /// `loading -> success | error`. Returns false when the ticket is stale
    /// and nothing was applied.
    pub fn complete_analysis(
        &mut self,
        ticket: Ticket,
        outcome: Result<AnalysisResult, AnalysisFailure>,
    ) -> bool {
        if ticket.0 != self.analysis_epoch || self.state != ViewState::Loading {
            return false;
        }
        self.state = match outcome {
            Ok(result) => ViewState::Success(Box::new(result)),
            Err(failure) => ViewState::Error(ErrorView::from(&failure)),
        };
        self.comparison = ComparisonFlow::Teaser;
        true
    }

    /// Start new / back / restart. Clears result, error and the comparison
    /// flow, hands back a fresh form and invalidates anything still in
    /// flight. Idempotent.
    pub fn reset(&mut self) {
        self.analysis_epoch += 1;
        self.comparison_epoch += 1;
        self.form = ResearcherForm::default();
        self.state = ViewState::Idle;
        self.comparison = ComparisonFlow::Teaser;
        self.parked_draft = ComparisonDraft::default();
    }

    fn require_result(&self) -> Result<&AnalysisResult, AppError> {
        match &self.state {
            ViewState::Success(result) => Ok(result),
            _ => Err(AppError::Conflict(
                "comparison is only available after a successful analysis".to_string(),
            )),
        }
    }

    // ── comparison ──────────────────────────────────────────────────────────

    pub fn open_comparison(&mut self) -> Result<(), AppError> {
        self.require_result()?;
        match self.comparison {
            ComparisonFlow::Teaser => {
                self.comparison = ComparisonFlow::collecting(self.parked_draft.clone());
                Ok(())
            }
            ComparisonFlow::Collecting { .. } => Ok(()),
            ComparisonFlow::Loading { .. } | ComparisonFlow::Ready { .. } => Err(AppError::Conflict(
                "comparison is already running or finished".to_string(),
            )),
        }
    }

    /// Back to the teaser from any comparison stage. The input is parked for
    /// the next `open`; a call still in flight is ignored when it lands.
    pub fn cancel_comparison(&mut self) -> Result<(), AppError> {
        self.require_result()?;
        if let Some(draft) = self.comparison.draft() {
            self.parked_draft = draft.clone();
        }
        self.comparison_epoch += 1;
        self.comparison = ComparisonFlow::Teaser;
        Ok(())
    }

    /// `collecting -> loading`. Returns the ticket, the analysis to compare
    /// against and the validated profile.
    pub fn begin_comparison(
        &mut self,
        draft: ComparisonDraft,
    ) -> Result<(Ticket, AnalysisResult, UserProfile), AppError> {
        let target = self.require_result()?.clone();
        if !matches!(self.comparison, ComparisonFlow::Collecting { .. }) {
            return Err(AppError::Conflict(
                "open the comparison form before submitting".to_string(),
            ));
        }

        let profile = draft.to_profile()?;
        self.comparison_epoch += 1;
        self.comparison = ComparisonFlow::Loading { draft };
        Ok((Ticket(self.comparison_epoch), target, profile))
    }

    /// `loading -> ready` on success; back to `collecting` with the draft and
    /// a visible error on failure.
    pub fn complete_comparison(
        &mut self,
        ticket: Ticket,
        outcome: Result<ComparisonResult, AnalysisFailure>,
    ) -> bool {
        if ticket.0 != self.comparison_epoch {
            return false;
        }
        let ComparisonFlow::Loading { draft } = &self.comparison else {
            return false;
        };
        self.comparison = match outcome {
            Ok(result) => ComparisonFlow::Ready {
                draft: draft.clone(),
                result,
            },
            Err(failure) => ComparisonFlow::Collecting {
                draft: draft.clone(),
                last_error: Some(ErrorView::from(&failure)),
            },
        };
        true
    }

    /// `ready -> collecting`, discarding the report. The input that produced
    /// it is handed back for editing.
    pub fn modify_comparison(&mut self) -> Result<(), AppError> {
        self.require_result()?;
        match &self.comparison {
            ComparisonFlow::Ready { draft, .. } => {
                self.comparison = ComparisonFlow::collecting(draft.clone());
                Ok(())
            }
            _ => Err(AppError::Conflict(
                "there is no comparison report to modify".to_string(),
            )),
        }
    }

    // ── projection ──────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> SessionSnapshot {
        let (result, dossier, comparison) = match &self.state {
            ViewState::Success(result) => (
                Some(result.as_ref().clone()),
                Some(DossierView::from_result(result)),
                Some(ComparisonSnapshot::new(&self.comparison, &result.researcher_name)),
            ),
            _ => (None, None, None),
        };
        let error = match &self.state {
            ViewState::Error(error) => Some(error.clone()),
            _ => None,
        };

        SessionSnapshot {
            id: self.id,
            status: self.state.status(),
            form: self.form.clone(),
            error,
            result,
            dossier,
            comparison,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComparisonStage {
    Teaser,
    Collecting,
    Loading,
    Ready,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonSnapshot {
    pub stage: ComparisonStage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft: Option<ComparisonDraft>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<ErrorView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ComparisonView>,
}

impl ComparisonSnapshot {
    fn new(flow: &ComparisonFlow, target_name: &str) -> Self {
        match flow {
            ComparisonFlow::Teaser => Self {
                stage: ComparisonStage::Teaser,
                draft: None,
                last_error: None,
                report: None,
            },
            ComparisonFlow::Collecting { draft, last_error } => Self {
                stage: ComparisonStage::Collecting,
                draft: Some(draft.clone()),
                last_error: last_error.clone(),
                report: None,
            },
            ComparisonFlow::Loading { draft } => Self {
                stage: ComparisonStage::Loading,
                draft: Some(draft.clone()),
                last_error: None,
                report: None,
            },
            ComparisonFlow::Ready { draft, result } => Self {
                stage: ComparisonStage::Ready,
                draft: Some(draft.clone()),
                last_error: None,
                report: Some(ComparisonView::new(target_name, result)),
            },
        }
    }
}

/// Serializable view of a session, as returned by every session endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub status: AnalysisStatus,
    pub form: ResearcherForm,
    pub error: Option<ErrorView>,
    pub result: Option<AnalysisResult>,
    pub dossier: Option<DossierView>,
    pub comparison: Option<ComparisonSnapshot>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
