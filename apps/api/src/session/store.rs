use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};
use uuid::Uuid;

use crate::analysis::analyzer::analyze_research;
use crate::comparison::comparator::compare_with_user;
use crate::errors::AppError;
use crate::llm_client::ModelBackend;
use crate::session::machine::{ComparisonDraft, Session, SessionSnapshot};

/// In-memory session table. Nothing survives a restart.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self) -> SessionSnapshot {
        let session = Session::new(Uuid::new_v4());
        let snapshot = session.snapshot();
        self.sessions.write().await.insert(session.id(), session);
        info!("Session {} created", snapshot.id);
        snapshot
    }

    pub async fn snapshot(&self, id: Uuid) -> Result<SessionSnapshot, AppError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .map(Session::snapshot)
            .ok_or_else(|| not_found(id))
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        self.sessions
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found(id))
    }

    /// Applies `change` under the write lock. The timestamp is bumped only
    /// when the change succeeds.
    pub async fn update<T>(
        &self,
        id: Uuid,
        change: impl FnOnce(&mut Session) -> Result<T, AppError>,
    ) -> Result<(T, SessionSnapshot), AppError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id).ok_or_else(|| not_found(id))?;
        let value = change(session)?;
        session.touch();
        Ok((value, session.snapshot()))
    }

    /// Drops every session idle for longer than `ttl`. Returns how many went.
    pub async fn evict_idle(&self, ttl: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|id, session| {
            let keep = session.idle_for() <= ttl;
            if !keep {
                debug!("Session {id} expired");
            }
            keep
        });
        before - sessions.len()
    }

    /// Starts the background sweeper that expires idle sessions every
    /// `period`.
    pub fn spawn_sweeper(&self, ttl: Duration, period: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                let evicted = store.evict_idle(ttl).await;
                if evicted > 0 {
                    info!("Expired {evicted} idle sessions");
                }
            }
        })
    }

    /// Runs `apply` against the session if it still exists. Used for
    /// completions, where a deleted session is not an error.
    async fn settle(&self, id: Uuid, apply: impl FnOnce(&mut Session) -> bool) -> bool {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(&id) {
            Some(session) => {
                let applied = apply(session);
                if applied {
                    session.touch();
                }
                applied
            }
            None => false,
        }
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("session {id} not found"))
}

/// Submits the session's form: moves it to loading and runs the analysis in
/// the background. The returned snapshot already shows the loading state; the
/// handle resolves once the outcome has been applied or discarded.
pub async fn start_analysis(
    store: &SessionStore,
    backend: Arc<dyn ModelBackend>,
    id: Uuid,
) -> Result<(SessionSnapshot, JoinHandle<()>), AppError> {
    let ((ticket, submission), snapshot) = store.update(id, Session::begin_analysis).await?;

    let store = store.clone();
    let handle = tokio::spawn(async move {
        let outcome = analyze_research(backend.as_ref(), &submission).await;
        if !store
            .settle(id, |session| session.complete_analysis(ticket, outcome))
            .await
        {
            debug!("Session {id}: discarded stale analysis outcome");
        }
    });

    Ok((snapshot, handle))
}

/// Comparison counterpart of [`start_analysis`].
pub async fn start_comparison(
    store: &SessionStore,
    backend: Arc<dyn ModelBackend>,
    id: Uuid,
    draft: ComparisonDraft,
) -> Result<(SessionSnapshot, JoinHandle<()>), AppError> {
    let ((ticket, target, profile), snapshot) = store
        .update(id, |session| session.begin_comparison(draft))
        .await?;
    info!("Session {id}: comparing '{}'", profile.name());

    let store = store.clone();
    let handle = tokio::spawn(async move {
        let outcome = compare_with_user(backend.as_ref(), &target, &profile).await;
        if !store
            .settle(id, |session| session.complete_comparison(ticket, outcome))
            .await
        {
            debug!("Session {id}: discarded stale comparison outcome");
        }
    });

    Ok((snapshot, handle))
}
