pub mod health;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::session::handlers as session;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Stateless calls
        .route("/api/v1/analyze", post(analysis::handle_analyze))
        .route("/api/v1/compare", post(analysis::handle_compare))
        // Page sessions
        .route("/api/v1/sessions", post(session::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(session::handle_get_session).delete(session::handle_delete_session),
        )
        .route("/api/v1/sessions/:id/form", put(session::handle_replace_form))
        .route(
            "/api/v1/sessions/:id/form/papers",
            post(session::handle_add_paper),
        )
        .route(
            "/api/v1/sessions/:id/form/papers/:paper_id",
            delete(session::handle_remove_paper).patch(session::handle_update_paper),
        )
        .route(
            "/api/v1/sessions/:id/analysis",
            post(session::handle_submit_analysis),
        )
        .route("/api/v1/sessions/:id/reset", post(session::handle_reset))
        .route(
            "/api/v1/sessions/:id/comparison",
            post(session::handle_submit_comparison),
        )
        .route(
            "/api/v1/sessions/:id/comparison/open",
            post(session::handle_open_comparison),
        )
        .route(
            "/api/v1/sessions/:id/comparison/cancel",
            post(session::handle_cancel_comparison),
        )
        .route(
            "/api/v1/sessions/:id/comparison/modify",
            post(session::handle_modify_comparison),
        )
        .with_state(state)
}
