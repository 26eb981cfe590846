pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

use crate::media;
use crate::pages::{careers, dashboard, skills, vault, verification};
use crate::session;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Public verification (no session required)
        .route("/verify", get(verification::handle_verify))
        // Session
        .route("/api/v1/session", get(session::handle_get_session))
        .route("/api/v1/session/logout", post(session::handle_logout))
        // Dashboard
        .route("/api/v1/dashboard", get(dashboard::handle_get_dashboard))
        // Certificate vault
        .route("/api/v1/vault", get(vault::handle_get_vault))
        .route(
            "/api/v1/vault/certificates",
            post(vault::handle_add_certificate),
        )
        .route(
            "/api/v1/vault/certificates/:id",
            delete(vault::handle_delete_certificate),
        )
        // Skills inventory
        .route(
            "/api/v1/skills",
            get(skills::handle_get_skills).post(skills::handle_add_skill),
        )
        .route("/api/v1/skills/:id", delete(skills::handle_delete_skill))
        // Career recommendations (read-only)
        .route("/api/v1/careers", get(careers::handle_get_careers))
        // Media uploads. The route-level body limit must clear the largest
        // allowed file; the per-kind ceilings are enforced in validate_file.
        .route(
            "/api/v1/media",
            post(media::handle_upload).layer(DefaultBodyLimit::max(media::UPLOAD_BODY_LIMIT)),
        )
        .with_state(state)
}
