use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/state", get(handlers::get_state))
        .route("/api/onboarding", post(handlers::onboarding))
        .route("/api/onboarding/open", post(handlers::open_onboarding))
        .route("/api/onboarding/close", post(handlers::close_onboarding))
        .route("/api/session/start", post(handlers::start_session))
        .route("/api/session/finish", post(handlers::finish_session))
        .route("/api/session/back", post(handlers::back))
        .route("/api/session/another", post(handlers::do_another))
        .route("/api/playback/toggle", post(handlers::toggle_playback))
        .route("/api/playback/ended", post(handlers::playback_ended))
        .route("/api/checkout", post(handlers::checkout))
        .with_state(state)
}
