use crate::errors::AppError;
use crate::models::{CheckoutRequest, ControllerSnapshot, OnboardingRequest, Profile};
use crate::state::AppState;
use crate::ui::render_index;
use axum::{extract::State, response::Html, Json};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let mut controller = state.controller.lock().await;
    controller.sync_playback();
    Html(render_index(&controller.snapshot()))
}

pub async fn get_state(State(state): State<AppState>) -> Json<ControllerSnapshot> {
    let mut controller = state.controller.lock().await;
    controller.sync_playback();
    Json(controller.snapshot())
}

pub async fn onboarding(
    State(state): State<AppState>,
    Json(payload): Json<OnboardingRequest>,
) -> Result<Json<ControllerSnapshot>, AppError> {
    let profile = Profile::new(&payload.name, payload.goal, payload.length, &payload.reminder);
    let mut controller = state.controller.lock().await;
    controller.complete_onboarding(profile, payload.mood).await?;
    Ok(Json(controller.snapshot()))
}

pub async fn open_onboarding(State(state): State<AppState>) -> Json<ControllerSnapshot> {
    let mut controller = state.controller.lock().await;
    controller.open_onboarding();
    Json(controller.snapshot())
}

pub async fn close_onboarding(State(state): State<AppState>) -> Json<ControllerSnapshot> {
    let mut controller = state.controller.lock().await;
    controller.close_onboarding();
    Json(controller.snapshot())
}

pub async fn start_session(State(state): State<AppState>) -> Json<ControllerSnapshot> {
    let mut controller = state.controller.lock().await;
    controller.start_session().await;
    Json(controller.snapshot())
}

pub async fn finish_session(State(state): State<AppState>) -> Json<ControllerSnapshot> {
    let mut controller = state.controller.lock().await;
    controller.finish_session();
    Json(controller.snapshot())
}

pub async fn back(State(state): State<AppState>) -> Json<ControllerSnapshot> {
    let mut controller = state.controller.lock().await;
    controller.back();
    Json(controller.snapshot())
}

pub async fn do_another(State(state): State<AppState>) -> Json<ControllerSnapshot> {
    let mut controller = state.controller.lock().await;
    controller.do_another();
    Json(controller.snapshot())
}

pub async fn toggle_playback(State(state): State<AppState>) -> Json<ControllerSnapshot> {
    let mut controller = state.controller.lock().await;
    controller.toggle_playback();
    Json(controller.snapshot())
}

pub async fn playback_ended(State(state): State<AppState>) -> Json<ControllerSnapshot> {
    let mut controller = state.controller.lock().await;
    controller.playback_ended();
    Json(controller.snapshot())
}

pub async fn checkout(
    State(state): State<AppState>,
    Json(payload): Json<CheckoutRequest>,
) -> Result<Json<ControllerSnapshot>, AppError> {
    let mut controller = state.controller.lock().await;
    controller
        .submit_checkout(payload.mood_after, &payload.notes)
        .await?;
    Ok(Json(controller.snapshot()))
}
