use axum::{
    extract::{rejection::JsonRejection, State},
    routing::put,
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{MessageResponse, PasswordRequest, ProfileRequest, ProfileResponse},
    services,
};
use crate::{
    auth::extractors::AuthUser, error::AppResult, settings::model::UpdateOutcome,
    state::AppState,
};

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/settings/profile", put(update_profile))
        .route("/settings/password", put(update_password))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    payload: Result<Json<ProfileRequest>, JsonRejection>,
) -> AppResult<Json<ProfileResponse>> {
    let Json(patch) = payload?;
    let outcome = services::update_profile(&state, &user, patch).await?;
    let message = match outcome {
        UpdateOutcome::Updated(_) => "Profile updated successfully",
        UpdateOutcome::Unchanged(_) => "No changes made to profile",
    };
    Ok(Json(ProfileResponse {
        message,
        user: outcome.value().into(),
    }))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn update_password(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    payload: Result<Json<PasswordRequest>, JsonRejection>,
) -> AppResult<Json<MessageResponse>> {
    let Json(req) = payload?;
    services::update_password(&state, &user, req).await?;
    Ok(Json(MessageResponse {
        message: "Password updated successfully",
    }))
}
