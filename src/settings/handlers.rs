use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, put},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::instrument;

use super::{
    dto::{scalar_value, SettingsView},
    fields::SettingsGroup,
    model::{ScalarField, UpdateOutcome},
    services,
};
use crate::{auth::extractors::AuthUser, error::AppResult, state::AppState};

pub fn settings_routes() -> Router<AppState> {
    Router::new()
        .route("/settings", get(get_settings))
        .route("/settings/theme", put(update_theme))
        .route("/settings/currency", put(update_currency))
        .route("/settings/language", put(update_language))
        .route("/settings/notifications", put(update_notifications))
        .route("/settings/privacy", put(update_privacy))
        .route("/settings/dashboard", put(update_dashboard))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn get_settings(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> AppResult<Json<SettingsView>> {
    let settings = services::get_or_create(&state, user.id).await?;
    Ok(Json(settings.into()))
}

async fn scalar(
    state: &AppState,
    user: AuthUser,
    field: ScalarField,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let Json(body) = payload?;
    let value = scalar_value(&body, field)?;
    let outcome = services::update_scalar(state, user.0.id, field, value).await?;
    let message = match &outcome {
        UpdateOutcome::Updated(_) => format!("{} updated successfully", field.label()),
        UpdateOutcome::Unchanged(_) => format!("No changes made to {}", field.name()),
    };
    Ok(Json(json!({
        "message": message,
        field.name(): outcome.into_inner(),
    })))
}

#[instrument(skip_all, fields(user_id = %user.0.id))]
pub async fn update_theme(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<Value>> {
    scalar(&state, user, ScalarField::Theme, payload).await
}

#[instrument(skip_all, fields(user_id = %user.0.id))]
pub async fn update_currency(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<Value>> {
    scalar(&state, user, ScalarField::Currency, payload).await
}

#[instrument(skip_all, fields(user_id = %user.0.id))]
pub async fn update_language(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<Value>> {
    scalar(&state, user, ScalarField::Language, payload).await
}

async fn group(
    state: &AppState,
    user: AuthUser,
    group: SettingsGroup,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let Json(body) = payload?;
    let outcome = services::update_group(state, user.0.id, group, &body).await?;
    let message = match &outcome {
        UpdateOutcome::Updated(_) => format!("{} settings updated successfully", group.label()),
        UpdateOutcome::Unchanged(_) => "No changes made".to_string(),
    };
    Ok(Json(json!({
        "message": message,
        group.name(): outcome.into_inner(),
    })))
}

#[instrument(skip_all, fields(user_id = %user.0.id))]
pub async fn update_notifications(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<Value>> {
    group(&state, user, SettingsGroup::Notifications, payload).await
}

#[instrument(skip_all, fields(user_id = %user.0.id))]
pub async fn update_privacy(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<Value>> {
    group(&state, user, SettingsGroup::Privacy, payload).await
}

#[instrument(skip_all, fields(user_id = %user.0.id))]
pub async fn update_dashboard(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<Value>> {
    group(&state, user, SettingsGroup::Dashboard, payload).await
}
