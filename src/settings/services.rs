use serde_json::Value;
use time::OffsetDateTime;
use tracing::{debug, info};
use uuid::Uuid;

use super::{
    fields::{Flags, SettingsGroup},
    model::{ScalarField, Settings, Theme, UpdateOutcome},
};
use crate::{
    error::{AppError, AppResult},
    state::AppState,
};

/// Return the user's settings, provisioning the default document on first access.
pub async fn get_or_create(st: &AppState, user_id: Uuid) -> anyhow::Result<Settings> {
    if let Some(existing) = st.settings.find_by_user(user_id).await? {
        return Ok(existing);
    }
    let doc = Settings::defaults(user_id, OffsetDateTime::now_utc());
    let stored = st.settings.insert_if_absent(doc).await?;
    info!(%user_id, settings_id = %stored.id, "default settings provisioned");
    Ok(stored)
}

/// Check a scalar value and return the form that gets stored.
pub fn validate_scalar(field: ScalarField, value: Option<String>) -> AppResult<String> {
    let Some(value) = value else {
        return Err(AppError::validation(format!("{} is required", field.label())));
    };
    match field {
        ScalarField::Theme => value
            .parse::<Theme>()
            .map(|t| t.as_str().to_string())
            .map_err(|e| AppError::validation(e.to_string())),
        // Free-form: ISO codes are expected but not enforced. Stored as sent.
        ScalarField::Currency | ScalarField::Language => {
            if value.trim().is_empty() {
                return Err(AppError::validation(format!(
                    "{} must not be empty",
                    field.label()
                )));
            }
            Ok(value)
        }
    }
}

/// Set theme, currency or language, creating the document with defaults when missing.
pub async fn update_scalar(
    st: &AppState,
    user_id: Uuid,
    field: ScalarField,
    value: Option<String>,
) -> AppResult<UpdateOutcome<String>> {
    let value = validate_scalar(field, value)?;

    let mut seed = Settings::defaults(user_id, OffsetDateTime::now_utc());
    seed.set_scalar(field, &value)
        .map_err(|e| AppError::validation(e.to_string()))?;

    if st.settings.upsert_scalar(seed, field).await? {
        info!(%user_id, field = field.name(), %value, "setting updated");
        Ok(UpdateOutcome::Updated(value))
    } else {
        debug!(%user_id, field = field.name(), "setting unchanged");
        Ok(UpdateOutcome::Unchanged(value))
    }
}

/// Turn a request body into a canonical patch for `group`.
pub fn parse_group_patch(group: SettingsGroup, body: &Value) -> AppResult<Flags> {
    let Some(body) = body.as_object().filter(|o| !o.is_empty()) else {
        return Err(AppError::validation("No data provided"));
    };
    let patch = group.normalize_patch(body);
    if patch.is_empty() {
        return Err(AppError::validation(format!(
            "At least one valid {} setting must be provided",
            group.name().trim_end_matches('s')
        )));
    }
    Ok(patch)
}

/// Merge the recognized keys of `body` into one boolean group, returning the full group.
pub async fn update_group(
    st: &AppState,
    user_id: Uuid,
    group: SettingsGroup,
    body: &Value,
) -> AppResult<UpdateOutcome<Flags>> {
    let patch = parse_group_patch(group, body)?;

    if st.config.settings.group_upsert {
        get_or_create(st, user_id).await?;
    }

    let merged = st
        .settings
        .merge_group(user_id, group, &patch, OffsetDateTime::now_utc())
        .await?
        .ok_or_else(|| AppError::not_found("Settings not found"))?;

    if merged.changed {
        info!(%user_id, group = group.name(), keys = ?patch.keys().collect::<Vec<_>>(), "settings group merged");
        Ok(UpdateOutcome::Updated(merged.flags))
    } else {
        debug!(%user_id, group = group.name(), "settings group unchanged");
        Ok(UpdateOutcome::Unchanged(merged.flags))
    }
}
