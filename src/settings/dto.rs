use serde::Serialize;
use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

use super::fields::Flags;
use super::model::{ScalarField, Settings, Theme};
use crate::error::{AppError, AppResult};

/// Settings document as returned by `GET /settings`.
#[derive(Debug, Serialize)]
pub struct SettingsView {
    pub id: Uuid,
    pub theme: Theme,
    pub currency: String,
    pub language: String,
    pub notifications: Flags,
    pub privacy: Flags,
    pub dashboard: Flags,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Settings> for SettingsView {
    fn from(s: Settings) -> Self {
        Self {
            id: s.id,
            theme: s.theme,
            currency: s.currency,
            language: s.language,
            notifications: s.notifications,
            privacy: s.privacy,
            dashboard: s.dashboard,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

/// Read the route's own key from a theme/currency/language body.
/// Other keys are ignored whatever their type.
pub fn scalar_value(body: &Value, field: ScalarField) -> AppResult<Option<String>> {
    match body.get(field.name()) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(AppError::validation(format!(
            "{} must be a string",
            field.label()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalar_value_reads_only_its_own_key() {
        let body = json!({ "theme": "dark", "currency": 5, "language": ["x"] });
        assert_eq!(
            scalar_value(&body, ScalarField::Theme).unwrap().as_deref(),
            Some("dark")
        );
        assert!(scalar_value(&body, ScalarField::Currency).is_err());
        assert_eq!(scalar_value(&json!({ "theme": null }), ScalarField::Theme).unwrap(), None);
        assert_eq!(scalar_value(&json!({}), ScalarField::Language).unwrap(), None);
    }
}
