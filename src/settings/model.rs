use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::fields::{Flags, SettingsGroup};

pub const DEFAULT_CURRENCY: &str = "USD";
pub const DEFAULT_LANGUAGE: &str = "English";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    System,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Invalid theme value. Must be \"light\", \"dark\", or \"system\"")]
pub struct InvalidTheme;

impl FromStr for Theme {
    type Err = InvalidTheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "system" => Ok(Theme::System),
            _ => Err(InvalidTheme),
        }
    }
}

/// Single-valued settings fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarField {
    Theme,
    Currency,
    Language,
}

impl ScalarField {
    /// Document key and column name.
    pub fn name(self) -> &'static str {
        match self {
            ScalarField::Theme => "theme",
            ScalarField::Currency => "currency",
            ScalarField::Language => "language",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScalarField::Theme => "Theme",
            ScalarField::Currency => "Currency",
            ScalarField::Language => "Language",
        }
    }
}

/// Per-user preference document.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub id: Uuid,
    pub user_id: Uuid,
    pub theme: Theme,
    pub currency: String,
    pub language: String,
    pub notifications: Flags,
    pub privacy: Flags,
    pub dashboard: Flags,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Settings {
    pub fn defaults(user_id: Uuid, now: OffsetDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            theme: Theme::default(),
            currency: DEFAULT_CURRENCY.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            notifications: SettingsGroup::Notifications.defaults(),
            privacy: SettingsGroup::Privacy.defaults(),
            dashboard: SettingsGroup::Dashboard.defaults(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn group(&self, group: SettingsGroup) -> &Flags {
        match group {
            SettingsGroup::Notifications => &self.notifications,
            SettingsGroup::Privacy => &self.privacy,
            SettingsGroup::Dashboard => &self.dashboard,
        }
    }

    pub fn group_mut(&mut self, group: SettingsGroup) -> &mut Flags {
        match group {
            SettingsGroup::Notifications => &mut self.notifications,
            SettingsGroup::Privacy => &mut self.privacy,
            SettingsGroup::Dashboard => &mut self.dashboard,
        }
    }

    pub fn scalar(&self, field: ScalarField) -> &str {
        match field {
            ScalarField::Theme => self.theme.as_str(),
            ScalarField::Currency => &self.currency,
            ScalarField::Language => &self.language,
        }
    }

    /// Set a scalar field from its text form. Theme values must already be valid.
    pub fn set_scalar(&mut self, field: ScalarField, value: &str) -> Result<(), InvalidTheme> {
        match field {
            ScalarField::Theme => self.theme = value.parse()?,
            ScalarField::Currency => self.currency = value.to_string(),
            ScalarField::Language => self.language = value.to_string(),
        }
        Ok(())
    }

    /// Merge `patch` into `group`, leaving other keys untouched. Returns whether anything changed.
    pub fn merge_group(&mut self, group: SettingsGroup, patch: &Flags) -> bool {
        let flags = self.group_mut(group);
        let mut changed = false;
        for (key, value) in patch {
            if flags.insert(key.clone(), *value) != Some(*value) {
                changed = true;
            }
        }
        changed
    }
}

/// Result of a write that may turn out to be a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome<T> {
    Updated(T),
    Unchanged(T),
}

impl<T> UpdateOutcome<T> {
    pub fn is_updated(&self) -> bool {
        matches!(self, UpdateOutcome::Updated(_))
    }

    pub fn value(&self) -> &T {
        match self {
            UpdateOutcome::Updated(v) | UpdateOutcome::Unchanged(v) => v,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            UpdateOutcome::Updated(v) | UpdateOutcome::Unchanged(v) => v,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> UpdateOutcome<U> {
        match self {
            UpdateOutcome::Updated(v) => UpdateOutcome::Updated(f(v)),
            UpdateOutcome::Unchanged(v) => UpdateOutcome::Unchanged(f(v)),
        }
    }
}
