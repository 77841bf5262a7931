use sqlx::{types::Json, FromRow};
use time::OffsetDateTime;
use uuid::Uuid;

use super::fields::Flags;
use super::model::{InvalidTheme, Settings};

/// Settings row as stored in Postgres. Groups live in JSONB columns.
#[derive(Debug, FromRow)]
pub struct SettingsRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub theme: String,
    pub currency: String,
    pub language: String,
    pub notifications: Json<Flags>,
    pub privacy: Json<Flags>,
    pub dashboard: Json<Flags>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl TryFrom<SettingsRow> for Settings {
    type Error = InvalidTheme;

    fn try_from(r: SettingsRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: r.id,
            user_id: r.user_id,
            theme: r.theme.parse()?,
            currency: r.currency,
            language: r.language,
            notifications: r.notifications.0,
            privacy: r.privacy.0,
            dashboard: r.dashboard.0,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

/// Group contents after a merge-update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupMerge {
    pub flags: Flags,
    pub changed: bool,
}
