use anyhow::Context;
use async_trait::async_trait;
use sqlx::{types::Json, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::fields::{Flags, SettingsGroup};
use super::model::{ScalarField, Settings};
use super::repo_types::{GroupMerge, SettingsRow};

#[async_trait]
pub trait SettingsRepo: Send + Sync {
    async fn find_by_user(&self, user_id: Uuid) -> anyhow::Result<Option<Settings>>;

    /// Store `doc` unless its user already has settings. Returns the surviving document.
    async fn insert_if_absent(&self, doc: Settings) -> anyhow::Result<Settings>;

    /// Write `field` from `doc`, inserting the whole of `doc` when the user has no settings.
    /// Returns `false` when the stored value already matched.
    async fn upsert_scalar(&self, doc: Settings, field: ScalarField) -> anyhow::Result<bool>;

    /// Merge `patch` into one group in place. `None` when the user has no settings.
    async fn merge_group(
        &self,
        user_id: Uuid,
        group: SettingsGroup,
        patch: &Flags,
        now: OffsetDateTime,
    ) -> anyhow::Result<Option<GroupMerge>>;
}

pub struct PgSettingsRepo {
    db: PgPool,
}

impl PgSettingsRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

const SELECT_SETTINGS: &str = r#"
    SELECT id, user_id, theme, currency, language, notifications, privacy, dashboard,
           created_at, updated_at
      FROM settings
     WHERE user_id = $1
"#;

#[async_trait]
impl SettingsRepo for PgSettingsRepo {
    async fn find_by_user(&self, user_id: Uuid) -> anyhow::Result<Option<Settings>> {
        let row = sqlx::query_as::<_, SettingsRow>(SELECT_SETTINGS)
            .bind(user_id)
            .fetch_optional(&self.db)
            .await
            .context("find settings by user")?;
        row.map(Settings::try_from)
            .transpose()
            .context("decode settings row")
    }

    async fn insert_if_absent(&self, doc: Settings) -> anyhow::Result<Settings> {
        sqlx::query(
            r#"
            INSERT INTO settings (id, user_id, theme, currency, language,
                                  notifications, privacy, dashboard, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(doc.id)
        .bind(doc.user_id)
        .bind(doc.theme.as_str())
        .bind(&doc.currency)
        .bind(&doc.language)
        .bind(Json(&doc.notifications))
        .bind(Json(&doc.privacy))
        .bind(Json(&doc.dashboard))
        .bind(doc.created_at)
        .bind(doc.updated_at)
        .execute(&self.db)
        .await
        .context("insert default settings")?;

        self.find_by_user(doc.user_id)
            .await?
            .context("settings missing right after insert")
    }

    async fn upsert_scalar(&self, doc: Settings, field: ScalarField) -> anyhow::Result<bool> {
        let column = field.name();
        let sql = format!(
            r#"
            INSERT INTO settings (id, user_id, theme, currency, language,
                                  notifications, privacy, dashboard, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (user_id) DO UPDATE
               SET {column} = EXCLUDED.{column}, updated_at = EXCLUDED.updated_at
             WHERE settings.{column} IS DISTINCT FROM EXCLUDED.{column}
            RETURNING id
            "#
        );
        let written = sqlx::query_scalar::<_, Uuid>(&sql)
            .bind(doc.id)
            .bind(doc.user_id)
            .bind(doc.theme.as_str())
            .bind(&doc.currency)
            .bind(&doc.language)
            .bind(Json(&doc.notifications))
            .bind(Json(&doc.privacy))
            .bind(Json(&doc.dashboard))
            .bind(doc.created_at)
            .bind(doc.updated_at)
            .fetch_optional(&self.db)
            .await
            .with_context(|| format!("upsert settings {column}"))?;
        Ok(written.is_some())
    }

    async fn merge_group(
        &self,
        user_id: Uuid,
        group: SettingsGroup,
        patch: &Flags,
        now: OffsetDateTime,
    ) -> anyhow::Result<Option<GroupMerge>> {
        let column = group.name();
        // `||` merges only the patched keys; `@>` skips the write when they already match.
        let sql = format!(
            r#"
            UPDATE settings
               SET {column} = {column} || $2, updated_at = $3
             WHERE user_id = $1 AND NOT ({column} @> $2)
            RETURNING {column}
            "#
        );
        let merged = sqlx::query_scalar::<_, Json<Flags>>(&sql)
            .bind(user_id)
            .bind(Json(patch))
            .bind(now)
            .fetch_optional(&self.db)
            .await
            .with_context(|| format!("merge settings {column}"))?;

        if let Some(Json(flags)) = merged {
            return Ok(Some(GroupMerge {
                flags,
                changed: true,
            }));
        }

        let current = sqlx::query_scalar::<_, Json<Flags>>(&format!(
            "SELECT {column} FROM settings WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.db)
        .await
        .with_context(|| format!("read settings {column}"))?;

        Ok(current.map(|Json(flags)| GroupMerge {
            flags,
            changed: false,
        }))
    }
}
