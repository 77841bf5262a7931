use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{Account, Budget, Goal, NewAccount, Transaction, TxQuery};

/// Read access to a user's finance collections, plus default account provisioning.
#[async_trait]
pub trait FinanceRepo: Send + Sync {
    async fn list_accounts(&self, user_id: Uuid) -> anyhow::Result<Vec<Account>>;
    /// Insert `account` only when the user has no accounts yet. `None` if they already had one.
    async fn create_first_account(
        &self,
        user_id: Uuid,
        account: NewAccount,
    ) -> anyhow::Result<Option<Account>>;
    /// Newest first.
    async fn list_transactions(&self, user_id: Uuid, q: &TxQuery) -> anyhow::Result<Vec<Transaction>>;
    async fn count_transactions(&self, user_id: Uuid, q: &TxQuery) -> anyhow::Result<i64>;
    async fn list_budgets(&self, user_id: Uuid) -> anyhow::Result<Vec<Budget>>;
    async fn list_goals(&self, user_id: Uuid) -> anyhow::Result<Vec<Goal>>;
}

pub struct PgFinanceRepo {
    db: PgPool,
}

impl PgFinanceRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FinanceRepo for PgFinanceRepo {
    async fn list_accounts(&self, user_id: Uuid) -> anyhow::Result<Vec<Account>> {
        let rows = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, user_id, name, kind, balance, currency, created_at
              FROM accounts
             WHERE user_id = $1
             ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .context("list accounts")?;
        Ok(rows)
    }

    async fn create_first_account(
        &self,
        user_id: Uuid,
        account: NewAccount,
    ) -> anyhow::Result<Option<Account>> {
        let mut tx = self.db.begin().await.context("begin first account")?;

        // Serializes first-account creation per user until commit.
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(user_id.to_string())
            .execute(&mut *tx)
            .await
            .context("lock user accounts")?;

        let row = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (id, user_id, name, kind, balance, currency)
            SELECT $1, $2, $3, $4, $5, $6
             WHERE NOT EXISTS (SELECT 1 FROM accounts WHERE user_id = $2)
            RETURNING id, user_id, name, kind, balance, currency, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&account.name)
        .bind(&account.kind)
        .bind(account.balance)
        .bind(&account.currency)
        .fetch_optional(&mut *tx)
        .await
        .context("insert first account")?;

        tx.commit().await.context("commit first account")?;
        Ok(row)
    }

    async fn list_transactions(&self, user_id: Uuid, q: &TxQuery) -> anyhow::Result<Vec<Transaction>> {
        let rows = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, user_id, date, description, amount, category, kind
              FROM transactions
             WHERE user_id = $1
               AND ($2::text IS NULL OR category = $2)
               AND ($3::text IS NULL OR kind = $3)
             ORDER BY date DESC
             LIMIT $4 OFFSET $5
            "#,
        )
        .bind(user_id)
        .bind(q.category.as_deref())
        .bind(q.kind.as_deref())
        .bind(q.limit)
        .bind(q.skip)
        .fetch_all(&self.db)
        .await
        .context("list transactions")?;
        Ok(rows)
    }

    async fn count_transactions(&self, user_id: Uuid, q: &TxQuery) -> anyhow::Result<i64> {
        let n = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
              FROM transactions
             WHERE user_id = $1
               AND ($2::text IS NULL OR category = $2)
               AND ($3::text IS NULL OR kind = $3)
            "#,
        )
        .bind(user_id)
        .bind(q.category.as_deref())
        .bind(q.kind.as_deref())
        .fetch_one(&self.db)
        .await
        .context("count transactions")?;
        Ok(n)
    }

    async fn list_budgets(&self, user_id: Uuid) -> anyhow::Result<Vec<Budget>> {
        let rows = sqlx::query_as::<_, Budget>(
            r#"
            SELECT id, user_id, category, amount, spent, period
              FROM budgets
             WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .context("list budgets")?;
        Ok(rows)
    }

    async fn list_goals(&self, user_id: Uuid) -> anyhow::Result<Vec<Goal>> {
        let rows = sqlx::query_as::<_, Goal>(
            r#"
            SELECT id, user_id, name, target_amount, current_amount, deadline, priority
              FROM goals
             WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .context("list goals")?;
        Ok(rows)
    }
}
