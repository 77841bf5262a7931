use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub kind: String,
    pub balance: f64,
    pub currency: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub kind: String,
    pub balance: f64,
    pub currency: String,
}

impl NewAccount {
    /// Account every user starts with.
    pub fn cash() -> Self {
        Self {
            name: "Cash Account".into(),
            kind: "Cash".into(),
            balance: 1000.0,
            currency: "USD".into(),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: OffsetDateTime,
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub kind: String, // "income" | "expense"
}

#[derive(Debug, Clone, FromRow)]
pub struct Budget {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category: String,
    pub amount: f64,
    pub spent: f64,
    pub period: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct Goal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub deadline: Option<OffsetDateTime>,
    pub priority: String,
}

/// Filter and window for transaction listings.
#[derive(Debug, Clone, Default)]
pub struct TxQuery {
    pub limit: i64,
    pub skip: i64,
    pub category: Option<String>,
    pub kind: Option<String>,
}

impl TxQuery {
    pub fn recent(limit: i64) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    pub fn matches(&self, tx: &Transaction) -> bool {
        self.category.as_deref().map_or(true, |c| tx.category == c)
            && self.kind.as_deref().map_or(true, |k| tx.kind == k)
    }
}
