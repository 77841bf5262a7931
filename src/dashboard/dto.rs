use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::repo_types::{Account, Budget, Goal, Transaction};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AccountView {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub balance: f64,
    pub currency: String,
}

impl From<Account> for AccountView {
    fn from(a: Account) -> Self {
        Self {
            id: a.id.to_string(),
            name: a.name,
            kind: a.kind,
            balance: a.balance,
            currency: a.currency,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TransactionView {
    pub id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    pub description: String,
    pub amount: f64,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl From<Transaction> for TransactionView {
    fn from(t: Transaction) -> Self {
        Self {
            id: t.id.to_string(),
            date: t.date,
            description: t.description,
            amount: t.amount,
            category: t.category,
            kind: t.kind,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BudgetView {
    pub id: String,
    pub category: String,
    pub amount: f64,
    pub spent: f64,
    pub period: String,
}

impl From<Budget> for BudgetView {
    fn from(b: Budget) -> Self {
        Self {
            id: b.id.to_string(),
            category: b.category,
            amount: b.amount,
            spent: b.spent,
            period: b.period,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GoalView {
    pub id: String,
    pub name: String,
    pub target_amount: f64,
    pub current_amount: f64,
    #[serde(with = "time::serde::rfc3339::option")]
    pub deadline: Option<OffsetDateTime>,
    pub priority: String,
}

impl From<Goal> for GoalView {
    fn from(g: Goal) -> Self {
        Self {
            id: g.id.to_string(),
            name: g.name,
            target_amount: g.target_amount,
            current_amount: g.current_amount,
            deadline: g.deadline,
            priority: g.priority,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AccountsView {
    pub accounts: Vec<AccountView>,
    pub total_balance: f64,
}

#[derive(Debug, Serialize)]
pub struct TransactionsPage {
    pub transactions: Vec<TransactionView>,
    pub total_count: i64,
    pub current_page: i64,
    pub total_pages: i64,
}

#[derive(Debug, Serialize)]
pub struct BudgetsView {
    pub budgets: Vec<BudgetView>,
    pub total: f64,
    pub spent: f64,
    pub remaining: f64,
}

#[derive(Debug, Serialize)]
pub struct GoalsView {
    pub goals: Vec<GoalView>,
    pub total: f64,
    pub current: f64,
    pub progress: f64,
}

#[derive(Debug, Serialize)]
pub struct AccountsSection {
    pub data: Vec<AccountView>,
    pub total_balance: f64,
}

#[derive(Debug, Serialize)]
pub struct TransactionsSection {
    pub recent: Vec<TransactionView>,
}

#[derive(Debug, Serialize)]
pub struct BudgetsSection {
    pub data: Vec<BudgetView>,
    pub total: f64,
    pub spent: f64,
    pub remaining: f64,
}

#[derive(Debug, Serialize)]
pub struct GoalsSection {
    pub data: Vec<GoalView>,
    pub total: f64,
    pub current: f64,
    pub progress: f64,
}

#[derive(Debug, Serialize)]
pub struct SummaryFigures {
    pub net_worth: f64,
    pub income_this_month: f64,
    pub expenses_this_month: f64,
    pub savings_rate: f64,
}

#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub accounts: AccountsSection,
    pub transactions: TransactionsSection,
    pub budgets: BudgetsSection,
    pub goals: GoalsSection,
    pub summary: SummaryFigures,
}

#[derive(Debug, Deserialize)]
pub struct TransactionQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub skip: i64,
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}
fn default_limit() -> i64 {
    10
}
