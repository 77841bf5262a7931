//! Canned records shown when a user has no data of a kind yet.

use std::sync::Arc;

use time::{Duration, OffsetDateTime};

use super::dto::{AccountView, BudgetView, GoalView, TransactionView};
use crate::config::DashboardConfig;

/// Supplies stand-in records for empty collections. Output matches the real views.
pub trait SampleDataProvider: Send + Sync {
    fn accounts(&self) -> Vec<AccountView>;
    fn transactions(&self, now: OffsetDateTime) -> Vec<TransactionView>;
    fn budgets(&self) -> Vec<BudgetView>;
    fn goals(&self, now: OffsetDateTime) -> Vec<GoalView>;
}

pub fn provider(cfg: &DashboardConfig) -> Arc<dyn SampleDataProvider> {
    if cfg.sample_data {
        Arc::new(CannedSamples)
    } else {
        Arc::new(NoSamples)
    }
}

pub struct CannedSamples;

fn account(id: &str, name: &str, kind: &str, balance: f64) -> AccountView {
    AccountView {
        id: id.into(),
        name: name.into(),
        kind: kind.into(),
        balance,
        currency: "USD".into(),
    }
}

fn budget(id: &str, category: &str, amount: f64, spent: f64) -> BudgetView {
    BudgetView {
        id: id.into(),
        category: category.into(),
        amount,
        spent,
        period: "monthly".into(),
    }
}

impl SampleDataProvider for CannedSamples {
    fn accounts(&self) -> Vec<AccountView> {
        vec![
            account("mock-account-1", "Cash Account", "Cash", 1500.0),
            account("mock-account-2", "Savings Account", "Savings", 5000.0),
        ]
    }

    fn transactions(&self, now: OffsetDateTime) -> Vec<TransactionView> {
        let tx = |id: &str, days_ago: i64, description: &str, amount: f64, category: &str, kind: &str| {
            TransactionView {
                id: id.into(),
                date: now - Duration::days(days_ago),
                description: description.into(),
                amount,
                category: category.into(),
                kind: kind.into(),
            }
        };
        vec![
            tx("mock-tx-1", 0, "Grocery shopping", 120.50, "Food", "expense"),
            tx("mock-tx-2", 1, "Salary", 3000.00, "Income", "income"),
            tx("mock-tx-3", 2, "Restaurant", 75.20, "Dining", "expense"),
        ]
    }

    fn budgets(&self) -> Vec<BudgetView> {
        vec![
            budget("mock-budget-1", "Food", 500.0, 320.0),
            budget("mock-budget-2", "Entertainment", 200.0, 150.0),
            budget("mock-budget-3", "Transportation", 300.0, 180.0),
        ]
    }

    fn goals(&self, now: OffsetDateTime) -> Vec<GoalView> {
        vec![
            GoalView {
                id: "mock-goal-1".into(),
                name: "Emergency Fund".into(),
                target_amount: 10000.0,
                current_amount: 2500.0,
                deadline: Some(now + Duration::days(365)),
                priority: "high".into(),
            },
            GoalView {
                id: "mock-goal-2".into(),
                name: "Vacation".into(),
                target_amount: 3000.0,
                current_amount: 1200.0,
                deadline: Some(now + Duration::days(180)),
                priority: "medium".into(),
            },
        ]
    }
}

/// Leaves empty collections empty.
pub struct NoSamples;

impl SampleDataProvider for NoSamples {
    fn accounts(&self) -> Vec<AccountView> {
        Vec::new()
    }

    fn transactions(&self, _now: OffsetDateTime) -> Vec<TransactionView> {
        Vec::new()
    }

    fn budgets(&self) -> Vec<BudgetView> {
        Vec::new()
    }

    fn goals(&self, _now: OffsetDateTime) -> Vec<GoalView> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canned_totals() {
        let s = CannedSamples;
        let now = OffsetDateTime::now_utc();
        assert_eq!(s.accounts().iter().map(|a| a.balance).sum::<f64>(), 6500.0);
        assert_eq!(s.budgets().iter().map(|b| b.amount).sum::<f64>(), 1000.0);
        assert_eq!(s.budgets().iter().map(|b| b.spent).sum::<f64>(), 650.0);
        let goals = s.goals(now);
        assert_eq!(goals.iter().map(|g| g.target_amount).sum::<f64>(), 13000.0);
        assert_eq!(goals.iter().map(|g| g.current_amount).sum::<f64>(), 3700.0);
        let txs = s.transactions(now);
        assert_eq!(txs.len(), 3);
        assert!(txs.windows(2).all(|w| w[0].date > w[1].date));
    }

    #[test]
    fn provider_follows_config() {
        let on = provider(&DashboardConfig { sample_data: true });
        let off = provider(&DashboardConfig { sample_data: false });
        assert_eq!(on.accounts().len(), 2);
        assert!(off.accounts().is_empty());
        assert!(off.goals(OffsetDateTime::now_utc()).is_empty());
    }
}
