use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::repo::FinanceRepo;
use super::repo_types::{Account, Budget, Goal, NewAccount, Transaction, TxQuery};

#[derive(Default)]
pub struct MemoryFinanceRepo {
    accounts: RwLock<Vec<Account>>,
    transactions: RwLock<Vec<Transaction>>,
    budgets: RwLock<Vec<Budget>>,
    goals: RwLock<Vec<Goal>>,
}

impl MemoryFinanceRepo {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn seed_transaction(&self, tx: Transaction) {
        self.transactions.write().await.push(tx);
    }

    #[cfg(test)]
    pub async fn seed_budget(&self, budget: Budget) {
        self.budgets.write().await.push(budget);
    }

    #[cfg(test)]
    pub async fn seed_goal(&self, goal: Goal) {
        self.goals.write().await.push(goal);
    }
}

#[async_trait]
impl FinanceRepo for MemoryFinanceRepo {
    async fn list_accounts(&self, user_id: Uuid) -> anyhow::Result<Vec<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.iter().filter(|a| a.user_id == user_id).cloned().collect())
    }

    async fn create_first_account(
        &self,
        user_id: Uuid,
        account: NewAccount,
    ) -> anyhow::Result<Option<Account>> {
        let mut accounts = self.accounts.write().await;
        if accounts.iter().any(|a| a.user_id == user_id) {
            return Ok(None);
        }
        let account = Account {
            id: Uuid::new_v4(),
            user_id,
            name: account.name,
            kind: account.kind,
            balance: account.balance,
            currency: account.currency,
            created_at: OffsetDateTime::now_utc(),
        };
        accounts.push(account.clone());
        Ok(Some(account))
    }

    async fn list_transactions(&self, user_id: Uuid, q: &TxQuery) -> anyhow::Result<Vec<Transaction>> {
        let txs = self.transactions.read().await;
        let mut rows: Vec<Transaction> = txs
            .iter()
            .filter(|t| t.user_id == user_id && q.matches(t))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(rows
            .into_iter()
            .skip(q.skip.max(0) as usize)
            .take(q.limit.max(0) as usize)
            .collect())
    }

    async fn count_transactions(&self, user_id: Uuid, q: &TxQuery) -> anyhow::Result<i64> {
        let txs = self.transactions.read().await;
        Ok(txs.iter().filter(|t| t.user_id == user_id && q.matches(t)).count() as i64)
    }

    async fn list_budgets(&self, user_id: Uuid) -> anyhow::Result<Vec<Budget>> {
        let budgets = self.budgets.read().await;
        Ok(budgets.iter().filter(|b| b.user_id == user_id).cloned().collect())
    }

    async fn list_goals(&self, user_id: Uuid) -> anyhow::Result<Vec<Goal>> {
        let goals = self.goals.read().await;
        Ok(goals.iter().filter(|g| g.user_id == user_id).cloned().collect())
    }
}
