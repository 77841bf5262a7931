use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use super::{
    dto::{
        AccountView, AccountsSection, AccountsView, BudgetView, BudgetsSection, BudgetsView,
        DashboardSummary, GoalView, GoalsSection, GoalsView, SummaryFigures, TransactionQuery,
        TransactionView, TransactionsPage, TransactionsSection,
    },
    repo_types::{Account, NewAccount, TxQuery},
};
use crate::state::AppState;

const RECENT_TRANSACTIONS: i64 = 5;
const MAX_PAGE_SIZE: i64 = 100;
// Placeholder until savings are tracked per month.
const SAVINGS_RATE: f64 = 25.0;

/// current / target as a percentage with two decimals; 0 when there is no target.
pub fn goal_progress(current: f64, target: f64) -> f64 {
    if target > 0.0 {
        (current / target * 100.0 * 100.0).round() / 100.0
    } else {
        0.0
    }
}

/// Give the user the default cash account unless they already have an account.
pub async fn provision_default_account(
    st: &AppState,
    user_id: Uuid,
) -> anyhow::Result<Option<Account>> {
    let created = st
        .finance
        .create_first_account(user_id, NewAccount::cash())
        .await?;
    if let Some(account) = &created {
        info!(%user_id, account_id = %account.id, "default account created");
    }
    Ok(created)
}

fn or_samples<T>(real: Vec<T>, samples: impl FnOnce() -> Vec<T>) -> Vec<T> {
    if real.is_empty() {
        samples()
    } else {
        real
    }
}

fn total_balance(accounts: &[AccountView]) -> f64 {
    accounts.iter().map(|a| a.balance).sum()
}

fn budget_totals(budgets: &[BudgetView]) -> (f64, f64) {
    (
        budgets.iter().map(|b| b.amount).sum(),
        budgets.iter().map(|b| b.spent).sum(),
    )
}

fn goal_totals(goals: &[GoalView]) -> (f64, f64) {
    (
        goals.iter().map(|g| g.target_amount).sum(),
        goals.iter().map(|g| g.current_amount).sum(),
    )
}

fn sum_of_kind(txs: &[TransactionView], kind: &str) -> f64 {
    txs.iter().filter(|t| t.kind == kind).map(|t| t.amount).sum()
}

pub async fn summary(st: &AppState, user_id: Uuid) -> anyhow::Result<DashboardSummary> {
    let now = OffsetDateTime::now_utc();
    let finance = &st.finance;

    let accounts = or_samples(
        finance.list_accounts(user_id).await?.into_iter().map(Into::into).collect(),
        || st.samples.accounts(),
    );
    let recent = or_samples(
        finance
            .list_transactions(user_id, &TxQuery::recent(RECENT_TRANSACTIONS))
            .await?
            .into_iter()
            .map(Into::into)
            .collect(),
        || st.samples.transactions(now),
    );
    let budgets = or_samples(
        finance.list_budgets(user_id).await?.into_iter().map(Into::into).collect(),
        || st.samples.budgets(),
    );
    let goals = or_samples(
        finance.list_goals(user_id).await?.into_iter().map(Into::into).collect(),
        || st.samples.goals(now),
    );

    let balance = total_balance(&accounts);
    let (budget_total, spent) = budget_totals(&budgets);
    let (goals_total, goals_current) = goal_totals(&goals);
    let summary = SummaryFigures {
        net_worth: balance,
        income_this_month: sum_of_kind(&recent, "income"),
        expenses_this_month: sum_of_kind(&recent, "expense"),
        savings_rate: SAVINGS_RATE,
    };

    Ok(DashboardSummary {
        accounts: AccountsSection {
            data: accounts,
            total_balance: balance,
        },
        transactions: TransactionsSection { recent },
        budgets: BudgetsSection {
            data: budgets,
            total: budget_total,
            spent,
            remaining: budget_total - spent,
        },
        goals: GoalsSection {
            data: goals,
            total: goals_total,
            current: goals_current,
            progress: goal_progress(goals_current, goals_total),
        },
        summary,
    })
}

/// Lists accounts, creating the default cash account when the user has none.
pub async fn accounts(st: &AppState, user_id: Uuid) -> anyhow::Result<AccountsView> {
    let mut rows = st.finance.list_accounts(user_id).await?;
    if rows.is_empty() {
        provision_default_account(st, user_id).await?;
        rows = st.finance.list_accounts(user_id).await?;
    }
    let accounts: Vec<AccountView> = rows.into_iter().map(Into::into).collect();
    Ok(AccountsView {
        total_balance: total_balance(&accounts),
        accounts,
    })
}

pub async fn transactions(
    st: &AppState,
    user_id: Uuid,
    params: TransactionQuery,
) -> anyhow::Result<TransactionsPage> {
    let q = TxQuery {
        limit: params.limit.clamp(1, MAX_PAGE_SIZE),
        skip: params.skip.max(0),
        category: params.category.filter(|c| !c.is_empty()),
        kind: params.kind.filter(|k| !k.is_empty()),
    };

    let total_count = st.finance.count_transactions(user_id, &q).await?;
    if total_count == 0 {
        let samples = st.samples.transactions(OffsetDateTime::now_utc());
        let count = samples.len() as i64;
        return Ok(TransactionsPage {
            transactions: samples,
            total_count: count,
            current_page: 1,
            total_pages: if count > 0 { 1 } else { 0 },
        });
    }

    let rows = st.finance.list_transactions(user_id, &q).await?;
    Ok(TransactionsPage {
        transactions: rows.into_iter().map(Into::into).collect(),
        total_count,
        current_page: q.skip / q.limit + 1,
        total_pages: (total_count + q.limit - 1) / q.limit,
    })
}

pub async fn budgets(st: &AppState, user_id: Uuid) -> anyhow::Result<BudgetsView> {
    let budgets = or_samples(
        st.finance.list_budgets(user_id).await?.into_iter().map(Into::into).collect(),
        || st.samples.budgets(),
    );
    let (total, spent) = budget_totals(&budgets);
    Ok(BudgetsView {
        budgets,
        total,
        spent,
        remaining: total - spent,
    })
}

pub async fn goals(st: &AppState, user_id: Uuid) -> anyhow::Result<GoalsView> {
    let goals = or_samples(
        st.finance.list_goals(user_id).await?.into_iter().map(Into::into).collect(),
        || st.samples.goals(OffsetDateTime::now_utc()),
    );
    let (total, current) = goal_totals(&goals);
    Ok(GoalsView {
        goals,
        total,
        current,
        progress: goal_progress(current, total),
    })
}
