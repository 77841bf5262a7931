use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{AccountsView, BudgetsView, DashboardSummary, GoalsView, TransactionQuery, TransactionsPage},
    services,
};
use crate::{auth::extractors::AuthUser, error::AppResult, state::AppState};

pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard/summary", get(get_summary))
        .route("/dashboard/accounts", get(get_accounts))
        .route("/dashboard/transactions", get(get_transactions))
        .route("/dashboard/budgets", get(get_budgets))
        .route("/dashboard/goals", get(get_goals))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn get_summary(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> AppResult<Json<DashboardSummary>> {
    Ok(Json(services::summary(&state, user.id).await?))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn get_accounts(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> AppResult<Json<AccountsView>> {
    Ok(Json(services::accounts(&state, user.id).await?))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn get_transactions(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    params: Result<Query<TransactionQuery>, QueryRejection>,
) -> AppResult<Json<TransactionsPage>> {
    let Query(params) = params?;
    Ok(Json(services::transactions(&state, user.id, params).await?))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn get_budgets(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> AppResult<Json<BudgetsView>> {
    Ok(Json(services::budgets(&state, user.id).await?))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn get_goals(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> AppResult<Json<GoalsView>> {
    Ok(Json(services::goals(&state, user.id).await?))
}
