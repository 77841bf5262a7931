use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use super::jwt::JwtKeys;
use crate::{error::AppError, state::AppState, users::repo_types::User};

const INVALID_TOKEN: &str = "Invalid or expired token";

/// Verifies the bearer token and resolves the user record it names.
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Token is missing"))?;

        let token = auth
            .strip_prefix("Bearer ")
            .or_else(|| auth.strip_prefix("bearer "))
            .ok_or_else(|| AppError::unauthorized(INVALID_TOKEN))?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(token).map_err(|e| {
            warn!(error = %e, "token rejected");
            AppError::unauthorized(INVALID_TOKEN)
        })?;

        match state.users.find_by_id(claims.sub).await? {
            Some(user) => Ok(AuthUser(user)),
            None => {
                warn!(user_id = %claims.sub, "token for unknown user");
                Err(AppError::unauthorized(INVALID_TOKEN))
            }
        }
    }
}
