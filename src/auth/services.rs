use axum::extract::FromRef;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use super::{
    dto::{LoginRequest, RegisterRequest},
    jwt::JwtKeys,
    password::{hash_password, is_long_enough, verify_password},
};
use crate::{
    dashboard::services::provision_default_account,
    error::{AppError, AppResult},
    settings::services::get_or_create,
    state::AppState,
    users::repo_types::{NewUser, User},
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// A freshly issued bearer token and the user it belongs to.
#[derive(Debug)]
pub struct Session {
    pub token: String,
    pub user: User,
}

fn required(field: Option<String>) -> Option<String> {
    field
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub async fn register(st: &AppState, payload: RegisterRequest) -> AppResult<Session> {
    let (Some(name), Some(email), Some(password)) = (
        required(payload.name),
        required(payload.email),
        payload.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(AppError::validation("Missing required fields"));
    };

    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(AppError::validation("Invalid email"));
    }
    if !is_long_enough(&password) {
        return Err(AppError::validation(
            "Password must be at least 8 characters long",
        ));
    }

    let hash = hash_password(&password)?;
    let Some(user) = st.users.create(NewUser::new(&name, &email, hash)).await? else {
        warn!(email = %email, "email already registered");
        return Err(AppError::Conflict("User already exists".into()));
    };

    provision_default_account(st, user.id).await?;
    get_or_create(st, user.id).await?;

    let token = JwtKeys::from_ref(st).sign(user.id)?;
    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(Session { token, user })
}

pub async fn authenticate(st: &AppState, payload: LoginRequest) -> AppResult<Session> {
    let (Some(email), Some(password)) = (
        required(payload.email),
        payload.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(AppError::validation("Missing email or password"));
    };

    let invalid = || AppError::unauthorized("Invalid email or password");

    let Some(user) = st.users.find_by_email(&email).await? else {
        warn!(email = %email, "login unknown email");
        return Err(invalid());
    };
    if !verify_password(&password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(invalid());
    }

    let token = JwtKeys::from_ref(st).sign(user.id)?;
    info!(user_id = %user.id, "user logged in");
    Ok(Session { token, user })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_req(name: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: Some(name.into()),
            email: Some(email.into()),
            password: Some(password.into()),
        }
    }

    fn login_req(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: Some(email.into()),
            password: Some(password.into()),
        }
    }

    #[test]
    fn email_shape_check() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.de"));
    }

    #[tokio::test]
    async fn register_issues_verifiable_token_and_provisions_defaults() {
        let st = AppState::fake();
        let session = register(&st, register_req("Jordan Lee", "jordan@example.com", "password1"))
            .await
            .unwrap();

        assert_eq!(session.user.avatar, "JO");
        assert_eq!(session.user.role, "Standard User");
        let claims = JwtKeys::from_ref(&st).verify(&session.token).unwrap();
        assert_eq!(claims.sub, session.user.id);

        assert!(st.settings.find_by_user(session.user.id).await.unwrap().is_some());
        let accounts = st.finance.list_accounts(session.user.id).await.unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].name, "Cash Account");
    }

    #[tokio::test]
    async fn register_duplicate_email_conflicts() {
        let st = AppState::fake();
        register(&st, register_req("A", "dup@example.com", "password1"))
            .await
            .unwrap();
        let err = register(&st, register_req("B", "dup@example.com", "password2"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn register_requires_all_fields() {
        let st = AppState::fake();
        let err = register(
            &st,
            RegisterRequest {
                name: None,
                ..register_req("", "x@example.com", "password1")
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn authenticate_checks_password() {
        let st = AppState::fake();
        register(&st, register_req("Ada", "ada@example.com", "password1"))
            .await
            .unwrap();

        assert!(authenticate(&st, login_req("ada@example.com", "password1"))
            .await
            .is_ok());
        let err = authenticate(&st, login_req("ada@example.com", "wrong-pass"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
        let err = authenticate(&st, login_req("nobody@example.com", "password1"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid email or password");
    }
}
