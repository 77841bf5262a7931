use tracing::{info, warn};

use super::dto::{PasswordRequest, ProfileRequest};
use crate::{
    auth::password::{hash_password, is_long_enough, verify_password},
    error::{AppError, AppResult},
    settings::model::UpdateOutcome,
    state::AppState,
    users::repo_types::{avatar_for, User},
};

/// Rename the user; the avatar follows the name.
pub async fn update_profile(
    st: &AppState,
    user: &User,
    patch: ProfileRequest,
) -> AppResult<UpdateOutcome<User>> {
    let Some(name) = patch
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
    else {
        return Err(AppError::validation("No valid profile fields to update"));
    };

    let avatar = avatar_for(&name);
    if name == user.name && avatar == user.avatar {
        return Ok(UpdateOutcome::Unchanged(user.clone()));
    }

    let updated = st
        .users
        .update_profile(user.id, &name, &avatar)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    info!(user_id = %user.id, "profile updated");
    Ok(UpdateOutcome::Updated(updated))
}

pub async fn update_password(st: &AppState, user: &User, req: PasswordRequest) -> AppResult<()> {
    let (Some(current), Some(new)) = (
        req.current_password.filter(|p| !p.is_empty()),
        req.new_password.filter(|p| !p.is_empty()),
    ) else {
        return Err(AppError::validation(
            "Current password and new password are required",
        ));
    };

    if !verify_password(&current, &user.password_hash)? {
        warn!(user_id = %user.id, "password change with wrong current password");
        return Err(AppError::unauthorized("Current password is incorrect"));
    }
    if !is_long_enough(&new) {
        return Err(AppError::validation(
            "Password must be at least 8 characters long",
        ));
    }

    let hash = hash_password(&new)?;
    if !st.users.update_password_hash(user.id, &hash).await? {
        return Err(AppError::not_found("User not found"));
    }
    info!(user_id = %user.id, "password updated");
    Ok(())
}
