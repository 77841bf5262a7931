use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

pub const DEFAULT_ROLE: &str = "Standard User";

/// User record in the directory.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // Argon2 hash, not exposed in JSON
    pub role: String,
    pub avatar: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Fields needed to insert a user; id and created_at come from the store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub avatar: String,
}

impl NewUser {
    pub fn new(name: &str, email: &str, password_hash: String) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            password_hash,
            role: DEFAULT_ROLE.to_string(),
            avatar: avatar_for(name),
        }
    }
}

/// First two characters of the name, uppercased. Shorter names are not padded.
pub fn avatar_for(name: &str) -> String {
    name.chars().take(2).collect::<String>().to_uppercase()
}

/// Public part of the user returned to the client.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub avatar: String,
    pub role: String,
}

impl From<&User> for PublicUser {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            name: u.name.clone(),
            email: u.email.clone(),
            avatar: u.avatar.clone(),
            role: u.role.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn avatar_takes_two_uppercased_chars() {
        assert_eq!(avatar_for("Jordan Lee"), "JO");
        assert_eq!(avatar_for("X"), "X");
        assert_eq!(avatar_for(""), "");
        assert_eq!(avatar_for("élan"), "ÉL");
    }

    #[test]
    fn new_user_gets_default_role() {
        let u = NewUser::new("ada", "ada@example.com", "hash".into());
        assert_eq!(u.role, DEFAULT_ROLE);
        assert_eq!(u.avatar, "AD");
    }

    #[test]
    fn password_hash_is_not_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password_hash: "secret-digest".into(),
            role: DEFAULT_ROLE.into(),
            avatar: "AD".into(),
            created_at: OffsetDateTime::now_utc(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-digest"));
        assert!(json.contains("ada@example.com"));
    }
}
