use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

/// Where user, settings and finance documents live.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres { database_url: String },
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SettingsPolicy {
    /// Group merge-updates provision the default document when it is missing.
    /// When `false` they report "Settings not found" instead.
    pub group_upsert: bool,
}

impl Default for SettingsPolicy {
    fn default() -> Self {
        Self { group_upsert: true }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    pub sample_data: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self { sample_data: true }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub store: StoreBackend,
    pub jwt: JwtConfig,
    pub settings: SettingsPolicy,
    pub dashboard: DashboardConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let store = match std::env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "postgres".into())
            .as_str()
        {
            "memory" => StoreBackend::Memory,
            "postgres" => StoreBackend::Postgres {
                database_url: std::env::var("DATABASE_URL")?,
            },
            other => anyhow::bail!("unknown STORE_BACKEND {other:?}, expected postgres or memory"),
        };
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "finfine".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "finfine-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24),
        };
        let settings = SettingsPolicy {
            group_upsert: env_flag("SETTINGS_GROUP_UPSERT").unwrap_or(true),
        };
        let dashboard = DashboardConfig {
            sample_data: env_flag("DASHBOARD_SAMPLE_DATA").unwrap_or(true),
        };
        Ok(Self {
            store,
            jwt,
            settings,
            dashboard,
        })
    }
}

fn env_flag(name: &str) -> Option<bool> {
    std::env::var(name).ok().and_then(|v| parse_flag(&v))
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_flag_accepts_common_spellings() {
        assert_eq!(parse_flag("true"), Some(true));
        assert_eq!(parse_flag(" ON "), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("No"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn policies_default_to_upsert_and_samples() {
        assert!(SettingsPolicy::default().group_upsert);
        assert!(DashboardConfig::default().sample_data);
    }
}
