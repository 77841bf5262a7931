//! Canonical field tables for the boolean settings groups.
//!
//! Each group lists its snake_case storage names next to the optional camelCase
//! alias the web UI sends and the default value, so the three stay in step.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

/// Flags of one group keyed by canonical field name.
pub type Flags = BTreeMap<String, bool>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub canonical: &'static str,
    pub ui_alias: Option<&'static str>,
    pub default: bool,
}

const fn field(canonical: &'static str, ui_alias: Option<&'static str>, default: bool) -> FieldSpec {
    FieldSpec {
        canonical,
        ui_alias,
        default,
    }
}

const NOTIFICATION_FIELDS: &[FieldSpec] = &[
    field("email", None, true),
    field("push", None, true),
    field("budget_alerts", Some("budgetAlerts"), true),
    field("transaction_alerts", None, true),
    field("goal_reminders", Some("goalReminders"), true),
    field("investment_opportunities", Some("investmentOpportunities"), false),
    field("monthly_reports", Some("monthlyReports"), true),
];

const PRIVACY_FIELDS: &[FieldSpec] = &[
    field("share_analytics", Some("analyticsSharing"), false),
    field("two_factor_auth", Some("twoFactorAuth"), false),
    field("third_party_integrations", Some("thirdPartyIntegrations"), false),
    field("public_profile", Some("publicProfile"), false),
];

// The dashboard UI already sends canonical names; no aliases.
const DASHBOARD_FIELDS: &[FieldSpec] = &[
    field("show_accounts", None, true),
    field("show_transactions", None, true),
    field("show_budgets", None, true),
    field("show_goals", None, true),
    field("compact_view", None, false),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingsGroup {
    Notifications,
    Privacy,
    Dashboard,
}

impl SettingsGroup {
    pub const ALL: [SettingsGroup; 3] = [
        SettingsGroup::Notifications,
        SettingsGroup::Privacy,
        SettingsGroup::Dashboard,
    ];

    /// Document key and column name.
    pub fn name(self) -> &'static str {
        match self {
            SettingsGroup::Notifications => "notifications",
            SettingsGroup::Privacy => "privacy",
            SettingsGroup::Dashboard => "dashboard",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SettingsGroup::Notifications => "Notification",
            SettingsGroup::Privacy => "Privacy",
            SettingsGroup::Dashboard => "Dashboard",
        }
    }

    pub fn fields(self) -> &'static [FieldSpec] {
        match self {
            SettingsGroup::Notifications => NOTIFICATION_FIELDS,
            SettingsGroup::Privacy => PRIVACY_FIELDS,
            SettingsGroup::Dashboard => DASHBOARD_FIELDS,
        }
    }

    /// Canonical name for `key`, which may be either form. `None` if unrecognized.
    pub fn resolve(self, key: &str) -> Option<&'static str> {
        self.fields()
            .iter()
            .find(|f| f.canonical == key || f.ui_alias == Some(key))
            .map(|f| f.canonical)
    }

    pub fn defaults(self) -> Flags {
        self.fields()
            .iter()
            .map(|f| (f.canonical.to_string(), f.default))
            .collect()
    }

    /// Keep only recognized keys, translated to canonical names, values coerced to bool.
    /// When a field is sent under both names the canonical one wins.
    pub fn normalize_patch(self, body: &Map<String, Value>) -> Flags {
        body.iter()
            .filter_map(|(key, value)| {
                let canonical = self.resolve(key)?;
                if key != canonical && body.contains_key(canonical) {
                    return None;
                }
                Some((canonical.to_string(), truthy(value)))
            })
            .collect()
    }
}

/// Truthiness used when coercing request values to flags.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn defaults_match_documented_values() {
        let n = SettingsGroup::Notifications.defaults();
        assert_eq!(n.len(), 7);
        assert!(n.iter().all(|(k, v)| *v == (k != "investment_opportunities")));

        let p = SettingsGroup::Privacy.defaults();
        assert_eq!(p.len(), 4);
        assert!(p.values().all(|v| !v));

        let d = SettingsGroup::Dashboard.defaults();
        assert_eq!(d.len(), 5);
        assert_eq!(d["compact_view"], false);
        assert!(d.iter().filter(|(k, _)| k.starts_with("show_")).all(|(_, v)| *v));
    }

    #[test]
    fn aliases_resolve_to_canonical_names() {
        let g = SettingsGroup::Notifications;
        assert_eq!(g.resolve("goalReminders"), Some("goal_reminders"));
        assert_eq!(g.resolve("goal_reminders"), Some("goal_reminders"));
        assert_eq!(g.resolve("monthlyReports"), Some("monthly_reports"));
        assert_eq!(g.resolve("transactionAlerts"), None);

        let p = SettingsGroup::Privacy;
        assert_eq!(p.resolve("analyticsSharing"), Some("share_analytics"));
        assert_eq!(p.resolve("twoFactorAuth"), Some("two_factor_auth"));
        assert_eq!(p.resolve("shareAnalytics"), None);
    }

    #[test]
    fn dashboard_has_no_aliases() {
        let d = SettingsGroup::Dashboard;
        assert_eq!(d.resolve("show_goals"), Some("show_goals"));
        assert_eq!(d.resolve("showGoals"), None);
        assert_eq!(d.resolve("compactView"), None);
    }

    #[test]
    fn aliases_never_collide_with_other_canonical_names() {
        for g in SettingsGroup::ALL {
            for f in g.fields() {
                if let Some(alias) = f.ui_alias {
                    assert!(g.fields().iter().all(|o| o.canonical != alias));
                }
            }
        }
    }

    #[test]
    fn normalize_drops_unknown_keys_and_coerces() {
        let patch = SettingsGroup::Notifications.normalize_patch(&obj(json!({
            "goalReminders": 0,
            "push": "yes",
            "unknownField": true,
        })));
        assert_eq!(patch.len(), 2);
        assert_eq!(patch["goal_reminders"], false);
        assert_eq!(patch["push"], true);
    }

    #[test]
    fn canonical_name_beats_alias_for_same_field() {
        for body in [
            json!({ "goalReminders": true, "goal_reminders": false }),
            json!({ "goal_reminders": false, "goalReminders": true }),
        ] {
            let patch = SettingsGroup::Notifications.normalize_patch(&obj(body));
            assert_eq!(patch.len(), 1);
            assert_eq!(patch["goal_reminders"], false);
        }

        let patch = SettingsGroup::Privacy.normalize_patch(&obj(json!({
            "analyticsSharing": false,
            "share_analytics": true,
        })));
        assert_eq!(patch["share_analytics"], true);
    }

    #[test]
    fn normalize_of_only_unknown_keys_is_empty() {
        let patch = SettingsGroup::Privacy.normalize_patch(&obj(json!({ "unknownField": true })));
        assert!(patch.is_empty());
    }

    #[test]
    fn truthiness_follows_json_shape() {
        assert!(!truthy(&Value::Null));
        assert!(truthy(&json!(true)));
        assert!(!truthy(&json!(0)));
        assert!(truthy(&json!(0.5)));
        assert!(!truthy(&json!("")));
        assert!(truthy(&json!("false")));
        assert!(!truthy(&json!([])));
        assert!(truthy(&json!({ "a": 1 })));
    }
}
