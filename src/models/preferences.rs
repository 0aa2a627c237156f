use serde::{Deserialize, Serialize};

/// The colour scheme the UI renders with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

/// Display options that outlive any single session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPreferences {
    pub theme: Theme,
    /// Mask balances behind placeholders.
    pub hide_balances: bool,
    /// Show fiat values next to token amounts.
    pub show_usd_values: bool,
    pub compact_mode: bool,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            theme: Theme::System,
            hide_balances: false,
            show_usd_values: true,
            compact_mode: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let prefs: UserPreferences = sonic_rs::from_str(r#"{"theme":"dark"}"#).unwrap();
        assert_eq!(prefs.theme, Theme::Dark);
        assert!(prefs.show_usd_values);
        assert!(!prefs.hide_balances);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = sonic_rs::to_string(&UserPreferences::default()).unwrap();
        assert!(json.contains(r#""theme":"system""#));
        assert!(json.contains(r#""showUsdValues":true"#));
    }
}
