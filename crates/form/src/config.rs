//! Validator configuration.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::locale::{DEFAULT_LOCALE, LocaleMessages};

/// Settings for a [`FormValidator`](crate::FormValidator).
///
/// Every field has a default, so a partial document deserializes:
///
/// ```rust,ignore
/// let config = ValidatorConfig::from_json(r#"{ "locale": "nl" }"#)?;
/// assert!(config.builtin_rules);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Locale active after construction. Unknown locales fall back to `en`.
    pub locale: String,
    /// Seed the registry with the built-in rules.
    pub builtin_rules: bool,
    /// Drop results of an area validation that a newer one superseded.
    ///
    /// Off by default: the last validation to finish wins.
    pub discard_stale_results: bool,
    /// Extra templates merged into the catalog.
    pub messages: LocaleMessages,
}

impl ValidatorConfig {
    /// Parses a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn with_builtin_rules(mut self, enabled: bool) -> Self {
        self.builtin_rules = enabled;
        self
    }

    pub fn with_discard_stale_results(mut self, enabled: bool) -> Self {
        self.discard_stale_results = enabled;
        self
    }

    pub fn with_messages(mut self, messages: LocaleMessages) -> Self {
        self.messages = messages;
        self
    }
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            locale: DEFAULT_LOCALE.to_string(),
            builtin_rules: true,
            discard_stale_results: false,
            messages: LocaleMessages::new(),
        }
    }
}
