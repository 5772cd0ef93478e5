//! Locale-keyed message templates.
//!
//! A catalog maps locale code to rule name to template. The active locale is
//! shared by every session created from the same [`FormValidator`]; switching
//! to an unknown locale falls back to [`DEFAULT_LOCALE`].
//!
//! [`FormValidator`]: crate::FormValidator

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::error::Result;

/// Fallback locale, always present.
pub const DEFAULT_LOCALE: &str = "en";

/// `locale -> rule name -> template`
pub type LocaleMessages = HashMap<String, HashMap<String, String>>;

#[derive(Debug)]
struct CatalogState {
    active: String,
    messages: LocaleMessages,
}

/// Message templates per locale plus the active locale.
#[derive(Debug)]
pub struct LocaleCatalog {
    state: RwLock<CatalogState>,
}

impl LocaleCatalog {
    /// Catalog seeded with the built-in `en` and `nl` templates, `en` active.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(CatalogState {
                active: DEFAULT_LOCALE.to_string(),
                messages: builtin_messages(),
            }),
        }
    }

    /// Parses a `{ "<locale>": { "<rule>": "<template>" } }` document.
    pub fn parse_messages(json: &str) -> Result<LocaleMessages> {
        Ok(serde_json::from_str(json)?)
    }

    /// Built-in catalog extended with the templates of a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        let catalog = Self::new();
        catalog.add_locale(Self::parse_messages(json)?);
        Ok(catalog)
    }

    /// Merges templates into the catalog. Existing keys are overwritten.
    pub fn add_locale(&self, messages: LocaleMessages) {
        let mut state = self.state.write();
        for (locale, templates) in messages {
            state.messages.entry(locale).or_default().extend(templates);
        }
    }

    /// Switches the active locale, merging `messages` first when given.
    ///
    /// Returns the locale that ended up active.
    pub fn set_locale(&self, locale: &str, messages: Option<LocaleMessages>) -> String {
        if let Some(messages) = messages {
            self.add_locale(messages);
        }

        let mut state = self.state.write();
        if state.messages.contains_key(locale) {
            state.active = locale.to_string();
        } else {
            tracing::warn!(
                locale,
                fallback = DEFAULT_LOCALE,
                "Unknown locale, falling back"
            );
            state.active = DEFAULT_LOCALE.to_string();
        }
        state.active.clone()
    }

    /// The active locale code.
    pub fn locale(&self) -> String {
        self.state.read().active.clone()
    }

    pub fn has_locale(&self, locale: &str) -> bool {
        self.state.read().messages.contains_key(locale)
    }

    /// Template for `rule` in the active locale.
    pub fn template(&self, rule: &str) -> Option<String> {
        let state = self.state.read();
        state
            .messages
            .get(&state.active)
            .and_then(|templates| templates.get(rule))
            .cloned()
    }
}

impl Default for LocaleCatalog {
    fn default() -> Self {
        Self::new()
    }
}

fn builtin_messages() -> LocaleMessages {
    let en = [
        ("accepted", "{name} is not accepted"),
        ("active_url", "{name} is not an active url"),
        ("checked", "{name} is not checked"),
        ("length", "{name} should be {0} characters long"),
        ("max", "{name} should be not greater than {0}"),
        ("max_length", "{name} should be at most {0} characters long"),
        ("min", "{name} should be at least {0}"),
        ("min_length", "{name} should be at least {0} characters long"),
        ("regex", "{name} doesn't have a valid format"),
        ("required", "{name} is required"),
        ("same", "{name} should be the same as {0}"),
    ];
    let nl = [
        ("accepted", "{name} is niet geaccepteerd"),
        ("active_url", "{name} is geen actieve URL"),
        ("checked", "{name} is niet aangevinkt"),
        ("length", "{name} moet {0} karakters lang zijn"),
        ("max", "{name} mag niet meer zijn dan {0}"),
        ("max_length", "{name} mag maximaal {0} karakters lang zijn"),
        ("min", "{name} moet minstens {0} zijn"),
        ("min_length", "{name} moet minstens {0} karakters lang zijn"),
        ("regex", "{name} heeft geen geldig formaat"),
        ("required", "{name} is verplicht"),
        ("same", "{name} moet hetzelfde zijn als {0}"),
    ];

    let table = |entries: &[(&str, &str)]| {
        entries
            .iter()
            .map(|(rule, template)| ((*rule).to_string(), (*template).to_string()))
            .collect::<HashMap<_, _>>()
    };

    HashMap::from([
        (DEFAULT_LOCALE.to_string(), table(&en)),
        ("nl".to_string(), table(&nl)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_english() {
        let catalog = LocaleCatalog::new();
        assert_eq!(catalog.locale(), "en");
        assert_eq!(catalog.template("required").as_deref(), Some("{name} is required"));
    }

    #[test]
    fn switches_to_known_locale() {
        let catalog = LocaleCatalog::new();
        assert_eq!(catalog.set_locale("nl", None), "nl");
        assert_eq!(catalog.template("required").as_deref(), Some("{name} is verplicht"));
    }

    #[test]
    fn unknown_locale_falls_back_to_english() {
        let catalog = LocaleCatalog::new();
        catalog.set_locale("nl", None);
        assert_eq!(catalog.set_locale("not_existing", None), "en");
        assert_eq!(catalog.locale(), "en");
    }

    #[test]
    fn set_locale_registers_supplied_messages() {
        let catalog = LocaleCatalog::new();
        let messages = HashMap::from([(
            "test".to_string(),
            HashMap::from([("foo".to_string(), "bar".to_string())]),
        )]);

        assert_eq!(catalog.set_locale("test", Some(messages)), "test");
        assert_eq!(catalog.template("foo").as_deref(), Some("bar"));
        assert_eq!(catalog.template("required"), None);
    }

    #[test]
    fn add_locale_merges_keys() {
        let catalog = LocaleCatalog::new();
        catalog.add_locale(HashMap::from([(
            "en".to_string(),
            HashMap::from([("custom".to_string(), "{name} is custom".to_string())]),
        )]));

        assert!(catalog.template("custom").is_some());
        assert!(catalog.template("required").is_some());
    }

    #[test]
    fn parses_json_catalog() {
        let messages = LocaleCatalog::parse_messages(r#"{"de": {"required": "{name} ist erforderlich"}}"#)
            .expect("valid catalog");
        assert_eq!(messages["de"]["required"], "{name} ist erforderlich");

        assert!(LocaleCatalog::parse_messages("[1, 2]").is_err());
    }

    #[test]
    fn from_json_keeps_builtin_locales() {
        let catalog = LocaleCatalog::from_json(r#"{"de": {"required": "{name} fehlt"}}"#).unwrap();
        assert!(catalog.has_locale("de"));
        assert!(catalog.has_locale("nl"));
        assert_eq!(catalog.set_locale("de", None), "de");
        assert_eq!(catalog.template("required").as_deref(), Some("{name} fehlt"));

        assert!(matches!(
            LocaleCatalog::from_json("not json"),
            Err(crate::Error::InvalidCatalog { .. })
        ));
    }
}
