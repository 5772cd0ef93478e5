//! The validation context every area, provider and session is created from.

use std::sync::Arc;

use crate::area::{Area, AreaOptions};
use crate::config::ValidatorConfig;
use crate::locale::{LocaleCatalog, LocaleMessages};
use crate::provider::Provider;
use crate::registry::RuleRegistry;
use crate::rule::{Rule, RuleDefinition};
use crate::rule_spec::RuleOptions;
use crate::session::{SessionBuilder, ValidationSession};

/// Owns the rule registry and locale catalog of one validation tree.
///
/// Cloning is cheap and clones share the registry and catalog: a rule
/// extended through any clone is visible to every area and session built
/// from any other. Separate `FormValidator::new` calls are fully isolated.
#[derive(Debug, Clone)]
pub struct FormValidator {
    registry: Arc<RuleRegistry>,
    catalog: Arc<LocaleCatalog>,
    config: Arc<ValidatorConfig>,
}

impl FormValidator {
    pub fn new(config: ValidatorConfig) -> Self {
        let registry = if config.builtin_rules {
            RuleRegistry::with_builtin_rules()
        } else {
            RuleRegistry::new()
        };

        let catalog = LocaleCatalog::new();
        if !config.messages.is_empty() {
            catalog.add_locale(config.messages.clone());
        }
        catalog.set_locale(&config.locale, None);

        Self {
            registry: Arc::new(registry),
            catalog: Arc::new(catalog),
            config: Arc::new(config),
        }
    }

    pub fn registry(&self) -> &Arc<RuleRegistry> {
        &self.registry
    }

    pub fn catalog(&self) -> &Arc<LocaleCatalog> {
        &self.catalog
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// See [`RuleRegistry::extend`].
    pub fn extend(&self, name: impl Into<String>, rule: impl Into<RuleDefinition>) {
        self.registry.extend(name, rule);
    }

    /// See [`RuleRegistry::extend_bound`].
    pub fn extend_bound<F>(&self, name: impl Into<String>, factory: F)
    where
        F: Fn(&ValidationSession) -> Arc<dyn Rule> + Send + Sync + 'static,
    {
        self.registry.extend_bound(name, factory);
    }

    pub fn rule_exists(&self, name: &str) -> bool {
        self.registry.rule_exists(name)
    }

    /// See [`LocaleCatalog::set_locale`].
    pub fn set_locale(&self, locale: &str, messages: Option<LocaleMessages>) -> String {
        self.catalog.set_locale(locale, messages)
    }

    pub fn add_locale(&self, messages: LocaleMessages) {
        self.catalog.add_locale(messages);
    }

    pub fn locale(&self) -> String {
        self.catalog.locale()
    }

    /// A new area sharing this validator.
    pub fn area(&self, options: AreaOptions) -> Arc<Area> {
        Area::new(self.clone(), options)
    }

    /// A new provider sharing this validator.
    pub fn provider(&self, rules: impl Into<RuleOptions>) -> Arc<Provider> {
        Provider::new(self.clone(), rules)
    }

    /// A standalone session builder.
    pub fn session(&self) -> SessionBuilder {
        ValidationSession::builder(self)
    }
}

impl Default for FormValidator {
    fn default() -> Self {
        Self::new(ValidatorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::FnRule;

    #[test]
    fn clones_share_the_registry() {
        let validator = FormValidator::default();
        let clone = validator.clone();
        clone.extend("shared", FnRule::new("", |_, _| Ok(true.into())));
        assert!(validator.rule_exists("shared"));
    }

    #[test]
    fn separate_validators_are_isolated() {
        let first = FormValidator::default();
        let second = FormValidator::default();
        first.extend("only_first", FnRule::new("", |_, _| Ok(true.into())));
        assert!(!second.rule_exists("only_first"));
    }

    #[test]
    fn builtin_rules_can_be_disabled() {
        let validator = FormValidator::new(ValidatorConfig::default().with_builtin_rules(false));
        assert!(!validator.rule_exists("required"));
    }

    #[test]
    fn config_locale_is_applied() {
        let validator = FormValidator::new(ValidatorConfig::default().with_locale("nl"));
        assert_eq!(validator.locale(), "nl");

        let fallback = FormValidator::new(ValidatorConfig::default().with_locale("xx"));
        assert_eq!(fallback.locale(), "en");
    }
}
