//! Rule registry.
//!
//! Maps rule names to [`RuleDefinition`]s. One registry is shared by every
//! area, provider and session created from the same [`FormValidator`], so a
//! rule extended anywhere is visible everywhere in that validation tree.
//!
//! [`FormValidator`]: crate::FormValidator

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::rule::{Rule, RuleDefinition};
use crate::session::ValidationSession;

/// Rules whose argument tail is passed as one unsplit argument by default.
const WHOLE_ARGUMENT_RULES: &[&str] = &["regex"];

/// Name-keyed rule store.
pub struct RuleRegistry {
    rules: RwLock<HashMap<String, RuleDefinition>>,
    whole_argument: RwLock<HashSet<String>>,
}

impl RuleRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            rules: RwLock::new(HashMap::new()),
            whole_argument: RwLock::new(
                WHOLE_ARGUMENT_RULES
                    .iter()
                    .map(|name| (*name).to_string())
                    .collect(),
            ),
        }
    }

    /// A registry seeded with the built-in rules.
    pub fn with_builtin_rules() -> Self {
        let registry = Self::new();
        crate::rules::register_builtin(&registry);
        registry
    }

    /// Inserts or overwrites a rule. Last write wins.
    ///
    /// No shape check happens here; a broken rule surfaces when invoked.
    pub fn extend(&self, name: impl Into<String>, rule: impl Into<RuleDefinition>) {
        let name = name.into();
        let replaced = self.rules.write().insert(name.clone(), rule.into()).is_some();

        if replaced {
            tracing::debug!(rule = %name, "Overwrote validation rule");
        } else {
            tracing::debug!(rule = %name, "Registered validation rule");
        }
    }

    /// Registers a factory that binds a rule to each running session.
    pub fn extend_bound<F>(&self, name: impl Into<String>, factory: F)
    where
        F: Fn(&ValidationSession) -> Arc<dyn Rule> + Send + Sync + 'static,
    {
        self.extend(name, RuleDefinition::bound(factory));
    }

    pub fn rule_exists(&self, name: &str) -> bool {
        self.rules.read().contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<RuleDefinition> {
        self.rules.read().get(name).cloned()
    }

    /// Registered rule names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.rules.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Marks `name` as taking its whole argument tail as a single argument.
    ///
    /// Needed for rules whose argument may itself contain commas.
    pub fn keep_arguments_whole(&self, name: impl Into<String>) {
        self.whole_argument.write().insert(name.into());
    }

    /// Whether the argument tail of `name` is comma-split.
    pub fn splits_arguments(&self, name: &str) -> bool {
        !self.whole_argument.read().contains(name)
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &self.names())
            .field("whole_argument", &*self.whole_argument.read())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::FnRule;

    #[test]
    fn rule_exists_after_extend() {
        let registry = RuleRegistry::new();
        assert!(!registry.rule_exists("test_rule"));

        registry.extend("test_rule", FnRule::new("", |_, _| Ok(true.into())));
        assert!(registry.rule_exists("test_rule"));
        assert!(!registry.rule_exists("never_registered"));
    }

    #[test]
    fn extend_overwrites() {
        let registry = RuleRegistry::new();
        registry.extend("x", FnRule::new("first", |_, _| Ok(true.into())));
        registry.extend("x", FnRule::new("second", |_, _| Ok(true.into())));

        match registry.get("x") {
            Some(RuleDefinition::Static(rule)) => assert_eq!(rule.message(), "second"),
            other => panic!("unexpected definition: {other:?}"),
        }
        assert_eq!(registry.names(), vec!["x".to_string()]);
    }

    #[test]
    fn regex_keeps_arguments_whole() {
        let registry = RuleRegistry::new();
        assert!(!registry.splits_arguments("regex"));
        assert!(registry.splits_arguments("max"));

        registry.keep_arguments_whole("pattern");
        assert!(!registry.splits_arguments("pattern"));
    }

    #[test]
    fn builtin_rules_are_registered() {
        let registry = RuleRegistry::with_builtin_rules();
        for name in [
            "required", "min", "max", "length", "min_length", "max_length", "regex", "checked",
            "accepted", "same",
        ] {
            assert!(registry.rule_exists(name), "missing built-in rule {name}");
        }
    }
}
