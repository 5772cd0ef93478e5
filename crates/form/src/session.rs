//! Validation session: one run of a rule list against a set of elements.
//!
//! Sessions are cheap to clone; clones share the error accumulator and the
//! state, which lets session-bound rules keep a handle to the run that
//! created them.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::area::Area;
use crate::element::{Element, ElementKind, ElementRef};
use crate::error::{Error, Result};
use crate::invoker::RuleInvoker;
use crate::locale::LocaleCatalog;
use crate::registry::RuleRegistry;
use crate::rule_spec::{RuleOptions, RuleSpec};
use crate::validator::FormValidator;

/// The rule that makes every element applicable.
pub const REQUIRED_RULE: &str = "required";

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Running,
    Passed,
    Failed,
    /// A rule could not be evaluated; the run was aborted.
    Errored,
}

/// Evaluates an ordered rule list against a set of target elements.
#[derive(Clone)]
pub struct ValidationSession {
    elements: Arc<[ElementRef]>,
    rules: Arc<[String]>,
    name: String,
    validation_name: Option<String>,
    area: Option<Weak<Area>>,
    registry: Arc<RuleRegistry>,
    catalog: Arc<LocaleCatalog>,
    errors: Arc<Mutex<Vec<String>>>,
    state: Arc<Mutex<SessionState>>,
}

impl ValidationSession {
    /// Starts building a session against `validator`'s registry and catalog.
    pub fn builder(validator: &FormValidator) -> SessionBuilder {
        SessionBuilder {
            registry: Arc::clone(validator.registry()),
            catalog: Arc::clone(validator.catalog()),
            elements: Vec::new(),
            rules: RuleOptions::none(),
            name: None,
            validation_name: None,
            area: None,
        }
    }

    pub fn elements(&self) -> &[ElementRef] {
        &self.elements
    }

    pub fn rules(&self) -> &[String] {
        &self.rules
    }

    /// Name resolved at construction.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Override used in messages instead of [`name`](Self::name).
    pub fn validation_name(&self) -> Option<&str> {
        self.validation_name.as_deref()
    }

    /// Name substituted for `{name}` in messages.
    pub fn display_name(&self) -> &str {
        self.validation_name.as_deref().unwrap_or(&self.name)
    }

    pub fn registry(&self) -> &Arc<RuleRegistry> {
        &self.registry
    }

    pub fn catalog(&self) -> &Arc<LocaleCatalog> {
        &self.catalog
    }

    pub fn state(&self) -> SessionState {
        *self.state.lock()
    }

    /// Whether the rule list mentions the unconditional `required` rule.
    pub fn requires_value(&self) -> bool {
        self.rules
            .iter()
            .any(|raw| RuleSpec::name_of(raw) == REQUIRED_RULE)
    }

    /// Whether `element` takes part in validation.
    ///
    /// True when the rules include `required`, when the element currently
    /// yields a value, or when its kind is always applicable.
    pub fn should_validate(&self, element: &Element) -> bool {
        self.requires_value()
            || !element.values().is_empty()
            || element.capabilities().always_applicable
    }

    /// Whether any target element takes part in validation.
    pub fn has_applicable_elements(&self) -> bool {
        self.elements
            .iter()
            .any(|element| self.should_validate(element))
    }

    /// Runs every rule in order and reports whether all of them passed.
    ///
    /// Failing rules append their message and evaluation continues. A rule
    /// that errors aborts the run and the error is returned.
    pub async fn validate(&self) -> Result<bool> {
        self.errors.lock().clear();
        self.set_state(SessionState::Running);

        if !self.has_applicable_elements() {
            tracing::trace!(name = %self.name, "No applicable elements, skipping rules");
            self.set_state(SessionState::Passed);
            return Ok(true);
        }

        let invoker = RuleInvoker::new(self);
        let mut passed = true;
        for raw in self.rules.iter() {
            match invoker.invoke(raw).await {
                Ok(rule_passed) => passed &= rule_passed,
                Err(err) => {
                    self.set_state(SessionState::Errored);
                    return Err(err);
                }
            }
        }

        self.set_state(if passed {
            SessionState::Passed
        } else {
            SessionState::Failed
        });
        Ok(passed)
    }

    /// Messages of the failed rules, in rule order.
    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().clone()
    }

    pub(crate) fn push_error(&self, message: String) {
        self.errors.lock().push(message);
    }

    /// The area this session validates for.
    pub fn area(&self) -> Result<Arc<Area>> {
        self.area
            .as_ref()
            .and_then(Weak::upgrade)
            .ok_or(Error::NotInAreaContext)
    }

    /// Elements tracked by areas of the enclosing provider.
    ///
    /// With `area_name` only that area's elements are returned (none for an
    /// unknown name); without, the union over all areas. `kind` filters by
    /// element kind. An area outside any provider sees no elements. Fails
    /// with [`Error::NotInAreaContext`] when the session has no area.
    pub fn refs(&self, area_name: Option<&str>, kind: Option<ElementKind>) -> Result<Vec<ElementRef>> {
        let area = self.area()?;
        Ok(area
            .provider()
            .map(|provider| provider.refs(area_name, kind))
            .unwrap_or_default())
    }

    fn set_state(&self, state: SessionState) {
        *self.state.lock() = state;
    }
}

impl std::fmt::Debug for ValidationSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationSession")
            .field("name", &self.name)
            .field("validation_name", &self.validation_name)
            .field("rules", &self.rules)
            .field("elements", &self.elements.len())
            .field("state", &self.state())
            .finish()
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Builder for [`ValidationSession`].
#[derive(Debug)]
pub struct SessionBuilder {
    registry: Arc<RuleRegistry>,
    catalog: Arc<LocaleCatalog>,
    elements: Vec<ElementRef>,
    rules: RuleOptions,
    name: Option<String>,
    validation_name: Option<String>,
    area: Option<Weak<Area>>,
}

impl SessionBuilder {
    pub fn elements(mut self, elements: impl IntoIterator<Item = ElementRef>) -> Self {
        self.elements = elements.into_iter().collect();
        self
    }

    pub fn element(mut self, element: ElementRef) -> Self {
        self.elements.push(element);
        self
    }

    pub fn rules(mut self, rules: impl Into<RuleOptions>) -> Self {
        self.rules = rules.into();
        self
    }

    /// Name used when the targets do not provide one.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn validation_name(mut self, name: Option<String>) -> Self {
        self.validation_name = name;
        self
    }

    pub(crate) fn area(mut self, area: Weak<Area>) -> Self {
        self.area = Some(area);
        self
    }

    /// Resolves the session name and builds the session.
    ///
    /// A single target with a `name` attribute names the session; otherwise
    /// the explicit name is used. Neither is [`Error::MissingName`].
    pub fn build(self) -> Result<ValidationSession> {
        let element_name = match self.elements.as_slice() {
            [single] => single.name().map(ToString::to_string),
            _ => None,
        };
        let name = element_name.or(self.name).ok_or(Error::MissingName)?;

        Ok(ValidationSession {
            elements: self.elements.into(),
            rules: self.rules.flatten().into(),
            name,
            validation_name: self.validation_name,
            area: self.area,
            registry: self.registry,
            catalog: self.catalog,
            errors: Arc::new(Mutex::new(Vec::new())),
            state: Arc::new(Mutex::new(SessionState::Idle)),
        })
    }
}
