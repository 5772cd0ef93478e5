//! Validation area: a named group of elements validated as one unit.
//!
//! An area tracks the interactive elements of its subtree, runs a
//! [`ValidationSession`] on interaction or on demand and keeps the resulting
//! state. Areas may register with a [`Provider`] for "validate all" and
//! cross-area lookups.
//!
//! Overlapping validations of one area are not cancelled: by default the
//! last run to finish writes the state. With
//! [`ValidatorConfig::discard_stale_results`](crate::ValidatorConfig) each run
//! is stamped and results of superseded runs are dropped instead.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};

use crate::element::{ElementRef, contains};
use crate::error::{Error, Result};
use crate::provider::Provider;
use crate::rule_spec::{RuleOptions, merge_rules};
use crate::scope::AreaScope;
use crate::session::ValidationSession;
use crate::tree::{Node, collect_elements};
use crate::validator::FormValidator;

// ============================================================================
// OPTIONS
// ============================================================================

/// Static configuration of an area.
#[derive(Debug, Clone, Default)]
pub struct AreaOptions {
    pub rules: RuleOptions,
    /// Explicit area name. Required unless the area tracks exactly one named element.
    pub name: Option<String>,
    /// Name shown in messages instead of the resolved name.
    pub validation_name: Option<String>,
}

impl AreaOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rules(mut self, rules: impl Into<RuleOptions>) -> Self {
        self.rules = rules.into();
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn validation_name(mut self, name: impl Into<String>) -> Self {
        self.validation_name = Some(name.into());
        self
    }
}

// ============================================================================
// AREA
// ============================================================================

#[derive(Debug, Clone)]
struct AreaState {
    errors: Vec<String>,
    valid: bool,
    pending: bool,
    dirty: bool,
    touched: bool,
}

impl Default for AreaState {
    fn default() -> Self {
        Self {
            errors: Vec::new(),
            valid: true,
            pending: false,
            dirty: false,
            touched: false,
        }
    }
}

/// A boundaried group of form elements.
pub struct Area {
    validator: FormValidator,
    options: AreaOptions,
    elements: RwLock<Vec<ElementRef>>,
    state: RwLock<AreaState>,
    provider: RwLock<Option<Weak<Provider>>>,
    injected: Mutex<Option<Vec<String>>>,
    generation: AtomicU64,
    this: Weak<Area>,
}

impl Area {
    pub fn new(validator: FormValidator, options: AreaOptions) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            validator,
            options,
            elements: RwLock::new(Vec::new()),
            state: RwLock::new(AreaState::default()),
            provider: RwLock::new(None),
            injected: Mutex::new(None),
            generation: AtomicU64::new(0),
            this: this.clone(),
        })
    }

    pub fn options(&self) -> &AreaOptions {
        &self.options
    }

    // ------------------------------------------------------------------------
    // Element tracking
    // ------------------------------------------------------------------------

    /// Recomputes the tracked elements from a render pass.
    pub fn render(&self, tree: &Node) {
        *self.elements.write() = collect_elements(tree);
    }

    /// Tracks one more element; already tracked elements are ignored.
    pub fn register_element(&self, element: ElementRef) {
        let mut elements = self.elements.write();
        if !contains(&elements, &element) {
            elements.push(element);
        }
    }

    /// Currently tracked elements.
    pub fn input_refs(&self) -> Vec<ElementRef> {
        self.elements.read().clone()
    }

    pub fn tracks(&self, element: &ElementRef) -> bool {
        contains(&self.elements.read(), element)
    }

    /// The area's registry key and default display name.
    ///
    /// A single tracked element with a name wins; otherwise the explicit
    /// name option is used.
    pub fn name(&self) -> Result<String> {
        let elements = self.elements.read();
        if let [single] = elements.as_slice()
            && let Some(name) = single.name()
        {
            return Ok(name.to_string());
        }
        self.options.name.clone().ok_or(Error::MissingName)
    }

    // ------------------------------------------------------------------------
    // Provider registration
    // ------------------------------------------------------------------------

    /// Resolves the name and registers with `provider`, if any.
    ///
    /// Call after the first [`render`](Self::render). Fails with
    /// [`Error::MissingName`] or [`Error::DuplicateAreaName`].
    pub fn mount(&self, provider: Option<&Arc<Provider>>) -> Result<()> {
        let name = self.name()?;
        tracing::debug!(area = %name, with_provider = provider.is_some(), "Mounting area");

        if let Some(provider) = provider {
            let this = self.this.upgrade().ok_or(Error::NotInAreaContext)?;
            provider.add_area(&name, this)?;
        }
        Ok(())
    }

    pub(crate) fn attach(&self, provider: Weak<Provider>) {
        *self.provider.write() = Some(provider);
    }

    /// The enclosing provider, if registered with one.
    pub fn provider(&self) -> Option<Arc<Provider>> {
        self.provider.read().as_ref().and_then(Weak::upgrade)
    }

    /// Own rules followed by the provider's rules.
    pub fn rules(&self) -> Vec<String> {
        match self.provider() {
            Some(provider) => merge_rules([self.options.rules.clone(), provider.rules().clone()]),
            None => self.options.rules.flatten(),
        }
    }

    // ------------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------------

    /// Builds the session for a run over `element` or the whole area.
    pub fn session(&self, element: Option<&ElementRef>) -> Result<ValidationSession> {
        let targets = match element {
            Some(element) => vec![Arc::clone(element)],
            None => self.input_refs(),
        };

        ValidationSession::builder(&self.validator)
            .elements(targets)
            .rules(self.rules())
            .name(self.name()?)
            .validation_name(self.options.validation_name.clone())
            .area(self.this.clone())
            .build()
    }

    /// Validates one element, or the whole area when `element` is `None`.
    ///
    /// Configuration errors are returned. Rule failures (unknown rule, bad
    /// argument) are logged and leave the area not pending with its validity
    /// untouched; the run then reports `false`.
    pub async fn validate(&self, element: Option<&ElementRef>) -> Result<bool> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = self.state.write();
            state.pending = true;
            state.dirty = false;
            state.errors.clear();
        }
        *self.injected.lock() = None;

        let session = match self.session(element) {
            Ok(session) => session,
            Err(err) => {
                self.state.write().pending = false;
                return Err(err);
            }
        };

        tracing::debug!(
            area = %session.name(),
            generation,
            rules = session.rules().len(),
            "Validating area"
        );

        let outcome = session.validate().await;

        if self.is_stale(generation) {
            tracing::debug!(area = %session.name(), generation, "Discarding superseded validation result");
            return match outcome {
                Ok(passed) => Ok(passed),
                Err(err) if err.is_configuration() => Err(err),
                Err(err) => {
                    tracing::debug!(area = %session.name(), generation, error = %err, "Superseded validation aborted");
                    Ok(false)
                }
            };
        }

        let mut state = self.state.write();
        state.pending = false;
        match outcome {
            Ok(passed) => {
                state.valid = passed;
                state.errors = session.errors();
                tracing::debug!(area = %session.name(), passed, errors = state.errors.len(), "Validated area");
                Ok(passed)
            }
            Err(err) if err.is_configuration() => Err(err),
            Err(err) => {
                tracing::error!(area = %session.name(), error = %err, "Validation aborted");
                Ok(false)
            }
        }
    }

    fn is_stale(&self, generation: u64) -> bool {
        self.validator.config().discard_stale_results
            && self.generation.load(Ordering::SeqCst) != generation
    }

    // ------------------------------------------------------------------------
    // Interaction
    // ------------------------------------------------------------------------

    /// Handles a blur on `element`.
    ///
    /// The element's own listener always runs. Blurrable kinds then mark the
    /// area touched and validate: just that element when it is tracked,
    /// otherwise the whole area. Returns `None` when no validation ran.
    pub async fn handle_blur(&self, element: &ElementRef) -> Result<Option<bool>> {
        element.fire_blur();

        if !element.capabilities().blurrable {
            return Ok(None);
        }

        self.state.write().touched = true;
        let target = self.tracks(element).then_some(element);
        self.validate(target).await.map(Some)
    }

    /// Handles a change on `element`: runs its listener and marks the area dirty.
    pub fn handle_change(&self, element: &ElementRef) {
        element.fire_change();
        self.state.write().dirty = true;
    }

    // ------------------------------------------------------------------------
    // External errors
    // ------------------------------------------------------------------------

    /// Appends an externally supplied error batch and marks the area invalid.
    ///
    /// A batch equal to the one injected since the last validation is
    /// ignored.
    pub fn inject_errors(&self, errors: Vec<String>) {
        let mut injected = self.injected.lock();
        if injected.as_ref() == Some(&errors) {
            return;
        }

        self.append_errors(&errors);
        *injected = Some(errors);
    }

    /// Appends a batch the provider already found changed.
    pub(crate) fn receive_errors(&self, errors: Vec<String>) {
        self.append_errors(&errors);
        *self.injected.lock() = Some(errors);
    }

    fn append_errors(&self, errors: &[String]) {
        if errors.is_empty() {
            return;
        }
        let mut state = self.state.write();
        state.errors.extend_from_slice(errors);
        state.valid = false;
    }

    // ------------------------------------------------------------------------
    // State
    // ------------------------------------------------------------------------

    pub fn scope(&self) -> AreaScope {
        let state = self.state.read();
        AreaScope {
            errors: state.errors.clone(),
            valid: state.valid,
            pending: state.pending,
            dirty: state.dirty,
            touched: state.touched,
        }
    }

    pub fn errors(&self) -> Vec<String> {
        self.state.read().errors.clone()
    }

    pub fn is_valid(&self) -> bool {
        self.state.read().valid
    }

    pub fn is_pending(&self) -> bool {
        self.state.read().pending
    }

    pub fn is_dirty(&self) -> bool {
        self.state.read().dirty
    }

    pub fn is_touched(&self) -> bool {
        self.state.read().touched
    }
}

impl std::fmt::Debug for Area {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Area")
            .field("options", &self.options)
            .field("elements", &self.elements.read().len())
            .field("state", &*self.state.read())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;
    use crate::rule::FnRule;

    fn area(validator: &FormValidator, options: AreaOptions, elements: Vec<ElementRef>) -> Arc<Area> {
        let area = Area::new(validator.clone(), options);
        area.render(&Node::fragment(elements.into_iter().map(Node::element).collect()));
        area
    }

    #[test]
    fn name_from_single_element() {
        let validator = FormValidator::default();
        let area = area(&validator, AreaOptions::new(), vec![Element::input().with_name("test").shared()]);
        assert_eq!(area.name().unwrap(), "test");
    }

    #[test]
    fn mount_without_name_fails() {
        let validator = FormValidator::default();
        let area = area(
            &validator,
            AreaOptions::new(),
            vec![Element::input().shared(), Element::input().shared()],
        );
        assert!(matches!(area.mount(None), Err(Error::MissingName)));
    }

    #[test]
    fn register_element_deduplicates() {
        let validator = FormValidator::default();
        let area = Area::new(validator, AreaOptions::new().name("test"));
        let input = Element::input().shared();
        area.register_element(input.clone());
        area.register_element(input);
        assert_eq!(area.input_refs().len(), 1);
    }

    #[tokio::test]
    async fn failed_validation_sets_errors() {
        let validator = FormValidator::default();
        validator.extend("passes_not", FnRule::new("not passed", |_, _| Ok(false.into())));
        let area = area(
            &validator,
            AreaOptions::new().rules("passes_not"),
            vec![Element::input().with_name("test").with_value("test").shared()],
        );

        assert!(!area.validate(None).await.unwrap());
        let scope = area.scope();
        assert_eq!(scope.errors, vec!["Not passed"]);
        assert!(!scope.valid);
        assert!(!scope.pending);
    }

    #[tokio::test]
    async fn rule_errors_fail_soft() {
        let validator = FormValidator::default();
        let area = area(
            &validator,
            AreaOptions::new().rules("min:foo"),
            vec![Element::input().with_name("test").with_value("test").shared()],
        );

        assert!(!area.validate(None).await.unwrap());
        let scope = area.scope();
        assert!(!scope.pending);
        assert!(scope.valid, "validity is left untouched");
        assert!(scope.errors.is_empty());
    }

    #[test]
    fn injected_errors_are_deduplicated_by_value() {
        let validator = FormValidator::default();
        let area = Area::new(validator, AreaOptions::new().name("test"));

        area.inject_errors(vec!["test error".to_string()]);
        area.inject_errors(vec!["test error".to_string()]);
        assert_eq!(area.errors().len(), 1);
        assert!(!area.is_valid());

        area.inject_errors(vec!["test error 2".to_string()]);
        assert_eq!(area.errors().len(), 2);
    }
}
