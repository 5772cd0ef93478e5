//! Provider: coordinating owner of named areas.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use futures::future::join_all;
use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::area::Area;
use crate::element::{ElementKind, ElementRef};
use crate::error::{Error, Result};
use crate::rule_spec::RuleOptions;
use crate::scope::ProviderScope;
use crate::validator::FormValidator;

/// Externally supplied errors, keyed by area name.
pub type AreaErrors = HashMap<String, Vec<String>>;

#[derive(Debug, Clone)]
struct ProviderState {
    valid: bool,
    dirty: bool,
}

/// Owns a set of uniquely named areas.
///
/// Rules given to the provider are appended to the rules of every area
/// registered with it.
pub struct Provider {
    validator: FormValidator,
    rules: RuleOptions,
    areas: RwLock<IndexMap<String, Arc<Area>>>,
    errors: RwLock<AreaErrors>,
    state: RwLock<ProviderState>,
    this: Weak<Provider>,
}

impl Provider {
    pub fn new(validator: FormValidator, rules: impl Into<RuleOptions>) -> Arc<Self> {
        let rules = rules.into();
        Arc::new_cyclic(|this| Self {
            validator,
            rules,
            areas: RwLock::new(IndexMap::new()),
            errors: RwLock::new(AreaErrors::new()),
            state: RwLock::new(ProviderState {
                valid: true,
                dirty: false,
            }),
            this: this.clone(),
        })
    }

    pub fn validator(&self) -> &FormValidator {
        &self.validator
    }

    /// Rules inherited by every area.
    pub fn rules(&self) -> &RuleOptions {
        &self.rules
    }

    /// Registers `area` under `name`.
    ///
    /// Errors queued for `name` are flushed into the area right away.
    pub fn add_area(&self, name: &str, area: Arc<Area>) -> Result<()> {
        {
            let mut areas = self.areas.write();
            if areas.contains_key(name) {
                return Err(Error::DuplicateAreaName {
                    name: name.to_string(),
                });
            }
            areas.insert(name.to_string(), Arc::clone(&area));
        }

        area.attach(self.this.clone());
        tracing::debug!(area = %name, "Registered area with provider");

        let queued = self.errors.read().get(name).cloned();
        if let Some(errors) = queued.filter(|errors| !errors.is_empty()) {
            area.receive_errors(errors);
        }
        Ok(())
    }

    pub fn area(&self, name: &str) -> Option<Arc<Area>> {
        self.areas.read().get(name).cloned()
    }

    /// Registered area names, in registration order.
    pub fn area_names(&self) -> Vec<String> {
        self.areas.read().keys().cloned().collect()
    }

    /// Validates every area concurrently.
    ///
    /// Returns whether all areas passed. A configuration error in any area is
    /// returned once every area has finished.
    pub async fn validate(&self) -> Result<bool> {
        self.validate_inner(None::<fn()>).await
    }

    /// Like [`validate`](Self::validate), calling `on_all_valid` only when
    /// every area passed.
    pub async fn validate_with<F>(&self, on_all_valid: F) -> Result<bool>
    where
        F: FnOnce(),
    {
        self.validate_inner(Some(on_all_valid)).await
    }

    async fn validate_inner<F>(&self, on_all_valid: Option<F>) -> Result<bool>
    where
        F: FnOnce(),
    {
        self.state.write().dirty = false;

        let areas: Vec<Arc<Area>> = self.areas.read().values().cloned().collect();
        let outcomes = join_all(areas.iter().map(|area| area.validate(None))).await;

        let mut all_valid = true;
        for outcome in outcomes {
            all_valid &= outcome?;
        }

        {
            let mut state = self.state.write();
            state.valid = all_valid;
            state.dirty = !all_valid;
        }
        tracing::debug!(areas = areas.len(), all_valid, "Validated provider");

        if all_valid && let Some(callback) = on_all_valid {
            callback();
        }
        Ok(all_valid)
    }

    /// Elements tracked by the named area, or by all areas without a name.
    ///
    /// An unknown name yields no elements. `kind` filters by element kind.
    pub fn refs(&self, area_name: Option<&str>, kind: Option<ElementKind>) -> Vec<ElementRef> {
        let areas = self.areas.read();
        let selected: Vec<&Arc<Area>> = match area_name {
            Some(name) => areas.get(name).into_iter().collect(),
            None => areas.values().collect(),
        };

        selected
            .into_iter()
            .flat_map(|area| area.input_refs())
            .filter(|element| kind.is_none_or(|kind| element.kind() == kind))
            .collect()
    }

    /// Applies an externally supplied `area name -> errors` map.
    ///
    /// Only entries that changed since the previous map and are non-empty are
    /// injected. Unknown area names are ignored; their errors are flushed if
    /// an area with that name registers later.
    pub fn set_errors(&self, errors: AreaErrors) {
        let previous = std::mem::replace(&mut *self.errors.write(), errors.clone());

        for (name, batch) in errors {
            if batch.is_empty() || previous.get(&name) == Some(&batch) {
                continue;
            }
            match self.area(&name) {
                Some(area) => area.receive_errors(batch),
                None => tracing::trace!(area = %name, "Errors for unregistered area"),
            }
        }
    }

    pub fn scope(&self) -> ProviderScope {
        let state = self.state.read();
        ProviderScope {
            valid: state.valid,
            dirty: state.dirty,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.state.read().valid
    }

    pub fn is_dirty(&self) -> bool {
        self.state.read().dirty
    }
}

impl std::fmt::Debug for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Provider")
            .field("rules", &self.rules)
            .field("areas", &self.area_names())
            .field("state", &*self.state.read())
            .finish()
    }
}
