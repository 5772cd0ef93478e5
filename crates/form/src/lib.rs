//! # nebula-form
//!
//! Declarative validation for interactive form elements.
//!
//! Validation is driven by rule strings such as `"required|max:5"`. Areas
//! group elements and validate them on blur or on demand; a provider owns
//! several named areas, validates them together and lets rules look across
//! areas.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use nebula_form::prelude::*;
//!
//! let validator = FormValidator::default();
//! let age = Element::input().with_name("age").with_value("7").shared();
//!
//! let area = validator.area(AreaOptions::new().rules("required|max:5"));
//! area.render(&Node::element(age));
//!
//! assert!(!area.validate(None).await?);
//! assert_eq!(area.errors(), vec!["Age should be not greater than 5"]);
//! ```
//!
//! ## Rules
//!
//! A rule is a predicate plus a message template, see [`Rule`]. Rules are
//! registered on a [`RuleRegistry`], either as one shared object or as a
//! factory bound to the running [`ValidationSession`]. The built-in set is
//! documented in [`rules`].
//!
//! Messages come from the active locale of the [`LocaleCatalog`] and fall
//! back to the rule's own template. `{name}` and `{0}`, `{1}`, ... are
//! substituted, see [`MessageFormatter`].

pub mod area;
pub mod config;
pub mod element;
pub mod error;
pub mod invoker;
pub mod locale;
pub mod message;
pub mod prelude;
pub mod provider;
pub mod registry;
pub mod rule;
pub mod rule_spec;
pub mod rules;
pub mod scope;
pub mod session;
pub mod tree;
pub mod validator;

pub use area::{Area, AreaOptions};
pub use config::ValidatorConfig;
pub use element::{Element, ElementKind, ElementRef, InputType};
pub use error::{Error, Result};
pub use invoker::RuleInvoker;
pub use locale::{LocaleCatalog, LocaleMessages};
pub use message::MessageFormatter;
pub use provider::{AreaErrors, Provider};
pub use registry::RuleRegistry;
pub use rule::{FnRule, Rule, RuleDefinition, Verdict};
pub use rule_spec::{RuleOptions, RuleSpec, merge_rules};
pub use scope::{AreaScope, ProviderScope};
pub use session::{SessionState, ValidationSession};
pub use tree::Node;
pub use validator::FormValidator;
