//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use nebula_form::prelude::*;
//! ```

// ============================================================================
// CONTEXT
// ============================================================================

pub use crate::config::ValidatorConfig;
pub use crate::error::{Error, Result};
pub use crate::validator::FormValidator;

// ============================================================================
// ELEMENTS AND STATE MACHINES
// ============================================================================

pub use crate::area::{Area, AreaOptions};
pub use crate::element::{Element, ElementKind, ElementRef, InputType};
pub use crate::provider::{AreaErrors, Provider};
pub use crate::scope::{AreaScope, ProviderScope};
pub use crate::tree::Node;

// ============================================================================
// RULES
// ============================================================================

pub use crate::rule::{FnRule, Rule, RuleDefinition, Verdict};
pub use crate::rule_spec::{RuleOptions, merge_rules};
pub use crate::rules::{ActiveUrl, UrlProbe};
pub use crate::session::ValidationSession;
