//! Error types for form validation.
//!
//! Two families live here. Configuration errors (duplicate or missing area
//! names, cross-area lookups outside an area) are programmer mistakes and are
//! raised synchronously. Rule failures (unknown rule, bad argument, probe
//! transport failure) abort only the validation run they happen in.
use thiserror::Error;

/// Result type for form validation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the rule registry, sessions, areas and providers
#[derive(Error, Debug)]
pub enum Error {
    /// A rule spec names a rule that is not registered
    #[error("Validation rule {rule} not found.")]
    RuleNotFound {
        /// The rule name as written in the rule spec
        rule: String,
    },

    /// A rule argument (or a value the rule coerces) has the wrong type
    #[error("{rule} rule has incorrect argument {argument}. Expected {expected}.")]
    IncorrectArgumentType {
        /// The rule that rejected the argument
        rule: String,
        /// The offending argument
        argument: String,
        /// What the rule expected, e.g. "a number"
        expected: String,
    },

    /// Two areas were registered under one provider with the same name
    #[error("Validation area names should be unique, '{name}' is already registered")]
    DuplicateAreaName {
        /// The duplicated area name
        name: String,
    },

    /// An area has no name prop and not exactly one named element
    #[error("All input areas should contain either a name prop, or only one input-like with a name prop")]
    MissingName,

    /// A cross-area lookup was made by a session that does not belong to an area
    #[error("Areas are only available when validating within an area")]
    NotInAreaContext,

    /// A locale catalog or configuration document could not be parsed
    #[error("Invalid catalog: {source}")]
    InvalidCatalog {
        /// The underlying parse error
        #[from]
        source: serde_json::Error,
    },

    /// An asynchronous URL probe could not reach its target
    #[error("Probe of '{url}' failed: {reason}")]
    Probe {
        /// The probed URL
        url: String,
        /// The transport failure
        reason: String,
    },
}

impl Error {
    /// Shorthand for a numeric-argument failure.
    pub fn expected_number(rule: impl Into<String>, argument: impl Into<String>) -> Self {
        Self::IncorrectArgumentType {
            rule: rule.into(),
            argument: argument.into(),
            expected: "a number".to_string(),
        }
    }

    /// Whether this error signals a configuration bug in the host.
    ///
    /// These must never be swallowed.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::DuplicateAreaName { .. } | Self::MissingName | Self::NotInAreaContext
        )
    }

    /// Whether this error aborts only the current validation run.
    pub fn is_rule_failure(&self) -> bool {
        matches!(
            self,
            Self::RuleNotFound { .. } | Self::IncorrectArgumentType { .. } | Self::Probe { .. }
        )
    }
}
