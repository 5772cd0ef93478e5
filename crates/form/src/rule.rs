//! Rule trait and rule definitions.
//!
//! A rule is a predicate over the target elements plus a default message
//! template. Predicates may answer immediately or hand back a future; the
//! invoker awaits only when it has to, so synchronous rules never need to be
//! written as async code.
//!
//! Rules are registered either as a shared static object or as a factory that
//! binds a fresh rule to the running [`ValidationSession`], which gives the
//! rule access to sibling elements and other areas.

use std::borrow::Cow;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::element::ElementRef;
use crate::error::Result;
use crate::session::ValidationSession;

// ============================================================================
// VERDICT
// ============================================================================

/// Outcome of a predicate: known now, or known later.
pub enum Verdict {
    /// The predicate answered synchronously.
    Ready(bool),
    /// The predicate answers once the future resolves.
    Deferred(BoxFuture<'static, Result<bool>>),
}

impl Verdict {
    /// Wraps a future into a deferred verdict.
    pub fn deferred<F>(future: F) -> Self
    where
        F: Future<Output = Result<bool>> + Send + 'static,
    {
        Self::Deferred(Box::pin(future))
    }

    /// Resolves now or awaits.
    pub async fn resolve(self) -> Result<bool> {
        match self {
            Self::Ready(passed) => Ok(passed),
            Self::Deferred(future) => future.await,
        }
    }
}

impl From<bool> for Verdict {
    fn from(passed: bool) -> Self {
        Self::Ready(passed)
    }
}

impl fmt::Debug for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready(passed) => f.debug_tuple("Ready").field(passed).finish(),
            Self::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

// ============================================================================
// RULE
// ============================================================================

/// A named validation rule.
pub trait Rule: Send + Sync {
    /// Whether `elements` satisfy the rule for the given arguments.
    ///
    /// Returning `Err` aborts the whole validation run.
    fn passed(&self, elements: &[ElementRef], args: &[String]) -> Result<Verdict>;

    /// Default message template, used when the active locale has none.
    fn message(&self) -> Cow<'static, str>;
}

impl<R: Rule + ?Sized> Rule for Arc<R> {
    fn passed(&self, elements: &[ElementRef], args: &[String]) -> Result<Verdict> {
        (**self).passed(elements, args)
    }

    fn message(&self) -> Cow<'static, str> {
        (**self).message()
    }
}

/// Closure-backed rule.
///
/// ```rust,ignore
/// let never = FnRule::new("{name} never passes", |_, _| Ok(false.into()));
/// ```
pub struct FnRule<F> {
    message: Cow<'static, str>,
    predicate: F,
}

impl<F> FnRule<F>
where
    F: Fn(&[ElementRef], &[String]) -> Result<Verdict> + Send + Sync,
{
    pub fn new(message: impl Into<Cow<'static, str>>, predicate: F) -> Self {
        Self {
            message: message.into(),
            predicate,
        }
    }
}

impl<F> Rule for FnRule<F>
where
    F: Fn(&[ElementRef], &[String]) -> Result<Verdict> + Send + Sync,
{
    fn passed(&self, elements: &[ElementRef], args: &[String]) -> Result<Verdict> {
        (self.predicate)(elements, args)
    }

    fn message(&self) -> Cow<'static, str> {
        self.message.clone()
    }
}

impl<F> fmt::Debug for FnRule<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnRule").field("message", &self.message).finish()
    }
}

// ============================================================================
// RULE DEFINITION
// ============================================================================

/// Builds a rule bound to the running session.
pub type RuleFactory = Arc<dyn Fn(&ValidationSession) -> Arc<dyn Rule> + Send + Sync>;

/// What the registry stores under a rule name.
#[derive(Clone)]
pub enum RuleDefinition {
    /// One rule object shared by every session.
    Static(Arc<dyn Rule>),
    /// A factory invoked once per use with the running session.
    Bound(RuleFactory),
}

impl RuleDefinition {
    pub fn bound<F>(factory: F) -> Self
    where
        F: Fn(&ValidationSession) -> Arc<dyn Rule> + Send + Sync + 'static,
    {
        Self::Bound(Arc::new(factory))
    }

    /// The rule object to run for `session`.
    pub fn resolve(&self, session: &ValidationSession) -> Arc<dyn Rule> {
        match self {
            Self::Static(rule) => Arc::clone(rule),
            Self::Bound(factory) => factory(session),
        }
    }
}

impl<R: Rule + 'static> From<R> for RuleDefinition {
    fn from(rule: R) -> Self {
        Self::Static(Arc::new(rule))
    }
}

impl fmt::Debug for RuleDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(rule) => f.debug_tuple("Static").field(&rule.message()).finish(),
            Self::Bound(_) => f.write_str("Bound(..)"),
        }
    }
}
