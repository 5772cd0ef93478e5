//! State snapshots handed to the rendering layer.

use serde::Serialize;

/// Snapshot of an [`Area`](crate::Area).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AreaScope {
    /// Messages from the last validation plus injected errors
    pub errors: Vec<String>,
    pub valid: bool,
    /// A validation is running
    pub pending: bool,
    /// Content changed since the last validation
    pub dirty: bool,
    /// At least one element was blurred
    pub touched: bool,
}

/// Snapshot of a [`Provider`](crate::Provider).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProviderScope {
    /// Every area passed the last "validate all"
    pub valid: bool,
    /// Some area failed the last "validate all"
    pub dirty: bool,
}
