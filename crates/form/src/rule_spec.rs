//! Rule strings and their parsed form.
//!
//! A rule spec is `name` or `name:arg1,arg2`. Specs arrive as a single
//! string, a pipe-delimited string (`required|max:5`) or nested lists of
//! either; [`merge_rules`] flattens any mix of them into one ordered list.

use serde::{Deserialize, Serialize};

// ============================================================================
// RULE OPTIONS
// ============================================================================

/// Rules as supplied by an area or provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleOptions {
    /// `"rule"` or `"rule1|rule2"`
    Text(String),
    /// A list of further options.
    List(Vec<RuleOptions>),
}

impl RuleOptions {
    pub fn none() -> Self {
        Self::List(Vec::new())
    }

    /// Flattens into individual rule specs, in order.
    pub fn flatten(&self) -> Vec<String> {
        let mut specs = Vec::new();
        self.flatten_into(&mut specs);
        specs
    }

    fn flatten_into(&self, specs: &mut Vec<String>) {
        match self {
            Self::Text(text) => specs.extend(
                text.split('|')
                    .filter(|spec| !spec.is_empty())
                    .map(ToString::to_string),
            ),
            Self::List(items) => {
                for item in items {
                    item.flatten_into(specs);
                }
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.flatten().is_empty()
    }
}

impl Default for RuleOptions {
    fn default() -> Self {
        Self::none()
    }
}

impl From<&str> for RuleOptions {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for RuleOptions {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl<T: Into<RuleOptions>> From<Vec<T>> for RuleOptions {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<RuleOptions>, const N: usize> From<[T; N]> for RuleOptions {
    fn from(items: [T; N]) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

/// Concatenates rule sources into one flat spec list, preserving order.
///
/// ```rust,ignore
/// let merged = merge_rules([
///     RuleOptions::from(["a", "b"]),
///     RuleOptions::from("c|d"),
///     RuleOptions::from(["e|f"]),
/// ]);
/// assert_eq!(merged, ["a", "b", "c", "d", "e", "f"]);
/// ```
pub fn merge_rules<I>(sources: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: Into<RuleOptions>,
{
    sources
        .into_iter()
        .flat_map(|source| source.into().flatten())
        .collect()
}

// ============================================================================
// RULE SPEC
// ============================================================================

/// One parsed `name:args` spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSpec {
    pub name: String,
    pub args: Vec<String>,
}

impl RuleSpec {
    /// Splits at the first `:`; the tail is comma-split unless
    /// `split_arguments` is false, in which case it stays one argument.
    pub fn parse(raw: &str, split_arguments: bool) -> Self {
        let (name, tail) = match raw.split_once(':') {
            Some((name, tail)) => (name, Some(tail)),
            None => (raw, None),
        };

        let args = match tail {
            None => Vec::new(),
            Some(tail) if split_arguments => tail.split(',').map(ToString::to_string).collect(),
            Some(tail) => vec![tail.to_string()],
        };

        Self {
            name: name.to_string(),
            args,
        }
    }

    /// The rule name of a raw spec, without parsing arguments.
    pub fn name_of(raw: &str) -> &str {
        raw.split_once(':').map_or(raw, |(name, _)| name)
    }
}
