//! Built-in rules.
//!
//! | name         | arguments     | checks                                        |
//! |--------------|---------------|-----------------------------------------------|
//! | `required`   |               | input, textarea and select carry a value      |
//! | `min`        | number        | numeric values are at least the bound         |
//! | `max`        | number        | numeric values are at most the bound          |
//! | `length`     | number        | values have exactly that many characters      |
//! | `min_length` | number        | values have at least that many characters     |
//! | `max_length` | number        | values have at most that many characters      |
//! | `regex`      | pattern       | values match the pattern (never comma-split)  |
//! | `checked`    |               | checkbox checked, radio group has a selection |
//! | `accepted`   |               | value is one of `true`, `1`, `yes`, `on`      |
//! | `same`       | area name     | values equal the values of the named area     |
//! | `active_url` |               | every value answers with HTTP 200             |
//!
//! Elements of kinds a rule does not understand always pass it.

mod active_url;
mod checked;
mod length;
mod numeric;
mod pattern;
mod required;
mod same;

use std::sync::Arc;

#[cfg(feature = "http")]
pub use active_url::HttpProbe;
pub use active_url::{ActiveUrl, UrlProbe};
pub use checked::{ACCEPTED_VALUES, Accepted, Checked};
pub use length::{Length, MaxLength, MinLength};
pub use numeric::{Max, Min};
pub use pattern::Pattern;
pub use required::Required;
pub use same::Same;

use crate::element::{Element, ElementKind, ElementRef};
use crate::error::{Error, Result};
use crate::registry::RuleRegistry;

/// Registers every built-in rule under its conventional name.
pub fn register_builtin(registry: &RuleRegistry) {
    registry.extend("required", Required);
    registry.extend("min", Min);
    registry.extend("max", Max);
    registry.extend("length", Length);
    registry.extend("min_length", MinLength);
    registry.extend("max_length", MaxLength);
    registry.extend("regex", Pattern);
    registry.extend_bound("checked", |session| Arc::new(Checked::new(session.clone())));
    registry.extend_bound("accepted", |session| Arc::new(Accepted::new(session.clone())));
    registry.extend_bound("same", |session| Arc::new(Same::new(session.clone())));

    #[cfg(feature = "http")]
    registry.extend("active_url", ActiveUrl::new(Arc::new(HttpProbe::default())));
}

/// Parses a numeric argument or value the way HTML forms accept numbers.
pub(crate) fn parse_number(rule: &str, raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|number| !number.is_nan())
        .ok_or_else(|| Error::expected_number(rule, raw))
}

/// Parses a character-count argument.
pub(crate) fn parse_count(rule: &str, raw: &str) -> Result<usize> {
    raw.trim()
        .parse::<usize>()
        .map_err(|_| Error::expected_number(rule, raw))
}

/// The first argument, or an argument error naming what was expected.
pub(crate) fn first_arg<'a>(rule: &str, args: &'a [String], expected: &str) -> Result<&'a str> {
    args.first()
        .map(String::as_str)
        .ok_or_else(|| Error::IncorrectArgumentType {
            rule: rule.to_string(),
            argument: String::new(),
            expected: expected.to_string(),
        })
}

/// Free-text inputs and selects; checkboxes and radios are not text.
pub(crate) fn is_text_target(element: &Element) -> bool {
    (element.kind().is_input_like() && !element.is_checkbox() && !element.is_radio())
        || element.kind() == ElementKind::Select
}

/// Checks `predicate` against every value of every element that `filter`
/// selects; other elements pass.
pub(crate) fn every_value<F, P>(elements: &[ElementRef], filter: F, mut predicate: P) -> Result<bool>
where
    F: Fn(&Element) -> bool,
    P: FnMut(&str) -> Result<bool>,
{
    for element in elements.iter().filter(|element| filter(element)) {
        for value in element.values() {
            if !predicate(&value)? {
                return Ok(false);
            }
        }
    }
    Ok(true)
}
