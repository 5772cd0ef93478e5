//! Rendering of rule message templates.
//!
//! Templates use `{name}` for the field's display name and `{0}`, `{1}`, ...
//! for the rule's positional arguments. Unknown placeholders are left as-is.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(\w+)\}").expect("placeholder pattern is valid"));

/// Uppercases the first character.
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Renders a template for one failing rule.
#[derive(Debug, Clone, Copy)]
pub struct MessageFormatter<'a> {
    name: &'a str,
    args: &'a [String],
}

impl<'a> MessageFormatter<'a> {
    pub fn new(name: &'a str, args: &'a [String]) -> Self {
        Self { name, args }
    }

    /// Substitutes placeholders and capitalizes the result.
    pub fn format(&self, template: &str) -> String {
        let rendered = PLACEHOLDER.replace_all(template, |caps: &Captures<'_>| {
            let key = &caps[1];
            if key == "name" {
                return capitalize(self.name);
            }
            key.parse::<usize>()
                .ok()
                .and_then(|index| self.args.get(index))
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        });
        capitalize(&rendered)
    }
}

/// One-shot form of [`MessageFormatter::format`].
pub fn format_message(template: &str, name: &str, args: &[String]) -> String {
    MessageFormatter::new(name, args).format(template)
}
