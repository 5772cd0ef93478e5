use std::borrow::Cow;

use regex::Regex;

use crate::element::ElementRef;
use crate::error::{Error, Result};
use crate::rule::{Rule, Verdict};

use super::{every_value, first_arg, is_text_target};

/// Values contain a match of the pattern argument.
///
/// Registered as `regex`. The argument tail is never split on commas, so
/// `regex:(\w)+,(\w)+` receives the whole pattern.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pattern;

impl Rule for Pattern {
    fn passed(&self, elements: &[ElementRef], args: &[String]) -> Result<Verdict> {
        let source = first_arg("regex", args, "a regular expression")?;
        let pattern = Regex::new(source).map_err(|_| Error::IncorrectArgumentType {
            rule: "regex".to_string(),
            argument: source.to_string(),
            expected: "a valid regular expression".to_string(),
        })?;

        every_value(elements, is_text_target, |value| Ok(pattern.is_match(value))).map(Verdict::from)
    }

    fn message(&self) -> Cow<'static, str> {
        Cow::Borrowed("{name} doesn't have a valid format")
    }
}
