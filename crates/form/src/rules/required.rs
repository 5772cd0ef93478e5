use std::borrow::Cow;

use crate::element::{ElementKind, ElementRef};
use crate::error::Result;
use crate::rule::{Rule, Verdict};

/// Every input, textarea and select carries a non-blank value.
///
/// Checkboxes and radios among the targets count as filled when any of them
/// with the same name is checked.
#[derive(Debug, Clone, Copy, Default)]
pub struct Required;

impl Rule for Required {
    fn passed(&self, elements: &[ElementRef], _args: &[String]) -> Result<Verdict> {
        let passed = elements.iter().all(|element| {
            if element.is_checkbox() || element.is_radio() {
                return elements.iter().any(|other| {
                    other.is_checked()
                        && other.input_type() == element.input_type()
                        && other.name() == element.name()
                });
            }
            match element.kind() {
                ElementKind::Input | ElementKind::TextArea | ElementKind::Select => element
                    .values()
                    .iter()
                    .any(|value| !value.trim().is_empty()),
                _ => true,
            }
        });
        Ok(passed.into())
    }

    fn message(&self) -> Cow<'static, str> {
        Cow::Borrowed("{name} is required")
    }
}
