use std::borrow::Cow;

use crate::element::{Element, ElementRef};
use crate::error::{Error, Result};
use crate::rule::{Rule, Verdict};
use crate::session::ValidationSession;

/// Values `accepted` treats as consent.
pub const ACCEPTED_VALUES: &[&str] = &["true", "1", "yes", "on"];

/// Radios sharing `radio`'s name among the session targets and, inside a
/// provider, every area's elements.
fn radio_group(session: &ValidationSession, radio: &Element) -> Result<Vec<ElementRef>> {
    let mut candidates = session.elements().to_vec();
    match session.refs(None, None) {
        Ok(refs) => candidates.extend(refs),
        Err(Error::NotInAreaContext) => {}
        Err(err) => return Err(err),
    }

    Ok(candidates
        .into_iter()
        .filter(|other| other.is_radio() && other.name() == radio.name())
        .collect())
}

/// Checkboxes are checked; radio groups have a checked member.
///
/// Bound to the session so groups can span areas.
#[derive(Debug, Clone)]
pub struct Checked {
    session: ValidationSession,
}

impl Checked {
    pub fn new(session: ValidationSession) -> Self {
        Self { session }
    }
}

impl Rule for Checked {
    fn passed(&self, elements: &[ElementRef], _args: &[String]) -> Result<Verdict> {
        for element in elements {
            let passed = if element.is_checkbox() {
                element.is_checked()
            } else if element.is_radio() {
                radio_group(&self.session, element)?
                    .iter()
                    .any(|radio| radio.is_checked())
            } else {
                true
            };
            if !passed {
                return Ok(false.into());
            }
        }
        Ok(true.into())
    }

    fn message(&self) -> Cow<'static, str> {
        Cow::Borrowed("{name} is not checked")
    }
}

/// The value is one of [`ACCEPTED_VALUES`].
///
/// A checkbox must be checked; a radio group's checked member must carry an
/// accepted value.
#[derive(Debug, Clone)]
pub struct Accepted {
    session: ValidationSession,
}

impl Accepted {
    pub fn new(session: ValidationSession) -> Self {
        Self { session }
    }
}

fn is_accepted(value: &str) -> bool {
    ACCEPTED_VALUES.contains(&value.trim().to_ascii_lowercase().as_str())
}

impl Rule for Accepted {
    fn passed(&self, elements: &[ElementRef], _args: &[String]) -> Result<Verdict> {
        for element in elements {
            let passed = if element.is_checkbox() {
                element.is_checked()
            } else if element.is_radio() {
                radio_group(&self.session, element)?
                    .iter()
                    .find(|radio| radio.is_checked())
                    .is_some_and(|radio| is_accepted(&radio.value()))
            } else if element.kind().is_input_like() {
                element.values().iter().all(|value| is_accepted(value))
            } else {
                true
            };
            if !passed {
                return Ok(false.into());
            }
        }
        Ok(true.into())
    }

    fn message(&self) -> Cow<'static, str> {
        Cow::Borrowed("{name} is not accepted")
    }
}
