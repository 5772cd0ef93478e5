use std::borrow::Cow;

use crate::element::{ElementRef, values_of};
use crate::error::Result;
use crate::rule::{Rule, Verdict};
use crate::session::ValidationSession;

use super::first_arg;

/// The targets hold the same values as the area named by the argument.
///
/// Values are compared as multisets. Only usable inside an area.
#[derive(Debug, Clone)]
pub struct Same {
    session: ValidationSession,
}

impl Same {
    pub fn new(session: ValidationSession) -> Self {
        Self { session }
    }
}

impl Rule for Same {
    fn passed(&self, elements: &[ElementRef], args: &[String]) -> Result<Verdict> {
        let other = first_arg("same", args, "an area name")?;

        let mut ours = values_of(elements);
        let mut theirs = values_of(&self.session.refs(Some(other), None)?);
        ours.sort_unstable();
        theirs.sort_unstable();

        Ok((ours == theirs).into())
    }

    fn message(&self) -> Cow<'static, str> {
        Cow::Borrowed("{name} should be the same as {0}")
    }
}
