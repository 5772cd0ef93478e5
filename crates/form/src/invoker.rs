//! Rule invocation: parse a raw spec, resolve it and run it.

use std::borrow::Cow;

use crate::error::{Error, Result};
use crate::message::format_message;
use crate::rule_spec::RuleSpec;
use crate::session::ValidationSession;

/// Runs single rule specs on behalf of a session.
#[derive(Debug, Clone, Copy)]
pub struct RuleInvoker<'a> {
    session: &'a ValidationSession,
}

impl<'a> RuleInvoker<'a> {
    pub fn new(session: &'a ValidationSession) -> Self {
        Self { session }
    }

    /// Evaluates `raw` against the session's elements.
    ///
    /// On failure the localized message is appended to the session errors
    /// and `Ok(false)` is returned. Unknown rules and predicate errors are
    /// returned as `Err`.
    pub async fn invoke(&self, raw: &str) -> Result<bool> {
        let registry = self.session.registry();
        let name = RuleSpec::name_of(raw);
        let spec = RuleSpec::parse(raw, registry.splits_arguments(name));

        let definition = registry.get(&spec.name).ok_or_else(|| Error::RuleNotFound {
            rule: spec.name.clone(),
        })?;
        let rule = definition.resolve(self.session);

        let passed = rule
            .passed(self.session.elements(), &spec.args)?
            .resolve()
            .await?;

        tracing::trace!(rule = %spec.name, passed, "Evaluated rule");

        if !passed {
            let template = self
                .session
                .catalog()
                .template(&spec.name)
                .map_or_else(|| rule.message(), Cow::Owned);
            self.session.push_error(format_message(
                &template,
                self.session.display_name(),
                &spec.args,
            ));
        }

        Ok(passed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;
    use crate::rule::FnRule;
    use crate::validator::FormValidator;

    fn session(validator: &FormValidator) -> ValidationSession {
        ValidationSession::builder(validator)
            .element(Element::input().with_value("test").shared())
            .name("test")
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn unknown_rule_is_an_error() {
        let validator = FormValidator::default();
        let err = RuleInvoker::new(&session(&validator))
            .invoke("not_existing_rule")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::RuleNotFound { ref rule } if rule == "not_existing_rule"));
    }

    #[tokio::test]
    async fn failing_rule_appends_formatted_message() {
        let validator = FormValidator::default();
        validator.extend(
            "rule_with_params",
            FnRule::new("rule params not passed: {0}, {1}, {2}, {3}", |_, _| {
                Ok(false.into())
            }),
        );
        let session = session(&validator);

        let passed = RuleInvoker::new(&session)
            .invoke("rule_with_params:1,2,3,4")
            .await
            .unwrap();

        assert!(!passed);
        assert_eq!(session.errors(), vec!["Rule params not passed: 1, 2, 3, 4"]);
    }

    #[tokio::test]
    async fn locale_template_wins_over_rule_message() {
        let validator = FormValidator::default();
        validator.extend("required", FnRule::new("embedded", |_, _| Ok(false.into())));
        let session = session(&validator);

        RuleInvoker::new(&session).invoke("required").await.unwrap();
        assert_eq!(session.errors(), vec!["Test is required"]);
    }

    #[tokio::test]
    async fn whole_argument_rules_receive_one_argument() {
        let validator = FormValidator::default();
        validator.extend(
            "regex",
            FnRule::new("", |_, args| Ok((args.len() == 1 && args[0] == "a,b").into())),
        );
        let session = session(&validator);

        assert!(RuleInvoker::new(&session).invoke("regex:a,b").await.unwrap());
    }
}
