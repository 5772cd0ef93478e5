//! Session and registry behaviour observed through the public API.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use nebula_form::prelude::*;
use nebula_form::{RuleInvoker, SessionState};
use pretty_assertions::assert_eq;
use rstest::rstest;

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

fn input(value: &str) -> ElementRef {
    Element::input().with_name("test").with_value(value).shared()
}

fn session(validator: &FormValidator, element: ElementRef, rules: &str) -> ValidationSession {
    validator
        .session()
        .element(element)
        .rules(rules)
        .build()
        .expect("named element")
}

fn constant(passed: bool, message: &'static str) -> impl Rule {
    FnRule::new(message, move |_, _| Ok(passed.into()))
}

// ============================================================================
// RULE AGGREGATION
// ============================================================================

#[rstest]
#[case::all_pass("ok_a|ok_b", true, vec![])]
#[case::one_fails("ok_a|no_a|ok_b", false, vec!["First"])]
#[case::order_kept("no_b|ok_a|no_a", false, vec!["Second", "First"])]
#[tokio::test]
async fn validate_ands_rules_and_collects_messages_in_order(
    #[case] rules: &str,
    #[case] expected: bool,
    #[case] errors: Vec<&str>,
) {
    let validator = FormValidator::default();
    validator.extend("ok_a", constant(true, "never shown"));
    validator.extend("ok_b", constant(true, "never shown"));
    validator.extend("no_a", constant(false, "first"));
    validator.extend("no_b", constant(false, "second"));

    let session = session(&validator, input("x"), rules);
    assert_eq!(session.validate().await.unwrap(), expected);
    assert_eq!(session.errors(), errors);
    assert_eq!(
        session.state(),
        if expected { SessionState::Passed } else { SessionState::Failed }
    );
}

#[tokio::test]
async fn deferred_rules_keep_rule_order() {
    let validator = FormValidator::default();
    validator.extend(
        "slow",
        FnRule::new("slow failed", |_, _| {
            Ok(Verdict::deferred(async {
                tokio::time::sleep(Duration::from_millis(20)).await;
                Ok(false)
            }))
        }),
    );
    validator.extend("fast", constant(false, "fast failed"));

    let session = session(&validator, input("x"), "slow|fast");
    assert!(!session.validate().await.unwrap());
    assert_eq!(session.errors(), vec!["Slow failed", "Fast failed"]);
}

#[tokio::test]
async fn validate_resets_previous_errors() {
    let validator = FormValidator::default();
    let element = Element::input().with_name("test").shared();
    let session = session(&validator, Arc::clone(&element), "required");

    assert!(!session.validate().await.unwrap());
    element.set_value("filled");
    assert!(session.validate().await.unwrap());
    assert!(session.errors().is_empty());
}

// ============================================================================
// REGISTRY
// ============================================================================

#[tokio::test]
async fn extend_overwrites_existing_rule() {
    let validator = FormValidator::default();
    let first = Arc::new(AtomicUsize::new(0));
    let second = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&first);
    validator.extend(
        "x",
        FnRule::new("", move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(true.into())
        }),
    );
    let counter = Arc::clone(&second);
    validator.extend(
        "x",
        FnRule::new("", move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(true.into())
        }),
    );

    assert!(session(&validator, input("v"), "x").validate().await.unwrap());
    assert_eq!(first.load(Ordering::SeqCst), 0);
    assert_eq!(second.load(Ordering::SeqCst), 1);
}

#[test]
fn rule_exists_after_extend() {
    let validator = FormValidator::default();
    assert!(!validator.rule_exists("custom"));
    validator.extend("custom", constant(true, ""));
    assert!(validator.rule_exists("custom"));
    assert!(!validator.rule_exists("never_registered"));
}

#[tokio::test]
async fn unknown_rule_aborts_the_run() {
    let validator = FormValidator::default();
    let session = session(&validator, input("x"), "not_existing_rule|required");

    let err = session.validate().await.unwrap_err();
    assert!(matches!(err, Error::RuleNotFound { ref rule } if rule == "not_existing_rule"));
    assert_eq!(err.to_string(), "Validation rule not_existing_rule not found.");
    assert_eq!(session.state(), SessionState::Errored);
}

#[tokio::test]
async fn bound_rules_see_the_session() {
    let validator = FormValidator::default();
    validator.extend_bound("named_test", |session| {
        let matches = session.name() == "test";
        Arc::new(FnRule::new("wrong session", move |_, _| Ok(matches.into())))
    });

    assert!(session(&validator, input("x"), "named_test").validate().await.unwrap());
}

// ============================================================================
// BUILT-IN RULES
// ============================================================================

#[tokio::test]
async fn required_reports_capitalized_name() {
    let validator = FormValidator::default();
    let session = session(&validator, input(""), "required");

    assert!(!session.validate().await.unwrap());
    assert_eq!(session.errors()[0], "Test is required");
}

#[tokio::test]
async fn validation_name_overrides_display_name() {
    let validator = FormValidator::default();
    let session = validator
        .session()
        .element(input(""))
        .rules("required")
        .validation_name(Some("foo".to_string()))
        .build()
        .unwrap();

    session.validate().await.unwrap();
    assert_eq!(session.errors(), vec!["Foo is required"]);
}

#[rstest]
#[case::above("6", false, 1)]
#[case::equal("5", true, 0)]
#[case::below("-2", true, 0)]
#[tokio::test]
async fn max_bound(#[case] value: &str, #[case] expected: bool, #[case] errors: usize) {
    let validator = FormValidator::default();
    let session = session(&validator, input(value), "max:5");

    assert_eq!(session.validate().await.unwrap(), expected);
    assert_eq!(session.errors().len(), errors);
}

#[tokio::test]
async fn max_with_non_numeric_value_is_an_argument_error() {
    let validator = FormValidator::default();
    let err = session(&validator, input("foo"), "max:5")
        .validate()
        .await
        .unwrap_err();
    assert!(matches!(err, Error::IncorrectArgumentType { .. }));
    assert!(err.is_rule_failure());
}

#[tokio::test]
async fn max_message_carries_the_bound() {
    let validator = FormValidator::default();
    let session = session(&validator, input("6"), "max:5");
    session.validate().await.unwrap();
    assert_eq!(session.errors(), vec!["Test should be not greater than 5"]);
}

#[tokio::test]
async fn regex_keeps_commas_in_the_pattern() {
    let validator = FormValidator::default();
    let element = input("foo,|bar");
    let session = session(&validator, Arc::clone(&element), r"regex:(\w)+,(\w)+");

    assert!(!session.validate().await.unwrap());
    assert_eq!(session.errors(), vec!["Test doesn't have a valid format"]);

    element.set_value("foo,bar");
    assert!(session.validate().await.unwrap());
}

#[tokio::test]
async fn optional_empty_fields_skip_rules() {
    let validator = FormValidator::default();
    let session = session(&validator, input(""), "min_length:3|max:5");
    assert!(session.validate().await.unwrap());
}

#[tokio::test]
async fn canvas_is_always_validated() {
    let validator = FormValidator::default();
    validator.extend("draw", constant(false, "{name} needs a drawing"));

    let session = validator
        .session()
        .element(Element::canvas().with_name("signature").shared())
        .rules("draw")
        .build()
        .unwrap();
    assert!(!session.validate().await.unwrap());
    assert_eq!(session.errors(), vec!["Signature needs a drawing"]);
}

#[tokio::test]
async fn invoker_runs_a_single_spec() {
    let validator = FormValidator::default();
    let session = session(&validator, input("abcd"), "");

    let invoker = RuleInvoker::new(&session);
    assert!(!invoker.invoke("length:3").await.unwrap());
    assert!(invoker.invoke("max_length:4").await.unwrap());
    assert_eq!(session.errors(), vec!["Test should be 3 characters long"]);
}

// ============================================================================
// LOCALES
// ============================================================================

#[tokio::test]
async fn dutch_messages() {
    let validator = FormValidator::new(ValidatorConfig::default().with_locale("nl"));
    let session = session(&validator, input(""), "required");

    session.validate().await.unwrap();
    assert_eq!(session.errors(), vec!["Test is verplicht"]);
}

#[tokio::test]
async fn locale_without_template_uses_rule_message() {
    let validator = FormValidator::default();
    validator.set_locale(
        "custom",
        Some(std::collections::HashMap::from([(
            "custom".to_string(),
            std::collections::HashMap::new(),
        )])),
    );

    let session = session(&validator, input(""), "required");
    session.validate().await.unwrap();
    assert_eq!(session.errors(), vec!["Test is required"]);
}
