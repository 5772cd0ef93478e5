use std::borrow::Cow;

use crate::element::ElementRef;
use crate::error::Result;
use crate::rule::{Rule, Verdict};

use super::{every_value, first_arg, is_text_target, parse_count};

fn measure(
    rule: &str,
    elements: &[ElementRef],
    args: &[String],
    accept: fn(usize, usize) -> bool,
) -> Result<Verdict> {
    let count = parse_count(rule, first_arg(rule, args, "a number")?)?;
    every_value(elements, is_text_target, |value| {
        Ok(accept(value.chars().count(), count))
    })
    .map(Verdict::from)
}

/// Values have exactly the given number of characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Length;

impl Rule for Length {
    fn passed(&self, elements: &[ElementRef], args: &[String]) -> Result<Verdict> {
        measure("length", elements, args, |len, count| len == count)
    }

    fn message(&self) -> Cow<'static, str> {
        Cow::Borrowed("{name} should be {0} characters long")
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MinLength;

impl Rule for MinLength {
    fn passed(&self, elements: &[ElementRef], args: &[String]) -> Result<Verdict> {
        measure("min_length", elements, args, |len, count| len >= count)
    }

    fn message(&self) -> Cow<'static, str> {
        Cow::Borrowed("{name} should be at least {0} characters long")
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MaxLength;

impl Rule for MaxLength {
    fn passed(&self, elements: &[ElementRef], args: &[String]) -> Result<Verdict> {
        measure("max_length", elements, args, |len, count| len <= count)
    }

    fn message(&self) -> Cow<'static, str> {
        Cow::Borrowed("{name} should be at most {0} characters long")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;
    use rstest::rstest;

    #[rstest]
    #[case::exact("abc", "3", true)]
    #[case::short("ab", "3", false)]
    #[case::multibyte("äöü", "3", true)]
    fn length_counts_characters(#[case] value: &str, #[case] count: &str, #[case] expected: bool) {
        let elements = [Element::input().with_value(value).shared()];
        let verdict = Length.passed(&elements, &[count.to_string()]).unwrap();
        assert!(matches!(verdict, Verdict::Ready(passed) if passed == expected));
    }

    #[test]
    fn bounds() {
        let elements = [Element::textarea().with_value("hello").shared()];
        let five = ["5".to_string()];
        let six = ["6".to_string()];
        assert!(matches!(MinLength.passed(&elements, &five), Ok(Verdict::Ready(true))));
        assert!(matches!(MinLength.passed(&elements, &six), Ok(Verdict::Ready(false))));
        assert!(matches!(MaxLength.passed(&elements, &five), Ok(Verdict::Ready(true))));
        assert!(matches!(MaxLength.passed(&elements, &["4".to_string()]), Ok(Verdict::Ready(false))));
    }

    #[test]
    fn bad_count_is_an_argument_error() {
        let elements = [Element::input().with_value("x").shared()];
        assert!(Length.passed(&elements, &["x".to_string()]).is_err());
    }
}
