use std::borrow::Cow;

use crate::element::{Element, ElementKind, ElementRef};
use crate::error::Result;
use crate::rule::{Rule, Verdict};

use super::{every_value, first_arg, parse_number};

fn is_numeric_target(element: &Element) -> bool {
    let kind = element.kind();
    (kind.is_input_like() && !element.is_checkbox() && !element.is_radio())
        || kind == ElementKind::Select
        || kind.is_gauge_like()
}

fn compare(
    rule: &str,
    elements: &[ElementRef],
    args: &[String],
    accept: fn(f64, f64) -> bool,
) -> Result<Verdict> {
    let bound = parse_number(rule, first_arg(rule, args, "a number")?)?;
    every_value(elements, is_numeric_target, |value| {
        Ok(accept(parse_number(rule, value)?, bound))
    })
    .map(Verdict::from)
}

/// Numeric values are at least the bound.
#[derive(Debug, Clone, Copy, Default)]
pub struct Min;

impl Rule for Min {
    fn passed(&self, elements: &[ElementRef], args: &[String]) -> Result<Verdict> {
        compare("min", elements, args, |value, bound| value >= bound)
    }

    fn message(&self) -> Cow<'static, str> {
        Cow::Borrowed("{name} should be at least {0}")
    }
}

/// Numeric values are at most the bound.
#[derive(Debug, Clone, Copy, Default)]
pub struct Max;

impl Rule for Max {
    fn passed(&self, elements: &[ElementRef], args: &[String]) -> Result<Verdict> {
        compare("max", elements, args, |value, bound| value <= bound)
    }

    fn message(&self) -> Cow<'static, str> {
        Cow::Borrowed("{name} should be not greater than {0}")
    }
}
