//! Typed, validated views over a generator's property map.
//!
//! Every family wraps [`BasePattern`], which owns the properties shared by
//! all generators (`input`, `format`, `length`). Construction is the only
//! place generator configuration is checked; a pattern that exists is valid.

use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::properties::{
    parse_int, parse_list, parse_long, validate_properties, Properties, PropertyKind, PropertySpec,
};

pub const INPUT: &str = "input";
pub const FORMAT: &str = "format";
pub const LENGTH: &str = "length";
pub const START: &str = "start";
pub const STEP: &str = "step";
pub const PADDING_LENGTH: &str = "padding-length";
pub const LIST: &str = "list";
pub const FORMULA: &str = "formula";

const BASE_PROPERTIES: &[PropertySpec] = &[
    PropertySpec::new(INPUT, PropertyKind::Int, true),
    PropertySpec::new(FORMAT, PropertyKind::String, false),
    PropertySpec::new(LENGTH, PropertyKind::Int, false),
];
const SEQUENTIAL_NUMBER_PROPERTIES: &[PropertySpec] = &[
    PropertySpec::new(START, PropertyKind::Long, true),
    PropertySpec::new(STEP, PropertyKind::Long, true),
    PropertySpec::new(LENGTH, PropertyKind::Int, true),
    PropertySpec::new(PADDING_LENGTH, PropertyKind::Long, false),
];
const SEQUENTIAL_ALPHABET_PROPERTIES: &[PropertySpec] = &[
    PropertySpec::new(LIST, PropertyKind::List, true),
    PropertySpec::new(START, PropertyKind::String, true),
    PropertySpec::new(LENGTH, PropertyKind::Int, true),
    PropertySpec::new(PADDING_LENGTH, PropertyKind::Long, false),
];
const TOOL_PROPERTIES: &[PropertySpec] = &[
    PropertySpec::new(FORMULA, PropertyKind::String, false),
    PropertySpec::new(START, PropertyKind::String, false),
];

/// Properties common to every generator family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasePattern {
    /// Slot index whose current value feeds this generator.
    pub input: usize,
    /// Per-field sub-format applied to this slot's value before templating.
    pub format: Option<String>,
    /// Declared value length; mandatory whenever `format` is set.
    pub length: Option<u32>,
}

impl BasePattern {
    pub fn from_properties(properties: &Properties, ctx: &'static str) -> Result<Self> {
        validate_properties(properties, BASE_PROPERTIES, ctx)?;

        let format = properties.get(FORMAT).map(str::to_string);
        let length = properties
            .get(LENGTH)
            .map(|value| parse_int(ctx, LENGTH, value))
            .transpose()?;
        // `format` implies `length`
        if format.is_some() && length.is_none() {
            return Err(Error::MissingProperty {
                context: ctx,
                key: LENGTH.to_string(),
            });
        }

        let input = properties
            .get(INPUT)
            .map(|value| parse_int(ctx, INPUT, value))
            .transpose()?
            .unwrap_or_default() as usize;

        Ok(Self {
            input,
            format,
            length,
        })
    }
}

/// Numeric counter: `start`, `step`, bounded by `10^length`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequentialNumberPattern {
    pub base: BasePattern,
    pub start: i64,
    pub step: i64,
    pub length: u32,
    pub padding_length: usize,
}

impl SequentialNumberPattern {
    const CTX: &'static str = "sequential number";

    pub fn from_properties(properties: &Properties) -> Result<Self> {
        let base = BasePattern::from_properties(properties, Self::CTX)?;
        validate_properties(properties, SEQUENTIAL_NUMBER_PROPERTIES, Self::CTX)?;

        let start = required_long(properties, START, Self::CTX)?;
        let step = required_long(properties, STEP, Self::CTX)?;
        let length = required_int(properties, LENGTH, Self::CTX)?;
        if length == 0 {
            return Err(Error::invalid(
                Self::CTX,
                LENGTH,
                &length.to_string(),
                "length must be greater than zero",
            ));
        }
        let padding_length = padding_length(properties, Self::CTX)?;

        Ok(Self {
            base,
            start,
            step,
            length,
            padding_length,
        })
    }
}

/// Odometer over a symbol list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequentialAlphabetPattern {
    pub base: BasePattern,
    pub alphabet: Vec<String>,
    pub start: String,
    pub length: usize,
    pub padding_length: usize,
}

impl SequentialAlphabetPattern {
    const CTX: &'static str = "sequential alphabet";

    pub fn from_properties(properties: &Properties) -> Result<Self> {
        let base = BasePattern::from_properties(properties, Self::CTX)?;
        validate_properties(properties, SEQUENTIAL_ALPHABET_PROPERTIES, Self::CTX)?;

        let list = properties.get(LIST).unwrap_or_default();
        let alphabet = parse_list(Self::CTX, LIST, list)?;
        if let Some(duplicate) = first_duplicate(&alphabet) {
            return Err(Error::invalid(
                Self::CTX,
                LIST,
                list,
                format!("symbol '{duplicate}' appears more than once"),
            ));
        }
        let start = properties.get(START).unwrap_or_default().to_string();
        let length = required_int(properties, LENGTH, Self::CTX)? as usize;
        let padding_length = padding_length(properties, Self::CTX)?;

        Ok(Self {
            base,
            alphabet,
            start,
            length,
            padding_length,
        })
    }
}

/// Formula-driven generator shared by calculation and evaluation slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPattern {
    pub base: BasePattern,
    /// Only checked when the formula is actually compiled.
    pub formula: Option<String>,
    /// Seed for a tool slot that drives itself.
    pub start: Option<String>,
}

impl ToolPattern {
    const CTX: &'static str = "tool";

    pub fn from_properties(properties: &Properties) -> Result<Self> {
        let base = BasePattern::from_properties(properties, Self::CTX)?;
        validate_properties(properties, TOOL_PROPERTIES, Self::CTX)?;

        Ok(Self {
            base,
            formula: properties.get(FORMULA).map(str::to_string),
            start: properties.get(START).map(str::to_string),
        })
    }
}

/// Any validated generator pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    SequentialNumber(SequentialNumberPattern),
    SequentialAlphabet(SequentialAlphabetPattern),
    Tool(ToolPattern),
}

impl Pattern {
    pub fn base(&self) -> &BasePattern {
        match self {
            Pattern::SequentialNumber(pattern) => &pattern.base,
            Pattern::SequentialAlphabet(pattern) => &pattern.base,
            Pattern::Tool(pattern) => &pattern.base,
        }
    }

    pub fn input(&self) -> usize {
        self.base().input
    }

    pub fn sub_format(&self) -> Option<&str> {
        self.base().format.as_deref()
    }

    /// Value handed to the step function when the slot is first seeded.
    pub fn start_value(&self) -> Option<String> {
        match self {
            Pattern::SequentialNumber(pattern) => Some(pattern.start.to_string()),
            Pattern::SequentialAlphabet(pattern) => Some(pattern.start.clone()),
            Pattern::Tool(pattern) => pattern.start.clone(),
        }
    }
}

fn required_long(properties: &Properties, key: &'static str, ctx: &'static str) -> Result<i64> {
    let value = properties.get(key).ok_or_else(|| Error::MissingProperty {
        context: ctx,
        key: key.to_string(),
    })?;
    parse_long(ctx, key, value)
}

fn required_int(properties: &Properties, key: &'static str, ctx: &'static str) -> Result<u32> {
    let value = properties.get(key).ok_or_else(|| Error::MissingProperty {
        context: ctx,
        key: key.to_string(),
    })?;
    parse_int(ctx, key, value)
}

fn first_duplicate(symbols: &[String]) -> Option<&str> {
    let mut seen = BTreeSet::new();
    symbols
        .iter()
        .map(String::as_str)
        .find(|symbol| !seen.insert(*symbol))
}

fn padding_length(properties: &Properties, ctx: &'static str) -> Result<usize> {
    let Some(value) = properties.get(PADDING_LENGTH) else {
        return Ok(0);
    };
    let padding = parse_long(ctx, PADDING_LENGTH, value)?;
    usize::try_from(padding)
        .map_err(|_| Error::invalid(ctx, PADDING_LENGTH, value, "padding must not be negative"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number_props() -> Properties {
        Properties::new()
            .with(INPUT, "0")
            .with(START, "100")
            .with(STEP, "2")
            .with(LENGTH, "5")
    }

    #[test]
    fn sequential_number_defaults_padding_to_zero() {
        let pattern = SequentialNumberPattern::from_properties(&number_props()).expect("valid");
        assert_eq!(pattern.start, 100);
        assert_eq!(pattern.step, 2);
        assert_eq!(pattern.length, 5);
        assert_eq!(pattern.padding_length, 0);
        assert_eq!(pattern.base.input, 0);
    }

    #[test]
    fn sequential_number_rejects_zero_length() {
        let props = number_props().with(LENGTH, "0");
        assert!(SequentialNumberPattern::from_properties(&props).is_err());
    }

    #[test]
    fn sequential_number_reports_malformed_start() {
        let props = number_props().with(START, "12x");
        let err = SequentialNumberPattern::from_properties(&props).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("'start'"), "{message}");
        assert!(message.contains("'12x'"), "{message}");
    }

    #[test]
    fn input_is_required_for_every_family() {
        let props = Properties::new().with(FORMULA, "A+B");
        let err = ToolPattern::from_properties(&props).unwrap_err();
        assert!(matches!(err, Error::MissingProperty { ref key, .. } if key == INPUT));
    }

    #[test]
    fn format_requires_length() {
        let props = Properties::new().with(INPUT, "1").with(FORMAT, "{0}-{0}");
        assert!(ToolPattern::from_properties(&props).is_err());

        let props = props.with(LENGTH, "2");
        let pattern = ToolPattern::from_properties(&props).expect("valid");
        assert_eq!(pattern.base.format.as_deref(), Some("{0}-{0}"));
        assert!(pattern.formula.is_none());
    }

    #[test]
    fn alphabet_requires_list() {
        let props = Properties::new()
            .with(INPUT, "0")
            .with(START, "AA")
            .with(LENGTH, "2");
        let err = SequentialAlphabetPattern::from_properties(&props).unwrap_err();
        assert!(err.to_string().contains("'list'"));

        let pattern =
            SequentialAlphabetPattern::from_properties(&props.with(LIST, "A,B,C")).expect("valid");
        assert_eq!(pattern.alphabet, vec!["A", "B", "C"]);
        assert_eq!(pattern.length, 2);
    }

    #[test]
    fn negative_padding_is_rejected() {
        let props = number_props().with(PADDING_LENGTH, "-1");
        assert!(SequentialNumberPattern::from_properties(&props).is_err());
    }

    #[test]
    fn alphabet_rejects_duplicate_symbols() {
        let props = Properties::new()
            .with(INPUT, "0")
            .with(START, "A")
            .with(LENGTH, "1")
            .with(LIST, "A,A,B");
        let err = SequentialAlphabetPattern::from_properties(&props).unwrap_err();
        assert!(err.to_string().contains("'A' appears more than once"), "{err}");
    }
}
