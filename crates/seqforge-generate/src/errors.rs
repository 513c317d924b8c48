use thiserror::Error;

/// Errors emitted by the generation engine.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("configuration error: {0}")]
    Config(#[from] seqforge_core::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("cannot parse '{value}' as {expected}")]
    Parse {
        value: String,
        expected: &'static str,
    },
    #[error("formula error: {0}")]
    Formula(#[from] FormulaError),
    #[error("format error: {0}")]
    Format(#[from] FormatError),
    #[error("slot {index} is exhausted: no value follows '{last}'")]
    Exhausted { index: usize, last: String },
    #[error("no record accepted after {attempts} consecutive rejected ticks")]
    AttemptsExceeded { attempts: u64 },
}

/// Failures while substituting, compiling or evaluating a formula.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormulaError {
    #[error("formula is empty")]
    Empty,
    #[error("letter '{letter}' is out of range: input provides {available} digit(s)")]
    UnboundLetter { letter: char, available: usize },
    #[error("unexpected character '{found}' at offset {offset} in '{expression}'")]
    UnexpectedChar {
        found: char,
        offset: usize,
        expression: String,
    },
    #[error("unexpected {found} in '{expression}'")]
    UnexpectedToken { found: String, expression: String },
    #[error("invalid number literal '{0}'")]
    InvalidNumber(String),
    #[error("expression '{0}' did not evaluate to a finite number")]
    NonFinite(String),
}

/// Failures while expanding placeholders.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    #[error("malformed placeholder at offset {offset} in '{format}'")]
    MalformedPlaceholder { format: String, offset: usize },
    #[error("'{format}' needs more characters than '{value}' provides")]
    NotEnoughCharacters { format: String, value: String },
    #[error("placeholder {{{index}}} refers to an unknown slot")]
    UnknownSlot { index: usize },
}
