//! Placeholder expansion for fields and whole records.
//!
//! A placeholder is `{` followed by one ASCII digit and `}`. In a field
//! sub-format the digit is only a marker: each placeholder takes the next
//! unused character of the field value. In the record template the digit is
//! the slot index whose value is substituted.

use std::collections::BTreeMap;

use crate::errors::FormatError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Piece {
    Literal(char),
    Placeholder(usize),
}

fn pieces(format: &str) -> Result<Vec<Piece>, FormatError> {
    let mut out = Vec::with_capacity(format.len());
    let mut chars = format.char_indices();

    while let Some((offset, ch)) = chars.next() {
        if ch != '{' {
            out.push(Piece::Literal(ch));
            continue;
        }
        let malformed = || FormatError::MalformedPlaceholder {
            format: format.to_string(),
            offset,
        };
        let digit = chars
            .next()
            .and_then(|(_, ch)| ch.to_digit(10))
            .ok_or_else(malformed)?;
        match chars.next() {
            Some((_, '}')) => out.push(Piece::Placeholder(digit as usize)),
            _ => return Err(malformed()),
        }
    }

    Ok(out)
}

/// Consumes `value`'s characters in order, one per placeholder in `sub_format`.
pub fn format_field(value: &str, sub_format: &str) -> Result<String, FormatError> {
    let mut source = value.chars();
    let mut out = String::with_capacity(sub_format.len());

    for piece in pieces(sub_format)? {
        match piece {
            Piece::Literal(ch) => out.push(ch),
            Piece::Placeholder(_) => {
                let ch = source
                    .next()
                    .ok_or_else(|| FormatError::NotEnoughCharacters {
                        format: sub_format.to_string(),
                        value: value.to_string(),
                    })?;
                out.push(ch);
            }
        }
    }

    Ok(out)
}

/// Record template plus per-slot sub-formats.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Template {
    format_string: String,
    sub_formats: BTreeMap<usize, String>,
}

impl Template {
    pub fn new(format_string: impl Into<String>) -> Self {
        Self {
            format_string: format_string.into(),
            sub_formats: BTreeMap::new(),
        }
    }

    pub fn with_sub_format(mut self, index: usize, sub_format: impl Into<String>) -> Self {
        self.sub_formats.insert(index, sub_format.into());
        self
    }

    pub fn format_string(&self) -> &str {
        &self.format_string
    }

    pub fn sub_format(&self, index: usize) -> Option<&str> {
        self.sub_formats.get(&index).map(String::as_str)
    }

    /// Slot indices referenced by the record template.
    pub fn referenced_slots(&self) -> Result<Vec<usize>, FormatError> {
        Ok(pieces(&self.format_string)?
            .into_iter()
            .filter_map(|piece| match piece {
                Piece::Placeholder(index) => Some(index),
                Piece::Literal(_) => None,
            })
            .collect())
    }

    /// Formats one record; `Ok(None)` when a referenced slot is absent.
    pub fn format(&self, values: &[Option<String>]) -> Result<Option<String>, FormatError> {
        let mut fields = Vec::with_capacity(values.len());
        for (index, value) in values.iter().enumerate() {
            let field = match (value, self.sub_format(index)) {
                (Some(value), Some(sub_format)) => Some(format_field(value, sub_format)?),
                (value, _) => value.clone(),
            };
            fields.push(field);
        }

        let mut out = String::with_capacity(self.format_string.len());
        for piece in pieces(&self.format_string)? {
            match piece {
                Piece::Literal(ch) => out.push(ch),
                Piece::Placeholder(index) => {
                    let field = fields.get(index).ok_or(FormatError::UnknownSlot { index })?;
                    match field {
                        Some(field) => out.push_str(field),
                        None => return Ok(None),
                    }
                }
            }
        }

        Ok(Some(out))
    }
}
