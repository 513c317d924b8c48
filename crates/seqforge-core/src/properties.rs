use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Flat `key -> value` property map describing one generator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Properties(BTreeMap<String, String>);

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

}

impl<K, V> FromIterator<(K, V)> for Properties
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropertyKind {
    /// Non-negative 32-bit integer (indices, lengths).
    Int,
    /// Signed 64-bit integer.
    Long,
    /// Any text.
    String,
    /// Comma-separated list with at least one entry.
    List,
}

#[derive(Clone, Copy, Debug)]
pub struct PropertySpec {
    pub key: &'static str,
    pub kind: PropertyKind,
    pub required: bool,
}

impl PropertySpec {
    pub const fn new(key: &'static str, kind: PropertyKind, required: bool) -> Self {
        Self {
            key,
            kind,
            required,
        }
    }
}

/// Checks presence and shape of every listed property, failing on the first offender.
pub fn validate_properties(
    properties: &Properties,
    specs: &[PropertySpec],
    ctx: &'static str,
) -> Result<()> {
    for spec in specs {
        match properties.get(spec.key) {
            Some(value) => validate_kind(ctx, spec.key, spec.kind, value)?,
            None if spec.required => {
                return Err(Error::MissingProperty {
                    context: ctx,
                    key: spec.key.to_string(),
                });
            }
            None => {}
        }
    }
    Ok(())
}

pub fn parse_int(ctx: &'static str, key: &str, value: &str) -> Result<u32> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|err| {
            Error::invalid(ctx, key, value, format!("expected a non-negative integer ({err})"))
        })
}

pub fn parse_long(ctx: &'static str, key: &str, value: &str) -> Result<i64> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|err| {
            Error::invalid(ctx, key, value, format!("expected a 64-bit integer ({err})"))
        })
}

pub fn parse_list(ctx: &'static str, key: &str, value: &str) -> Result<Vec<String>> {
    let items: Vec<String> = value
        .split(',')
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect();
    if items.is_empty() {
        return Err(Error::invalid(ctx, key, value, "expected at least one entry"));
    }
    Ok(items)
}

fn validate_kind(ctx: &'static str, key: &str, kind: PropertyKind, value: &str) -> Result<()> {
    match kind {
        PropertyKind::Int => parse_int(ctx, key, value).map(|_| ()),
        PropertyKind::Long => parse_long(ctx, key, value).map(|_| ()),
        PropertyKind::String => Ok(()),
        PropertyKind::List => parse_list(ctx, key, value).map(|_| ()),
    }
}
