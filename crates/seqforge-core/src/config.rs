use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::pattern::{INPUT, STEP};
use crate::properties::Properties;
use crate::types::GeneratorKind;

/// One record layout: a template plus its generators in slot order.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RecordConfig {
    /// Record template; `{n}` is replaced with slot `n`'s value.
    pub template: String,
    /// Generators; the n-th entry occupies slot `n`.
    #[serde(rename = "generator", default)]
    pub generators: Vec<GeneratorConfig>,
}

/// A generator keyword and its flat properties.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GeneratorConfig {
    /// Generator keyword (ex.: `SEQUENTIALNUMBERGENERATOR`).
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub properties: BTreeMap<String, PropertyValue>,
}

/// Scalar property value as written in a configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum PropertyValue {
    Integer(i64),
    Boolean(bool),
    Text(String),
}

impl PropertyValue {
    pub fn as_property(&self) -> String {
        match self {
            PropertyValue::Integer(value) => value.to_string(),
            PropertyValue::Boolean(value) => value.to_string(),
            PropertyValue::Text(value) => value.clone(),
        }
    }
}

impl GeneratorConfig {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            properties: BTreeMap::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: PropertyValue) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    /// Stringified property map handed to the pattern model.
    pub fn to_properties(&self) -> Properties {
        self.properties
            .iter()
            .map(|(key, value)| (key.clone(), value.as_property()))
            .collect()
    }
}

impl RecordConfig {
    /// Checks that belong to the configuration layer rather than to a pattern.
    ///
    /// This rejects:
    /// - an empty generator list
    /// - a driving sequential-number generator with `step = 0`
    pub fn validate(&self) -> Result<()> {
        if self.generators.is_empty() {
            return Err(Error::InvalidConfig(
                "at least one generator is required".to_string(),
            ));
        }

        for (index, generator) in self.generators.iter().enumerate() {
            let Ok(GeneratorKind::SequentialNumber) = generator.kind.parse::<GeneratorKind>() else {
                continue;
            };
            let properties = generator.to_properties();
            let driving = properties
                .get(INPUT)
                .and_then(|value| value.trim().parse::<usize>().ok())
                == Some(index);
            let step = properties
                .get(STEP)
                .and_then(|value| value.trim().parse::<i64>().ok());
            if driving && step == Some(0) {
                return Err(Error::InvalidConfig(format!(
                    "generator {index}: step must not be 0 for a driving sequential number"
                )));
            }
        }

        Ok(())
    }
}
