use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Generator family keyword as written in a record configuration.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub enum GeneratorKind {
    #[serde(rename = "SEQUENTIALNUMBERGENERATOR")]
    SequentialNumber,
    #[serde(rename = "SEQUENTIALASCIIGENERATOR")]
    SequentialAlphabet,
    #[serde(rename = "CALCULATION")]
    Calculation,
    #[serde(rename = "EVALUATION")]
    Evaluation,
}

impl GeneratorKind {
    pub const ALL: [GeneratorKind; 4] = [
        GeneratorKind::SequentialNumber,
        GeneratorKind::SequentialAlphabet,
        GeneratorKind::Calculation,
        GeneratorKind::Evaluation,
    ];

    pub fn keyword(&self) -> &'static str {
        match self {
            GeneratorKind::SequentialNumber => "SEQUENTIALNUMBERGENERATOR",
            GeneratorKind::SequentialAlphabet => "SEQUENTIALASCIIGENERATOR",
            GeneratorKind::Calculation => "CALCULATION",
            GeneratorKind::Evaluation => "EVALUATION",
        }
    }
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for GeneratorKind {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        GeneratorKind::ALL
            .into_iter()
            .find(|kind| kind.keyword().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| Error::InvalidConfig(format!("unknown generator type '{value}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_parse_case_insensitively() {
        let kind: GeneratorKind = "evaluation".parse().expect("known keyword");
        assert_eq!(kind, GeneratorKind::Evaluation);
        assert_eq!(kind.to_string(), "EVALUATION");
    }

    #[test]
    fn unknown_keyword_is_rejected() {
        let err = "RANDOMGENERATOR".parse::<GeneratorKind>().unwrap_err();
        assert!(err.to_string().contains("RANDOMGENERATOR"));
    }
}
