use seqforge_core::{
    GeneratorKind, Pattern, Properties, SequentialAlphabetPattern, SequentialNumberPattern,
};

use crate::errors::GenerationError;
use crate::generators::{BoundGenerator, GeneratorRegistry, StepFunction};

/// Highest per-position radix for alphabet counters.
const MAX_RADIX: usize = 10;

pub fn register(registry: &mut GeneratorRegistry) {
    registry.register_generator(GeneratorKind::SequentialNumber, bind_sequential_number);
    registry.register_generator(GeneratorKind::SequentialAlphabet, bind_sequential_alphabet);
}

fn bind_sequential_number(properties: &Properties) -> Result<BoundGenerator, GenerationError> {
    let pattern = SequentialNumberPattern::from_properties(properties)?;
    let step = SequentialNumber::new(&pattern);
    Ok(BoundGenerator::new(
        GeneratorKind::SequentialNumber,
        Pattern::SequentialNumber(pattern),
        step,
    ))
}

fn bind_sequential_alphabet(properties: &Properties) -> Result<BoundGenerator, GenerationError> {
    let pattern = SequentialAlphabetPattern::from_properties(properties)?;
    let step = SequentialAlphabet::new(&pattern);
    Ok(BoundGenerator::new(
        GeneratorKind::SequentialAlphabet,
        Pattern::SequentialAlphabet(pattern),
        step,
    ))
}

/// `previous + step`, absent once the result reaches `10^length`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequentialNumber {
    step: i64,
    bound: i128,
    padding: usize,
}

impl SequentialNumber {
    pub fn new(pattern: &SequentialNumberPattern) -> Self {
        Self {
            step: pattern.step,
            bound: 10_i128.pow(pattern.length.min(38)),
            padding: pattern.padding_length,
        }
    }
}

impl StepFunction for SequentialNumber {
    fn id(&self) -> &'static str {
        "sequential.number"
    }

    fn generate(&self, previous: &str) -> Result<Option<String>, GenerationError> {
        let value = previous
            .trim()
            .parse::<i64>()
            .map_err(|_| GenerationError::Parse {
                value: previous.to_string(),
                expected: "a 64-bit integer",
            })?;
        let next = i128::from(value) + i128::from(self.step);
        if next >= self.bound {
            return Ok(None);
        }
        Ok(Some(format!("{next:0width$}", width = self.padding)))
    }
}

/// Odometer over an alphabet, wrapping to all-zero after the last value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequentialAlphabet {
    alphabet: Vec<String>,
    length: usize,
    padding: usize,
}

impl SequentialAlphabet {
    pub fn new(pattern: &SequentialAlphabetPattern) -> Self {
        Self {
            alphabet: pattern.alphabet.clone(),
            length: pattern.length,
            padding: pattern.padding_length,
        }
    }

    /// Per-position radix; never above [`MAX_RADIX`] whatever the alphabet size.
    pub fn radix(&self) -> usize {
        self.alphabet.len().saturating_sub(1).min(MAX_RADIX - 1) + 1
    }

    /// Splits `value` into `length` symbol indices, most significant first.
    pub fn decode(&self, value: &str) -> Result<Vec<usize>, GenerationError> {
        let mut positions = Vec::with_capacity(self.length);
        let mut rest = value;
        while !rest.is_empty() {
            let (index, symbol) = self
                .alphabet
                .iter()
                .enumerate()
                .filter(|(_, symbol)| rest.starts_with(symbol.as_str()))
                .max_by_key(|(_, symbol)| symbol.len())
                .ok_or_else(|| {
                    GenerationError::InvalidConfig(format!(
                        "'{value}' contains a symbol outside the alphabet [{}]",
                        self.alphabet.join(",")
                    ))
                })?;
            positions.push(index);
            rest = &rest[symbol.len()..];
        }

        if positions.len() > self.length {
            // leading zero symbols are padding
            let extra = positions.len() - self.length;
            if positions[..extra].iter().any(|index| *index != 0) {
                return Err(GenerationError::InvalidConfig(format!(
                    "'{value}' is longer than {} symbol(s)",
                    self.length
                )));
            }
            positions.drain(..extra);
        }
        while positions.len() < self.length {
            positions.insert(0, 0);
        }
        Ok(positions)
    }

    pub fn encode(&self, positions: &[usize]) -> String {
        let mut out = String::new();
        let zero = self.alphabet.first().map(String::as_str).unwrap_or_default();
        for _ in positions.len()..self.padding {
            out.push_str(zero);
        }
        for index in positions {
            if let Some(symbol) = self.alphabet.get(*index) {
                out.push_str(symbol);
            }
        }
        out
    }
}

/// Bumps the rightmost position below `max`, zeroing everything after it.
/// When every position is at `max` the whole counter wraps to zero.
pub fn increment(positions: &mut [usize], max: usize) {
    match positions.iter().rposition(|index| *index < max) {
        Some(pos) => {
            positions[pos] += 1;
            positions[pos + 1..].fill(0);
        }
        None => positions.fill(0),
    }
}

impl StepFunction for SequentialAlphabet {
    fn id(&self) -> &'static str {
        "sequential.alphabet"
    }

    fn generate(&self, previous: &str) -> Result<Option<String>, GenerationError> {
        let mut positions = self.decode(previous)?;
        increment(&mut positions, self.radix() - 1);
        Ok(Some(self.encode(&positions)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number(start: &str, step: &str, length: &str, padding: Option<&str>) -> SequentialNumber {
        let mut props = Properties::new()
            .with("input", "0")
            .with("start", start)
            .with("step", step)
            .with("length", length);
        if let Some(padding) = padding {
            props.insert("padding-length", padding);
        }
        SequentialNumber::new(&SequentialNumberPattern::from_properties(&props).expect("valid"))
    }

    fn alphabet(list: &str, length: &str) -> SequentialAlphabet {
        let props = Properties::new()
            .with("input", "0")
            .with("start", "")
            .with("list", list)
            .with("length", length);
        SequentialAlphabet::new(&SequentialAlphabetPattern::from_properties(&props).expect("valid"))
    }

    #[test]
    fn number_pads_and_stops_at_bound() {
        let step = number("1", "2", "5", Some("3"));
        assert_eq!(step.generate("3").expect("parse"), Some("005".to_string()));
        assert_eq!(step.generate("99999").expect("parse"), None);
        assert_eq!(step.generate("99997").expect("parse"), Some("99999".to_string()));
    }

    #[test]
    fn number_without_padding_keeps_natural_width() {
        let step = number("0", "1", "3", None);
        assert_eq!(step.generate("9").expect("parse"), Some("10".to_string()));
        assert_eq!(step.generate("999").expect("parse"), None);
    }

    #[test]
    fn number_nth_value_follows_start_plus_n_steps() {
        let step = number("7", "3", "2", None);
        let mut value = "7".to_string();
        for n in 1..=30 {
            match step.generate(&value).expect("parse") {
                Some(next) => {
                    assert_eq!(next, (7 + n * 3).to_string());
                    value = next;
                }
                None => {
                    assert!(7 + n * 3 >= 100);
                    return;
                }
            }
        }
        panic!("counter never reached its bound");
    }

    #[test]
    fn number_rejects_malformed_previous() {
        let step = number("0", "1", "3", None);
        assert!(matches!(
            step.generate("abc"),
            Err(GenerationError::Parse { .. })
        ));
    }

    #[test]
    fn increment_carries_and_wraps() {
        let mut positions = vec![0, 0, 0];
        increment(&mut positions, 1);
        assert_eq!(positions, vec![0, 0, 1]);
        increment(&mut positions, 1);
        assert_eq!(positions, vec![0, 1, 0]);

        let mut positions = vec![1, 1, 1];
        increment(&mut positions, 1);
        assert_eq!(positions, vec![0, 0, 0]);
    }

    #[test]
    fn alphabet_steps_and_wraps() {
        let step = alphabet("A,B,C", "2");
        assert_eq!(step.generate("AA").expect("valid"), Some("AB".to_string()));
        assert_eq!(step.generate("AC").expect("valid"), Some("BA".to_string()));
        assert_eq!(step.generate("CC").expect("valid"), Some("AA".to_string()));
    }

    #[test]
    fn alphabet_radix_is_capped_at_ten() {
        let step = alphabet("A,B,C,D,E,F,G,H,I,J,K,L", "1");
        assert_eq!(step.radix(), 10);
        assert_eq!(step.generate("I").expect("valid"), Some("J".to_string()));
        assert_eq!(step.generate("J").expect("valid"), Some("A".to_string()));
    }

    #[test]
    fn alphabet_rejects_unknown_symbols() {
        let step = alphabet("A,B", "2");
        assert!(matches!(
            step.generate("AZ"),
            Err(GenerationError::InvalidConfig(_))
        ));
    }

    #[test]
    fn alphabet_supports_multi_character_symbols() {
        let step = alphabet("x,yy", "2");
        assert_eq!(step.decode("yyx").expect("valid"), vec![1, 0]);
        assert_eq!(step.generate("xyy").expect("valid"), Some("yyx".to_string()));
    }

    #[test]
    fn alphabet_padding_round_trips() {
        let props = Properties::new()
            .with("input", "0")
            .with("start", "A")
            .with("list", "A,B,C")
            .with("length", "2")
            .with("padding-length", "4");
        let step = SequentialAlphabet::new(
            &SequentialAlphabetPattern::from_properties(&props).expect("valid"),
        );
        let first = step.generate("AB").expect("valid").expect("value");
        assert_eq!(first, "AAAC");
        assert_eq!(step.generate(&first).expect("valid"), Some("AABA".to_string()));
    }
}
