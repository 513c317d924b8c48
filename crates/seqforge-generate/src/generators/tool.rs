use seqforge_core::{GeneratorKind, Pattern, Properties, ToolPattern};

use crate::errors::{FormulaError, GenerationError};
use crate::formula::FormulaTool;
use crate::generators::{BoundGenerator, GeneratorRegistry, StepFunction};

pub fn register(registry: &mut GeneratorRegistry) {
    registry.register_generator(GeneratorKind::Calculation, bind_calculate);
    registry.register_generator(GeneratorKind::Evaluation, bind_evaluate);
}

fn bind_calculate(properties: &Properties) -> Result<BoundGenerator, GenerationError> {
    let pattern = ToolPattern::from_properties(properties)?;
    let step = Calculate::new(&pattern);
    Ok(BoundGenerator::new(
        GeneratorKind::Calculation,
        Pattern::Tool(pattern),
        step,
    ))
}

fn bind_evaluate(properties: &Properties) -> Result<BoundGenerator, GenerationError> {
    let pattern = ToolPattern::from_properties(properties)?;
    let step = Evaluate::new(&pattern);
    Ok(BoundGenerator::new(
        GeneratorKind::Evaluation,
        Pattern::Tool(pattern),
        step,
    ))
}

/// Emits the formula's integer result; never absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calculate {
    tool: FormulaTool,
}

impl Calculate {
    pub fn new(pattern: &ToolPattern) -> Self {
        Self {
            tool: FormulaTool::new(pattern.formula.clone()),
        }
    }
}

impl StepFunction for Calculate {
    fn id(&self) -> &'static str {
        "tool.calculate"
    }

    fn generate(&self, values: &str) -> Result<Option<String>, GenerationError> {
        let result = self.tool.evaluate(values)?;
        Ok(Some(result.to_string()))
    }
}

/// Passes `values` through when the formula evaluates to 1, otherwise absent.
///
/// A non-finite result (such as division by a zero digit) rejects the candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluate {
    tool: FormulaTool,
}

impl Evaluate {
    pub fn new(pattern: &ToolPattern) -> Self {
        Self {
            tool: FormulaTool::new(pattern.formula.clone()),
        }
    }
}

impl StepFunction for Evaluate {
    fn id(&self) -> &'static str {
        "tool.evaluate"
    }

    fn generate(&self, values: &str) -> Result<Option<String>, GenerationError> {
        match self.tool.evaluate(values) {
            Ok(1) => Ok(Some(values.to_string())),
            Ok(_) | Err(FormulaError::NonFinite(_)) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}
