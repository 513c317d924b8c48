use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use seqforge_core::{GeneratorKind, Pattern, Properties};

use crate::errors::GenerationError;

pub mod sequential;
pub mod tool;

/// A deterministic `previous | input -> next` function.
///
/// `Ok(None)` is the absent signal: terminal for a driving slot, a rejection
/// for a derived one. `Err` is reserved for malformed input.
pub trait StepFunction: fmt::Debug + Send + Sync {
    fn id(&self) -> &'static str;

    fn generate(&self, previous: &str) -> Result<Option<String>, GenerationError>;
}

/// A validated pattern paired with the step function built from it.
#[derive(Debug, Clone)]
pub struct BoundGenerator {
    pub kind: GeneratorKind,
    pub pattern: Pattern,
    pub step: Arc<dyn StepFunction>,
}

impl BoundGenerator {
    pub fn new(kind: GeneratorKind, pattern: Pattern, step: impl StepFunction + 'static) -> Self {
        Self {
            kind,
            pattern,
            step: Arc::new(step),
        }
    }
}

pub type GeneratorFactory = fn(&Properties) -> Result<BoundGenerator, GenerationError>;

/// Keyword to factory registry.
#[derive(Clone)]
pub struct GeneratorRegistry {
    factories: BTreeMap<GeneratorKind, GeneratorFactory>,
}

impl Default for GeneratorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for GeneratorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorRegistry")
            .field("kinds", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl GeneratorRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            factories: BTreeMap::new(),
        };
        sequential::register(&mut registry);
        tool::register(&mut registry);
        registry
    }

    pub fn register_generator(&mut self, kind: GeneratorKind, factory: GeneratorFactory) {
        self.factories.insert(kind, factory);
    }

    pub fn kinds(&self) -> Vec<GeneratorKind> {
        self.factories.keys().copied().collect()
    }

    /// Validates `properties` for the keyword's family and builds its step function.
    pub fn bind(
        &self,
        keyword: &str,
        properties: &Properties,
    ) -> Result<BoundGenerator, GenerationError> {
        let kind: GeneratorKind = keyword.parse()?;
        if properties.is_empty() {
            return Err(GenerationError::InvalidConfig(format!(
                "{kind}: property map must not be empty"
            )));
        }
        let factory = self.factories.get(&kind).ok_or_else(|| {
            GenerationError::InvalidConfig(format!("no generator registered for '{kind}'"))
        })?;
        factory(properties)
    }
}
