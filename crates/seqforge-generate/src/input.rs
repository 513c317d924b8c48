use tracing::debug;

use seqforge_core::{Properties, RecordConfig};

use crate::engine::{Orchestrator, Slot};
use crate::errors::GenerationError;
use crate::formatter::Template;
use crate::generators::GeneratorRegistry;

/// Binds generator keywords to slots at consecutive indices.
#[derive(Debug, Default)]
pub struct InputAssembly {
    registry: GeneratorRegistry,
    slots: Vec<Slot>,
}

impl InputAssembly {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and binds one generator; returns the slot index it occupies.
    pub fn add(
        &mut self,
        keyword: &str,
        properties: &Properties,
    ) -> Result<usize, GenerationError> {
        let bound = self.registry.bind(keyword, properties)?;
        let index = self.slots.len();
        debug!(slot = index, kind = %bound.kind, step = bound.step.id(), "generator bound");

        self.slots.push(Slot {
            index,
            kind: bound.kind,
            input_index: bound.pattern.input(),
            start_value: bound.pattern.start_value(),
            sub_format: bound.pattern.sub_format().map(str::to_string),
            step: bound.step,
        });
        Ok(index)
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Collects sub-formats into the template and seeds an orchestrator.
    pub fn build(self, format_string: impl Into<String>) -> Result<Orchestrator, GenerationError> {
        let mut template = Template::new(format_string);
        for slot in &self.slots {
            if let Some(sub_format) = &slot.sub_format {
                template = template.with_sub_format(slot.index, sub_format.clone());
            }
        }
        Orchestrator::new(self.slots, template)
    }

    /// Assembles every generator of a record configuration, in order.
    pub fn from_config(config: &RecordConfig) -> Result<Orchestrator, GenerationError> {
        let mut assembly = Self::new();
        for generator in &config.generators {
            assembly.add(&generator.kind, &generator.to_properties())?;
        }
        assembly.build(config.template.clone())
    }
}
