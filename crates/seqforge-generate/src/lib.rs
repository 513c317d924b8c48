//! Generation engine for seqforge.
//!
//! This crate binds configured generators to slots, advances them tick by
//! tick in dependency order, filters candidates through formulas, and
//! formats accepted records from a template.

pub mod engine;
pub mod errors;
pub mod formatter;
pub mod formula;
pub mod generators;
pub mod input;
pub mod model;

pub use engine::{
    collect_accepted, Orchestrator, OrchestratorState, Records, Slot, TickOutcome,
};
pub use errors::{FormatError, FormulaError, GenerationError};
pub use formatter::{format_field, Template};
pub use formula::{compile, CompiledExpr, FormulaContext, FormulaTool};
pub use generators::{BoundGenerator, GeneratorRegistry, StepFunction};
pub use input::InputAssembly;
pub use model::GenerationReport;
