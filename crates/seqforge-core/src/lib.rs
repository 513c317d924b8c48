//! Core contracts and helpers for seqforge.
//!
//! This crate defines the generator property model, the typed patterns
//! validated from it, the record configuration format, and the slot
//! dependency graph shared by the engine and the CLI.

pub mod config;
pub mod error;
pub mod graph;
pub mod pattern;
pub mod properties;
pub mod types;

pub use config::{GeneratorConfig, PropertyValue, RecordConfig};
pub use error::{Error, Result};
pub use graph::{build_dependency_report, DependencyReport, DependencySummary};
pub use pattern::{
    BasePattern, Pattern, SequentialAlphabetPattern, SequentialNumberPattern, ToolPattern,
};
pub use properties::{Properties, PropertyKind, PropertySpec};
pub use types::GeneratorKind;

/// Current contract version for record configuration files.
pub const CONFIG_VERSION: &str = "0.1";
