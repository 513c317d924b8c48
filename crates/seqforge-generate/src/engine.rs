use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use seqforge_core::{build_dependency_report, GeneratorKind};

use crate::errors::{FormatError, GenerationError};
use crate::formatter::Template;
use crate::generators::StepFunction;
use crate::model::GenerationReport;

/// One configured generator at a fixed index within a record.
#[derive(Debug, Clone)]
pub struct Slot {
    pub index: usize,
    pub kind: GeneratorKind,
    pub step: Arc<dyn StepFunction>,
    /// Equal to `index` for a driving slot.
    pub input_index: usize,
    /// Seed for driving slots; derived slots seed from their input.
    pub start_value: Option<String>,
    pub sub_format: Option<String>,
}

impl Slot {
    pub fn is_driving(&self) -> bool {
        self.input_index == self.index
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrchestratorState {
    Running,
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Accepted,
    Rejected,
}

/// Owns the value table and advances every slot once per tick.
#[derive(Debug)]
pub struct Orchestrator {
    slots: Vec<Slot>,
    derived_order: Vec<usize>,
    template: Template,
    values: Vec<Option<String>>,
    outcome: TickOutcome,
    state: OrchestratorState,
    ticks: u64,
}

impl Orchestrator {
    /// Validates slot wiring and seeds the value table from the start values.
    pub fn new(slots: Vec<Slot>, template: Template) -> Result<Self, GenerationError> {
        for (position, slot) in slots.iter().enumerate() {
            if slot.index != position {
                return Err(GenerationError::InvalidConfig(format!(
                    "slot at position {position} declares index {}",
                    slot.index
                )));
            }
            if slot.input_index >= slots.len() {
                return Err(GenerationError::InvalidConfig(format!(
                    "slot {} reads from unknown slot {}",
                    slot.index, slot.input_index
                )));
            }
        }

        let inputs: BTreeMap<usize, usize> = slots
            .iter()
            .map(|slot| (slot.index, slot.input_index))
            .collect();
        let report = build_dependency_report(&inputs);
        let derived_order = report.derived_order(&inputs).ok_or_else(|| {
            GenerationError::InvalidConfig(format!(
                "derived slots form a cycle: {:?}",
                report.cycle.unwrap_or_default()
            ))
        })?;

        let mut orchestrator = Self {
            values: vec![None; slots.len()],
            slots,
            derived_order,
            template,
            outcome: TickOutcome::Accepted,
            state: OrchestratorState::Running,
            ticks: 0,
        };
        orchestrator.seed()?;

        info!(
            slots = orchestrator.slots.len(),
            driving = report.summary.driving,
            derived = report.summary.derived,
            template = %orchestrator.template.format_string(),
            "orchestrator seeded"
        );

        Ok(orchestrator)
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Read-only view of the current value table.
    pub fn values(&self) -> &[Option<String>] {
        &self.values
    }

    pub fn state(&self) -> OrchestratorState {
        self.state
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Checks the template against the slot table and formats the seeded record.
    ///
    /// Every referenced slot must exist, even when an absent value would
    /// otherwise end formatting before reaching it.
    pub fn check_template(&self) -> Result<Option<String>, FormatError> {
        for index in self.template.referenced_slots()? {
            if index >= self.slots.len() {
                return Err(FormatError::UnknownSlot { index });
            }
        }
        self.template.format(&self.values)
    }

    /// Lazy, infinite sequence of records; `Ok(None)` marks a rejected tick.
    ///
    /// The first element is the seeded record. The sequence ends after the
    /// first error, which is driving exhaustion or a malformed value.
    pub fn generate(self) -> Records {
        Records {
            orchestrator: self,
            seeded: true,
            done: false,
        }
    }

    fn seed(&mut self) -> Result<(), GenerationError> {
        for slot in self.slots.iter().filter(|slot| slot.is_driving()) {
            let start = slot.start_value.as_deref().ok_or_else(|| {
                GenerationError::InvalidConfig(format!(
                    "driving slot {} ({}) has no start value",
                    slot.index, slot.kind
                ))
            })?;
            let value = slot.step.generate(start)?.ok_or_else(|| {
                GenerationError::Exhausted {
                    index: slot.index,
                    last: start.to_string(),
                }
            })?;
            self.values[slot.index] = Some(value);
        }

        self.outcome = self.derive()?;
        Ok(())
    }

    /// Recomputes derived slots in dependency order from the table's current values.
    fn derive(&mut self) -> Result<TickOutcome, GenerationError> {
        let mut outcome = TickOutcome::Accepted;
        for &index in &self.derived_order {
            let slot = &self.slots[index];
            let value = match self.values[slot.input_index].as_deref() {
                Some(input) => slot.step.generate(input)?,
                None => None,
            };
            if value.is_none() {
                outcome = TickOutcome::Rejected;
            }
            self.values[index] = value;
        }
        Ok(outcome)
    }

    fn advance(&mut self) -> Result<(), GenerationError> {
        if self.state == OrchestratorState::Exhausted {
            return Err(GenerationError::InvalidConfig(
                "orchestrator is exhausted".to_string(),
            ));
        }

        let mut driven = Vec::new();
        for slot in self.slots.iter().filter(|slot| slot.is_driving()) {
            let current = self.values[slot.index].as_deref().unwrap_or_default();
            match slot.step.generate(current)? {
                Some(next) => driven.push((slot.index, next)),
                None => {
                    self.state = OrchestratorState::Exhausted;
                    warn!(
                        slot = slot.index,
                        last = %current,
                        ticks = self.ticks,
                        "driving slot exhausted"
                    );
                    return Err(GenerationError::Exhausted {
                        index: slot.index,
                        last: current.to_string(),
                    });
                }
            }
        }
        for (index, value) in driven {
            self.values[index] = Some(value);
        }

        self.outcome = self.derive()?;
        self.ticks += 1;
        debug!(tick = self.ticks, outcome = ?self.outcome, "tick");
        Ok(())
    }

    fn current_record(&self) -> Result<Option<String>, GenerationError> {
        match self.outcome {
            TickOutcome::Rejected => Ok(None),
            TickOutcome::Accepted => Ok(self.template.format(&self.values)?),
        }
    }
}

/// Iterator returned by [`Orchestrator::generate`].
#[derive(Debug)]
pub struct Records {
    orchestrator: Orchestrator,
    seeded: bool,
    done: bool,
}

impl Records {
    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }
}

impl Iterator for Records {
    type Item = Result<Option<String>, GenerationError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = if std::mem::take(&mut self.seeded) {
            self.orchestrator.current_record()
        } else {
            self.orchestrator
                .advance()
                .and_then(|()| self.orchestrator.current_record())
        };
        if result.is_err() {
            self.done = true;
        }
        Some(result)
    }
}

/// Pulls records until `count` are accepted.
///
/// `max_attempts` bounds consecutive rejected records; `None` leaves the scan
/// bounded only by driving exhaustion.
pub fn collect_accepted<I>(
    records: I,
    count: usize,
    max_attempts: Option<u64>,
) -> Result<(Vec<String>, GenerationReport), GenerationError>
where
    I: IntoIterator<Item = Result<Option<String>, GenerationError>>,
{
    let start = Instant::now();
    let mut report = GenerationReport::default();
    let mut accepted = Vec::with_capacity(count);
    let mut streak = 0_u64;

    if count == 0 {
        return Ok((accepted, report));
    }

    for record in records {
        report.records_pulled += 1;
        match record? {
            Some(record) => {
                accepted.push(record);
                report.accepted += 1;
                streak = 0;
                if accepted.len() == count {
                    break;
                }
            }
            None => {
                report.rejected += 1;
                streak += 1;
                if max_attempts.is_some_and(|max| streak >= max) {
                    return Err(GenerationError::AttemptsExceeded { attempts: streak });
                }
            }
        }
    }

    report.duration_ms = start.elapsed().as_millis() as u64;
    info!(
        accepted = report.accepted,
        rejected = report.rejected,
        duration_ms = report.duration_ms,
        "records collected"
    );
    Ok((accepted, report))
}

#[cfg(test)]
mod tests {
    use seqforge_core::Properties;

    use super::*;
    use crate::input::InputAssembly;

    fn short_counter() -> Orchestrator {
        short_counter_with_template("{0}")
    }

    fn short_counter_with_template(template: &str) -> Orchestrator {
        let mut assembly = InputAssembly::new();
        assembly
            .add(
                "SEQUENTIALNUMBERGENERATOR",
                &Properties::new()
                    .with("start", "7")
                    .with("length", "1")
                    .with("step", "1")
                    .with("input", "0"),
            )
            .expect("bind counter");
        assembly.build(template).expect("build")
    }

    #[test]
    fn exhaustion_moves_to_terminal_state() {
        let mut records = short_counter().generate();

        assert_eq!(records.next().map(Result::ok), Some(Some(Some("8".to_string()))));
        assert_eq!(records.next().map(Result::ok), Some(Some(Some("9".to_string()))));
        assert!(matches!(
            records.next(),
            Some(Err(GenerationError::Exhausted { index: 0, .. }))
        ));
        assert_eq!(records.orchestrator().state(), OrchestratorState::Exhausted);
        assert_eq!(records.orchestrator().ticks(), 1);
        assert!(records.next().is_none());
    }

    #[test]
    fn collecting_zero_records_pulls_nothing() {
        let (records, report) =
            collect_accepted(short_counter().generate(), 0, None).expect("collect");
        assert!(records.is_empty());
        assert_eq!(report, GenerationReport::default());
    }

    #[test]
    fn check_template_surfaces_template_errors_before_generation() {
        let orchestrator = short_counter();
        assert_eq!(orchestrator.check_template(), Ok(Some("8".to_string())));

        let mut assembly = InputAssembly::new();
        assembly
            .add(
                "SEQUENTIALNUMBERGENERATOR",
                &Properties::new()
                    .with("start", "0")
                    .with("length", "1")
                    .with("step", "1")
                    .with("input", "0"),
            )
            .expect("bind counter");
        assembly
            .add(
                "EVALUATION",
                &Properties::new().with("formula", "A==0").with("input", "0"),
            )
            .expect("bind filter");
        // slot 1 is absent on the seed, slot 4 does not exist
        let orchestrator = assembly.build("{1}{4}").expect("build");
        assert_eq!(
            orchestrator.check_template(),
            Err(FormatError::UnknownSlot { index: 4 })
        );

        let orchestrator = short_counter_with_template("{x}");
        assert!(matches!(
            orchestrator.check_template(),
            Err(FormatError::MalformedPlaceholder { .. })
        ));
    }
}
