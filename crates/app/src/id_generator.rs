//! In-process [`IdGenerator`] implementations.

use opsdeck_domain::automation::Automation;
use opsdeck_domain::id::IdKind;
use uuid::Uuid;

use crate::ports::IdGenerator;

/// Per-kind counters formatted as `<prefix>-<n:03>`, e.g. `auto-007`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequentialIdGenerator {
    next: [u64; 3],
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl SequentialIdGenerator {
    /// Every kind starts counting at `start`.
    #[must_use]
    pub fn starting_at(start: u64) -> Self {
        Self { next: [start; 3] }
    }

    /// Continue after the highest numbered id already present in
    /// `automations`, per kind. Ids that do not follow the
    /// `<prefix>-<number>` pattern are ignored.
    #[must_use]
    pub fn resuming(automations: &[Automation]) -> Self {
        let mut generator = Self::default();
        for automation in automations {
            generator.observe(IdKind::Automation, automation.id.as_str());
            for section in &automation.config {
                generator.observe(IdKind::Section, section.id.as_str());
                for entry in &section.entries {
                    generator.observe(IdKind::Entry, entry.id.as_str());
                }
            }
        }
        generator
    }

    /// The number the next id of `kind` will carry.
    #[must_use]
    pub fn peek(&self, kind: IdKind) -> u64 {
        self.next[slot(kind)]
    }

    fn observe(&mut self, kind: IdKind, id: &str) {
        let number = id
            .strip_prefix(kind.prefix())
            .and_then(|rest| rest.strip_prefix('-'))
            .and_then(|digits| digits.parse::<u64>().ok());
        if let Some(n) = number {
            let next = &mut self.next[slot(kind)];
            *next = (*next).max(n.saturating_add(1));
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&mut self, kind: IdKind) -> String {
        let counter = &mut self.next[slot(kind)];
        let n = *counter;
        *counter = n.saturating_add(1);
        format!("{}-{n:03}", kind.prefix())
    }
}

fn slot(kind: IdKind) -> usize {
    match kind {
        IdKind::Automation => 0,
        IdKind::Section => 1,
        IdKind::Entry => 2,
    }
}

/// Random v4 UUIDs, e.g. `cs-3f2b…`. Safe across independent stores.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&mut self, kind: IdKind) -> String {
        format!("{}-{}", kind.prefix(), Uuid::new_v4())
    }
}
