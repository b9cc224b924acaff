//! Shared "currently hovered operation" slot for one rendered trace.
//!
//! Operation units never reference each other. A unit that is pointed at
//! publishes its operation here; every other unit observes the slot and
//! decides on its own whether the hovered operation concerns it.

use otlog_core::OperationIdentity;

/// Identity of one operation unit within a trace view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(pub usize);

#[derive(Debug, Clone, PartialEq, Eq)]
struct HoverSlot {
    publisher: UnitId,
    operation: OperationIdentity,
}

/// Single-value hover state. The most recent publish always wins.
#[derive(Debug, Default)]
pub struct HoverCoordinator {
    slot: Option<HoverSlot>,
    generation: u64,
}

impl HoverCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hovered(&self) -> Option<&OperationIdentity> {
        self.slot.as_ref().map(|slot| &slot.operation)
    }

    /// Unit that published the current value, if any.
    pub fn publisher(&self) -> Option<UnitId> {
        self.slot.as_ref().map(|slot| slot.publisher)
    }

    /// Bumped on every change of the slot.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn publish(&mut self, publisher: UnitId, operation: OperationIdentity) {
        tracing::debug!(unit = publisher.0, op = %operation.tag(), "hover publish");
        self.slot = Some(HoverSlot {
            publisher,
            operation,
        });
        self.generation += 1;
    }

    /// Clear the slot on behalf of `unit`. A unit that has been superseded
    /// by a later publish does not own the slot, so its clear is a no-op.
    pub fn clear(&mut self, unit: UnitId) -> bool {
        if self.publisher() != Some(unit) {
            tracing::debug!(unit = unit.0, "stale hover clear ignored");
            return false;
        }
        tracing::debug!(unit = unit.0, "hover clear");
        self.slot = None;
        self.generation += 1;
        true
    }

    /// Drop whatever is hovered, e.g. when the view is torn down or reloaded.
    pub fn reset(&mut self) {
        if self.slot.take().is_some() {
            self.generation += 1;
        }
    }

    pub fn subscribe(&self) -> HoverSubscription {
        HoverSubscription {
            seen: self.generation,
        }
    }
}

/// Change tracker for one observer of a [`HoverCoordinator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoverSubscription {
    seen: u64,
}

impl HoverSubscription {
    /// Whether the slot changed since the last poll.
    pub fn poll(&mut self, coordinator: &HoverCoordinator) -> bool {
        let changed = self.seen != coordinator.generation();
        self.seen = coordinator.generation();
        changed
    }
}
