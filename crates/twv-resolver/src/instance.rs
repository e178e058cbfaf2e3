//! The component instance boundary.

use indexmap::IndexMap;
use twv_core::SlotId;

/// Per-render data of a component.
///
/// Accessors and predicates read the instance's own fields; the only thing
/// the resolver asks of it directly is its explicit per-slot classes.
pub trait Styled {
    /// Caller-supplied classes per slot, applied after everything else.
    fn slot_overrides(&self) -> Option<&SlotOverrides> {
        None
    }
}

/// A sparse mapping from slot to extra classes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotOverrides {
    slots: IndexMap<SlotId, String>,
}

impl SlotOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style `set`.
    pub fn with(mut self, slot: impl Into<SlotId>, classes: impl Into<String>) -> Self {
        self.set(slot, classes);
        self
    }

    /// Set the classes of a slot, replacing any previous value.
    pub fn set(&mut self, slot: impl Into<SlotId>, classes: impl Into<String>) {
        self.slots.insert(slot.into(), classes.into());
    }

    /// Get the classes of a slot.
    pub fn get(&self, slot: &str) -> Option<&str> {
        self.slots.get(slot).map(String::as_str)
    }

    /// Entries with non-blank classes, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&SlotId, &str)> {
        self.slots
            .iter()
            .filter(|(_, classes)| !classes.trim().is_empty())
            .map(|(slot, classes)| (slot, classes.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

impl Styled for SlotOverrides {
    fn slot_overrides(&self) -> Option<&SlotOverrides> {
        Some(self)
    }
}
