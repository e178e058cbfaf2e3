//! Compound rules: classes applied only when a combination holds.

use crate::resolver::Selections;
use std::fmt;
use std::sync::Arc;
use twv_core::{EvalError, SlotMap, VariantValue, BASE_SLOT};

type PredicateFn<I> = dyn Fn(&I) -> Result<bool, EvalError> + Send + Sync;

/// Extra classes gated on axis selections and/or a predicate over the
/// instance.
///
/// A rule matches when every required selection equals the instance's
/// effective selection on that axis and the predicate, if any, holds. A
/// rule with no conditions always matches.
pub struct CompoundRule<I: ?Sized> {
    selections: Vec<(String, VariantValue)>,
    predicate: Option<Arc<PredicateFn<I>>>,
    classes: Option<String>,
    slots: Option<SlotMap>,
    label: Option<String>,
}

impl<I: ?Sized> CompoundRule<I> {
    /// A rule with no conditions.
    pub fn always() -> Self {
        Self {
            selections: Vec::new(),
            predicate: None,
            classes: None,
            slots: None,
            label: None,
        }
    }

    /// A rule gated on an infallible predicate.
    ///
    /// A panic in `predicate` is not caught and escapes resolution. Use
    /// [`try_when`](Self::try_when) for checks that can fail.
    pub fn when<F>(predicate: F) -> Self
    where
        F: Fn(&I) -> bool + Send + Sync + 'static,
    {
        Self::try_when(move |instance: &I| Ok(predicate(instance)))
    }

    /// A rule gated on a fallible predicate. An error counts as no match.
    pub fn try_when<F>(predicate: F) -> Self
    where
        F: Fn(&I) -> Result<bool, EvalError> + Send + Sync + 'static,
    {
        let mut rule = Self::always();
        rule.predicate = Some(Arc::new(predicate));
        rule
    }

    /// A rule gated on the selection of one axis.
    pub fn selected(key: &str, value: impl Into<VariantValue>) -> Self {
        Self::always().and_selected(key, value)
    }

    /// Also require `key` to be selected as `value`.
    pub fn and_selected(mut self, key: &str, value: impl Into<VariantValue>) -> Self {
        self.selections.push((key.to_string(), value.into()));
        self
    }

    /// Classes added to `Base` when the rule matches.
    pub fn class(mut self, classes: impl Into<String>) -> Self {
        self.classes = Some(classes.into());
        self
    }

    /// Classes added to `slot` when the rule matches.
    pub fn slot(mut self, slot: &str, classes: impl AsRef<str>) -> Self {
        self.slots.get_or_insert_with(SlotMap::new).push(slot, classes);
        self
    }

    /// Per-slot classes added when the rule matches.
    pub fn slots(mut self, slots: SlotMap) -> Self {
        self.slots = Some(slots);
        self
    }

    /// Name used in diagnostics.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn label_str(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub(crate) fn required_axes(&self) -> impl Iterator<Item = &str> {
        self.selections.iter().map(|(key, _)| key.as_str())
    }

    pub(crate) fn fragment_slots(&self) -> impl Iterator<Item = &str> {
        self.slots
            .iter()
            .flat_map(|slots| slots.slots().map(|slot| slot.as_str()))
    }

    /// Evaluate the rule. Selections are checked before the predicate runs.
    pub fn matches(&self, instance: &I, selections: &Selections) -> Result<bool, EvalError> {
        let selected = self
            .selections
            .iter()
            .all(|(key, value)| selections.get(key) == Some(value));
        if !selected {
            return Ok(false);
        }
        match &self.predicate {
            Some(predicate) => predicate(instance),
            None => Ok(true),
        }
    }

    /// Append the rule's classes onto per-slot accumulators.
    pub(crate) fn contribute(&self, accumulators: &mut SlotMap) {
        if let Some(classes) = self.classes.as_deref().filter(|c| !c.trim().is_empty()) {
            accumulators.push(BASE_SLOT, classes);
        }
        if let Some(slots) = &self.slots {
            for (slot, classes) in slots.iter() {
                accumulators.entry(slot.clone()).extend_from(classes);
            }
        }
    }
}

impl<I: ?Sized> fmt::Debug for CompoundRule<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompoundRule")
            .field("label", &self.label)
            .field("selections", &self.selections)
            .field("predicate", &self.predicate.is_some())
            .field("classes", &self.classes)
            .field("slots", &self.slots)
            .finish()
    }
}
