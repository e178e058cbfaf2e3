//! Descriptors: the precomputed styling configuration of a component type.

use crate::axis::{CompiledAxis, VariantAxis};
use crate::compound::CompoundRule;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;
use twv_core::{ClassList, ConfigError, EvalError, SlotId, SlotMap, SlotSet, ToVariant, VariantValue};

/// Immutable styling configuration for one component type.
///
/// Inherited slot classes and axes are flattened once at construction;
/// resolution only reads the computed tables, so one descriptor can serve
/// any number of concurrent resolutions.
pub struct Descriptor<I: ?Sized> {
    parent: Option<Arc<Descriptor<I>>>,
    slot_set: Option<&'static SlotSet>,
    computed_slots: IndexMap<SlotId, String>,
    computed_axes: IndexMap<String, CompiledAxis<I>>,
    defaults: IndexMap<String, VariantValue>,
    compound_rules: Vec<Arc<CompoundRule<I>>>,
}

impl<I: ?Sized> Descriptor<I> {
    pub fn builder() -> DescriptorBuilder<I> {
        DescriptorBuilder::new()
    }

    /// A descriptor styling only `Base`.
    pub fn from_base(classes: &str) -> Self {
        Self {
            parent: None,
            slot_set: None,
            computed_slots: ClassList::from(classes)
                .joined()
                .map(|joined| (SlotId::base(), joined))
                .into_iter()
                .collect(),
            computed_axes: IndexMap::new(),
            defaults: IndexMap::new(),
            compound_rules: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<&Arc<Descriptor<I>>> {
        self.parent.as_ref()
    }

    pub fn slot_set(&self) -> Option<&'static SlotSet> {
        self.slot_set
    }

    /// Flattened classes of a slot, ancestors first.
    pub fn slot_classes(&self, slot: &str) -> Option<&str> {
        self.computed_slots.get(slot).map(String::as_str)
    }

    /// Flattened slot classes in slot order.
    pub fn computed_slots(&self) -> impl Iterator<Item = (&SlotId, &str)> {
        self.computed_slots
            .iter()
            .map(|(slot, classes)| (slot, classes.as_str()))
    }

    /// Compiled axes, inherited ones first.
    pub fn axes(&self) -> impl Iterator<Item = &CompiledAxis<I>> {
        self.computed_axes.values()
    }

    pub fn axis(&self, key: &str) -> Option<&CompiledAxis<I>> {
        self.computed_axes.get(key)
    }

    pub fn default_variant(&self, key: &str) -> Option<&VariantValue> {
        self.defaults.get(key)
    }

    /// Compound rules, inherited ones first.
    pub fn compound_rules(&self) -> impl Iterator<Item = &CompoundRule<I>> {
        self.compound_rules.iter().map(Arc::as_ref)
    }
}

impl<I: ?Sized> fmt::Debug for Descriptor<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("has_parent", &self.parent.is_some())
            .field("slot_set", &self.slot_set.map(|set| set.name))
            .field("computed_slots", &self.computed_slots)
            .field("axes", &self.computed_axes.keys().collect::<Vec<_>>())
            .field("defaults", &self.defaults)
            .field("compound_rules", &self.compound_rules.len())
            .finish()
    }
}

/// Builder for [`Descriptor`]. Every field is optional.
pub struct DescriptorBuilder<I: ?Sized> {
    parent: Option<Arc<Descriptor<I>>>,
    slot_set: Option<&'static SlotSet>,
    base: ClassList,
    slots: SlotMap,
    axes: Vec<Result<CompiledAxis<I>, ConfigError>>,
    defaults: Vec<(String, VariantValue)>,
    compound_rules: Vec<CompoundRule<I>>,
}

impl<I: ?Sized> Default for DescriptorBuilder<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: ?Sized> DescriptorBuilder<I> {
    pub fn new() -> Self {
        Self {
            parent: None,
            slot_set: None,
            base: ClassList::new(),
            slots: SlotMap::new(),
            axes: Vec::new(),
            defaults: Vec::new(),
            compound_rules: Vec::new(),
        }
    }

    /// Inherit slot classes, axes, defaults and compound rules.
    pub fn extends(mut self, parent: &Arc<Descriptor<I>>) -> Self {
        self.parent = Some(Arc::clone(parent));
        self
    }

    /// Restrict slot ids to a declared slot set.
    pub fn slot_set(mut self, slot_set: &'static SlotSet) -> Self {
        self.slot_set = Some(slot_set);
        self
    }

    /// Base classes, applied to the `Base` slot.
    pub fn base(mut self, classes: impl AsRef<str>) -> Self {
        self.base.push(classes);
        self
    }

    /// Default classes of one slot.
    pub fn slot(mut self, slot: &str, classes: impl AsRef<str>) -> Self {
        self.slots.push(slot, classes);
        self
    }

    /// Default classes of several slots.
    pub fn slots(mut self, slots: SlotMap) -> Self {
        for (slot, classes) in slots.iter() {
            self.slots.entry(slot.clone()).extend_from(classes);
        }
        self
    }

    /// An axis whose accessor always yields a selection.
    ///
    /// A panic in `accessor` is not caught and escapes resolution. Use
    /// [`try_variant`](Self::try_variant) for lookups that can fail.
    pub fn variant<F, T>(mut self, key: &str, accessor: F, axis: VariantAxis) -> Self
    where
        F: Fn(&I) -> T + Send + Sync + 'static,
        T: ToVariant,
    {
        self.axes.push(CompiledAxis::infallible(key, accessor, axis));
        self
    }

    /// An axis whose selection may be absent.
    pub fn optional_variant<F, T>(mut self, key: &str, accessor: F, axis: VariantAxis) -> Self
    where
        F: Fn(&I) -> Option<T> + Send + Sync + 'static,
        T: ToVariant,
    {
        self.axes.push(CompiledAxis::optional(key, accessor, axis));
        self
    }

    /// An axis whose accessor can fail for a given instance.
    pub fn try_variant<F>(mut self, key: &str, accessor: F, axis: VariantAxis) -> Self
    where
        F: Fn(&I) -> Result<Option<VariantValue>, EvalError> + Send + Sync + 'static,
    {
        self.axes.push(CompiledAxis::new(key, accessor, axis));
        self
    }

    /// Selection used when an axis accessor yields nothing.
    pub fn default_variant(mut self, key: &str, value: impl Into<VariantValue>) -> Self {
        self.defaults.push((key.to_string(), value.into()));
        self
    }

    /// Add a compound rule. Rules are numbered after the inherited ones,
    /// matching [`Descriptor::compound_rules`].
    pub fn compound(mut self, rule: CompoundRule<I>) -> Self {
        self.compound_rules.push(rule);
        self
    }

    /// Validate the configuration and precompute the inherited tables.
    pub fn build(self) -> Result<Descriptor<I>, ConfigError> {
        let slot_set = self
            .slot_set
            .or_else(|| self.parent.as_ref().and_then(|parent| parent.slot_set));

        let mut computed_axes = match &self.parent {
            Some(parent) => parent.computed_axes.clone(),
            None => IndexMap::new(),
        };
        for axis in self.axes {
            let axis = axis?;
            for slot in axis.axis().values().flat_map(|(_, fragment)| fragment.slots()) {
                check_slot(slot.as_str(), slot_set)?;
            }
            if computed_axes.contains_key(axis.key()) {
                tracing::trace!(axis = axis.key(), "axis shadows an earlier registration");
            }
            computed_axes.insert(axis.key().to_string(), axis);
        }

        let mut defaults = match &self.parent {
            Some(parent) => parent.defaults.clone(),
            None => IndexMap::new(),
        };
        for (key, value) in self.defaults {
            if !computed_axes.contains_key(&key) {
                return Err(ConfigError::UnknownAxis {
                    key,
                    context: "default variant".to_string(),
                });
            }
            defaults.insert(key, value);
        }

        let mut compound_rules = match &self.parent {
            Some(parent) => parent.compound_rules.clone(),
            None => Vec::new(),
        };
        let inherited = compound_rules.len();
        for (index, rule) in self.compound_rules.into_iter().enumerate() {
            if let Some(key) = rule.required_axes().find(|key| !computed_axes.contains_key(*key)) {
                return Err(ConfigError::UnknownAxis {
                    key: key.to_string(),
                    context: format!("compound rule #{}", inherited + index),
                });
            }
            for slot in rule.fragment_slots() {
                check_slot(slot, slot_set)?;
            }
            compound_rules.push(Arc::new(rule));
        }

        let computed_slots = compute_slots(self.parent.as_deref(), self.base, self.slots, slot_set)?;

        tracing::debug!(
            slots = computed_slots.len(),
            axes = computed_axes.len(),
            compound_rules = compound_rules.len(),
            inherited = self.parent.is_some(),
            "built descriptor"
        );

        Ok(Descriptor {
            parent: self.parent,
            slot_set,
            computed_slots,
            computed_axes,
            defaults,
            compound_rules,
        })
    }
}

/// Flatten own and inherited slot classes. Ancestor classes are prepended
/// so that a descendant's later class wins under last-write-wins merging.
fn compute_slots<I: ?Sized>(
    parent: Option<&Descriptor<I>>,
    base: ClassList,
    slots: SlotMap,
    slot_set: Option<&'static SlotSet>,
) -> Result<IndexMap<SlotId, String>, ConfigError> {
    let mut local: IndexMap<SlotId, ClassList> = IndexMap::new();
    if !base.is_empty() {
        local.insert(SlotId::base(), base);
    }
    for (slot, classes) in slots.iter() {
        check_slot(slot.as_str(), slot_set)?;
        local.entry(slot.clone()).or_default().extend_from(classes);
    }

    if let Some(parent) = parent {
        for (slot, classes) in &parent.computed_slots {
            local.entry(slot.clone()).or_default().prepend(classes);
        }
    }

    Ok(local
        .into_iter()
        .filter_map(|(slot, classes)| classes.joined().map(|joined| (slot, joined)))
        .collect())
}

fn check_slot(slot: &str, slot_set: Option<&SlotSet>) -> Result<(), ConfigError> {
    if !SlotId::from(slot).is_valid() {
        return Err(ConfigError::InvalidSlotId {
            slot: slot.to_string(),
        });
    }
    match slot_set {
        Some(set) if !set.contains(slot) => Err(ConfigError::UnknownSlot {
            slot: slot.to_string(),
            slot_set: set.name.to_string(),
        }),
        _ => Ok(()),
    }
}
