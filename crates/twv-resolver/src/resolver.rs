//! Per-instance resolution.
//!
//! Resolution runs a fixed pipeline, each layer appending after the
//! previous one so later, more specific layers win the final merge:
//! 1. Seed every slot with the descriptor's flattened classes
//! 2. Apply variant axes (call-time axes first, then descriptor axes)
//! 3. Apply matching compound rules
//! 4. Apply the instance's slot overrides, then call-time overrides
//! 5. Merge every slot

use crate::axis::{CompiledAxis, VariantAxis};
use crate::descriptor::Descriptor;
use crate::diagnostics::Diagnostic;
use crate::instance::{SlotOverrides, Styled};
use indexmap::IndexMap;
use twv_core::{ConfigError, EvalError, Merger, SlotId, SlotMap, ToVariant, VariantValue};
use twv_merge::TailwindMerger;

/// Effective axis selections of one resolution, keyed by axis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selections {
    values: IndexMap<String, VariantValue>,
}

impl Selections {
    pub fn get(&self, key: &str) -> Option<&VariantValue> {
        self.values.get(key)
    }

    pub fn insert(&mut self, key: &str, value: VariantValue) {
        self.values.insert(key.to_string(), value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &VariantValue)> {
        self.values.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Final class string per slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotClasses {
    slots: IndexMap<SlotId, Option<String>>,
}

impl SlotClasses {
    /// Classes of a slot. Unstyled and unknown slots give `None`.
    pub fn get(&self, slot: &str) -> Option<&str> {
        self.slots.get(slot).and_then(Option::as_deref)
    }

    pub fn base(&self) -> Option<&str> {
        self.get(twv_core::BASE_SLOT)
    }

    /// Styled slots in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (&SlotId, &str)> {
        self.slots
            .iter()
            .filter_map(|(slot, classes)| classes.as_deref().map(|classes| (slot, classes)))
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

/// Output of one resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub slots: SlotClasses,
    pub selections: Selections,
    /// Accessor and predicate failures that were skipped.
    pub diagnostics: Vec<Diagnostic>,
}

impl Resolution {
    pub fn get(&self, slot: &str) -> Option<&str> {
        self.slots.get(slot)
    }

    pub fn base(&self) -> Option<&str> {
        self.slots.base()
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Per-call additions: extra axes and overrides.
pub struct ResolveOptions<I: ?Sized> {
    axes: IndexMap<String, CompiledAxis<I>>,
    overrides: SlotOverrides,
}

impl<I: ?Sized> Default for ResolveOptions<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: ?Sized> ResolveOptions<I> {
    pub fn new() -> Self {
        Self {
            axes: IndexMap::new(),
            overrides: SlotOverrides::new(),
        }
    }

    /// Add an axis that shadows any descriptor axis with the same key.
    pub fn axis(mut self, axis: CompiledAxis<I>) -> Self {
        self.axes.insert(axis.key().to_string(), axis);
        self
    }

    /// Compile and add an infallible call-time axis.
    pub fn variant<F, T>(self, key: &str, accessor: F, axis: VariantAxis) -> Result<Self, ConfigError>
    where
        F: Fn(&I) -> T + Send + Sync + 'static,
        T: ToVariant,
    {
        Ok(self.axis(CompiledAxis::infallible(key, accessor, axis)?))
    }

    /// Overrides applied after the instance's own.
    pub fn overrides(mut self, overrides: SlotOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    fn shadows(&self, key: &str) -> bool {
        self.axes.contains_key(key)
    }
}

/// Resolves descriptors against instances, merging each slot with `M`.
#[derive(Debug, Clone, Default)]
pub struct Resolver<M = TailwindMerger> {
    merger: M,
}

impl Resolver<TailwindMerger> {
    /// A resolver using the built-in conflict table.
    pub fn tailwind() -> Self {
        Self::default()
    }
}

impl<M: Merger> Resolver<M> {
    pub fn new(merger: M) -> Self {
        Self { merger }
    }

    pub fn merger(&self) -> &M {
        &self.merger
    }

    /// Resolve every slot of `descriptor` for `instance`.
    pub fn invoke<I>(&self, descriptor: &Descriptor<I>, instance: &I) -> Resolution
    where
        I: Styled + ?Sized,
    {
        self.invoke_with(descriptor, instance, &ResolveOptions::new())
    }

    /// Resolve with call-time axes and overrides.
    pub fn invoke_with<I>(
        &self,
        descriptor: &Descriptor<I>,
        instance: &I,
        options: &ResolveOptions<I>,
    ) -> Resolution
    where
        I: Styled + ?Sized,
    {
        let mut pass = Pass::default();

        for (slot, classes) in descriptor.computed_slots() {
            pass.accumulators.push(slot.clone(), classes);
        }

        for axis in options.axes.values() {
            pass.apply_axis(axis, descriptor.default_variant(axis.key()), instance);
        }
        for axis in descriptor.axes() {
            if options.shadows(axis.key()) {
                tracing::trace!(axis = axis.key(), "axis shadowed by call-time axis");
                continue;
            }
            pass.apply_axis(axis, descriptor.default_variant(axis.key()), instance);
        }

        for (index, rule) in descriptor.compound_rules().enumerate() {
            match rule.matches(instance, &pass.selections) {
                Ok(true) => rule.contribute(&mut pass.accumulators),
                Ok(false) => {}
                Err(error) => {
                    tracing::warn!(
                        rule = index,
                        label = rule.label_str(),
                        %error,
                        "compound rule evaluation failed"
                    );
                    pass.diagnostics
                        .push(Diagnostic::compound_rule(index, rule.label_str(), error));
                }
            }
        }

        if let Some(overrides) = instance.slot_overrides() {
            pass.apply_overrides(overrides);
        }
        pass.apply_overrides(&options.overrides);

        let slots = pass
            .accumulators
            .iter()
            .map(|(slot, classes)| {
                let merged = classes
                    .joined()
                    .and_then(|joined| self.merger.merge(&joined))
                    .filter(|merged| !merged.trim().is_empty());
                (slot.clone(), merged)
            })
            .collect();

        Resolution {
            slots: SlotClasses { slots },
            selections: pass.selections,
            diagnostics: pass.diagnostics,
        }
    }
}

/// Call-local state of one resolution.
#[derive(Default)]
struct Pass {
    accumulators: SlotMap,
    selections: Selections,
    diagnostics: Vec<Diagnostic>,
}

impl Pass {
    fn apply_axis<I: ?Sized>(
        &mut self,
        axis: &CompiledAxis<I>,
        default: Option<&VariantValue>,
        instance: &I,
    ) {
        let selected = match axis.select(instance) {
            Ok(selected) => selected.or_else(|| default.cloned()),
            Err(error) => {
                self.report_axis(axis.key(), error);
                return;
            }
        };
        let Some(selected) = selected else {
            return;
        };

        if let Some(fragment) = axis.axis().try_resolve(Some(&selected)) {
            for (slot, classes) in fragment.iter() {
                self.accumulators.entry(slot.clone()).extend_from(classes);
            }
        }
        self.selections.insert(axis.key(), selected);
    }

    fn report_axis(&mut self, key: &str, error: EvalError) {
        tracing::warn!(axis = key, %error, "variant axis evaluation failed");
        self.diagnostics.push(Diagnostic::axis(key, error));
    }

    fn apply_overrides(&mut self, overrides: &SlotOverrides) {
        for (slot, classes) in overrides.iter() {
            self.accumulators.push(slot.clone(), classes);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compound::CompoundRule;
    use std::sync::Arc;
    use twv_core::{JoinMerger, BASE_SLOT};

    #[derive(Default)]
    struct Button {
        size: &'static str,
        color: Option<&'static str>,
        disabled: bool,
        overrides: Option<SlotOverrides>,
    }

    impl Styled for Button {
        fn slot_overrides(&self) -> Option<&SlotOverrides> {
            self.overrides.as_ref()
        }
    }

    fn button() -> Descriptor<Button> {
        Descriptor::builder()
            .base("inline-flex p-4")
            .slot("Icon", "w-4")
            .variant(
                "size",
                |b: &Button| b.size,
                VariantAxis::new()
                    .value("sm", "text-sm")
                    .value("lg", SlotMap::from("text-lg").with("Icon", "w-6")),
            )
            .optional_variant(
                "color",
                |b: &Button| b.color,
                VariantAxis::new()
                    .value("primary", "bg-blue-500")
                    .value("danger", "bg-red-500"),
            )
            .variant("disabled", |b: &Button| b.disabled, VariantAxis::new())
            .compound(
                CompoundRule::when(|b: &Button| b.size == "lg" && b.disabled)
                    .class("opacity-50 cursor-not-allowed"),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_empty_descriptor_base_is_none() {
        let descriptor = Descriptor::<Button>::builder().build().unwrap();
        let resolution = Resolver::tailwind().invoke(&descriptor, &Button::default());
        assert_eq!(resolution.base(), None);
        assert!(resolution.slots.is_empty());
    }

    #[test]
    fn test_blank_base_is_none() {
        let resolver = Resolver::tailwind();
        for base in ["", "   "] {
            let descriptor = Descriptor::<Button>::builder().base(base).build().unwrap();
            assert_eq!(resolver.invoke(&descriptor, &Button::default()).base(), None);
        }
    }

    #[test]
    fn test_axes_combine() {
        let descriptor = button();
        let instance = Button {
            size: "sm",
            color: Some("primary"),
            ..Button::default()
        };
        let resolution = Resolver::tailwind().invoke(&descriptor, &instance);
        assert_eq!(resolution.base(), Some("inline-flex p-4 text-sm bg-blue-500"));
        assert_eq!(resolution.get("Icon"), Some("w-4"));
        assert!(resolution.is_clean());
    }

    #[test]
    fn test_axis_fragment_targets_slots() {
        let descriptor = button();
        let instance = Button {
            size: "lg",
            ..Button::default()
        };
        let resolution = Resolver::tailwind().invoke(&descriptor, &instance);
        assert_eq!(resolution.get("Icon"), Some("w-6"));
        assert_eq!(resolution.base(), Some("inline-flex p-4 text-lg"));
    }

    #[test]
    fn test_unmapped_value_contributes_nothing() {
        let descriptor = button();
        let instance = Button {
            size: "xxl",
            color: Some("chartreuse"),
            ..Button::default()
        };
        let resolution = Resolver::tailwind().invoke(&descriptor, &instance);
        assert_eq!(resolution.base(), Some("inline-flex p-4"));
        assert!(resolution.is_clean());
        // The selection is still recorded for compound rules.
        assert_eq!(resolution.selections.get("size"), Some(&VariantValue::from("xxl")));
    }

    #[test]
    fn test_compound_rule_gating() {
        let descriptor = button();
        let resolver = Resolver::tailwind();
        let cases = [("lg", true, true), ("lg", false, false), ("sm", true, false)];
        for (size, disabled, expected) in cases {
            let instance = Button {
                size,
                disabled,
                ..Button::default()
            };
            let base = resolver.invoke(&descriptor, &instance).base().unwrap().to_string();
            assert_eq!(base.contains("opacity-50"), expected, "{size} {disabled}");
            assert_eq!(base.contains("cursor-not-allowed"), expected, "{size} {disabled}");
        }
    }

    #[test]
    fn test_failing_predicate_is_skipped() {
        let descriptor = Descriptor::<Button>::builder()
            .base("p-4")
            .compound(CompoundRule::try_when(|_: &Button| Err(EvalError::custom("boom"))).class("hidden"))
            .compound(CompoundRule::always().class("rounded"))
            .build()
            .unwrap();
        let resolution = Resolver::tailwind().invoke(&descriptor, &Button::default());
        assert_eq!(resolution.base(), Some("p-4 rounded"));
        assert_eq!(resolution.diagnostics.len(), 1);
        assert_eq!(
            resolution.diagnostics[0],
            Diagnostic::compound_rule(0, None, EvalError::custom("boom"))
        );
    }

    #[test]
    fn test_failing_accessor_is_skipped() {
        let descriptor = Descriptor::<Button>::builder()
            .base("p-4")
            .try_variant(
                "broken",
                |_: &Button| {
                    Err(EvalError::MissingProperty {
                        property: "broken".into(),
                    })
                },
                VariantAxis::new().value(true, "hidden"),
            )
            .variant("size", |b: &Button| b.size, VariantAxis::new().value("sm", "text-sm"))
            .slot("Icon", "w-4")
            .build()
            .unwrap();
        let instance = Button {
            size: "sm",
            ..Button::default()
        };
        let resolution = Resolver::tailwind().invoke(&descriptor, &instance);
        assert_eq!(resolution.base(), Some("p-4 text-sm"));
        assert_eq!(resolution.get("Icon"), Some("w-4"));
        assert!(matches!(
            &resolution.diagnostics[..],
            [Diagnostic { error: EvalError::MissingProperty { .. }, .. }]
        ));
        assert!(resolution.selections.get("broken").is_none());
    }

    #[test]
    fn test_instance_override_wins() {
        let descriptor = Descriptor::<Button>::builder()
            .base("p-4 bg-red-500")
            .build()
            .unwrap();
        let instance = Button {
            overrides: Some(SlotOverrides::new().with(BASE_SLOT, "p-8 bg-blue-500")),
            ..Button::default()
        };
        let base = Resolver::tailwind()
            .invoke(&descriptor, &instance)
            .base()
            .unwrap()
            .to_string();
        let tokens: Vec<_> = base.split(' ').collect();
        assert!(tokens.contains(&"p-8") && tokens.contains(&"bg-blue-500"));
        assert!(!tokens.contains(&"p-4") && !tokens.contains(&"bg-red-500"));
    }

    #[test]
    fn test_override_creates_slot() {
        let descriptor = Descriptor::<Button>::builder().base("p-4").build().unwrap();
        let instance = Button {
            overrides: Some(SlotOverrides::new().with("Label", "font-bold")),
            ..Button::default()
        };
        let resolution = Resolver::tailwind().invoke(&descriptor, &instance);
        assert_eq!(resolution.get("Label"), Some("font-bold"));
        assert_eq!(resolution.get("Unknown"), None);
    }

    #[test]
    fn test_default_variant_applies_when_unselected() {
        let descriptor = Descriptor::<Button>::builder()
            .optional_variant(
                "color",
                |b: &Button| b.color,
                VariantAxis::new().value("neutral", "bg-gray-100").value("primary", "bg-blue-500"),
            )
            .default_variant("color", "neutral")
            .compound(CompoundRule::selected("color", "neutral").class("text-gray-900"))
            .build()
            .unwrap();
        let resolver = Resolver::tailwind();

        let unselected = resolver.invoke(&descriptor, &Button::default());
        assert_eq!(unselected.base(), Some("bg-gray-100 text-gray-900"));

        let primary = Button {
            color: Some("primary"),
            ..Button::default()
        };
        assert_eq!(resolver.invoke(&descriptor, &primary).base(), Some("bg-blue-500"));
    }

    #[test]
    fn test_call_time_axis_shadows_descriptor_axis() {
        let descriptor = button();
        let options = ResolveOptions::new()
            .variant(
                "size",
                |b: &Button| b.size,
                VariantAxis::new().value("sm", "text-xs"),
            )
            .unwrap()
            .overrides(SlotOverrides::new().with("Icon", "w-3"));
        let instance = Button {
            size: "sm",
            ..Button::default()
        };
        let resolution = Resolver::tailwind().invoke_with(&descriptor, &instance, &options);
        assert_eq!(resolution.base(), Some("inline-flex p-4 text-xs"));
        assert_eq!(resolution.get("Icon"), Some("w-3"));
    }

    #[test]
    fn test_call_time_override_follows_instance_override() {
        let descriptor = Descriptor::<Button>::builder().base("p-4").build().unwrap();
        let instance = Button {
            overrides: Some(SlotOverrides::new().with(BASE_SLOT, "p-2")),
            ..Button::default()
        };
        let options = ResolveOptions::new().overrides(SlotOverrides::new().with(BASE_SLOT, "p-6"));

        let merged = Resolver::tailwind().invoke_with(&descriptor, &instance, &options);
        assert_eq!(merged.base(), Some("p-6"));

        let joined = Resolver::new(JoinMerger).invoke_with(&descriptor, &instance, &options);
        assert_eq!(joined.base(), Some("p-4 p-2 p-6"));
    }

    #[test]
    fn test_call_time_axes_apply_before_descriptor_axes() {
        let descriptor = Descriptor::<Button>::builder()
            .variant("size", |b: &Button| b.size, VariantAxis::new().value("sm", "p-4"))
            .build()
            .unwrap();
        let options = ResolveOptions::new()
            .variant("tone", |_: &Button| true, VariantAxis::new().value(true, "p-2"))
            .unwrap();
        let instance = Button {
            size: "sm",
            ..Button::default()
        };

        let merged = Resolver::tailwind().invoke_with(&descriptor, &instance, &options);
        assert_eq!(merged.base(), Some("p-4"));
        assert_eq!(merged.selections.get("tone"), Some(&VariantValue::Bool(true)));

        let joined = Resolver::new(JoinMerger).invoke_with(&descriptor, &instance, &options);
        assert_eq!(joined.base(), Some("p-2 p-4"));
    }

    #[test]
    fn test_inheritance_order_survives_merge() {
        let parent = Arc::new(
            Descriptor::<Button>::builder()
                .base("p-1 bg-red-500")
                .build()
                .unwrap(),
        );
        let child = Descriptor::builder()
            .extends(&parent)
            .base("text-sm bg-blue-500")
            .build()
            .unwrap();
        let base = Resolver::tailwind()
            .invoke(&child, &Button::default())
            .base()
            .unwrap()
            .to_string();
        assert_eq!(base, "p-1 text-sm bg-blue-500");
        let p1 = base.find("p-1").unwrap();
        let text_sm = base.find("text-sm").unwrap();
        assert!(p1 < text_sm);
    }

    #[test]
    fn test_inherited_axis_applies_to_child() {
        let parent = Arc::new(button());
        let child = Descriptor::builder()
            .extends(&parent)
            .base("shadow")
            .build()
            .unwrap();
        let instance = Button {
            size: "lg",
            disabled: true,
            ..Button::default()
        };
        let resolution = Resolver::tailwind().invoke(&child, &instance);
        assert_eq!(
            resolution.base(),
            Some("inline-flex p-4 shadow text-lg opacity-50 cursor-not-allowed")
        );
    }

    #[test]
    fn test_custom_merger() {
        let descriptor = Descriptor::<Button>::builder()
            .base("p-4")
            .build()
            .unwrap();
        let instance = Button {
            overrides: Some(SlotOverrides::new().with(BASE_SLOT, "p-8")),
            ..Button::default()
        };
        let resolution = Resolver::new(JoinMerger).invoke(&descriptor, &instance);
        assert_eq!(resolution.base(), Some("p-4 p-8"));
    }

    #[test]
    fn test_merger_returning_blank_is_none() {
        struct Blank;
        impl Merger for Blank {
            fn merge(&self, _: &str) -> Option<String> {
                Some(String::new())
            }
        }
        let descriptor = Descriptor::<Button>::builder().base("p-4").build().unwrap();
        let resolution = Resolver::new(Blank).invoke(&descriptor, &Button::default());
        assert_eq!(resolution.base(), None);
    }
}
