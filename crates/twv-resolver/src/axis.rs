//! Variant axes and their compiled accessors.

use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;
use twv_core::{ConfigError, EvalError, SlotMap, ToVariant, VariantValue};

/// Reads the current selection of one axis from an instance.
pub(crate) type AccessorFn<I> =
    dyn Fn(&I) -> Result<Option<VariantValue>, EvalError> + Send + Sync;

/// One styling dimension: each value selects a per-slot class fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantAxis {
    values: IndexMap<VariantValue, SlotMap>,
}

impl VariantAxis {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `value` to a fragment. A bare class string styles `Base`.
    /// Mapping the same value again replaces the earlier fragment.
    pub fn value(mut self, value: impl Into<VariantValue>, classes: impl Into<SlotMap>) -> Self {
        self.values.insert(value.into(), classes.into());
        self
    }

    /// Like [`value`](Self::value) for any [`ToVariant`] type.
    pub fn when(self, value: impl ToVariant, classes: impl Into<SlotMap>) -> Self {
        let value = value.to_variant();
        self.value(value, classes)
    }

    /// The fragment for a selection. Absent or unmapped selections give
    /// `None`.
    pub fn try_resolve(&self, selected: Option<&VariantValue>) -> Option<&SlotMap> {
        selected.and_then(|value| self.values.get(value))
    }

    pub fn values(&self) -> impl Iterator<Item = (&VariantValue, &SlotMap)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// An axis bound to the accessor that selects its value.
///
/// The key identifies the axis: two axes with the same key are the same
/// axis, and the later one shadows the earlier.
pub struct CompiledAxis<I: ?Sized> {
    key: String,
    accessor: Arc<AccessorFn<I>>,
    axis: Arc<VariantAxis>,
}

impl<I: ?Sized> CompiledAxis<I> {
    /// Compile a fallible accessor.
    pub fn new<F>(key: &str, accessor: F, axis: VariantAxis) -> Result<Self, ConfigError>
    where
        F: Fn(&I) -> Result<Option<VariantValue>, EvalError> + Send + Sync + 'static,
    {
        ConfigError::check_axis_key(key)?;
        Ok(Self {
            key: key.to_string(),
            accessor: Arc::new(accessor),
            axis: Arc::new(axis),
        })
    }

    /// Compile an accessor that always yields a selection.
    pub fn infallible<F, T>(key: &str, accessor: F, axis: VariantAxis) -> Result<Self, ConfigError>
    where
        F: Fn(&I) -> T + Send + Sync + 'static,
        T: ToVariant,
    {
        Self::new(
            key,
            move |instance: &I| Ok(Some(accessor(instance).to_variant())),
            axis,
        )
    }

    /// Compile an accessor whose selection may be absent.
    pub fn optional<F, T>(key: &str, accessor: F, axis: VariantAxis) -> Result<Self, ConfigError>
    where
        F: Fn(&I) -> Option<T> + Send + Sync + 'static,
        T: ToVariant,
    {
        Self::new(
            key,
            move |instance: &I| Ok(accessor(instance).map(|value| value.to_variant())),
            axis,
        )
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn axis(&self) -> &VariantAxis {
        &self.axis
    }

    /// Evaluate the accessor.
    pub fn select(&self, instance: &I) -> Result<Option<VariantValue>, EvalError> {
        (self.accessor)(instance)
    }
}

impl<I: ?Sized> Clone for CompiledAxis<I> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            accessor: Arc::clone(&self.accessor),
            axis: Arc::clone(&self.axis),
        }
    }
}

impl<I: ?Sized> fmt::Debug for CompiledAxis<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledAxis")
            .field("key", &self.key)
            .field("axis", &self.axis)
            .finish_non_exhaustive()
    }
}
