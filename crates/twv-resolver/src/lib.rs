//! Descriptors and per-instance resolution of slot class variants.
//!
//! A [`Descriptor`] is built once per component type from base classes,
//! per-slot classes, variant axes and compound rules, optionally extending
//! a parent descriptor. A [`Resolver`] evaluates it against one component
//! instance and produces the merged class string of every slot.

mod axis;
mod compound;
mod descriptor;
mod diagnostics;
mod instance;
mod resolver;

pub use axis::{CompiledAxis, VariantAxis};
pub use compound::CompoundRule;
pub use descriptor::{Descriptor, DescriptorBuilder};
pub use diagnostics::{Diagnostic, DiagnosticSource};
pub use instance::{SlotOverrides, Styled};
pub use resolver::{Resolution, ResolveOptions, Resolver, Selections, SlotClasses};

pub use twv_core::{
    ClassList, ConfigError, EvalError, Merger, SlotId, SlotMap, SlotSet, ToVariant, VariantValue,
    BASE_SLOT,
};
