//! Variant values.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A discrete value selected on a variant axis.
///
/// Equality is by kind and value. Enumerants also compare their declaring
/// type, so two enums sharing a variant name never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VariantValue {
    Bool(bool),
    Int(i64),
    Str(String),
    Enum(Enumerant),
}

/// A named constant of a specific enum type.
#[derive(Clone, Copy)]
pub struct Enumerant {
    type_id: TypeId,
    type_name: &'static str,
    name: &'static str,
}

impl Enumerant {
    pub fn of<E: 'static>(name: &'static str) -> Self {
        Self {
            type_id: TypeId::of::<E>(),
            type_name: std::any::type_name::<E>(),
            name,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl PartialEq for Enumerant {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id && self.name == other.name
    }
}

impl Eq for Enumerant {}

impl Hash for Enumerant {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
        self.name.hash(state);
    }
}

impl fmt::Debug for Enumerant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.type_name, self.name)
    }
}

impl VariantValue {
    /// An enumerant of type `E`.
    pub fn enumerant<E: 'static>(name: &'static str) -> Self {
        VariantValue::Enum(Enumerant::of::<E>(name))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            VariantValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            VariantValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for VariantValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariantValue::Bool(b) => write!(f, "{b}"),
            VariantValue::Int(n) => write!(f, "{n}"),
            VariantValue::Str(s) => f.write_str(s),
            VariantValue::Enum(e) => f.write_str(e.name),
        }
    }
}

impl From<bool> for VariantValue {
    fn from(b: bool) -> Self {
        VariantValue::Bool(b)
    }
}

impl From<i64> for VariantValue {
    fn from(n: i64) -> Self {
        VariantValue::Int(n)
    }
}

impl From<&str> for VariantValue {
    fn from(s: &str) -> Self {
        VariantValue::Str(s.to_string())
    }
}

impl From<String> for VariantValue {
    fn from(s: String) -> Self {
        VariantValue::Str(s)
    }
}

impl From<Enumerant> for VariantValue {
    fn from(e: Enumerant) -> Self {
        VariantValue::Enum(e)
    }
}

/// Conversion for component property types used as variant selections.
///
/// Implement this for an enum to make it usable as an axis value:
///
/// ```
/// use twv_core::{ToVariant, VariantValue};
///
/// #[derive(Clone, Copy)]
/// enum Size { Sm, Lg }
///
/// impl ToVariant for Size {
///     fn to_variant(&self) -> VariantValue {
///         match self {
///             Size::Sm => VariantValue::enumerant::<Size>("Sm"),
///             Size::Lg => VariantValue::enumerant::<Size>("Lg"),
///         }
///     }
/// }
///
/// assert_eq!(Size::Lg.to_variant(), Size::Lg.to_variant());
/// assert_ne!(Size::Sm.to_variant(), Size::Lg.to_variant());
/// ```
pub trait ToVariant {
    fn to_variant(&self) -> VariantValue;
}

impl ToVariant for VariantValue {
    fn to_variant(&self) -> VariantValue {
        self.clone()
    }
}

impl ToVariant for bool {
    fn to_variant(&self) -> VariantValue {
        VariantValue::Bool(*self)
    }
}

impl ToVariant for i64 {
    fn to_variant(&self) -> VariantValue {
        VariantValue::Int(*self)
    }
}

impl ToVariant for str {
    fn to_variant(&self) -> VariantValue {
        VariantValue::Str(self.to_string())
    }
}

impl ToVariant for String {
    fn to_variant(&self) -> VariantValue {
        VariantValue::Str(self.clone())
    }
}

impl<T: ToVariant + ?Sized> ToVariant for &T {
    fn to_variant(&self) -> VariantValue {
        (**self).to_variant()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    enum Size {}
    enum Tone {}

    #[test]
    fn test_enumerant_equality_by_type_and_name() {
        let a = VariantValue::enumerant::<Size>("Lg");
        let b = VariantValue::enumerant::<Size>("Lg");
        let other_type = VariantValue::enumerant::<Tone>("Lg");
        assert_eq!(a, b);
        assert_ne!(a, other_type);
    }

    #[test]
    fn test_kinds_do_not_collide() {
        assert_ne!(VariantValue::from(true), VariantValue::from("true"));
        assert_ne!(VariantValue::from(1i64), VariantValue::from("1"));
    }

    #[test]
    fn test_hash_consistent_with_eq() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(VariantValue::enumerant::<Size>("Sm"));
        assert!(set.contains(&VariantValue::enumerant::<Size>("Sm")));
        assert!(!set.contains(&VariantValue::enumerant::<Tone>("Sm")));
    }

    #[test]
    fn test_display() {
        assert_eq!(VariantValue::enumerant::<Size>("Md").to_string(), "Md");
        assert_eq!(VariantValue::from(false).to_string(), "false");
    }
}
