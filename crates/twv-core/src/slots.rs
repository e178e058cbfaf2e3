//! Slot identifiers, slot maps and slot sets.

use crate::class_list::ClassList;
use indexmap::IndexMap;
use std::borrow::Borrow;
use std::fmt;

/// Identifier of the root slot every component has.
pub const BASE_SLOT: &str = "Base";

/// A slot identifier (case-sensitive).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlotId(pub String);

impl SlotId {
    /// The `Base` slot.
    pub fn base() -> Self {
        SlotId(BASE_SLOT.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_base(&self) -> bool {
        self.0 == BASE_SLOT
    }

    /// A slot id is valid when it is non-empty and has no whitespace.
    pub fn is_valid(&self) -> bool {
        !self.0.is_empty() && !self.0.chars().any(char::is_whitespace)
    }
}

impl From<&str> for SlotId {
    fn from(s: &str) -> Self {
        SlotId(s.to_string())
    }
}

impl From<String> for SlotId {
    fn from(s: String) -> Self {
        SlotId(s)
    }
}

impl Borrow<str> for SlotId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An ordered mapping from slot to class list.
///
/// Lookups never materialize entries: a slot that was never mentioned is
/// absent, while a slot mentioned only with blank classes is present with
/// an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlotMap {
    slots: IndexMap<SlotId, ClassList>,
}

impl SlotMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style: add `classes` to `slot`.
    pub fn with(mut self, slot: impl Into<SlotId>, classes: impl AsRef<str>) -> Self {
        self.push(slot, classes);
        self
    }

    /// Append classes to a slot, creating the entry if needed.
    pub fn push(&mut self, slot: impl Into<SlotId>, classes: impl AsRef<str>) {
        self.slots.entry(slot.into()).or_default().push(classes);
    }

    /// Replace the class list of a slot.
    pub fn insert(&mut self, slot: impl Into<SlotId>, classes: ClassList) {
        self.slots.insert(slot.into(), classes);
    }

    /// Get the class list of a slot.
    pub fn get(&self, slot: &str) -> Option<&ClassList> {
        self.slots.get(slot)
    }

    /// Mutable access, creating an empty entry when absent.
    pub fn entry(&mut self, slot: impl Into<SlotId>) -> &mut ClassList {
        self.slots.entry(slot.into()).or_default()
    }

    pub fn contains(&self, slot: &str) -> bool {
        self.slots.contains_key(slot)
    }

    /// Iterate over slots in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&SlotId, &ClassList)> {
        self.slots.iter()
    }

    pub fn slots(&self) -> impl Iterator<Item = &SlotId> {
        self.slots.keys()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Shorthand: a bare class string styles the `Base` slot.
impl From<&str> for SlotMap {
    fn from(s: &str) -> Self {
        SlotMap::new().with(BASE_SLOT, s)
    }
}

impl From<String> for SlotMap {
    fn from(s: String) -> Self {
        SlotMap::from(s.as_str())
    }
}

impl<K: Into<SlotId>, V: AsRef<str>> FromIterator<(K, V)> for SlotMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = SlotMap::new();
        for (slot, classes) in iter {
            map.push(slot, classes);
        }
        map
    }
}

/// The slots a component type declares, composed with an ancestor set.
///
/// A derived component lists only the slots it adds and points at the set
/// it extends.
#[derive(Debug, Clone, Copy)]
pub struct SlotSet {
    pub name: &'static str,
    pub slots: &'static [&'static str],
    pub parent: Option<&'static SlotSet>,
}

impl SlotSet {
    pub const fn new(name: &'static str, slots: &'static [&'static str]) -> Self {
        Self {
            name,
            slots,
            parent: None,
        }
    }

    pub const fn extends(
        name: &'static str,
        slots: &'static [&'static str],
        parent: &'static SlotSet,
    ) -> Self {
        Self {
            name,
            slots,
            parent: Some(parent),
        }
    }

    /// Every slot id in the chain, ancestors first. `Base` is always
    /// included.
    pub fn all(&self) -> Vec<&'static str> {
        let mut chain = Vec::new();
        let mut current = Some(self);
        while let Some(set) = current {
            chain.push(set);
            current = set.parent;
        }

        let mut ids = vec![BASE_SLOT];
        for set in chain.into_iter().rev() {
            for slot in set.slots {
                if !ids.contains(slot) {
                    ids.push(slot);
                }
            }
        }
        ids
    }

    pub fn contains(&self, slot: &str) -> bool {
        if slot == BASE_SLOT || self.slots.iter().any(|s| *s == slot) {
            return true;
        }
        self.parent.is_some_and(|parent| parent.contains(slot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static BUTTON: SlotSet = SlotSet::new("Button", &["Icon", "Label"]);
    static ICON_BUTTON: SlotSet = SlotSet::extends("IconButton", &["Badge"], &BUTTON);

    #[test]
    fn test_string_shorthand_targets_base() {
        let map = SlotMap::from("p-4 rounded");
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(BASE_SLOT).map(ToString::to_string).as_deref(), Some("p-4 rounded"));
    }

    #[test]
    fn test_absent_slot_is_not_materialized() {
        let map = SlotMap::from("p-4");
        assert!(map.get("Icon").is_none());
        assert!(!map.contains("Icon"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_blank_slot_is_present_but_empty() {
        let map = SlotMap::new().with("Icon", "");
        assert!(map.get("Icon").is_some_and(ClassList::is_empty));
    }

    #[test]
    fn test_slot_ids_are_case_sensitive() {
        let map = SlotMap::new().with("Icon", "w-4");
        assert!(map.get("icon").is_none());
    }

    #[test]
    fn test_slot_set_chain() {
        assert_eq!(ICON_BUTTON.all(), vec!["Base", "Icon", "Label", "Badge"]);
        assert!(ICON_BUTTON.contains("Label"));
        assert!(ICON_BUTTON.contains("Base"));
        assert!(!BUTTON.contains("Badge"));
    }

    #[test]
    fn test_slot_id_validity() {
        assert!(SlotId::from("Icon").is_valid());
        assert!(!SlotId::from("").is_valid());
        assert!(!SlotId::from("Icon Label").is_valid());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_slot_map_serde() {
        let map = SlotMap::new().with("Base", "p-4").with("Icon", "w-4");
        let json = serde_json::to_string(&map).unwrap();
        let back: SlotMap = serde_json::from_str(&json).unwrap();
        assert_eq!(map, back);
    }
}
