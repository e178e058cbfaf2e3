//! Ordered class-name fragments.

use smallvec::SmallVec;
use std::fmt;

/// An ordered sequence of non-empty class-name fragments.
///
/// A fragment may itself hold several space-separated classes. Duplicates
/// are kept; deduplication is the merger's job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassList {
    fragments: SmallVec<[String; 4]>,
}

impl ClassList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fragment. Blank fragments are ignored.
    pub fn push(&mut self, fragment: impl AsRef<str>) {
        if let Some(fragment) = normalize(fragment.as_ref()) {
            self.fragments.push(fragment);
        }
    }

    /// Insert a fragment at `index`. Blank fragments are ignored and an
    /// index past the end appends.
    pub fn insert(&mut self, index: usize, fragment: impl AsRef<str>) {
        if let Some(fragment) = normalize(fragment.as_ref()) {
            let index = index.min(self.fragments.len());
            self.fragments.insert(index, fragment);
        }
    }

    /// Insert a fragment before every existing one.
    pub fn prepend(&mut self, fragment: impl AsRef<str>) {
        self.insert(0, fragment);
    }

    /// Append every fragment of `other`.
    pub fn extend_from(&mut self, other: &ClassList) {
        self.fragments.extend(other.fragments.iter().cloned());
    }

    /// Iterate over fragments in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.fragments.iter().map(String::as_str)
    }

    /// Number of fragments.
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Space-joined fragments, or `None` when the list is empty.
    pub fn joined(&self) -> Option<String> {
        if self.fragments.is_empty() {
            None
        } else {
            Some(self.fragments.join(" "))
        }
    }
}

fn normalize(fragment: &str) -> Option<String> {
    let trimmed = fragment.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl fmt::Display for ClassList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, fragment) in self.fragments.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(fragment)?;
        }
        Ok(())
    }
}

impl From<&str> for ClassList {
    fn from(s: &str) -> Self {
        let mut list = ClassList::new();
        list.push(s);
        list
    }
}

impl From<String> for ClassList {
    fn from(s: String) -> Self {
        ClassList::from(s.as_str())
    }
}

impl<S: AsRef<str>> FromIterator<S> for ClassList {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        let mut list = ClassList::new();
        for fragment in iter {
            list.push(fragment);
        }
        list
    }
}
