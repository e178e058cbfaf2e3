//! The merger contract.

use std::sync::Arc;

/// Conflict-resolving class merger.
///
/// `merge` receives a whitespace-separated class sequence and returns each
/// semantically distinct class once, the later of two conflicting classes
/// winning. Output must be deterministic for a given input. Blank input
/// yields `None`.
pub trait Merger {
    fn merge(&self, classes: &str) -> Option<String>;
}

impl<M: Merger + ?Sized> Merger for &M {
    fn merge(&self, classes: &str) -> Option<String> {
        (**self).merge(classes)
    }
}

impl<M: Merger + ?Sized> Merger for Box<M> {
    fn merge(&self, classes: &str) -> Option<String> {
        (**self).merge(classes)
    }
}

impl<M: Merger + ?Sized> Merger for Arc<M> {
    fn merge(&self, classes: &str) -> Option<String> {
        (**self).merge(classes)
    }
}

/// Joins classes without any conflict resolution.
#[derive(Debug, Clone, Copy, Default)]
pub struct JoinMerger;

impl Merger for JoinMerger {
    fn merge(&self, classes: &str) -> Option<String> {
        let joined = classes.split_whitespace().collect::<Vec<_>>().join(" ");
        if joined.is_empty() {
            None
        } else {
            Some(joined)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_merger_normalizes_whitespace() {
        assert_eq!(JoinMerger.merge("  p-4   p-4 ").as_deref(), Some("p-4 p-4"));
    }

    #[test]
    fn test_join_merger_blank_is_none() {
        assert_eq!(JoinMerger.merge("   "), None);
    }

    #[test]
    fn test_merger_through_arc() {
        let merger: Arc<dyn Merger + Send + Sync> = Arc::new(JoinMerger);
        assert_eq!(merger.merge("flex").as_deref(), Some("flex"));
    }
}
