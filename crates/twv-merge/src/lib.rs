//! Utility class merging for twv.
//!
//! This crate handles:
//! - Classifying utility classes into conflict groups
//! - Last-write-wins resolution between conflicting classes
//! - Deduplication

mod config;
mod merger;
mod table;

pub use config::MergeConfig;
pub use merger::{DedupMerger, TailwindMerger};
pub use table::{ClassGroup, ConflictTable, ValueKind};

/// Merge `classes` with the default conflict table.
pub fn merge(classes: &str) -> Option<String> {
    use twv_core::Merger;
    TailwindMerger::default().merge(classes)
}
