//! Last-write-wins class merging.

use crate::config::MergeConfig;
use crate::table::ConflictTable;
use smallvec::SmallVec;
use std::collections::HashSet;
use twv_core::Merger;

/// A class token split into its parts.
#[derive(Debug, PartialEq, Eq)]
struct ParsedClass<'a> {
    /// Variant modifiers (`hover`, `md`), sorted.
    modifiers: SmallVec<[&'a str; 2]>,
    important: bool,
    /// The utility with important marker and negative sign removed.
    utility: &'a str,
}

impl ParsedClass<'_> {
    /// Key shared by classes applying under the same conditions.
    fn scope(&self) -> String {
        let mut scope = self.modifiers.join(":");
        if self.important {
            scope.push('!');
        }
        scope
    }
}

/// Merger resolving conflicts through a [`ConflictTable`].
///
/// Scanning from the end, the first class of each group survives, and it
/// also displaces earlier classes of the groups it overrides. Classes
/// outside the table are only deduplicated. Survivors keep their relative
/// order.
#[derive(Debug, Clone, Default)]
pub struct TailwindMerger {
    table: ConflictTable,
    config: MergeConfig,
}

impl TailwindMerger {
    pub fn new(table: ConflictTable, config: MergeConfig) -> Self {
        Self { table, config }
    }

    pub fn with_table(table: ConflictTable) -> Self {
        Self::new(table, MergeConfig::default())
    }

    pub fn with_config(config: MergeConfig) -> Self {
        Self::new(ConflictTable::default(), config)
    }

    pub fn table(&self) -> &ConflictTable {
        &self.table
    }

    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    fn parse<'a>(&self, token: &'a str) -> ParsedClass<'a> {
        let mut parts = split_outside_brackets(token, self.config.separator);
        let mut utility = parts.pop().unwrap_or(token);
        parts.sort_unstable();

        let important = utility.starts_with(self.config.important);
        if important {
            utility = &utility[self.config.important.len_utf8()..];
        }
        if let Some(positive) = utility.strip_prefix('-') {
            utility = positive;
        }

        ParsedClass {
            modifiers: parts,
            important,
            utility,
        }
    }

    /// Conflict key and overridden keys of one token.
    fn keys(&self, token: &str) -> (String, Vec<String>) {
        let parsed = self.parse(token);
        let scope = parsed.scope();

        let utility = match &self.config.prefix {
            Some(prefix) => match parsed.utility.strip_prefix(prefix.as_str()) {
                Some(unprefixed) => unprefixed,
                None => return (format!("={token}"), Vec::new()),
            },
            None => parsed.utility,
        };

        // Arbitrary property: `[mask-type:luminance]`.
        if let Some(property) = utility
            .strip_prefix('[')
            .and_then(|inner| inner.split_once(':'))
            .map(|(property, _)| property)
        {
            return (format!("{scope}|[{property}]"), Vec::new());
        }

        match self.table.classify(utility) {
            Some(group) => (
                format!("{scope}|{}", group.id),
                group
                    .conflicts
                    .iter()
                    .map(|other| format!("{scope}|{other}"))
                    .collect(),
            ),
            None => (format!("={token}"), Vec::new()),
        }
    }
}

impl Merger for TailwindMerger {
    fn merge(&self, classes: &str) -> Option<String> {
        let tokens: Vec<&str> = classes.split_whitespace().collect();
        if tokens.is_empty() {
            return None;
        }

        let mut taken: HashSet<String> = HashSet::new();
        let mut kept = Vec::with_capacity(tokens.len());
        for token in tokens.into_iter().rev() {
            let (key, overridden) = self.keys(token);
            if !taken.insert(key) {
                continue;
            }
            taken.extend(overridden);
            kept.push(token);
        }
        kept.reverse();
        Some(kept.join(" "))
    }
}

/// Merger removing exact duplicates only; the last occurrence stays.
#[derive(Debug, Clone, Copy, Default)]
pub struct DedupMerger;

impl Merger for DedupMerger {
    fn merge(&self, classes: &str) -> Option<String> {
        let mut seen = HashSet::new();
        let mut kept: Vec<&str> = classes
            .split_whitespace()
            .rev()
            .filter(|token| seen.insert(*token))
            .collect();
        if kept.is_empty() {
            return None;
        }
        kept.reverse();
        Some(kept.join(" "))
    }
}

/// Split on `separator` outside `[...]`.
fn split_outside_brackets(token: &str, separator: char) -> SmallVec<[&str; 2]> {
    let mut parts = SmallVec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in token.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            c if c == separator && depth == 0 => {
                parts.push(&token[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&token[start..]);
    parts
}
