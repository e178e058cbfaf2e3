//! Merger configuration.

/// How class tokens are split before conflict lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MergeConfig {
    /// Separator between variant modifiers and the utility (`hover:p-4`).
    pub separator: char,
    /// Leading important marker (`!p-4`).
    pub important: char,
    /// Utility prefix (`tw-`). When set, unprefixed tokens only dedupe.
    pub prefix: Option<String>,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            separator: ':',
            important: '!',
            prefix: None,
        }
    }
}

impl MergeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    pub fn important(mut self, important: char) -> Self {
        self.important = important;
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }
}
