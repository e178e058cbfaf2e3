//! Evaluation diagnostics.

use std::fmt;
use twv_core::EvalError;

/// Where a swallowed evaluation failure came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticSource {
    Axis { key: String },
    /// `index` is the position in [`Descriptor::compound_rules`], inherited
    /// rules first.
    ///
    /// [`Descriptor::compound_rules`]: crate::Descriptor::compound_rules
    CompoundRule { index: usize, label: Option<String> },
}

/// An accessor or predicate failure that was skipped during resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub source: DiagnosticSource,
    pub error: EvalError,
}

impl Diagnostic {
    pub fn axis(key: &str, error: EvalError) -> Self {
        Self {
            source: DiagnosticSource::Axis {
                key: key.to_string(),
            },
            error,
        }
    }

    pub fn compound_rule(index: usize, label: Option<&str>, error: EvalError) -> Self {
        Self {
            source: DiagnosticSource::CompoundRule {
                index,
                label: label.map(str::to_string),
            },
            error,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            DiagnosticSource::Axis { key } => write!(f, "axis '{key}': {}", self.error),
            DiagnosticSource::CompoundRule {
                label: Some(label), ..
            } => write!(f, "compound rule '{label}': {}", self.error),
            DiagnosticSource::CompoundRule { index, label: None } => {
                write!(f, "compound rule #{index}: {}", self.error)
            }
        }
    }
}
