//! Error types for the twv crates.

use thiserror::Error;

/// Top-level error type.
#[derive(Debug, Error)]
pub enum TwvError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// Errors in how a descriptor is declared. Raised at construction time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid axis key '{key}': expected a simple identifier")]
    InvalidAxisKey { key: String },

    #[error("Invalid slot id '{slot}': must be non-empty without whitespace")]
    InvalidSlotId { slot: String },

    #[error("Slot '{slot}' is not declared by slot set {slot_set}")]
    UnknownSlot { slot: String, slot_set: String },

    #[error("Unknown variant axis '{key}' referenced by {context}")]
    UnknownAxis { key: String, context: String },
}

/// Errors while evaluating an accessor or predicate against one instance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("Missing property: {property}")]
    MissingProperty { property: String },

    #[error("Invalid value for '{property}': {reason}")]
    InvalidValue { property: String, reason: String },

    #[error("{0}")]
    Custom(String),
}

impl EvalError {
    pub fn custom(message: impl Into<String>) -> Self {
        EvalError::Custom(message.into())
    }
}

impl ConfigError {
    /// Check that `key` is a simple identifier: `[A-Za-z_][A-Za-z0-9_]*`.
    pub fn check_axis_key(key: &str) -> Result<(), ConfigError> {
        let mut chars = key.chars();
        let valid = match chars.next() {
            Some(first) => {
                (first.is_ascii_alphabetic() || first == '_')
                    && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            }
            None => false,
        };
        if valid {
            Ok(())
        } else {
            Err(ConfigError::InvalidAxisKey {
                key: key.to_string(),
            })
        }
    }
}
