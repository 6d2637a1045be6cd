//! Typed error variants for the evidence-panel-config crate.
//!
//! `ValidationError` covers every precondition checked before the store
//! mutates anything; its `Display` text is what the host shows in a
//! transient notice. `ConfigError` wraps it together with I/O and parse
//! failures from the settings document.

use thiserror::Error;

/// A save or delete precondition that was not met.
///
/// The store checks these before touching memory or disk, so an operation
/// that returns one of these left everything exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please set a keyboard shortcut")]
    EmptyKeys,

    #[error("Maximum of {max} keys allowed for shortcuts (got {count})")]
    TooManyKeys { count: usize, max: usize },

    #[error("Key '{0}' appears more than once in the shortcut")]
    RepeatedKey(String),

    #[error("Front side template must contain {{front}}")]
    FrontTemplateMissingFront,

    #[error(
        "Front side template cannot use {{back}} - only {{front}} is available when viewing the question"
    )]
    FrontTemplateUsesBack,

    #[error("Back side template must contain {{front}}")]
    BackTemplateMissingFront,

    #[error("This key combination is already in use by another shortcut (#{index})")]
    DuplicateChord { index: usize },

    #[error("Cannot delete the last keybinding")]
    LastBinding,

    #[error("No shortcut at position {index} (have {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("This shortcut has not been saved yet")]
    NotPersisted,
}

/// Errors that can occur when loading, validating or saving settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The settings file could not be read or written.
    #[error("I/O error on settings file: {0}")]
    Io(#[from] std::io::Error),

    /// The settings file is not a valid JSON settings document.
    #[error("JSON parse error in settings: {0}")]
    Parse(#[from] serde_json::Error),

    /// The requested change violates a store invariant.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ConfigError {
    /// The validation failure behind this error, if that is what it is.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            ConfigError::Validation(v) => Some(v),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages_show_literal_placeholders() {
        assert_eq!(
            ValidationError::FrontTemplateMissingFront.to_string(),
            "Front side template must contain {front}"
        );
        assert!(
            ValidationError::FrontTemplateUsesBack
                .to_string()
                .contains("cannot use {back}")
        );
    }

    #[test]
    fn config_error_is_transparent_for_validation() {
        let err = ConfigError::from(ValidationError::LastBinding);
        assert_eq!(err.to_string(), "Cannot delete the last keybinding");
        assert_eq!(err.as_validation(), Some(&ValidationError::LastBinding));
    }
}
