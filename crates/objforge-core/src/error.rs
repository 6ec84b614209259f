//! Error types for registration, discovery, and instantiation.

use thiserror::Error;

/// Errors surfaced by the registry.
///
/// Every variant is a caller-visible contract violation raised synchronously;
/// the registry performs no recovery or retry.
#[derive(Debug, Error)]
pub enum FactoryError {
    /// The caller supplied an invalid registration (empty or blank name).
    #[error("invalid registration: {reason}")]
    Validation { reason: String },

    /// A catalog failed to enumerate its classes during bulk population.
    #[error("catalog '{library}' failed to enumerate classes: {reason}")]
    Catalog { library: String, reason: String },

    /// No entry matched the supplied name and qualifiers.
    #[error("no class registered for '{selector}'")]
    NotFound { selector: String },

    /// Several entries matched; the caller must narrow the lookup.
    #[error("{count} classes registered for '{selector}'; narrow the lookup with a library or label")]
    Ambiguous { selector: String, count: usize },

    /// The registered constructor itself failed.
    #[error("constructor for '{name}' failed: {reason}")]
    Construction { name: String, reason: String },

    /// The constructed instance was not of the requested concrete type.
    #[error("instance created for '{name}' is not a `{expected}`")]
    Downcast {
        name: String,
        expected: &'static str,
    },
}

impl FactoryError {
    /// Returns `true` if the lookup found no matching entry.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if the lookup matched more than one entry.
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Self::Ambiguous { .. })
    }
}
