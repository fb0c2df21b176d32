//! Failures raised while merging and extracting configuration.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// The layered figment could not be merged or deserialized.
    #[error("Configuration error: {0}")]
    Figment(#[from] figment::Error),

    /// A section the requested operation depends on has no usable value,
    /// e.g. no database path before opening the service.
    #[error("Configuration section '{section}' is incomplete: {hint}")]
    Incomplete {
        section: &'static str,
        hint: &'static str,
    },
}
