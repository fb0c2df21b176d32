//! Database location configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Filesystem path of the libSQL database file (e.g. `./padron.db`).
    /// Tests use `:memory:` directly and never read this.
    #[serde(default)]
    pub path: String,
}

impl DatabaseConfig {
    /// Check if a database path has been provided.
    pub fn is_configured(&self) -> bool {
        !self.path.is_empty()
    }

    /// The configured path, or an error when none is set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Incomplete` while `path` is empty.
    pub fn require_path(&self) -> Result<&str, ConfigError> {
        if self.path.is_empty() {
            return Err(ConfigError::Incomplete {
                section: "database",
                hint: "set database.path or PADRON_DATABASE__PATH",
            });
        }
        Ok(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_not_configured() {
        assert!(!DatabaseConfig::default().is_configured());
    }

    #[test]
    fn configured_when_path_set() {
        let config = DatabaseConfig {
            path: "./padron.db".into(),
        };
        assert!(config.is_configured());
        assert_eq!(config.require_path().unwrap(), "./padron.db");
    }

    #[test]
    fn require_path_names_the_section() {
        let err = DatabaseConfig::default().require_path().unwrap_err();
        assert!(err.to_string().contains("'database'"));
    }
}
