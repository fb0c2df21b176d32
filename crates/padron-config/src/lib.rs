//! # padron-config
//!
//! Figment-layered configuration for the Padron crates.
//!
//! Four sources merge into one [`PadronConfig`], lowest priority first:
//! built-in defaults, the user-global `~/.config/padron/config.toml`, a
//! project-local `.padron/config.toml`, and `PADRON_*` environment
//! variables. `__` separates nested keys, so `PADRON_DATABASE__PATH` sets
//! `database.path` and `PADRON_SECURITY__DELETE_SECRET` sets
//! `security.delete_secret`.
//!
//! ```no_run
//! use padron_config::PadronConfig;
//!
//! // Typical entry point: workspace .env first, then the full chain.
//! let config = PadronConfig::load_with_dotenv().expect("config");
//!
//! // Without .env loading (environment must already be set):
//! let config = PadronConfig::load().expect("config");
//!
//! if config.database.is_configured() {
//!     println!("Database path: {}", config.database.path);
//! }
//! ```

mod database;
mod error;
mod general;
mod import;
mod security;

pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use import::ImportConfig;
pub use security::SecurityConfig;

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

/// Top-level configuration, one field per section.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PadronConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    #[serde(default)]
    pub import: ImportConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl PadronConfig {
    /// Extract configuration from the TOML files and the environment.
    ///
    /// `.env` files are not consulted; [`Self::load_with_dotenv`] layers
    /// that underneath.
    ///
    /// # Errors
    ///
    /// `ConfigError::Figment` when a source fails to parse or a value has
    /// the wrong shape.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load a workspace `.env` into the process environment, then [`Self::load`].
    ///
    /// The usual entry point for embedding programs and tests.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`]; a missing `.env` is not an error.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// The provider chain itself, exposed so tests can merge extra
    /// providers on top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        let global = Self::global_config_path().filter(|p| p.exists());
        if let Some(global) = global {
            figment = figment.merge(Toml::file(global));
        }
        let local = Path::new(".padron/config.toml");
        if local.exists() {
            figment = figment.merge(Toml::file(local));
        }
        // Environment wins over both files
        figment.merge(Env::prefixed("PADRON_").split("__"))
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("padron").join("config.toml"))
    }

    /// Best-effort `.env` loading: the nearest file wins, absence is fine.
    ///
    /// Under cargo the manifest dir is the crate, not the workspace, so the
    /// search walks a few ancestors before falling back to the working
    /// directory.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let manifest_dir = PathBuf::from(manifest_dir);
            for dir in manifest_dir.ancestors().take(3) {
                let candidate = dir.join(".env");
                if candidate.exists() {
                    let _ = dotenvy::from_path(&candidate);
                    return;
                }
            }
        }
        let _ = dotenvy::dotenv();
    }
}
