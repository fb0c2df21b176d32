//! Shared application resources initialized once at startup.

use anyhow::Context;
use padron_config::PadronConfig;
use padron_db::service::PadronService;

/// Shared application resources for the query surface.
///
/// An embedding program builds one of these at startup and hands out
/// references per request. All endpoint methods hang off this type; see
/// the `endpoints` modules.
pub struct PadronApi {
    pub service: PadronService,
    pub config: PadronConfig,
}

impl PadronApi {
    /// Initialize all shared resources from configuration.
    ///
    /// Opens (and migrates) the database at `config.database.path`.
    ///
    /// # Errors
    ///
    /// Fails when no database path is configured or the database cannot be
    /// opened.
    pub async fn init(config: PadronConfig) -> anyhow::Result<Self> {
        let path = config.database.require_path()?.to_string();
        let service = PadronService::new_local(&path)
            .await
            .context("failed to initialize padron-db service")?;

        Ok(Self { service, config })
    }
}
