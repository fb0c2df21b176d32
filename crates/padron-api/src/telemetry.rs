//! Tracing subscriber setup for embedding programs.

/// Initialize the global tracing subscriber.
///
/// The `PADRON_LOG` environment variable overrides `default_level` when set
/// and accepts the full `EnvFilter` directive syntax, so a deployment can
/// ask for `padron_db=debug,warn` without a rebuild.
///
/// # Errors
///
/// Returns an error when a global subscriber was already installed.
pub fn init_tracing(default_level: &str) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_env("PADRON_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|error| anyhow::anyhow!("tracing subscriber already installed: {error}"))?;

    Ok(())
}
