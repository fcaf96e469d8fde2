//! Command implementations.
//!
//! Output goes through `tracing::info!` so it follows the same filter and
//! format as the rest of the log.

pub mod combos;
pub mod products;

use thiserror::Error;

use combo_console::{ApiError, ComboApiClient, ConfigError, ConsoleConfig, ConsoleError};

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Console(#[from] ConsoleError),

    #[error("Combo API error: {0}")]
    Api(#[from] ApiError),

    /// A command-line value that clap could not check on its own.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Configuration and client shared by every command.
pub struct Context {
    pub config: ConsoleConfig,
    pub client: ComboApiClient,
}

impl Context {
    /// Load configuration from the environment and build the API client.
    pub fn load(base_url: Option<&str>) -> Result<Self, CommandError> {
        let mut config = ConsoleConfig::from_env()?;
        if let Some(base_url) = base_url {
            config = config.with_base_url(base_url)?;
        }
        tracing::debug!(config = ?config, "Loaded configuration");

        let client = ComboApiClient::new(&config.api)?;
        Ok(Self { config, client })
    }
}
