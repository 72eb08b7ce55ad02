use std::time::Duration;

use anyhow::{Context, Result, ensure};
use common::workflow::{MAX_POLLS, POLL_INTERVAL};
use common::{DEFAULT_API_BASE_URL, PollPolicy};
use config::{Config, Environment, File};
use serde::Deserialize;

/// Name of the optional settings file (`stockcast.toml`, `.json`, ...) in the working directory.
const CONFIG_FILE: &str = "stockcast";

/// Prefix of the environment variables that override the settings file.
const ENV_PREFIX: &str = "STOCKCAST";

/// Client settings. Layered: defaults, settings file, environment, then flags.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Settings {
    /// Base URL of the forecasting service, including the `/api` prefix
    pub api_base_url: String,
    /// Delay between two status polls
    pub poll_interval_ms: u64,
    /// Number of status polls before giving up
    pub max_polls: u32,
}

impl Settings {
    /// Load settings from `.env`, the optional settings file and `STOCKCAST_*` variables.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = defaults()?
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .context("Failed to read configuration")?;

        Self::from_config(config)
    }

    fn from_config(config: Config) -> Result<Self> {
        let settings: Settings = config
            .try_deserialize()
            .context("Invalid configuration")?;
        settings.validate()?;
        tracing::debug!(?settings, "Configuration loaded");
        Ok(settings)
    }

    /// Apply command-line overrides on top of the loaded values.
    pub fn with_overrides(
        mut self,
        api_base_url: Option<String>,
        poll_interval_ms: Option<u64>,
        max_polls: Option<u32>,
    ) -> Result<Self> {
        if let Some(api_base_url) = api_base_url {
            self.api_base_url = api_base_url;
        }
        if let Some(poll_interval_ms) = poll_interval_ms {
            self.poll_interval_ms = poll_interval_ms;
        }
        if let Some(max_polls) = max_polls {
            self.max_polls = max_polls;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            interval: Duration::from_millis(self.poll_interval_ms),
            max_polls: self.max_polls,
        }
    }

    fn validate(&self) -> Result<()> {
        ensure!(!self.api_base_url.trim().is_empty(), "api_base_url must not be empty");
        ensure!(self.max_polls > 0, "max_polls must be at least 1");
        Ok(())
    }
}

fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
    let builder = Config::builder()
        .set_default("api_base_url", DEFAULT_API_BASE_URL)?
        .set_default("poll_interval_ms", POLL_INTERVAL.as_millis() as u64)?
        .set_default("max_polls", u64::from(MAX_POLLS))?;
    Ok(builder)
}
