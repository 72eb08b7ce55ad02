use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

pub mod commands;

use crate::config::Settings;
use commands::{predict, status};

#[derive(Parser)]
#[command(name = "stockcast")]
#[command(about = "Train stock price models and fetch their forecasts")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub service: ServiceArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Overrides for the values read from `stockcast.toml` and `STOCKCAST_*` variables.
#[derive(Args, Debug, Default)]
pub struct ServiceArgs {
    /// Base URL of the forecasting service (e.g. http://localhost:5000/api)
    #[arg(long, global = true)]
    pub api_base_url: Option<String>,

    /// Milliseconds between status polls
    #[arg(long, global = true)]
    pub poll_interval_ms: Option<u64>,

    /// Number of status polls before giving up
    #[arg(long, global = true)]
    pub max_polls: Option<u32>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Train a model and wait for its forecast
    ///
    /// Examples:
    ///   stockcast predict --ticker AAPL
    ///   stockcast predict --ticker MSFT --start-date 2021-06-01 --json
    Predict {
        /// Stock ticker symbol
        #[arg(short, long)]
        ticker: String,

        /// First day of training data (YYYY-MM-DD)
        #[arg(short, long, default_value = "2020-01-01")]
        start_date: NaiveDate,

        /// Print the raw forecast as JSON instead of the table
        #[arg(long)]
        json: bool,
    },
    /// Ask the service once for the current state of a ticker
    Status {
        /// Stock ticker symbol
        #[arg(short, long)]
        ticker: String,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let settings = Settings::load()?.with_overrides(
            self.service.api_base_url,
            self.service.poll_interval_ms,
            self.service.max_polls,
        )?;

        match self.command {
            Commands::Predict { ticker, start_date, json } => {
                predict(&settings, &ticker, start_date, json).await?;
            }
            Commands::Status { ticker } => {
                status(&settings, &ticker).await?;
            }
        }
        Ok(())
    }
}
