use anyhow::Result;
use common::presentation::{format_metric, format_progress};
use common::{ForecastApi, PollOutcome};
use tracing::debug;

use crate::client::ForecastClient;
use crate::config::Settings;

pub async fn status(settings: &Settings, ticker: &str) -> Result<()> {
    println!("{}", status_line(settings, ticker).await?);
    Ok(())
}

/// One status request for `ticker`, summarized on a single line.
pub(crate) async fn status_line(settings: &Settings, ticker: &str) -> Result<String> {
    let ticker = ticker.trim().to_uppercase();
    let client = ForecastClient::new(&settings.api_base_url)?;
    debug!("Checking status of {} at {}", ticker, client.base_url());

    let response = client.predict(&ticker).await?;
    Ok(describe(&ticker, response.into_outcome()))
}

fn describe(ticker: &str, outcome: PollOutcome) -> String {
    match outcome {
        PollOutcome::Ready(result) => format!(
            "{}: ready (RMSE {}, MAE {}, {} forecast days)",
            ticker,
            format_metric(result.metrics.rmse),
            format_metric(result.metrics.mae),
            result.forecast.dates.len()
        ),
        PollOutcome::Training { progress } => {
            format!("{}: training ({})", ticker, format_progress(progress))
        }
        PollOutcome::Failed(error) => format!("{}: error ({})", ticker, error),
    }
}
