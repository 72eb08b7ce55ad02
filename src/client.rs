use std::time::Duration;

use anyhow::{Context, Result};
use common::{ForecastApi, PredictResponse, Sleeper, TrainRequest, WorkflowError};
use reqwest::Client;
use tracing::{debug, trace, warn};

/// Upper bound for a single request to the forecasting service.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the forecasting service.
#[derive(Debug, Clone)]
pub struct ForecastClient {
    client: Client,
    base_url: String,
}

impl ForecastClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }
}

impl ForecastApi for ForecastClient {
    async fn train(&self, request: &TrainRequest) -> Result<(), WorkflowError> {
        let url = self.url(common::TRAIN_ENDPOINT);
        debug!("POST {} ticker={} start_date={}", url, request.ticker, request.start_date);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                warn!("Training request to {} failed: {}", url, e);
                WorkflowError::transport(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Training request rejected with status {}: {}", status, body);
            return Err(WorkflowError::rejected(body));
        }

        trace!("Training accepted with status {}", status);
        Ok(())
    }

    async fn predict(&self, ticker: &str) -> Result<PredictResponse, WorkflowError> {
        let url = self.url(&common::predict_endpoint(ticker));
        trace!("GET {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!("Status poll to {} failed: {}", url, e);
            WorkflowError::transport(e)
        })?;

        // The service reports failures in the body, so the HTTP status is not checked here.
        let status = response.status();
        response.json::<PredictResponse>().await.map_err(|e| {
            warn!("Unreadable status response ({}): {}", status, e);
            WorkflowError::transport(e)
        })
    }
}

/// Sleeper backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
