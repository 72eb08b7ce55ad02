use std::time::Duration;

use common::{
    predict_endpoint, ForecastApi, PredictResponse, Sleeper, TrainRequest, WorkflowError,
    TRAIN_ENDPOINT,
};
use gloo_net::http::Request;

use crate::settings;

/// Browser client for the forecasting service.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastClient {
    base_url: String,
}

impl ForecastClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Client pointed at the base URL from the current settings
    pub fn from_settings() -> Self {
        Self::new(settings::get_settings().api_base_url())
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }
}

impl ForecastApi for ForecastClient {
    async fn train(&self, request: &TrainRequest) -> Result<(), WorkflowError> {
        let url = self.url(TRAIN_ENDPOINT);
        log::debug!("POST request to: {}", url);

        let response = Request::post(&url)
            .json(request)
            .map_err(|e| {
                log::error!("POST {} - Failed to serialize request: {}", TRAIN_ENDPOINT, e);
                WorkflowError::transport(e)
            })?
            .send()
            .await
            .map_err(|e| {
                log::error!("POST {} - Request failed: {}", TRAIN_ENDPOINT, e);
                WorkflowError::transport(e)
            })?;

        if !response.ok() {
            log::warn!("POST {} - Non-OK response: {}", TRAIN_ENDPOINT, response.status());
            let body = response.text().await.unwrap_or_default();
            return Err(WorkflowError::rejected(body));
        }

        log::info!("POST {} - Training accepted for {}", TRAIN_ENDPOINT, request.ticker);
        Ok(())
    }

    async fn predict(&self, ticker: &str) -> Result<PredictResponse, WorkflowError> {
        let endpoint = predict_endpoint(ticker);
        let url = self.url(&endpoint);
        log::debug!("GET request to: {}", url);

        let response = Request::get(&url).send().await.map_err(|e| {
            log::error!("GET {} - Request failed: {}", endpoint, e);
            WorkflowError::transport(e)
        })?;

        // The status field decides success; the HTTP status is not consulted
        log::trace!("GET {} - Response received, parsing JSON", endpoint);
        response.json::<PredictResponse>().await.map_err(|e| {
            log::error!("GET {} - Failed to parse response: {}", endpoint, e);
            WorkflowError::transport(e)
        })
    }
}

/// Poll delay backed by a browser timer. Dropping the future clears the timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimerSleeper;

impl Sleeper for TimerSleeper {
    async fn sleep(&self, duration: Duration) {
        gloo_timers::future::sleep(duration).await;
    }
}
