//! Request and response shapes of the forecasting service.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{RequestError, WorkflowError};

/// Base URL of the forecasting service when nothing else is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";

/// Path of the endpoint that starts training, relative to the base URL.
pub const TRAIN_ENDPOINT: &str = "/train";

/// Path of the status/prediction endpoint for a ticker, relative to the base URL.
pub fn predict_endpoint(ticker: &str) -> String {
    format!("/predict/{}", urlencoding::encode(ticker))
}

/// Body of `POST /train`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrainRequest {
    pub ticker: String,
    pub start_date: NaiveDate,
}

impl TrainRequest {
    /// Normalize and validate form input.
    ///
    /// The ticker is trimmed and upper-cased; the start date may not be later
    /// than `today`.
    pub fn new(ticker: &str, start_date: NaiveDate, today: NaiveDate) -> Result<Self, RequestError> {
        let ticker = ticker.trim().to_uppercase();
        if ticker.is_empty() {
            return Err(RequestError::EmptyTicker);
        }
        if start_date > today {
            return Err(RequestError::FutureStartDate { start: start_date, today });
        }
        Ok(Self { ticker, start_date })
    }
}

/// Historical window: actual closes plus the model's in-sample predictions.
///
/// `predicted` may be shorter than `dates`; it lines up with the end of the window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Historical {
    pub dates: Vec<String>,
    pub actual: Vec<f64>,
    #[serde(default)]
    pub predicted: Vec<f64>,
}

impl Historical {
    /// Most recent actual price, if any.
    pub fn last_actual(&self) -> Option<f64> {
        self.actual.last().copied()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Forecast {
    pub dates: Vec<String>,
    pub predicted: Vec<f64>,
}

/// Model error metrics reported alongside a forecast.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Metrics {
    pub rmse: f64,
    pub mae: f64,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub prediction_date: Option<String>,
}

/// A complete forecast snapshot. Replaced wholesale on every fetch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionResult {
    pub historical: Historical,
    pub forecast: Forecast,
    pub metrics: Metrics,
}

/// Raw body of `GET /predict/{ticker}`.
///
/// Every field is optional on the wire; [`PredictResponse::into_outcome`]
/// decides what the response means.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PredictResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub progress: Option<f64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub historical: Option<Historical>,
    #[serde(default)]
    pub forecast: Option<Forecast>,
    #[serde(default)]
    pub metrics: Option<Metrics>,
}

/// Interpreted poll response.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    Ready(PredictionResult),
    Training { progress: f64 },
    Failed(WorkflowError),
}

impl PredictResponse {
    pub fn into_outcome(self) -> PollOutcome {
        match self.status.as_deref() {
            Some("ready") => match (self.historical, self.forecast, self.metrics) {
                (Some(historical), Some(forecast), Some(metrics)) => {
                    PollOutcome::Ready(PredictionResult { historical, forecast, metrics })
                }
                _ => PollOutcome::Failed(WorkflowError::unexpected(self.message)),
            },
            Some("training") => PollOutcome::Training {
                progress: self.progress.filter(|p| p.is_finite()).unwrap_or(0.0),
            },
            _ => PollOutcome::Failed(WorkflowError::unexpected(self.message)),
        }
    }
}
