//! Shared core of the stock forecast client.
//!
//! Everything here compiles for both the native CLI and the wasm dashboard:
//! the wire types exchanged with the forecasting service, the
//! train-then-poll workflow with its status machine, and the presentation
//! model both front ends render from.

mod error;
pub mod presentation;
mod prediction;
pub mod workflow;

pub use error::{RequestError, WorkflowError};
pub use prediction::{
    Forecast, Historical, Metrics, PollOutcome, PredictResponse, PredictionResult, TrainRequest,
    DEFAULT_API_BASE_URL, TRAIN_ENDPOINT, predict_endpoint,
};
pub use workflow::{
    ForecastApi, PollPolicy, PollStep, Sleeper, Workflow, WorkflowState, WorkflowStatus,
};
