//! The train-then-poll workflow and its status machine.
//!
//! `idle -> training -> {ready | error}`. A run is a single future: it resets
//! the state, asks the service to train, then polls on a fixed interval until
//! the service reports a terminal status or the poll ceiling is hit. Dropping
//! the future cancels whatever request or timer is pending.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::error::WorkflowError;
use crate::prediction::{PollOutcome, PredictResponse, PredictionResult, TrainRequest};

/// Delay between two status polls.
pub const POLL_INTERVAL: Duration = Duration::from_millis(5000);

/// Maximum number of status polls before a run is declared timed out.
pub const MAX_POLLS: u32 = 30;

/// Retry policy of the polling loop. Fixed interval, no backoff, no jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_polls: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: POLL_INTERVAL,
            max_polls: MAX_POLLS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowStatus {
    #[default]
    Idle,
    Training,
    Ready,
    Error,
}

impl WorkflowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStatus::Idle => "idle",
            WorkflowStatus::Training => "training",
            WorkflowStatus::Ready => "ready",
            WorkflowStatus::Error => "error",
        }
    }

    /// Ready and error stay put until the user starts a new run.
    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkflowStatus::Ready | WorkflowStatus::Error)
    }
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the loop should do after a poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollStep {
    /// Still training, sleep one interval and poll again
    Continue,
    /// Reached `ready` or `error`
    Done,
}

/// Client-side view of one workflow run. Views only ever read snapshots of it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WorkflowState {
    pub status: WorkflowStatus,
    /// Progress as reported by the service, in percent
    pub progress: f64,
    pub poll_count: u32,
    pub error: Option<String>,
    pub result: Option<Arc<PredictionResult>>,
}

impl WorkflowState {
    pub fn is_training(&self) -> bool {
        self.status == WorkflowStatus::Training
    }

    /// Progress clamped for drawing a bar.
    pub fn progress_percent(&self) -> f64 {
        self.progress.clamp(0.0, 100.0)
    }

    /// Enter `training` with everything from the previous run cleared.
    pub fn reset_for_training(&mut self) {
        *self = WorkflowState {
            status: WorkflowStatus::Training,
            ..WorkflowState::default()
        };
    }

    pub fn fail(&mut self, error: &WorkflowError) {
        self.status = WorkflowStatus::Error;
        self.error = Some(error.to_string());
    }

    /// Fold one interpreted poll response into the state.
    pub fn apply_poll(&mut self, outcome: PollOutcome, policy: &PollPolicy) -> PollStep {
        self.poll_count += 1;

        match outcome {
            PollOutcome::Ready(result) => {
                self.result = Some(Arc::new(result));
                self.status = WorkflowStatus::Ready;
                PollStep::Done
            }
            PollOutcome::Training { progress } => {
                self.status = WorkflowStatus::Training;
                self.progress = progress;
                if self.poll_count < policy.max_polls {
                    PollStep::Continue
                } else {
                    self.fail(&WorkflowError::Timeout);
                    PollStep::Done
                }
            }
            PollOutcome::Failed(error) => {
                self.fail(&error);
                PollStep::Done
            }
        }
    }
}

/// The two calls the forecasting service offers.
#[allow(async_fn_in_trait)]
pub trait ForecastApi {
    /// Ask the service to start training. `Ok` means the request was accepted.
    async fn train(&self, request: &TrainRequest) -> Result<(), WorkflowError>;

    /// Fetch the current status (and the result once ready) for a ticker.
    async fn predict(&self, ticker: &str) -> Result<PredictResponse, WorkflowError>;
}

impl<T: ForecastApi + ?Sized> ForecastApi for &T {
    async fn train(&self, request: &TrainRequest) -> Result<(), WorkflowError> {
        (**self).train(request).await
    }

    async fn predict(&self, ticker: &str) -> Result<PredictResponse, WorkflowError> {
        (**self).predict(ticker).await
    }
}

/// Runtime-specific delay between polls.
#[allow(async_fn_in_trait)]
pub trait Sleeper {
    async fn sleep(&self, duration: Duration);
}

impl<T: Sleeper + ?Sized> Sleeper for &T {
    async fn sleep(&self, duration: Duration) {
        (**self).sleep(duration).await
    }
}

type Observer = Box<dyn FnMut(&WorkflowState)>;

/// Drives one forecasting run against a [`ForecastApi`].
pub struct Workflow<A, S> {
    api: A,
    sleeper: S,
    policy: PollPolicy,
    state: WorkflowState,
    observer: Option<Observer>,
}

impl<A, S> Workflow<A, S>
where
    A: ForecastApi,
    S: Sleeper,
{
    pub fn new(api: A, sleeper: S) -> Self {
        Self {
            api,
            sleeper,
            policy: PollPolicy::default(),
            state: WorkflowState::default(),
            observer: None,
        }
    }

    pub fn with_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Register a callback that receives a snapshot after every transition.
    pub fn with_observer(mut self, observer: impl FnMut(&WorkflowState) + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    /// Reset, request training, then poll until the run is ready or failed.
    #[instrument(skip(self, request), fields(ticker = %request.ticker, start_date = %request.start_date))]
    pub async fn start_training(&mut self, request: &TrainRequest) -> &WorkflowState {
        self.state.reset_for_training();
        self.notify();

        info!("Requesting model training");
        if let Err(err) = self.api.train(request).await {
            warn!(error = %err, "Training request failed");
            self.state.fail(&err);
            self.notify();
            return &self.state;
        }

        debug!("Training accepted, polling for results");
        while self.poll_once(&request.ticker).await == PollStep::Continue {
            self.sleeper.sleep(self.policy.interval).await;
        }

        match self.state.status {
            WorkflowStatus::Ready => info!(polls = self.state.poll_count, "Forecast ready"),
            _ => warn!(
                polls = self.state.poll_count,
                error = self.state.error.as_deref().unwrap_or_default(),
                "Forecast run failed"
            ),
        }
        &self.state
    }

    /// Issue a single status request and apply its answer.
    pub async fn poll_once(&mut self, ticker: &str) -> PollStep {
        let step = match self.api.predict(ticker).await {
            Ok(response) => {
                let step = self.state.apply_poll(response.into_outcome(), &self.policy);
                debug!(
                    poll = self.state.poll_count,
                    status = %self.state.status,
                    progress = self.state.progress,
                    "Poll answered"
                );
                step
            }
            Err(err) => {
                warn!(error = %err, "Poll failed");
                self.state.fail(&err);
                PollStep::Done
            }
        };
        self.notify();
        step
    }

    fn notify(&mut self) {
        if let Some(observer) = self.observer.as_mut() {
            observer(&self.state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prediction::{Forecast, Historical, Metrics};
    use chrono::NaiveDate;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    struct ScriptedApi {
        train_result: Result<(), WorkflowError>,
        responses: RefCell<VecDeque<Result<PredictResponse, WorkflowError>>>,
        log: Log,
    }

    impl ScriptedApi {
        fn new(log: Log) -> Self {
            Self {
                train_result: Ok(()),
                responses: RefCell::new(VecDeque::new()),
                log,
            }
        }

        fn rejecting(mut self, error: WorkflowError) -> Self {
            self.train_result = Err(error);
            self
        }

        fn then(self, response: Result<PredictResponse, WorkflowError>) -> Self {
            self.responses.borrow_mut().push_back(response);
            self
        }

        fn predict_calls(&self) -> usize {
            self.log.borrow().iter().filter(|e| e.starts_with("predict")).count()
        }
    }

    impl ForecastApi for ScriptedApi {
        async fn train(&self, request: &TrainRequest) -> Result<(), WorkflowError> {
            self.log.borrow_mut().push(format!("train {}", request.ticker));
            self.train_result.clone()
        }

        async fn predict(&self, ticker: &str) -> Result<PredictResponse, WorkflowError> {
            self.log.borrow_mut().push(format!("predict {}", ticker));
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Ok(training(0.0)))
        }
    }

    /// Sleeper backed by the tokio timer, for runs that must really wait.
    struct TimerSleeper;

    impl Sleeper for TimerSleeper {
        async fn sleep(&self, duration: Duration) {
            tokio::time::sleep(duration).await;
        }
    }

    #[derive(Default)]
    struct RecordingSleeper {
        sleeps: RefCell<Vec<Duration>>,
    }

    impl Sleeper for RecordingSleeper {
        async fn sleep(&self, duration: Duration) {
            self.sleeps.borrow_mut().push(duration);
        }
    }

    fn training(progress: f64) -> PredictResponse {
        PredictResponse {
            status: Some("training".to_string()),
            progress: Some(progress),
            ..Default::default()
        }
    }

    fn ready() -> PredictResponse {
        PredictResponse {
            status: Some("ready".to_string()),
            historical: Some(Historical {
                dates: vec!["2024-01-01".to_string(), "2024-01-02".to_string()],
                actual: vec![100.0, 101.0],
                predicted: vec![100.5],
            }),
            forecast: Some(Forecast {
                dates: vec!["2024-01-03".to_string()],
                predicted: vec![102.0],
            }),
            metrics: Some(Metrics {
                rmse: 1.23,
                mae: 0.98,
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn aapl() -> TrainRequest {
        TrainRequest::new(
            "AAPL",
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        )
        .unwrap()
    }

    fn recording_observer(
        log: &Log,
        snapshots: &Rc<RefCell<Vec<WorkflowState>>>,
    ) -> impl FnMut(&WorkflowState) + 'static {
        let log = log.clone();
        let snapshots = snapshots.clone();
        move |state: &WorkflowState| {
            log.borrow_mut().push(format!("state {}", state.status));
            snapshots.borrow_mut().push(state.clone());
        }
    }

    #[tokio::test]
    async fn test_train_then_ready_example() {
        let log = Log::default();
        let snapshots = Rc::new(RefCell::new(Vec::new()));
        let api = ScriptedApi::new(log.clone()).then(Ok(training(40.0))).then(Ok(ready()));
        let sleeper = RecordingSleeper::default();

        let mut workflow =
            Workflow::new(&api, &sleeper).with_observer(recording_observer(&log, &snapshots));
        let state = workflow.start_training(&aapl()).await.clone();

        assert_eq!(state.status, WorkflowStatus::Ready);
        assert_eq!(state.poll_count, 2);
        assert_eq!(state.error, None);
        let result = state.result.expect("result should be set");
        assert_eq!(result.metrics.rmse, 1.23);
        assert_eq!(result.metrics.mae, 0.98);

        // One poll was scheduled after the training response, none after ready
        assert_eq!(*sleeper.sleeps.borrow(), vec![Duration::from_millis(5000)]);
        assert_eq!(api.predict_calls(), 2);

        let snapshots = snapshots.borrow();
        assert_eq!(snapshots[1].status, WorkflowStatus::Training);
        assert_eq!(snapshots[1].progress, 40.0);
        assert_eq!(snapshots[1].poll_count, 1);
    }

    #[tokio::test]
    async fn test_reset_is_published_before_train_request() {
        let log = Log::default();
        let snapshots = Rc::new(RefCell::new(Vec::new()));
        let api = ScriptedApi::new(log.clone()).then(Ok(ready()));
        let sleeper = RecordingSleeper::default();

        let mut workflow =
            Workflow::new(&api, &sleeper).with_observer(recording_observer(&log, &snapshots));
        workflow.start_training(&aapl()).await;

        let log = log.borrow();
        assert_eq!(log[0], "state training");
        assert_eq!(log[1], "train AAPL");

        let snapshots = snapshots.borrow();
        let first = &snapshots[0];
        assert_eq!(first.progress, 0.0);
        assert_eq!(first.poll_count, 0);
        assert_eq!(first.error, None);
        assert_eq!(first.result, None);
    }

    #[tokio::test]
    async fn test_poll_ceiling_times_out_without_31st_poll() {
        let log = Log::default();
        let api = ScriptedApi::new(log.clone());
        let sleeper = RecordingSleeper::default();

        let mut workflow = Workflow::new(&api, &sleeper);
        let state = workflow.start_training(&aapl()).await.clone();

        assert_eq!(state.status, WorkflowStatus::Error);
        assert_eq!(state.poll_count, 30);
        assert_eq!(
            state.error.as_deref(),
            Some("Training took too long. Please try again.")
        );
        assert_eq!(api.predict_calls(), 30);
        assert_eq!(sleeper.sleeps.borrow().len(), 29);
    }

    #[tokio::test]
    async fn test_ready_halts_polling_at_any_count() {
        let log = Log::default();
        let api = ScriptedApi::new(log.clone())
            .then(Ok(training(10.0)))
            .then(Ok(training(55.5)))
            .then(Ok(training(90.0)))
            .then(Ok(ready()))
            .then(Ok(training(0.0)));
        let sleeper = RecordingSleeper::default();

        let mut workflow = Workflow::new(&api, &sleeper);
        let state = workflow.start_training(&aapl()).await;

        assert_eq!(state.status, WorkflowStatus::Ready);
        assert_eq!(state.poll_count, 4);
        assert_eq!(state.progress, 90.0);
        assert_eq!(api.predict_calls(), 4);
    }

    #[tokio::test]
    async fn test_unexpected_status_uses_message_or_fallback() {
        let with_message = PredictResponse {
            status: Some("failed".to_string()),
            message: Some("Not enough history".to_string()),
            ..Default::default()
        };
        let api = ScriptedApi::new(Log::default()).then(Ok(with_message));
        let sleeper = RecordingSleeper::default();
        let mut workflow = Workflow::new(&api, &sleeper);
        let state = workflow.start_training(&aapl()).await;
        assert_eq!(state.status, WorkflowStatus::Error);
        assert_eq!(state.error.as_deref(), Some("Not enough history"));

        let without_message = PredictResponse {
            status: Some("queued".to_string()),
            ..Default::default()
        };
        let api = ScriptedApi::new(Log::default()).then(Ok(without_message));
        let mut workflow = Workflow::new(&api, &sleeper);
        let state = workflow.start_training(&aapl()).await;
        assert_eq!(state.error.as_deref(), Some("Unknown polling response"));
    }

    #[tokio::test]
    async fn test_rejected_training_never_polls() {
        let log = Log::default();
        let api = ScriptedApi::new(log.clone())
            .rejecting(WorkflowError::rejected("Invalid ticker"));
        let sleeper = RecordingSleeper::default();

        let mut workflow = Workflow::new(&api, &sleeper);
        let state = workflow.start_training(&aapl()).await;

        assert_eq!(state.status, WorkflowStatus::Error);
        assert_eq!(state.error.as_deref(), Some("Invalid ticker"));
        assert_eq!(state.poll_count, 0);
        assert_eq!(api.predict_calls(), 0);
    }

    #[tokio::test]
    async fn test_transport_failure_while_polling() {
        let api = ScriptedApi::new(Log::default())
            .then(Ok(training(20.0)))
            .then(Err(WorkflowError::transport("connection refused")));
        let sleeper = RecordingSleeper::default();

        let mut workflow = Workflow::new(&api, &sleeper);
        let state = workflow.start_training(&aapl()).await;

        assert_eq!(state.status, WorkflowStatus::Error);
        assert_eq!(state.error.as_deref(), Some("connection refused"));
        // The failed request never produced a response to count
        assert_eq!(state.poll_count, 1);
    }

    #[tokio::test]
    async fn test_retry_after_error_clears_previous_run() {
        let log = Log::default();
        let snapshots = Rc::new(RefCell::new(Vec::new()));
        let api = ScriptedApi::new(log.clone())
            .then(Ok(PredictResponse::default()))
            .then(Ok(ready()));
        let sleeper = RecordingSleeper::default();

        let mut workflow =
            Workflow::new(&api, &sleeper).with_observer(recording_observer(&log, &snapshots));
        assert_eq!(workflow.start_training(&aapl()).await.status, WorkflowStatus::Error);

        snapshots.borrow_mut().clear();
        let state = workflow.start_training(&aapl()).await.clone();

        let snapshots = snapshots.borrow();
        let reset = &snapshots[0];
        assert_eq!(reset.status, WorkflowStatus::Training);
        assert_eq!(reset.error, None);
        assert_eq!(reset.result, None);
        assert_eq!(reset.poll_count, 0);

        assert_eq!(state.status, WorkflowStatus::Ready);
        assert_eq!(state.poll_count, 1);
    }

    #[tokio::test]
    async fn test_custom_policy_is_honored() {
        let api = ScriptedApi::new(Log::default());
        let sleeper = RecordingSleeper::default();
        let policy = PollPolicy {
            interval: Duration::from_millis(10),
            max_polls: 3,
        };

        let mut workflow = Workflow::new(&api, &sleeper).with_policy(policy);
        let state = workflow.start_training(&aapl()).await;

        assert_eq!(state.status, WorkflowStatus::Error);
        assert_eq!(state.poll_count, 3);
        assert_eq!(
            *sleeper.sleeps.borrow(),
            vec![Duration::from_millis(10), Duration::from_millis(10)]
        );
    }

    #[test]
    fn test_apply_poll_increments_by_one() {
        let mut state = WorkflowState::default();
        state.reset_for_training();
        let policy = PollPolicy::default();

        for expected in 1..=5 {
            let step = state.apply_poll(PollOutcome::Training { progress: 12.0 }, &policy);
            assert_eq!(step, PollStep::Continue);
            assert_eq!(state.poll_count, expected);
        }
    }

    #[tokio::test]
    async fn test_dropped_run_stops_polling() {
        let log = Log::default();
        let api = ScriptedApi::new(log.clone());
        let policy = PollPolicy {
            interval: Duration::from_millis(20),
            max_polls: 1000,
        };
        let request = aapl();

        {
            let mut workflow = Workflow::new(&api, TimerSleeper).with_policy(policy);
            let run =
                tokio::time::timeout(Duration::from_millis(50), workflow.start_training(&request)).await;
            assert!(run.is_err(), "run should still be polling when cancelled");
        }

        let polls_at_drop = api.predict_calls();
        assert!(polls_at_drop >= 1);

        // Several intervals later nothing else has been sent
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(api.predict_calls(), polls_at_drop);
    }

    #[test]
    fn test_progress_percent_is_clamped() {
        let mut state = WorkflowState::default();
        state.progress = 140.0;
        assert_eq!(state.progress_percent(), 100.0);
        state.progress = -3.0;
        assert_eq!(state.progress_percent(), 0.0);
    }

    #[test]
    fn test_status_terminality() {
        assert!(!WorkflowStatus::Idle.is_terminal());
        assert!(!WorkflowStatus::Training.is_terminal());
        assert!(WorkflowStatus::Ready.is_terminal());
        assert!(WorkflowStatus::Error.is_terminal());
        assert_eq!(WorkflowStatus::Training.to_string(), "training");
    }
}
