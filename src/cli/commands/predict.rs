use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, bail};
use chrono::{Local, NaiveDate};
use common::{ForecastApi, PollPolicy, PredictionResult, TrainRequest, Workflow, WorkflowState, WorkflowStatus};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use crate::client::{ForecastClient, TokioSleeper};
use crate::config::Settings;
use crate::report::render_report;

const PROGRESS_TEMPLATE: &str = "{spinner:.green} {prefix} [{bar:40.cyan/blue}] {pos:>3}% {msg}";

pub async fn predict(settings: &Settings, ticker: &str, start_date: NaiveDate, json: bool) -> Result<()> {
    let request = TrainRequest::new(ticker, start_date, Local::now().date_naive())?;
    info!("Requesting forecast for {} from {}", request.ticker, request.start_date);
    debug!("Service: {} policy: {:?}", settings.api_base_url, settings.poll_policy());

    let client = ForecastClient::new(&settings.api_base_url)?;
    let bar = progress_bar(&request.ticker);

    let outcome = tokio::select! {
        outcome = run_workflow(client, settings.poll_policy(), &request, bar.clone()) => outcome,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted while waiting for {}", request.ticker);
            bar.abandon_with_message("interrupted");
            bail!("Interrupted before the forecast was ready");
        }
    };
    let result = outcome?;

    if json {
        println!("{}", serde_json::to_string_pretty(&*result)?);
    } else {
        println!("{}", render_report(&request.ticker, &result));
    }
    Ok(())
}

/// Drives one train-then-poll run, mirroring progress onto `bar`.
pub(crate) async fn run_workflow<A: ForecastApi>(
    api: A,
    policy: PollPolicy,
    request: &TrainRequest,
    bar: ProgressBar,
) -> Result<Arc<PredictionResult>> {
    let observer_bar = bar.clone();
    let mut workflow = Workflow::new(api, TokioSleeper)
        .with_policy(policy)
        .with_observer(move |state: &WorkflowState| {
            if state.is_training() {
                observer_bar.set_position(state.progress_percent().round() as u64);
                observer_bar.set_message(format!("poll {}", state.poll_count));
            }
        });

    workflow.start_training(request).await;
    let state = workflow.state();
    match (state.status, &state.result) {
        (WorkflowStatus::Ready, Some(result)) => {
            bar.finish_and_clear();
            info!("Forecast for {} ready after {} polls", request.ticker, state.poll_count);
            Ok(Arc::clone(result))
        }
        _ => {
            let message = state
                .error
                .clone()
                .unwrap_or_else(|| format!("Workflow ended in state {}", state.status));
            bar.abandon_with_message(message.clone());
            bail!(message)
        }
    }
}

fn progress_bar(ticker: &str) -> ProgressBar {
    let bar = ProgressBar::new(100);
    let style = ProgressStyle::with_template(PROGRESS_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");
    bar.set_style(style);
    bar.set_prefix(format!("Training {}", ticker));
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}
