use chrono::NaiveDate;
use common::{TrainRequest, WorkflowStatus};
use yew::prelude::*;

use super::control_panel::ControlPanel;
use super::forecast_chart::ForecastChart;
use super::forecast_table::ForecastTable;
use super::metrics_card::MetricsCard;
use super::status_card::StatusCard;
use crate::common::error::ErrorDisplay;
use crate::hooks::use_forecast_workflow;

const DEFAULT_TICKER: &str = "AAPL";
const DEFAULT_START_DATE: &str = "2020-01-01";
const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

#[function_component(StockPredictor)]
pub fn stock_predictor() -> Html {
    let ticker = use_state(|| DEFAULT_TICKER.to_string());
    let start_date = use_state(|| DEFAULT_START_DATE.to_string());
    let validation_error = use_state(|| None::<String>);
    let (workflow, start) = use_forecast_workflow();

    let on_ticker_change = {
        let ticker = ticker.clone();
        Callback::from(move |value: String| ticker.set(value))
    };

    let on_date_change = {
        let start_date = start_date.clone();
        Callback::from(move |value: String| start_date.set(value))
    };

    // Used by both "Generate Predictions" and "Try Again"
    let on_submit = {
        let ticker = ticker.clone();
        let start_date = start_date.clone();
        let validation_error = validation_error.clone();
        let start = start.clone();

        Callback::from(move |_: ()| {
            let parsed = match NaiveDate::parse_from_str(&start_date, DATE_INPUT_FORMAT) {
                Ok(date) => date,
                Err(_) => {
                    validation_error.set(Some(format!("Invalid start date: {}", *start_date)));
                    return;
                }
            };

            match TrainRequest::new(&ticker, parsed, today()) {
                Ok(request) => {
                    validation_error.set(None);
                    log::info!("Starting forecast for {} from {}", request.ticker, request.start_date);
                    start.emit(request);
                }
                Err(e) => {
                    log::warn!("Rejected form input: {}", e);
                    validation_error.set(Some(e.to_string()));
                }
            }
        })
    };

    let state = &*workflow;
    let is_training = state.is_training();

    let content = match state.status {
        WorkflowStatus::Idle => html! {},
        WorkflowStatus::Training => html! {
            <StatusCard progress={state.progress_percent()} />
        },
        WorkflowStatus::Error => {
            let on_retry = on_submit.clone();
            html! {
                <ErrorDisplay
                    message={state.error.clone().unwrap_or_default()}
                    on_retry={Some(on_retry)}
                />
            }
        }
        WorkflowStatus::Ready => match &state.result {
            Some(result) => html! {
                <>
                    <MetricsCard metrics={result.metrics.clone()} />
                    <ForecastChart result={result.clone()} />
                    <ForecastTable result={result.clone()} />
                </>
            },
            None => html! {},
        },
    };

    html! {
        <div class="grid grid-cols-1 lg:grid-cols-3 gap-6">
            <div class="lg:col-span-1">
                <ControlPanel
                    ticker={(*ticker).clone()}
                    start_date={(*start_date).clone()}
                    max_date={today().format(DATE_INPUT_FORMAT).to_string()}
                    is_training={is_training}
                    progress={state.progress}
                    validation_error={(*validation_error).clone()}
                    {on_ticker_change}
                    {on_date_change}
                    {on_submit}
                />
            </div>
            <div class="lg:col-span-2 flex flex-col gap-6">
                {content}
            </div>
        </div>
    }
}
