use common::{TrainRequest, Workflow, WorkflowState};
use futures::future::{abortable, AbortHandle};
use yew::prelude::*;

use crate::api_client::{ForecastClient, TimerSleeper};

/// Runs the forecast workflow for a component.
///
/// Returns the latest state snapshot and a callback that starts a new run.
/// Starting a run aborts the one in flight, and unmounting the component
/// aborts whatever is still pending, so no stale poll can write into the
/// state afterwards.
#[hook]
pub fn use_forecast_workflow() -> (UseStateHandle<WorkflowState>, Callback<TrainRequest>) {
    let state = use_state(WorkflowState::default);
    let task = use_mut_ref(|| None::<AbortHandle>);

    {
        let task = task.clone();
        use_effect_with((), move |_| {
            move || {
                if let Some(handle) = task.borrow_mut().take() {
                    log::debug!("Component unmounted, aborting forecast run");
                    handle.abort();
                }
            }
        });
    }

    let start = {
        let state = state.clone();
        let task = task.clone();

        use_callback((), move |request: TrainRequest, _| {
            if let Some(previous) = task.borrow_mut().take() {
                log::debug!("Aborting previous forecast run");
                previous.abort();
            }

            let state = state.clone();
            let run = async move {
                let mut workflow = Workflow::new(ForecastClient::from_settings(), TimerSleeper)
                    .with_observer(move |snapshot: &WorkflowState| {
                        if snapshot.status.is_terminal() {
                            log::info!("Forecast run finished: {}", snapshot.status);
                        }
                        state.set(snapshot.clone());
                    });
                workflow.start_training(&request).await;
            };

            let (run, handle) = abortable(run);
            *task.borrow_mut() = Some(handle);

            wasm_bindgen_futures::spawn_local(async move {
                if run.await.is_err() {
                    log::debug!("Forecast run aborted");
                }
            });
        })
    };

    (state, start)
}
