use common::presentation::{format_metric, format_timestamp};
use common::Metrics;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub metrics: Metrics,
}

#[function_component(MetricsCard)]
pub fn metrics_card(props: &Props) -> Html {
    let metrics = &props.metrics;
    let last_updated = metrics
        .last_updated
        .as_deref()
        .map(format_timestamp)
        .unwrap_or_else(|| "—".to_string());

    html! {
        <section class="card bg-base-100 shadow">
            <div class="card-body">
                <h2 class="card-title">{"Model Performance Metrics"}</h2>
                <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
                    <div class="stat">
                        <div class="stat-value text-primary">{format_metric(metrics.rmse)}</div>
                        <div class="stat-desc">{"Root Mean Squared Error"}</div>
                    </div>
                    <div class="stat">
                        <div class="stat-value text-primary">{format_metric(metrics.mae)}</div>
                        <div class="stat-desc">{"Mean Absolute Error"}</div>
                    </div>
                    <div class="stat">
                        <div class="stat-value text-lg">{last_updated}</div>
                        <div class="stat-desc">{"Last Updated"}</div>
                    </div>
                </div>
            </div>
        </section>
    }
}
