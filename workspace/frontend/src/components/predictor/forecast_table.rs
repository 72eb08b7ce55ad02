use std::sync::Arc;

use common::presentation::{forecast_rows, format_date, Trend, FORECAST_HORIZON};
use common::PredictionResult;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub result: Arc<PredictionResult>,
}

#[function_component(ForecastTable)]
pub fn forecast_table(props: &Props) -> Html {
    let rows = forecast_rows(&props.result);
    let subtitle = props
        .result
        .metrics
        .prediction_date
        .as_deref()
        .map(|date| format!("Predictions from {}", format_date(date)));

    html! {
        <section class="card bg-base-100 shadow">
            <div class="card-body">
                <h2 class="card-title">{format!("{}-Day Price Forecast", FORECAST_HORIZON)}</h2>
                {if let Some(subtitle) = subtitle {
                    html! { <p class="text-sm text-gray-500">{subtitle}</p> }
                } else {
                    html! {}
                }}
                <div class="overflow-x-auto">
                    <table class="table table-zebra w-full">
                        <thead>
                            <tr>
                                <th>{"Date"}</th>
                                <th>{"Predicted Price"}</th>
                                <th>{"Change %"}</th>
                            </tr>
                        </thead>
                        <tbody>
                            {for rows.iter().map(|row| {
                                let trend = row.trend();
                                let change_class = match trend {
                                    Some(Trend::Up) => "text-success",
                                    Some(Trend::Down) => "text-error",
                                    None => "text-gray-500",
                                };
                                html! {
                                    <tr key={row.date.clone()}>
                                        <td>{row.date_label()}</td>
                                        <td>{row.price_label()}</td>
                                        <td class={classes!("change", trend.map(|t| t.css_class()), "font-semibold", change_class)}>
                                            {row.change_label()}
                                            {if let Some(arrow) = row.arrow() {
                                                html! { <span class="ml-2">{arrow}</span> }
                                            } else {
                                                html! {}
                                            }}
                                        </td>
                                    </tr>
                                }
                            })}
                        </tbody>
                    </table>
                </div>
            </div>
        </section>
    }
}
