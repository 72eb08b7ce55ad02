use std::sync::Arc;

use common::presentation::{ChartData, ACTUAL_SERIES_LABEL, PREDICTED_SERIES_LABEL};
use common::PredictionResult;
use plotly::common::{DashType, Line, Mode};
use plotly::{Layout, Scatter, Trace};
use web_sys::HtmlElement;
use yew::prelude::*;

use crate::chart;

const CHART_DIV_ID: &str = "price-prediction-chart";

#[derive(Properties, PartialEq)]
pub struct Props {
    pub result: Arc<PredictionResult>,
}

#[function_component(ForecastChart)]
pub fn forecast_chart(props: &Props) -> Html {
    let container_ref = use_node_ref();

    use_effect_with(
        (container_ref.clone(), props.result.clone()),
        move |(container_ref, result)| {
            if let Some(element) = container_ref.cast::<HtmlElement>() {
                element.set_id(CHART_DIV_ID);

                let data = ChartData::from_result(result);

                let actual = Scatter::new(data.labels.clone(), data.actual)
                    .mode(Mode::Lines)
                    .name(ACTUAL_SERIES_LABEL)
                    .line(Line::new().color("#4361ee").width(3.0));

                let predicted = Scatter::new(data.labels, data.predicted)
                    .mode(Mode::Lines)
                    .name(PREDICTED_SERIES_LABEL)
                    .line(
                        Line::new()
                            .color("#f72585")
                            .width(3.0)
                            .dash(DashType::Dash),
                    );

                let layout = Layout::new()
                    .y_axis(plotly::layout::Axis::new().tick_prefix("$"))
                    .height(400);

                let traces: Vec<Box<dyn Trace>> = vec![actual, predicted];
                chart::render(CHART_DIV_ID, traces, &layout);
            }
            || ()
        },
    );

    html! {
        <section class="card bg-base-100 shadow">
            <div class="card-body">
                <h2 class="card-title">{"Price Prediction Chart"}</h2>
                <div ref={container_ref} style="width: 100%; height: 400px;"></div>
            </div>
        </section>
    }
}
