use common::presentation::format_progress;
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub ticker: String,
    pub start_date: String,
    /// Latest selectable start date (`YYYY-MM-DD`)
    pub max_date: String,
    pub is_training: bool,
    pub progress: f64,
    #[prop_or_default]
    pub validation_error: Option<String>,
    pub on_ticker_change: Callback<String>,
    pub on_date_change: Callback<String>,
    pub on_submit: Callback<()>,
}

#[function_component(ControlPanel)]
pub fn control_panel(props: &Props) -> Html {
    let on_ticker_input = {
        let on_ticker_change = props.on_ticker_change.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            on_ticker_change.emit(input.value().to_uppercase());
        })
    };

    let on_date_input = {
        let on_date_change = props.on_date_change.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            on_date_change.emit(input.value());
        })
    };

    let on_click = {
        let on_submit = props.on_submit.clone();
        Callback::from(move |_: MouseEvent| {
            log::debug!("User requested predictions");
            on_submit.emit(());
        })
    };

    html! {
        <section class="card bg-base-100 shadow">
            <div class="card-body gap-4">
                <h2 class="card-title">
                    <i class="fas fa-chart-bar"></i>
                    {"Stock Selection"}
                </h2>

                <div class="form-control">
                    <label class="label" for="ticker-input">
                        <span class="label-text">
                            <i class="fas fa-dollar-sign mr-2"></i>
                            {"Ticker Symbol"}
                        </span>
                    </label>
                    <input
                        id="ticker-input"
                        type="text"
                        class="input input-bordered"
                        value={props.ticker.clone()}
                        oninput={on_ticker_input}
                        placeholder="e.g. AAPL, MSFT, GOOGL"
                        disabled={props.is_training}
                    />
                </div>

                <div class="form-control">
                    <label class="label" for="date-input">
                        <span class="label-text">
                            <i class="fas fa-calendar mr-2"></i>
                            {"Start Date"}
                        </span>
                    </label>
                    <input
                        id="date-input"
                        type="date"
                        class="input input-bordered"
                        value={props.start_date.clone()}
                        onchange={on_date_input}
                        max={props.max_date.clone()}
                        disabled={props.is_training}
                    />
                </div>

                {if let Some(error) = &props.validation_error {
                    html! { <p class="text-sm text-error">{error}</p> }
                } else {
                    html! {}
                }}

                <button
                    class="btn btn-primary"
                    onclick={on_click}
                    disabled={props.is_training}
                >
                    {if props.is_training {
                        html! {
                            <>
                                <span class="loading loading-spinner loading-sm"></span>
                                <span>{format!("Training Model ({})", format_progress(props.progress))}</span>
                            </>
                        }
                    } else {
                        html! {
                            <>
                                <i class="fas fa-chart-line"></i>
                                <span>{"Generate Predictions"}</span>
                            </>
                        }
                    }}
                </button>
            </div>
        </section>
    }
}
