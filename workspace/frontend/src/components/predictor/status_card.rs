use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct Props {
    /// Progress already clamped to 0..=100
    pub progress: f64,
}

#[function_component(StatusCard)]
pub fn status_card(props: &Props) -> Html {
    html! {
        <section class="card bg-base-100 shadow">
            <div class="card-body">
                <progress class="progress progress-primary w-full" value={props.progress.to_string()} max="100"></progress>
                <div class="flex items-center gap-4 mt-4">
                    <span class="loading loading-spinner loading-lg text-primary"></span>
                    <div>
                        <h3 class="font-semibold text-lg">{"Training AI Model"}</h3>
                        <p>{"Processing historical data and news sentiment..."}</p>
                        <small class="text-gray-500">{"This may take a few minutes"}</small>
                    </div>
                </div>
            </div>
        </section>
    }
}
