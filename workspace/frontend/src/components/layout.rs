use chrono::Datelike;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub children: Children,
}

#[function_component(Layout)]
pub fn layout(props: &Props) -> Html {
    let year = chrono::Local::now().year();

    html! {
        <div class="flex flex-col min-h-screen bg-base-200">
            <header class="bg-primary text-primary-content shadow">
                <div class="max-w-6xl mx-auto px-6 py-8">
                    <h1 class="text-3xl font-bold flex items-center gap-3">
                        <i class="fas fa-chart-line"></i>
                        {"Stock Price Prediction with News and Sentiment Analysis"}
                    </h1>
                    <p class="mt-2 opacity-80">
                        {"Harness the power of LSTM and real-time news sentiment to forecast market trends and make smarter investment decisions."}
                    </p>
                </div>
            </header>
            <main class="flex-1 w-full max-w-6xl mx-auto p-6">
                { for props.children.iter() }
            </main>
            <footer class="footer footer-center p-4 bg-base-300 text-base-content">
                <p>{format!("© {} Stock Predictor | Powered by LSTM & News Sentiment Analysis", year)}</p>
            </footer>
        </div>
    }
}
