use yew::prelude::*;

mod chart;
mod components;
pub mod api_client;
pub mod common;
pub mod hooks;
pub mod settings;

use components::{Layout, StockPredictor};

#[function_component(App)]
pub fn app() -> Html {
    html! {
        <Layout>
            <StockPredictor />
        </Layout>
    }
}

#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn run_app() {
    // Initialize settings first
    settings::init_settings();

    // Initialize logger with settings
    let settings = settings::get_settings();
    wasm_logger::init(wasm_logger::Config::new(settings.log_level));

    log::info!("=== Stock Predictor Frontend Starting ===");
    log::info!("Application settings: {:?}", settings);
    log::debug!("API base URL: {}", settings.api_base_url());
    log::debug!("Debug mode: {}", settings.debug_mode);

    chart::ensure_configured();

    log::trace!("Initializing Yew renderer");
    yew::Renderer::<App>::new().render();
    log::info!("Application initialized successfully");
}
