//! Thin bridge to the Plotly.js bundle loaded by `index.html`.

use std::sync::Once;

use plotly::{Layout, Trace};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = Plotly)]
    fn newPlot(div_id: &str, data: JsValue, layout: JsValue);

    #[wasm_bindgen(js_namespace = Plotly, js_name = setPlotConfig)]
    fn set_plot_config(config: JsValue);
}

static CONFIGURE: Once = Once::new();

/// Apply the global Plotly defaults. Only the first call does anything.
pub fn ensure_configured() {
    CONFIGURE.call_once(|| {
        let config = serde_json::json!({
            "responsive": true,
            "displaylogo": false,
        });
        match js_sys::JSON::parse(&config.to_string()) {
            Ok(config) => {
                set_plot_config(config);
                log::debug!("Plotly defaults configured");
            }
            Err(e) => log::error!("Failed to build Plotly config: {:?}", e),
        }
    });
}

/// Draw `traces` into the element with id `div_id`.
pub fn render(div_id: &str, traces: Vec<Box<dyn Trace>>, layout: &Layout) {
    ensure_configured();

    let data_js = js_sys::Array::new();
    for trace in traces {
        match js_sys::JSON::parse(&trace.to_json()) {
            Ok(trace_js) => {
                data_js.push(&trace_js);
            }
            Err(e) => log::error!("Failed to parse chart trace for {}: {:?}", div_id, e),
        }
    }

    let layout_js = match serde_json::to_string(layout).map(|json| js_sys::JSON::parse(&json)) {
        Ok(Ok(layout_js)) => layout_js,
        _ => {
            log::error!("Failed to serialize chart layout for {}", div_id);
            return;
        }
    };

    newPlot(div_id, data_js.into(), layout_js);
}
