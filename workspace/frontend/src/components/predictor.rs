mod control_panel;
mod forecast_chart;
mod forecast_table;
mod metrics_card;
mod status_card;
mod view;

pub use view::StockPredictor;
