use common::presentation::{self, FORECAST_HORIZON};
use common::PredictionResult;

/// Plain-text rendering of a finished forecast: metrics block, then the forecast table.
pub fn render_report(ticker: &str, result: &PredictionResult) -> String {
    let mut lines = Vec::new();

    lines.push(format!("{} price forecast", ticker));
    lines.push(String::new());
    lines.extend(render_metrics(result));
    lines.push(String::new());
    lines.extend(render_forecast_table(result));

    lines.join("\n")
}

fn render_metrics(result: &PredictionResult) -> Vec<String> {
    let metrics = &result.metrics;
    let or_dash = |value: &Option<String>, format: fn(&str) -> String| {
        value.as_deref().map(format).unwrap_or_else(|| "—".to_string())
    };

    vec![
        "Model Performance".to_string(),
        format!("  {:<16}{}", "RMSE", presentation::format_metric(metrics.rmse)),
        format!("  {:<16}{}", "MAE", presentation::format_metric(metrics.mae)),
        format!(
            "  {:<16}{}",
            "Last Updated",
            or_dash(&metrics.last_updated, presentation::format_timestamp)
        ),
        format!(
            "  {:<16}{}",
            "Prediction Date",
            or_dash(&metrics.prediction_date, presentation::format_date)
        ),
    ]
}

fn render_forecast_table(result: &PredictionResult) -> Vec<String> {
    let rows = presentation::forecast_rows(result);
    let mut lines = vec![format!("{}-Day Forecast", FORECAST_HORIZON)];

    if rows.is_empty() {
        lines.push("  No forecast data".to_string());
        return lines;
    }

    lines.push(format!("  {:<14}{:>12}  {}", "Date", "Predicted", "Change"));
    for row in rows {
        let change = match row.arrow() {
            Some(arrow) => format!("{} {}", row.change_label(), arrow),
            None => row.change_label(),
        };
        lines.push(format!("  {:<14}{:>12}  {}", row.date_label(), row.price_label(), change));
    }

    lines
}
