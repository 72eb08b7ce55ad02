//! View model shared by the dashboard and the CLI report.
//!
//! Turns a [`PredictionResult`] into chart series and forecast table rows,
//! and formats dates the way the dashboard shows them (Indian Standard Time).

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};

use crate::prediction::PredictionResult;

/// Number of forecast days shown in the table.
pub const FORECAST_HORIZON: usize = 10;

pub const ACTUAL_SERIES_LABEL: &str = "Historical Prices";
pub const PREDICTED_SERIES_LABEL: &str = "Model Predictions";

/// UTC+05:30, no daylight saving.
const IST_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// Two aligned line series over a shared label axis. `None` is a gap.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub actual: Vec<Option<f64>>,
    pub predicted: Vec<Option<f64>>,
}

impl ChartData {
    pub fn from_result(result: &PredictionResult) -> Self {
        let historical = &result.historical;
        let forecast = &result.forecast;

        let labels = historical
            .dates
            .iter()
            .chain(forecast.dates.iter())
            .cloned()
            .collect();

        let actual = historical
            .actual
            .iter()
            .copied()
            .map(Some)
            .chain(std::iter::repeat_n(None, forecast.dates.len()))
            .collect();

        // In-sample predictions cover the tail of the historical window
        let leading_gap = historical.dates.len().saturating_sub(historical.predicted.len());
        let predicted = std::iter::repeat_n(None, leading_gap)
            .chain(historical.predicted.iter().copied().map(Some))
            .chain(forecast.predicted.iter().copied().map(Some))
            .collect();

        Self {
            labels,
            actual,
            predicted,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
}

impl Trend {
    pub fn css_class(&self) -> &'static str {
        match self {
            Trend::Up => "positive",
            Trend::Down => "negative",
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            Trend::Up => "↑",
            Trend::Down => "↓",
        }
    }
}

/// One line of the forecast table.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRow {
    pub date: String,
    pub predicted: f64,
    /// Change against the last actual price, in percent, rounded to 2 decimals
    pub change_pct: Option<f64>,
    /// Only the first row carries the trend arrow
    pub show_arrow: bool,
}

impl ForecastRow {
    pub fn date_label(&self) -> String {
        format_date(&self.date)
    }

    pub fn price_label(&self) -> String {
        format_price(self.predicted)
    }

    pub fn trend(&self) -> Option<Trend> {
        self.change_pct
            .map(|change| if change >= 0.0 { Trend::Up } else { Trend::Down })
    }

    pub fn change_label(&self) -> String {
        match self.change_pct {
            Some(change) if change >= 0.0 => format!("+{:.2}%", change),
            Some(change) => format!("{:.2}%", change),
            None => "n/a".to_string(),
        }
    }

    pub fn arrow(&self) -> Option<&'static str> {
        if self.show_arrow {
            self.trend().map(|trend| trend.arrow())
        } else {
            None
        }
    }
}

/// Rows for the forecast table, capped at [`FORECAST_HORIZON`].
pub fn forecast_rows(result: &PredictionResult) -> Vec<ForecastRow> {
    let reference = result.historical.last_actual().filter(|p| *p != 0.0 && p.is_finite());

    result
        .forecast
        .dates
        .iter()
        .zip(result.forecast.predicted.iter())
        .take(FORECAST_HORIZON)
        .enumerate()
        .map(|(i, (date, predicted))| ForecastRow {
            date: date.clone(),
            predicted: *predicted,
            change_pct: reference.map(|current| percent_change(current, *predicted)),
            show_arrow: i == 0,
        })
        .collect()
}

fn percent_change(current: f64, predicted: f64) -> f64 {
    let rounded = ((predicted - current) / current * 100.0 * 100.0).round() / 100.0;
    // Collapse -0.0 so it reads as "+0.00%"
    if rounded == 0.0 { 0.0 } else { rounded }
}

pub fn format_metric(value: f64) -> String {
    format!("{:.2}", value)
}

pub fn format_price(value: f64) -> String {
    format!("${:.2}", value)
}

pub fn format_progress(progress: f64) -> String {
    format!("{}%", progress)
}

/// `2024-01-02` -> `2 Jan 2024`, in IST. Unparseable input is returned as is.
pub fn format_date(raw: &str) -> String {
    to_ist(raw)
        .map(|dt| dt.format("%-d %b %Y").to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// Timestamp in IST as `d/m/yyyy, h:mm:ss am`. Unparseable input is returned as is.
pub fn format_timestamp(raw: &str) -> String {
    to_ist(raw)
        .map(|dt| dt.format("%-d/%-m/%Y, %-I:%M:%S %P").to_string())
        .unwrap_or_else(|| raw.to_string())
}

fn to_ist(raw: &str) -> Option<DateTime<FixedOffset>> {
    let ist = FixedOffset::east_opt(IST_OFFSET_SECS)?;
    Some(parse_instant(raw.trim())?.with_timezone(&ist))
}

/// Accepts RFC 3339, naive date-times (taken as UTC) and plain dates (UTC midnight).
fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
