//! Query chart options and data shaping.
//!
//! The x axis is seconds since the oldest retained sample; labels show
//! wall-clock `HH:MM:SS`. The y axis starts from a suggested range and
//! widens to fit the data.

use chrono::{DateTime, Local, TimeDelta, Utc};
use ratatui::style::Color;

use crate::data::BoundedSeries;

/// Every option the chart reads.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    /// Line colour of the running-queries dataset.
    pub running_color: Color,
    /// Line colour of the blocked-queries dataset.
    pub blocked_color: Color,
    /// Colour of axis labels.
    pub label_color: Color,
    /// Lower end of the y range when the data doesn't go below it.
    pub suggested_min: f64,
    /// Upper end of the y range when the data doesn't go above it.
    pub suggested_max: f64,
    /// Maximum number of y axis labels.
    pub max_ticks: usize,
    /// `strftime` pattern of x axis labels.
    pub time_format: &'static str,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            running_color: Color::Rgb(0x6b, 0xd0, 0x98),
            blocked_color: Color::Rgb(0xf1, 0x7e, 0x5d),
            label_color: Color::Rgb(0x9f, 0x9f, 0x9f),
            suggested_min: 0.0,
            suggested_max: 100.0,
            max_ticks: 5,
            time_format: "%H:%M:%S",
        }
    }
}

impl ChartOptions {
    /// Y range covering the suggested range and every sample.
    pub fn y_bounds(&self, series: &[&BoundedSeries]) -> [f64; 2] {
        let min = series
            .iter()
            .filter_map(|s| s.min_value())
            .fold(self.suggested_min, f64::min);
        let max = series
            .iter()
            .filter_map(|s| s.max_value())
            .fold(self.suggested_max, f64::max);
        [min, max]
    }

    /// Evenly spaced y labels, at most `max_ticks` of them.
    pub fn y_labels(&self, bounds: [f64; 2]) -> Vec<String> {
        let ticks = self.max_ticks.max(2);
        let step = (bounds[1] - bounds[0]) / (ticks - 1) as f64;
        (0..ticks)
            .map(|i| format!("{:.0}", bounds[0] + step * i as f64))
            .collect()
    }

    /// Labels for the start, middle and end of the x range.
    pub fn x_labels(&self, origin: DateTime<Utc>, span_secs: f64) -> Vec<String> {
        [0.0, span_secs / 2.0, span_secs]
            .iter()
            .map(|offset| {
                let at = origin + TimeDelta::milliseconds((offset * 1000.0) as i64);
                at.with_timezone(&Local).format(self.time_format).to_string()
            })
            .collect()
    }
}

/// Timestamp the x axis counts from.
pub fn origin(series: &[&BoundedSeries]) -> Option<DateTime<Utc>> {
    series
        .iter()
        .filter_map(|s| s.oldest())
        .map(|sample| sample.timestamp)
        .min()
}

/// Chart points: seconds since `origin` against the sample value.
pub fn points(series: &BoundedSeries, origin: DateTime<Utc>) -> Vec<(f64, f64)> {
    series
        .iter()
        .map(|sample| {
            let secs = (sample.timestamp - origin).num_milliseconds() as f64 / 1000.0;
            (secs, sample.value)
        })
        .collect()
}

/// X range in seconds; never narrower than one second.
pub fn x_bounds(points: &[&[(f64, f64)]]) -> [f64; 2] {
    let end = points
        .iter()
        .flat_map(|p| p.iter().map(|(x, _)| *x))
        .fold(0.0, f64::max);
    [0.0, end.max(1.0)]
}
