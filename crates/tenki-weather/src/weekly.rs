//! Weekly outlook extraction.
//!
//! The weekly report (index 1 of the office document set) is read live
//! for the detail view and never persisted; only the short-range
//! "today" slice goes through the store. The weekly series carries
//! codes but no condition text, so categories come from the code path
//! of the classifier.

use chrono::{DateTime, NaiveDate};

use crate::classify::WeatherCategory;
use crate::payload::{ForecastDocument, UNKNOWN_VALUE};

/// One day of the weekly outlook for an area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlookDay {
    pub date: NaiveDate,
    pub weather_code: String,
    pub category: WeatherCategory,
    pub pop: String,
    pub temp_min: String,
    pub temp_max: String,
}

/// Extract the weekly outlook for an area from an office document set.
///
/// Days align with the weekly report's `timeDefines`; entries whose
/// date marker does not parse are dropped. Missing values resolve to
/// placeholders, never errors. Returns an empty outlook when the
/// office published no weekly report.
pub fn weekly_outlook(docs: &[ForecastDocument], area_code: &str) -> Vec<OutlookDay> {
    let Some(doc) = docs.get(1) else {
        return Vec::new();
    };
    let Some(weather_ts) = doc.time_series.first() else {
        return Vec::new();
    };
    let Some(weather) = weather_ts.area_series(area_code) else {
        return Vec::new();
    };
    let temps = doc.time_series.get(1).and_then(|ts| ts.area_series(area_code));

    weather_ts
        .time_defines
        .iter()
        .enumerate()
        .filter_map(|(i, raw)| {
            let date = DateTime::parse_from_rfc3339(raw).ok()?.date_naive();
            let weather_code = weather
                .weather_codes
                .get(i)
                .cloned()
                .unwrap_or_else(|| "100".to_string());
            let category = WeatherCategory::from_code(&weather_code);
            let pop = weather
                .pops
                .get(i)
                .cloned()
                .unwrap_or_else(|| UNKNOWN_VALUE.to_string());
            let temp_min = temps
                .and_then(|t| t.temps_min.get(i))
                .cloned()
                .unwrap_or_else(|| UNKNOWN_VALUE.to_string());
            let temp_max = temps
                .and_then(|t| t.temps_max.get(i))
                .cloned()
                .unwrap_or_else(|| UNKNOWN_VALUE.to_string());

            Some(OutlookDay {
                date,
                weather_code,
                category,
                pop,
                temp_min,
                temp_max,
            })
        })
        .collect()
}
