//! Serde model of the JMA per-office forecast document.
//!
//! The feed returns an array of reports per office: index 0 is the
//! short-range (few-day) report, index 1 the weekly report when
//! present. Each report carries parallel arrays aligned by
//! `timeDefines`, with per-area entries nested inside.

use serde::Deserialize;

use crate::error::WeatherError;

/// Placeholder threaded through to presentation for values the feed
/// did not provide. Never an error.
pub const UNKNOWN_VALUE: &str = "--";

/// One report (short-range or weekly) of an office document.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastDocument {
    #[serde(default)]
    pub time_series: Vec<TimeSeries>,
}

/// A dated series of parallel value arrays with per-area entries.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeries {
    #[serde(default)]
    pub time_defines: Vec<String>,
    #[serde(default)]
    pub areas: Vec<AreaSeries>,
}

/// The value arrays for one sub-area of the office.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaSeries {
    pub area: AreaRef,
    #[serde(default)]
    pub weather_codes: Vec<String>,
    #[serde(default)]
    pub weathers: Vec<String>,
    #[serde(default)]
    pub pops: Vec<String>,
    #[serde(default)]
    pub temps: Vec<String>,
    #[serde(default)]
    pub temps_min: Vec<String>,
    #[serde(default)]
    pub temps_max: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AreaRef {
    pub code: String,
    #[serde(default)]
    pub name: String,
}

impl TimeSeries {
    /// Sub-series for the given area code.
    ///
    /// Some offices group sub-areas under codes that differ from the
    /// monitor point's; the first entry is used then. Degraded but
    /// documented behavior, not an error.
    pub fn area_series(&self, area_code: &str) -> Option<&AreaSeries> {
        self.areas
            .iter()
            .find(|a| a.area.code == area_code)
            .or_else(|| self.areas.first())
    }
}

/// "Today's" values extracted from a short-range report for one area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodaySlice {
    pub weather_code: String,
    pub weather_text: String,
    pub temp_max: String,
    pub temp_min: String,
    pub pop: String,
}

/// Extract today's forecast values from the short-range report.
///
/// Today is taken as index 0 of each array. The index can drift with
/// the fetch time of day; this mirrors the upstream behavior and is a
/// known approximation until a timeDefines-based date match replaces it.
///
/// Absent temperatures resolve to [`UNKNOWN_VALUE`]; a short temps
/// array carries `[max]` only (morning publications), a full one is
/// ordered `[min, max]`. That ordering is an observed quirk of the
/// feed and must be preserved.
pub fn extract_today(doc: &ForecastDocument, area_code: &str) -> Result<TodaySlice, WeatherError> {
    let weather_ts = doc
        .time_series
        .first()
        .ok_or_else(|| WeatherError::Parse("document has no time series".into()))?;
    let weather = weather_ts
        .area_series(area_code)
        .ok_or_else(|| WeatherError::Parse("weather series has no areas".into()))?;

    let weather_code = weather
        .weather_codes
        .first()
        .cloned()
        .ok_or_else(|| WeatherError::Parse("weatherCodes is empty".into()))?;
    let weather_text = weather.weathers.first().cloned().unwrap_or_default();

    let pop = doc
        .time_series
        .get(1)
        .and_then(|ts| ts.area_series(area_code))
        .and_then(|a| a.pops.first().cloned())
        .unwrap_or_else(|| "0".to_string());

    let mut temp_max = UNKNOWN_VALUE.to_string();
    let mut temp_min = UNKNOWN_VALUE.to_string();
    if let Some(temps) = doc
        .time_series
        .get(2)
        .and_then(|ts| ts.area_series(area_code))
        .map(|a| a.temps.as_slice())
    {
        match temps {
            [] => {}
            // Morning publications may carry the max only.
            [only] => temp_max = only.clone(),
            [min, max, ..] => {
                temp_min = min.clone();
                temp_max = max.clone();
            }
        }
    }

    Ok(TodaySlice {
        weather_code,
        weather_text,
        temp_max,
        temp_min,
        pop,
    })
}
