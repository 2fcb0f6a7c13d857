use serde::{Deserialize, Serialize};

/// Weather categories normalized from JMA codes and condition text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCategory {
    Clear,
    PartlyCloudy,
    Cloudy,
    Rain,
    Snow,
    Thunder,
    #[default]
    Unknown,
}

/// Telop codes in the 2xx band that denote cloud turning to rain.
/// The band digit alone reads as Cloudy, so these are mapped
/// individually; the set must stay identical across releases to keep
/// historically stored rows comparable.
const RAIN_EXCEPTION_CODES: &[&str] = &["202", "203"];

impl WeatherCategory {
    /// Classify a free-text condition string ("晴れ時々くもり", ...).
    ///
    /// First match wins: thunder, snow and rain markers dominate
    /// everything else, mixed clear/cloud marks partly cloudy, a lone
    /// clear mark is clear, and anything unrecognized reads as cloudy.
    pub fn from_text(text: &str) -> Self {
        let text = text.trim();
        if text.is_empty() {
            return Self::Unknown;
        }
        if text.contains('雷') {
            return Self::Thunder;
        }
        if text.contains('雪') {
            return Self::Snow;
        }
        if text.contains('雨') {
            return Self::Rain;
        }
        let clear = text.contains('晴');
        let cloudy = text.contains('曇') || text.contains("くもり");
        match (clear, cloudy) {
            (true, true) => Self::PartlyCloudy,
            (true, false) => Self::Clear,
            _ => Self::Cloudy,
        }
    }

    /// Classify a JMA telop code by its leading digit, used where only
    /// code arrays are available (the weekly series). Never panics;
    /// malformed codes read as Unknown.
    pub fn from_code(code: &str) -> Self {
        match code.chars().next() {
            Some('1') => Self::Clear,
            Some('2') if RAIN_EXCEPTION_CODES.contains(&code) => Self::Rain,
            Some('2') => Self::Cloudy,
            Some('3') => Self::Rain,
            Some('4') => Self::Snow,
            _ => Self::Unknown,
        }
    }

    /// Classify from whatever the feed provided: the text path when
    /// condition text exists, otherwise the coarser code path.
    pub fn classify(code: &str, text: &str) -> Self {
        if !text.trim().is_empty() {
            Self::from_text(text)
        } else {
            Self::from_code(code)
        }
    }

    /// Get a human-readable description
    pub fn label(&self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::PartlyCloudy => "Partly Cloudy",
            Self::Cloudy => "Cloudy",
            Self::Rain => "Rain",
            Self::Snow => "Snow",
            Self::Thunder => "Thunder",
            Self::Unknown => "Unknown",
        }
    }

    /// Get icon name for the presentation layer
    pub fn icon_name(&self) -> &'static str {
        match self {
            Self::Clear => "sun",
            Self::PartlyCloudy => "cloud_sun",
            Self::Cloudy => "cloud",
            Self::Rain => "cloud_rain",
            Self::Snow => "cloud_snow",
            Self::Thunder => "cloud_lightning",
            Self::Unknown => "question",
        }
    }
}
