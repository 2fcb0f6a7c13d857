use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A monitored location as seeded into the area master table.
///
/// `office_code` is the remote source grouping the area belongs to and
/// doubles as the fetch key against the forecast feed. The position
/// fields are canvas coordinates consumed only by presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorPoint {
    pub office_code: String,
    pub area_code: String,
    pub name: String,
    pub pos_y: i32,
    pub pos_x: i32,
}

impl MonitorPoint {
    pub fn new(office_code: &str, area_code: &str, name: &str, pos_y: i32, pos_x: i32) -> Self {
        Self {
            office_code: office_code.to_string(),
            area_code: area_code.to_string(),
            name: name.to_string(),
            pos_y,
            pos_x,
        }
    }
}

/// A row of the area master table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    pub area_code: String,
    pub office_code: String,
    pub name: String,
    pub pos_y: i32,
    pub pos_x: i32,
}

/// One area's view for a given target date: the area row left-joined
/// with whatever forecast is cached for that date. Forecast fields are
/// `None` when no sync has ever written that (area, date) key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayRow {
    pub area: Area,
    pub weather_code: Option<String>,
    pub weather_text: Option<String>,
    pub temp_max: Option<String>,
    pub temp_min: Option<String>,
    pub pop: Option<String>,
    pub fetched_at: Option<DateTime<Utc>>,
}

impl DisplayRow {
    /// Whether any forecast has been cached for this area and date.
    /// Presentation uses this to grey out placeholder cards.
    pub fn has_data(&self) -> bool {
        self.weather_code.is_some()
    }
}
