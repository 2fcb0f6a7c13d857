//! Read-side projection over the forecast store.

use std::sync::Arc;

use chrono::NaiveDate;
use parking_lot::Mutex;

use tenki_store::{DisplayRow, ForecastStore, StoreError};

use crate::classify::WeatherCategory;

/// A display row enriched with the category derived from the stored
/// raw code/text. For rows with no cached data the category is
/// Unknown and presentation shows a placeholder card.
#[derive(Debug, Clone)]
pub struct AreaForecast {
    pub row: DisplayRow,
    pub category: WeatherCategory,
}

/// Pure read projection: what do we know as of date D, one entry per
/// registered area regardless of how much of it ever synced.
pub struct QueryService {
    store: Arc<Mutex<ForecastStore>>,
}

impl QueryService {
    pub fn new(store: Arc<Mutex<ForecastStore>>) -> Self {
        Self { store }
    }

    /// One entry per registered area for the given date, forecast
    /// fields empty where nothing was ever synced.
    pub fn forecasts_for(&self, date: NaiveDate) -> Result<Vec<AreaForecast>, StoreError> {
        let rows = self.store.lock().get_by_date(date)?;
        Ok(rows
            .into_iter()
            .map(|row| {
                let category = if row.has_data() {
                    WeatherCategory::classify(
                        row.weather_code.as_deref().unwrap_or(""),
                        row.weather_text.as_deref().unwrap_or(""),
                    )
                } else {
                    WeatherCategory::Unknown
                };
                AreaForecast { row, category }
            })
            .collect())
    }
}
