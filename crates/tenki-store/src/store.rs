//! SQLite-based forecast cache implementation.
//!
//! `ForecastStore` owns the connection and exposes the three write/read
//! paths the rest of the system is built on: seeding the area master,
//! upserting one forecast row per (area, target date), and the
//! date-scoped left join used by the dashboard.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection};
use std::path::Path;

use crate::error::StoreError;
use crate::types::{Area, DisplayRow, MonitorPoint};

/// SQLite-backed forecast storage.
pub struct ForecastStore {
    conn: Connection,
}

impl ForecastStore {
    /// Open (or create) the store at the given path.
    ///
    /// Creates the database file and schema if they don't exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn =
            Connection::open(path).map_err(|e| StoreError::Connection(e.to_string()))?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory store (for testing).
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn =
            Connection::open_in_memory().map_err(|e| StoreError::Connection(e.to_string()))?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Initialize the database schema.
    ///
    /// Foreign keys are enforced so a forecast can never reference an
    /// unseeded area. The UNIQUE constraint on (area_code, target_date)
    /// is what makes repeated syncs overwrite instead of duplicate.
    fn init_schema(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            r#"
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS areas (
                area_code TEXT PRIMARY KEY,
                office_code TEXT NOT NULL,
                name TEXT NOT NULL,
                pos_y INTEGER NOT NULL,
                pos_x INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS forecasts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                area_code TEXT NOT NULL,
                target_date TEXT NOT NULL,
                weather_code TEXT,
                weather_text TEXT,
                temp_max TEXT,
                temp_min TEXT,
                pop TEXT,
                fetched_at TEXT NOT NULL,
                FOREIGN KEY (area_code) REFERENCES areas (area_code),
                UNIQUE(area_code, target_date)
            );

            CREATE INDEX IF NOT EXISTS idx_forecasts_date ON forecasts(target_date);
            "#,
        )?;
        Ok(())
    }

    /// Seed the area master table.
    ///
    /// Full replace-by-key upsert, in seed order, inside a single
    /// transaction. Re-seeding with the same data is a no-op in effect.
    pub fn seed_areas(&mut self, points: &[MonitorPoint]) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        {
            // A plain REPLACE would delete-and-reinsert the row, which
            // trips the forecasts foreign key once data exists for it.
            let mut stmt = tx.prepare(
                "INSERT INTO areas (office_code, area_code, name, pos_y, pos_x)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(area_code) DO UPDATE SET
                     office_code = excluded.office_code,
                     name = excluded.name,
                     pos_y = excluded.pos_y,
                     pos_x = excluded.pos_x",
            )?;
            for p in points {
                stmt.execute(params![p.office_code, p.area_code, p.name, p.pos_y, p.pos_x])?;
            }
        }
        tx.commit()?;
        tracing::debug!("Seeded {} monitor points", points.len());
        Ok(())
    }

    /// Write or overwrite the forecast row for (area_code, target_date).
    ///
    /// `fetched_at` is stamped with the current time on every call.
    /// Fails with `StoreError::UnknownArea` when the area was never
    /// seeded; the write is atomic per row, there are no partial
    /// states to observe.
    pub fn upsert_forecast(
        &self,
        area_code: &str,
        target_date: NaiveDate,
        weather_code: &str,
        weather_text: &str,
        temp_max: &str,
        temp_min: &str,
        pop: &str,
    ) -> Result<(), StoreError> {
        let now = Utc::now().to_rfc3339();
        let date_str = target_date.format("%Y-%m-%d").to_string();

        self.conn
            .execute(
                r#"
                INSERT INTO forecasts
                    (area_code, target_date, weather_code, weather_text, temp_max, temp_min, pop, fetched_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                ON CONFLICT(area_code, target_date) DO UPDATE SET
                    weather_code = excluded.weather_code,
                    weather_text = excluded.weather_text,
                    temp_max = excluded.temp_max,
                    temp_min = excluded.temp_min,
                    pop = excluded.pop,
                    fetched_at = excluded.fetched_at
                "#,
                params![area_code, date_str, weather_code, weather_text, temp_max, temp_min, pop, now],
            )
            .map_err(|e| StoreError::from_write(e, area_code))?;

        tracing::debug!(area_code, date = %date_str, "Upserted forecast");
        Ok(())
    }

    /// One row per seeded area, left-joined with the forecast cached
    /// for the given date. Ordered by area code so repeated calls over
    /// unchanged data return identical row sets.
    pub fn get_by_date(&self, target_date: NaiveDate) -> Result<Vec<DisplayRow>, StoreError> {
        let date_str = target_date.format("%Y-%m-%d").to_string();

        let mut stmt = self.conn.prepare(
            "SELECT a.area_code, a.office_code, a.name, a.pos_y, a.pos_x,
                    f.weather_code, f.weather_text, f.temp_max, f.temp_min, f.pop, f.fetched_at
             FROM areas a
             LEFT JOIN forecasts f
                    ON f.area_code = a.area_code AND f.target_date = ?1
             ORDER BY a.area_code",
        )?;

        let rows = stmt.query_map(params![date_str], Self::row_to_display)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(StoreError::from)
    }

    /// Full area master table, in seed-key order.
    pub fn get_all_areas(&self) -> Result<Vec<Area>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT area_code, office_code, name, pos_y, pos_x FROM areas ORDER BY area_code",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Area {
                area_code: row.get(0)?,
                office_code: row.get(1)?,
                name: row.get(2)?,
                pos_y: row.get(3)?,
                pos_x: row.get(4)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(StoreError::from)
    }

    /// Total number of cached forecast rows across all dates.
    pub fn count_forecasts(&self) -> Result<usize, StoreError> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM forecasts", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Convert a joined row to a DisplayRow.
    fn row_to_display(row: &rusqlite::Row) -> rusqlite::Result<DisplayRow> {
        let fetched_at_str: Option<String> = row.get(10)?;
        let fetched_at = fetched_at_str
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok().map(|dt| dt.with_timezone(&Utc)));

        Ok(DisplayRow {
            area: Area {
                area_code: row.get(0)?,
                office_code: row.get(1)?,
                name: row.get(2)?,
                pos_y: row.get(3)?,
                pos_x: row.get(4)?,
            },
            weather_code: row.get(5)?,
            weather_text: row.get(6)?,
            temp_max: row.get(7)?,
            temp_min: row.get(8)?,
            pop: row.get(9)?,
            fetched_at,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use crate::seed::default_monitor_points;

    fn create_test_store() -> ForecastStore {
        ForecastStore::in_memory().expect("Failed to create in-memory store")
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn tokyo() -> Vec<MonitorPoint> {
        vec![MonitorPoint::new("130000", "130010", "Tokyo", 360, 560)]
    }

    #[test]
    fn test_seed_and_read_areas() {
        let mut store = create_test_store();
        store.seed_areas(&default_monitor_points()).unwrap();

        let areas = store.get_all_areas().unwrap();
        assert_eq!(areas.len(), 13);
        let sapporo = areas.iter().find(|a| a.area_code == "016010").unwrap();
        assert_eq!(sapporo.name, "札幌");
        assert_eq!(sapporo.office_code, "016000");
    }

    #[test]
    fn test_reseed_is_idempotent() {
        let mut store = create_test_store();
        let points = default_monitor_points();
        store.seed_areas(&points).unwrap();
        store.seed_areas(&points).unwrap();

        let areas = store.get_all_areas().unwrap();
        assert_eq!(areas.len(), points.len());
    }

    #[test]
    fn test_reseed_overwrites_by_key() {
        let mut store = create_test_store();
        store.seed_areas(&tokyo()).unwrap();
        store
            .seed_areas(&[MonitorPoint::new("130000", "130010", "東京", 100, 200)])
            .unwrap();

        let areas = store.get_all_areas().unwrap();
        assert_eq!(areas.len(), 1);
        assert_eq!(areas[0].name, "東京");
        assert_eq!(areas[0].pos_y, 100);
    }

    #[test]
    fn test_reseed_with_existing_forecasts() {
        let mut store = create_test_store();
        store.seed_areas(&tokyo()).unwrap();
        store.upsert_forecast("130010", date("2024-01-01"), "100", "晴れ", "10", "2", "5").unwrap();

        // Startup re-seeding must not trip the foreign key.
        store.seed_areas(&tokyo()).unwrap();
        assert_eq!(store.count_forecasts().unwrap(), 1);
    }

    #[test]
    fn test_upsert_is_idempotent_and_advances_fetched_at() {
        let mut store = create_test_store();
        store.seed_areas(&tokyo()).unwrap();
        let d = date("2024-01-01");

        store.upsert_forecast("130010", d, "100", "晴れ", "10", "2", "5").unwrap();
        let first = store.get_by_date(d).unwrap().remove(0).fetched_at.unwrap();

        store.upsert_forecast("130010", d, "100", "晴れ", "10", "2", "5").unwrap();
        let rows = store.get_by_date(d).unwrap();

        assert_eq!(store.count_forecasts().unwrap(), 1);
        assert_eq!(rows.len(), 1);
        assert!(rows[0].fetched_at.unwrap() > first);
    }

    #[test]
    fn test_upsert_overwrites_in_place() {
        let mut store = create_test_store();
        store.seed_areas(&tokyo()).unwrap();
        let d = date("2024-01-01");

        store.upsert_forecast("130010", d, "100", "晴れ", "10", "2", "5").unwrap();
        store.upsert_forecast("130010", d, "300", "雨", "8", "3", "70").unwrap();

        let rows = store.get_by_date(d).unwrap();
        assert_eq!(store.count_forecasts().unwrap(), 1);
        assert_eq!(rows[0].weather_code.as_deref(), Some("300"));
        assert_eq!(rows[0].pop.as_deref(), Some("70"));
    }

    #[test]
    fn test_distinct_dates_keep_distinct_rows() {
        let mut store = create_test_store();
        store.seed_areas(&tokyo()).unwrap();

        store.upsert_forecast("130010", date("2024-01-01"), "100", "晴れ", "10", "2", "5").unwrap();
        store.upsert_forecast("130010", date("2024-01-02"), "200", "曇り", "9", "3", "30").unwrap();

        assert_eq!(store.count_forecasts().unwrap(), 2);
    }

    #[test]
    fn test_unknown_area_is_rejected() {
        let mut store = create_test_store();
        store.seed_areas(&tokyo()).unwrap();

        let result =
            store.upsert_forecast("999999", date("2024-01-01"), "100", "晴れ", "10", "2", "5");
        assert!(matches!(result, Err(StoreError::UnknownArea(code)) if code == "999999"));
        assert_eq!(store.count_forecasts().unwrap(), 0);
    }

    #[test]
    fn test_get_by_date_left_join_completeness() {
        let mut store = create_test_store();
        store.seed_areas(&tokyo()).unwrap();
        store.upsert_forecast("130010", date("2024-01-01"), "100", "晴れ", "10", "2", "5").unwrap();

        let with_data = store.get_by_date(date("2024-01-01")).unwrap();
        assert_eq!(with_data.len(), 1);
        assert!(with_data[0].has_data());
        assert_eq!(with_data[0].area.name, "Tokyo");
        assert_eq!(with_data[0].temp_max.as_deref(), Some("10"));

        let without_data = store.get_by_date(date("2024-01-02")).unwrap();
        assert_eq!(without_data.len(), 1);
        assert!(!without_data[0].has_data());
        assert!(without_data[0].weather_text.is_none());
        assert!(without_data[0].temp_max.is_none());
        assert!(without_data[0].fetched_at.is_none());
    }

    #[test]
    fn test_get_by_date_one_row_per_area() {
        let mut store = create_test_store();
        store.seed_areas(&default_monitor_points()).unwrap();
        let d = date("2024-01-01");

        // Only a few areas have fresh data; every area must still appear.
        store.upsert_forecast("130010", d, "100", "晴れ", "10", "2", "5").unwrap();
        store.upsert_forecast("016010", d, "400", "雪", "-1", "-6", "80").unwrap();

        let rows = store.get_by_date(d).unwrap();
        assert_eq!(rows.len(), 13);
        assert_eq!(rows.iter().filter(|r| r.has_data()).count(), 2);
    }

    #[test]
    fn test_get_by_date_ordering_is_stable() {
        let mut store = create_test_store();
        store.seed_areas(&default_monitor_points()).unwrap();

        let first = store.get_by_date(date("2024-01-01")).unwrap();
        let second = store.get_by_date(date("2024-01-01")).unwrap();
        let codes_a: Vec<_> = first.iter().map(|r| r.area.area_code.clone()).collect();
        let codes_b: Vec<_> = second.iter().map(|r| r.area.area_code.clone()).collect();
        assert_eq!(codes_a, codes_b);

        let mut sorted = codes_a.clone();
        sorted.sort();
        assert_eq!(codes_a, sorted);
    }

    #[test]
    fn test_placeholder_values_are_stored_verbatim() {
        let mut store = create_test_store();
        store.seed_areas(&tokyo()).unwrap();
        let d = date("2024-01-01");

        store.upsert_forecast("130010", d, "201", "曇り時々晴れ", "--", "--", "0").unwrap();

        let rows = store.get_by_date(d).unwrap();
        assert_eq!(rows[0].temp_max.as_deref(), Some("--"));
        assert_eq!(rows[0].temp_min.as_deref(), Some("--"));
        assert!(rows[0].has_data());
    }
}
