//! On-disk persistence tests for ForecastStore.
//!
//! The in-memory tests in the crate cover query semantics; these make
//! sure the cache actually survives a process restart, which is the
//! whole point of decoupling reads from the remote feed.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use chrono::NaiveDate;
use tenki_store::{ForecastStore, MonitorPoint};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[test]
fn forecasts_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("weather_intelligence.db");
    let d = date("2024-01-01");

    {
        let mut store = ForecastStore::open(&db_path).unwrap();
        store
            .seed_areas(&[MonitorPoint::new("130000", "130010", "東京", 360, 560)])
            .unwrap();
        store
            .upsert_forecast("130010", d, "100", "晴れ", "10", "2", "5")
            .unwrap();
    }

    let store = ForecastStore::open(&db_path).unwrap();
    let rows = store.get_by_date(d).unwrap();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].has_data());
    assert_eq!(rows[0].weather_text.as_deref(), Some("晴れ"));
}

#[test]
fn foreign_keys_enforced_after_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("weather_intelligence.db");

    {
        let mut store = ForecastStore::open(&db_path).unwrap();
        store
            .seed_areas(&[MonitorPoint::new("130000", "130010", "東京", 360, 560)])
            .unwrap();
    }

    // The pragma is per-connection; a fresh open must still reject
    // forecasts for unseeded areas.
    let store = ForecastStore::open(&db_path).unwrap();
    let result = store.upsert_forecast("999999", date("2024-01-01"), "100", "晴れ", "10", "2", "5");
    assert!(matches!(
        result,
        Err(tenki_store::StoreError::UnknownArea(_))
    ));
}

#[test]
fn stale_entries_persist_for_historical_query() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("weather_intelligence.db");

    let mut store = ForecastStore::open(&db_path).unwrap();
    store
        .seed_areas(&[MonitorPoint::new("130000", "130010", "東京", 360, 560)])
        .unwrap();

    store
        .upsert_forecast("130010", date("2024-01-01"), "100", "晴れ", "10", "2", "5")
        .unwrap();
    store
        .upsert_forecast("130010", date("2024-01-02"), "300", "雨", "8", "4", "90")
        .unwrap();

    // Syncing a later date never deletes earlier rows.
    let yesterday = store.get_by_date(date("2024-01-01")).unwrap();
    assert_eq!(yesterday[0].weather_text.as_deref(), Some("晴れ"));
}
