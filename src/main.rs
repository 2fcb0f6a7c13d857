use anyhow::Result;
use chrono::Local;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

use tenki_core::error::{ReqwestErrorExt, RusqliteErrorExt};
use tenki_core::{AppError, DatabaseError, NetworkError};
use tenki_store::seed::default_monitor_points;
use tenki_store::{ForecastStore, StoreError};
use tenki_weather::{JmaClient, QueryService, SyncEngine, WeatherError};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize core
    tenki_core::init()?;

    if let Err(e) = run().await {
        tracing::error!(error = %e, "Sync run failed");
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> Result<(), AppError> {
    let (config, _) = tenki_core::Config::load_validated()?;

    if let Some(parent) = config.db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut store = ForecastStore::open(&config.db_path).map_err(store_app_error)?;
    store
        .seed_areas(&default_monitor_points())
        .map_err(store_app_error)?;
    let store = Arc::new(Mutex::new(store));

    let client = JmaClient::new(
        &config.forecast.base_url,
        Duration::from_secs(config.forecast.request_timeout_secs),
    )
    .map_err(weather_app_error)?;
    let engine = SyncEngine::new(
        client,
        store.clone(),
        config.forecast.max_concurrent_fetches,
    );

    let today = Local::now().date_naive();
    let report = engine.sync(today).await.map_err(store_app_error)?;
    for failure in &report.failures {
        tracing::warn!(area = %failure.name, error = %failure.error, "Area not updated");
    }
    let cached = store.lock().count_forecasts().map_err(store_app_error)?;

    let query = QueryService::new(store);
    println!(
        "Forecasts for {} ({} synced, {} failed, {} rows cached):",
        today,
        report.synced,
        report.failures.len(),
        cached,
    );
    for entry in query.forecasts_for(today).map_err(store_app_error)? {
        let row = &entry.row;
        if row.has_data() {
            println!(
                "  {:<6} {:<4} {:>3}° / {:>3}°  pop {:>3}%  {}",
                row.area.area_code,
                row.area.name,
                row.temp_max.as_deref().unwrap_or("--"),
                row.temp_min.as_deref().unwrap_or("--"),
                row.pop.as_deref().unwrap_or("--"),
                entry.category.label(),
            );
        } else {
            println!("  {:<6} {:<4} (no data)", row.area.area_code, row.area.name);
        }
    }

    Ok(())
}

/// Map store failures onto the boundary error type. An unknown area
/// means the seeding is broken, which no user action can repair; it
/// surfaces as a service error rather than a database one.
fn store_app_error(err: StoreError) -> AppError {
    match err {
        StoreError::UnknownArea(code) => {
            AppError::Service(format!("forecast references unseeded area {code}"))
        }
        StoreError::Connection(msg) => DatabaseError::ConnectionFailed(msg).into(),
        StoreError::Query(e) => e.into_database_error().into(),
    }
}

/// Map feed failures onto the boundary error type.
fn weather_app_error(err: WeatherError) -> AppError {
    match err {
        WeatherError::Network(e) => e.into_network_error().into(),
        WeatherError::Http { status } => NetworkError::ServerError {
            status,
            message: "forecast feed request failed".to_string(),
        }
        .into(),
        WeatherError::Parse(msg) => NetworkError::InvalidResponse(msg).into(),
    }
}
