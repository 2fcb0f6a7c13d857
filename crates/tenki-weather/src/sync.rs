//! One full sync pass: fetch, extract, classify, upsert.
//!
//! Each registered area is handled independently. Fetch or parse
//! trouble for one area is recorded in the report and the pass moves
//! on; only store failures (broken seeding, unreachable database) are
//! systemic and abort the pass.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use parking_lot::Mutex;
use tokio::task::JoinSet;

use tenki_store::{ForecastStore, StoreError};

use crate::classify::WeatherCategory;
use crate::client::JmaClient;
use crate::error::WeatherError;
use crate::payload::{extract_today, ForecastDocument};

/// Outcome of a sync pass.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Areas whose forecast row was written for the target date.
    pub synced: usize,
    /// Areas skipped this pass, with the reason. The caller decides
    /// whether and how to surface these.
    pub failures: Vec<SyncFailure>,
}

impl SyncReport {
    pub fn all_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

/// One area that could not be synced this pass.
///
/// The error is shared because several areas can ride the same office
/// fetch, and a failed fetch fails them all.
#[derive(Debug, Clone)]
pub struct SyncFailure {
    pub area_code: String,
    pub name: String,
    pub error: Arc<WeatherError>,
}

/// Pulls remote forecasts for every registered area and upserts them
/// into the shared store, one row per (area, target date).
pub struct SyncEngine {
    client: JmaClient,
    store: Arc<Mutex<ForecastStore>>,
    max_concurrent_fetches: usize,
}

impl SyncEngine {
    pub fn new(
        client: JmaClient,
        store: Arc<Mutex<ForecastStore>>,
        max_concurrent_fetches: usize,
    ) -> Self {
        Self {
            client,
            store,
            max_concurrent_fetches: max_concurrent_fetches.max(1),
        }
    }

    /// Run one sync pass for the given target date.
    ///
    /// Offices are fetched once each even when several areas share
    /// them, with a bounded number of fetches in flight. Upserts are
    /// serialized through the store mutex; each area writes a disjoint
    /// key, so ordering across areas is irrelevant.
    pub async fn sync(&self, today: NaiveDate) -> Result<SyncReport, StoreError> {
        let areas = self.store.lock().get_all_areas()?;

        let mut offices: Vec<String> = Vec::new();
        for area in &areas {
            if !offices.contains(&area.office_code) {
                offices.push(area.office_code.clone());
            }
        }
        tracing::info!(
            areas = areas.len(),
            offices = offices.len(),
            date = %today,
            "Starting sync pass"
        );

        let payloads = self.fetch_offices(offices).await;

        let mut report = SyncReport::default();
        for area in &areas {
            let outcome = match payloads.get(&area.office_code) {
                Some(Ok(docs)) => docs
                    .first()
                    .ok_or_else(|| Arc::new(WeatherError::Parse("empty document set".into())))
                    .and_then(|doc| extract_today(doc, &area.area_code).map_err(Arc::new)),
                Some(Err(e)) => Err(Arc::clone(e)),
                None => Err(Arc::new(WeatherError::Parse(
                    "fetch task did not complete".into(),
                ))),
            };

            match outcome {
                Ok(slice) => {
                    let category =
                        WeatherCategory::classify(&slice.weather_code, &slice.weather_text);
                    tracing::debug!(area = %area.name, ?category, "Extracted today's forecast");

                    // Stored values are the raw remote code/text; the
                    // category is re-derived at read time.
                    self.store.lock().upsert_forecast(
                        &area.area_code,
                        today,
                        &slice.weather_code,
                        &slice.weather_text,
                        &slice.temp_max,
                        &slice.temp_min,
                        &slice.pop,
                    )?;
                    report.synced += 1;
                }
                Err(error) => {
                    tracing::warn!(area = %area.name, %error, "Skipping area for this pass");
                    report.failures.push(SyncFailure {
                        area_code: area.area_code.clone(),
                        name: area.name.clone(),
                        error,
                    });
                }
            }
        }

        tracing::info!(
            synced = report.synced,
            failed = report.failures.len(),
            "Sync pass finished"
        );
        Ok(report)
    }

    /// Fetch every office document set with a bounded number of
    /// requests in flight.
    async fn fetch_offices(
        &self,
        offices: Vec<String>,
    ) -> HashMap<String, Result<Vec<ForecastDocument>, Arc<WeatherError>>> {
        let mut results = HashMap::with_capacity(offices.len());
        let mut pending = offices.into_iter();
        let mut join_set: JoinSet<(String, Result<Vec<ForecastDocument>, WeatherError>)> =
            JoinSet::new();

        loop {
            while join_set.len() < self.max_concurrent_fetches {
                match pending.next() {
                    Some(office) => {
                        let client = self.client.clone();
                        join_set.spawn(async move {
                            let result = client.fetch_office(&office).await;
                            (office, result)
                        });
                    }
                    None => break,
                }
            }

            match join_set.join_next().await {
                Some(Ok((office, result))) => {
                    results.insert(office, result.map_err(Arc::new));
                }
                Some(Err(e)) => {
                    tracing::error!(error = %e, "Office fetch task failed");
                }
                None => break,
            }
        }

        results
    }
}
