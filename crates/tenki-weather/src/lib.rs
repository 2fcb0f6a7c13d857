//! Forecast ingestion for tenki
//!
//! Pulls per-office forecast documents from the JMA open data feed,
//! normalizes heterogeneous weather codes/text into a small category
//! set, and upserts one row per (area, date) into the local store.
//! One area's failure never aborts a sync pass.

pub mod classify;
pub mod client;
pub mod error;
pub mod payload;
pub mod query;
pub mod sync;
pub mod weekly;

pub use classify::WeatherCategory;
pub use client::JmaClient;
pub use error::WeatherError;
pub use payload::{ForecastDocument, TodaySlice, UNKNOWN_VALUE};
pub use query::{AreaForecast, QueryService};
pub use sync::{SyncEngine, SyncFailure, SyncReport};
pub use weekly::{weekly_outlook, OutlookDay};
