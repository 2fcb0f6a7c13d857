//! Local forecast cache for tenki.
//!
//! A SQLite-backed store decoupling the slow remote forecast feed from
//! a fast local read path: an area master table seeded at startup and
//! one forecast row per (area, target date), overwritten in place on
//! every successful sync.

pub mod error;
pub mod seed;
pub mod store;
pub mod types;

pub use error::StoreError;
pub use seed::MONITOR_POINTS;
pub use store::ForecastStore;
pub use types::{Area, DisplayRow, MonitorPoint};
