//! Core library for the `skycast` weather dashboard.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The search workflow (resolve a city, fetch conditions and forecast)
//! - The persisted search history
//! - Abstraction over the weather provider
//!
//! It is used by `skycast-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod history;
pub mod model;
pub mod provider;
pub mod workflow;

pub use config::Config;
pub use error::SearchError;
pub use history::HistoryStore;
pub use model::{
    Coordinates, CurrentConditions, ForecastEntry, ForecastSet, HistoryRecord, SearchQuery,
    Snapshot,
};
pub use provider::{WeatherProvider, provider_from_config};
pub use workflow::{Dashboard, DashboardState, SearchOutcome, SearchPhase};
