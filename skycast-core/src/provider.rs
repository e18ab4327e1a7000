use crate::{
    Config,
    error::SearchError,
    model::{Coordinates, CurrentConditions, ForecastSet, SearchQuery},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Seam between the search workflow and the external weather service.
///
/// One search calls the three operations in order: resolve, current
/// conditions, forecast. Each call either yields its payload or fails the
/// whole attempt; there are no retries.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Resolve a free-text city name to coordinates.
    async fn resolve_city(&self, query: &SearchQuery) -> Result<Coordinates, SearchError>;

    /// Current conditions at the given coordinates.
    async fn current_conditions(
        &self,
        coords: &Coordinates,
    ) -> Result<CurrentConditions, SearchError>;

    /// Daily forecast at the given coordinates, at most one entry per day.
    async fn forecast(&self, coords: &Coordinates) -> Result<ForecastSet, SearchError>;
}

/// Construct the OpenWeather-backed provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.require_api_key()?;
    Ok(Box::new(OpenWeatherProvider::new(api_key.to_owned())?))
}
