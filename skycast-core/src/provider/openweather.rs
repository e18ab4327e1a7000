use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::{
    error::SearchError,
    model::{Coordinates, CurrentConditions, ForecastEntry, ForecastSet, SearchQuery},
};

use super::WeatherProvider;

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";
const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_owned())
    }

    /// Point the provider at a different host (used by tests).
    pub fn with_base_url(api_key: String, base_url: String) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { api_key, base_url, http })
    }

    async fn get_text(&self, path: &str, query: &[(&str, &str)]) -> Result<(reqwest::StatusCode, String)> {
        let url = format!("{}{}", self.base_url, path);

        let res = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("Failed to send request to OpenWeather ({path})"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read OpenWeather response body ({path})"))?;

        tracing::debug!(%status, path, "openweather response");
        Ok((status, body))
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn resolve_city(&self, query: &SearchQuery) -> Result<Coordinates, SearchError> {
        let (status, body) = self
            .get_text(
                "/geo/1.0/direct",
                &[("q", query.as_str()), ("limit", "1"), ("appid", self.api_key.as_str())],
            )
            .await?;

        // A rejected lookup and an empty match list read the same to the user.
        if !status.is_success() {
            tracing::debug!(%status, body = %truncate_body(&body), "geocoding rejected");
            return Err(SearchError::CityNotFound(query.as_str().to_owned()));
        }

        let parsed: Vec<GeoEntry> =
            serde_json::from_str(&body).context("Failed to parse OpenWeather geocoding JSON")?;

        let Some(hit) = parsed.first() else {
            return Err(SearchError::CityNotFound(query.as_str().to_owned()));
        };

        tracing::info!(city = query.as_str(), lat = hit.lat, lon = hit.lon, "resolved city");
        Ok(Coordinates { latitude: hit.lat, longitude: hit.lon })
    }

    async fn current_conditions(
        &self,
        coords: &Coordinates,
    ) -> Result<CurrentConditions, SearchError> {
        let lat = coords.latitude.to_string();
        let lon = coords.longitude.to_string();
        let (status, body) = self
            .get_text(
                "/data/2.5/weather",
                &[
                    ("lat", lat.as_str()),
                    ("lon", lon.as_str()),
                    ("appid", self.api_key.as_str()),
                    ("units", "metric"),
                ],
            )
            .await?;

        if !status.is_success() {
            return Err(SearchError::WeatherFetch(format!(
                "OpenWeather current request failed with status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        let parsed: OwCurrentResponse =
            serde_json::from_str(&body).context("Failed to parse OpenWeather current JSON")?;

        let observation_time = DateTime::from_timestamp(parsed.dt, 0).unwrap_or_else(Utc::now);
        let (condition, icon) = primary_condition(parsed.weather);

        Ok(CurrentConditions {
            location_name: parsed.name,
            temperature_c: parsed.main.temp,
            humidity_pct: parsed.main.humidity,
            wind_speed_mps: parsed.wind.speed,
            condition,
            icon,
            observation_time,
        })
    }

    async fn forecast(&self, coords: &Coordinates) -> Result<ForecastSet, SearchError> {
        let lat = coords.latitude.to_string();
        let lon = coords.longitude.to_string();
        let (status, body) = self
            .get_text(
                "/data/2.5/forecast",
                &[
                    ("lat", lat.as_str()),
                    ("lon", lon.as_str()),
                    ("appid", self.api_key.as_str()),
                    ("units", "metric"),
                ],
            )
            .await?;

        if !status.is_success() {
            return Err(SearchError::ForecastFetch(format!(
                "OpenWeather forecast request failed with status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        let parsed: OwForecastResponse =
            serde_json::from_str(&body).context("Failed to parse OpenWeather forecast JSON")?;

        let timeline = parsed.list.into_iter().map(|raw| {
            let (condition, icon) = primary_condition(raw.weather);
            ForecastEntry {
                timestamp: DateTime::from_timestamp(raw.dt, 0).unwrap_or_else(Utc::now),
                temperature_c: raw.main.temp,
                condition,
                icon,
            }
        });

        Ok(ForecastSet::from_timeline(timeline))
    }
}

fn primary_condition(weather: Vec<OwWeather>) -> (String, String) {
    weather
        .into_iter()
        .next()
        .map(|w| (w.description, w.icon))
        .unwrap_or_else(|| ("Unknown".to_owned(), String::new()))
}

#[derive(Debug, Deserialize)]
struct GeoEntry {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX { format!("{}...", &body[..MAX]) } else { body.to_owned() }
}
