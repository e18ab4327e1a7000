//! Error kinds surfaced by a single search attempt.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    /// The geocoding lookup rejected the query or returned no match.
    #[error("city not found: {0}")]
    CityNotFound(String),

    /// The current-conditions endpoint returned a non-success response.
    #[error("current conditions fetch failed: {0}")]
    WeatherFetch(String),

    /// The forecast endpoint returned a non-success response.
    #[error("forecast fetch failed: {0}")]
    ForecastFetch(String),

    /// A search was submitted while another one was still running.
    #[error("a search is already in progress")]
    SearchInProgress,

    /// Transport failures, malformed responses, storage I/O.
    #[error(transparent)]
    Unknown(#[from] anyhow::Error),
}

impl SearchError {
    /// The single user-visible message for this error; details stay in the
    /// error chain for logging.
    pub fn user_message(&self) -> String {
        match self {
            Self::CityNotFound(_) => "City not found".to_owned(),
            Self::WeatherFetch(_) => "Could not fetch current conditions".to_owned(),
            Self::ForecastFetch(_) => "Could not fetch the forecast".to_owned(),
            Self::SearchInProgress => "A search is already running".to_owned(),
            Self::Unknown(_) => "Something went wrong, please try again".to_owned(),
        }
    }
}
