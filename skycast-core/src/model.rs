use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A trimmed, non-empty city name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
    /// Trim the raw input. Empty and whitespace-only input yields `None`;
    /// such requests are silently dropped by the workflow.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_owned()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Resolved location of a query. Used once per search, never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub location_name: String,
    pub temperature_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub condition: String,
    /// Provider icon id, e.g. "04d".
    pub icon: String,
    pub observation_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub timestamp: DateTime<Utc>,
    pub temperature_c: f64,
    pub condition: String,
    pub icon: String,
}

impl ForecastEntry {
    /// Calendar date of this entry in the process-local time zone.
    pub fn local_date(&self) -> NaiveDate {
        self.timestamp.with_timezone(&Local).date_naive()
    }
}

/// At most one forecast entry per local calendar date, earliest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ForecastSet(Vec<ForecastEntry>);

impl ForecastSet {
    pub const MAX_DAYS: usize = 5;

    /// Condense a raw 3-hour timeline into one entry per day.
    ///
    /// Scans the timeline in order, keeps the first entry seen for each new
    /// local calendar date, and stops once `MAX_DAYS` dates are covered.
    pub fn from_timeline(timeline: impl IntoIterator<Item = ForecastEntry>) -> Self {
        let mut entries: Vec<ForecastEntry> = Vec::with_capacity(Self::MAX_DAYS);

        for entry in timeline {
            let date = entry.local_date();
            if entries.iter().any(|seen| seen.local_date() == date) {
                continue;
            }
            entries.push(entry);
            if entries.len() == Self::MAX_DAYS {
                break;
            }
        }

        Self(entries)
    }

    pub fn entries(&self) -> &[ForecastEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The paired current-conditions + forecast result of one successful search.
///
/// Serialized field names are the on-disk contract of the snapshot file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub weather: CurrentConditions,
    pub forecast: ForecastSet,
}

/// Persisted search history: past city names plus the last snapshot.
#[derive(Debug, Clone, Default)]
pub struct HistoryRecord {
    /// Insertion-ordered, no duplicates (exact string match).
    pub cities: Vec<String>,
    pub last_snapshot: Option<Snapshot>,
}
