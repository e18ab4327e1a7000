//! Human-friendly output formatting for snapshots.

use chrono::{DateTime, Local, Utc};
use skycast_core::{CurrentConditions, ForecastEntry, Snapshot};

/// Render a full snapshot: current conditions plus the daily forecast.
pub fn snapshot(snapshot: &Snapshot) -> String {
    let mut out = current(&snapshot.weather);

    if !snapshot.forecast.is_empty() {
        out.push('\n');
        out.push_str("Forecast:\n");
        for entry in snapshot.forecast.entries() {
            out.push_str(&forecast_line(entry));
            out.push('\n');
        }
    }

    out
}

fn current(weather: &CurrentConditions) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} {}\n", glyph(&weather.icon), weather.location_name));
    out.push_str(&format!("  {:>5.1} °C  {}\n", weather.temperature_c, weather.condition));
    out.push_str(&format!(
        "  humidity {}%  wind {:.1} m/s\n",
        weather.humidity_pct, weather.wind_speed_mps
    ));
    out.push_str(&format!("  observed {}\n", local_time(weather.observation_time)));
    out
}

fn forecast_line(entry: &ForecastEntry) -> String {
    format!(
        "  {}  {} {:>5.1} °C  {}",
        entry.timestamp.with_timezone(&Local).format("%a %d %b"),
        glyph(&entry.icon),
        entry.temperature_c,
        entry.condition
    )
}

fn local_time(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// OpenWeather icon ids ("01d", "10n", ...) to a console glyph.
fn glyph(icon: &str) -> &'static str {
    match icon.get(..2) {
        Some("01") => "☀",
        Some("02") => "🌤",
        Some("03") | Some("04") => "☁",
        Some("09") | Some("10") => "🌧",
        Some("11") => "⛈",
        Some("13") => "❄",
        Some("50") => "🌫",
        _ => "·",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skycast_core::ForecastSet;

    fn sample() -> Snapshot {
        Snapshot {
            weather: CurrentConditions {
                location_name: "London".to_owned(),
                temperature_c: 17.3,
                humidity_pct: 62,
                wind_speed_mps: 4.6,
                condition: "broken clouds".to_owned(),
                icon: "04d".to_owned(),
                observation_time: DateTime::from_timestamp(1_717_243_200, 0)
                    .expect("valid timestamp"),
            },
            forecast: ForecastSet::from_timeline(vec![ForecastEntry {
                timestamp: DateTime::from_timestamp(1_717_329_600, 0).expect("valid timestamp"),
                temperature_c: 14.0,
                condition: "light rain".to_owned(),
                icon: "10d".to_owned(),
            }]),
        }
    }

    #[test]
    fn snapshot_render_mentions_city_and_forecast() {
        let out = snapshot(&sample());

        assert!(out.contains("London"));
        assert!(out.contains("broken clouds"));
        assert!(out.contains("humidity 62%"));
        assert!(out.contains("Forecast:"));
        assert!(out.contains("light rain"));
    }

    #[test]
    fn glyph_maps_icon_families() {
        assert_eq!(glyph("01d"), "☀");
        assert_eq!(glyph("04n"), "☁");
        assert_eq!(glyph("10d"), "🌧");
        assert_eq!(glyph(""), "·");
    }
}
