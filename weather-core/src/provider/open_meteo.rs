use async_trait::async_trait;
use chrono::{NaiveDateTime, TimeZone};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::{
    config::parse_timezone,
    error::{Error, Result},
    model::{Coordinates, WeatherObservation},
};

use super::{WeatherProvider, truncate_body};

const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com/v1/forecast";

const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,apparent_temperature,is_day,\
precipitation_probability,weather_code,wind_speed_10m,wind_direction_10m";

const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    base_url: String,
    http: Client,
}

impl OpenMeteoProvider {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| Error::Network {
                stage: "building forecast client",
                source,
            })?;

        Ok(Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            http,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Debug, Deserialize)]
struct OmCurrent {
    time: String,
    temperature_2m: f64,
    relative_humidity_2m: f64,
    apparent_temperature: f64,
    is_day: i32,
    precipitation_probability: Option<f64>,
    weather_code: i32,
    wind_speed_10m: f64,
    wind_direction_10m: f64,
}

#[derive(Debug, Deserialize)]
struct OmResponse {
    timezone: String,
    current: OmCurrent,
}

/// Turn a forecast response body into an observation.
///
/// `current.time` is a zone-less local time; it is placed in the zone named by `timezone`.
pub fn parse_response(body: &str) -> Result<WeatherObservation> {
    let parsed: OmResponse =
        serde_json::from_str(body).map_err(|e| Error::decode("weather response", e))?;

    let tz = parse_timezone(&parsed.timezone)?;

    let naive = NaiveDateTime::parse_from_str(&parsed.current.time, TIME_FORMAT).map_err(|e| {
        Error::TimeParse {
            value: parsed.current.time.clone(),
            reason: e.to_string(),
        }
    })?;

    let observed_at = tz
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| Error::TimeParse {
            value: parsed.current.time.clone(),
            reason: format!("local time does not exist in {tz}"),
        })?;

    let current = parsed.current;
    Ok(WeatherObservation {
        observed_at,
        temperature_c: current.temperature_2m,
        apparent_temperature_c: current.apparent_temperature,
        relative_humidity_pct: current.relative_humidity_2m,
        precipitation_probability_pct: current.precipitation_probability.unwrap_or_default(),
        is_daytime: current.is_day == 1,
        weather_code: current.weather_code,
        wind_speed_kmh: current.wind_speed_10m,
        wind_direction_deg: current.wind_direction_10m,
    })
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    async fn current(&self, location: Coordinates) -> Result<WeatherObservation> {
        let latitude = location.latitude.to_string();
        let longitude = location.longitude.to_string();

        let res = self
            .http
            .get(&self.base_url)
            .query(&[
                ("latitude", latitude.as_str()),
                ("longitude", longitude.as_str()),
                ("current", CURRENT_FIELDS),
                ("timezone", "auto"),
                ("forecast_days", "1"),
            ])
            .send()
            .await
            .map_err(|source| Error::Network {
                stage: "requesting weather info",
                source,
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|source| Error::Network {
            stage: "reading weather response",
            source,
        })?;

        tracing::info!(%body, "weather response body");

        if !status.is_success() {
            return Err(Error::Status {
                stage: "weather",
                status,
                body: truncate_body(&body),
            });
        }

        let observation = parse_response(&body)?;
        tracing::info!(?observation, "weather data");
        Ok(observation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Offset, Timelike};

    const SAMPLE: &str = r#"{
        "latitude": 40.42,
        "longitude": -3.7,
        "timezone": "Europe/Madrid",
        "timezone_abbreviation": "CEST",
        "current_units": {"time": "iso8601"},
        "current": {
            "time": "2024-06-01T14:15",
            "interval": 900,
            "temperature_2m": 21.5,
            "relative_humidity_2m": 40,
            "apparent_temperature": 20.1,
            "is_day": 1,
            "precipitation_probability": 0,
            "weather_code": 0,
            "wind_speed_10m": 10.0,
            "wind_direction_10m": 0
        }
    }"#;

    #[test]
    fn parses_current_conditions() {
        let obs = parse_response(SAMPLE).expect("sample must parse");

        assert_eq!(obs.temperature_c, 21.5);
        assert_eq!(obs.relative_humidity_pct, 40.0);
        assert_eq!(obs.precipitation_probability_pct, 0.0);
        assert!(obs.is_daytime);
        assert_eq!(obs.weather_code, 0);
        assert_eq!(obs.wind_speed_kmh, 10.0);
        assert_eq!(obs.wind_direction_deg, 0.0);
    }

    #[test]
    fn time_is_placed_in_reported_zone() {
        let obs = parse_response(SAMPLE).unwrap();

        assert_eq!(obs.observed_at.timezone(), chrono_tz::Europe::Madrid);
        assert_eq!(obs.observed_at.hour(), 14);
        assert_eq!(obs.observed_at.offset().fix().local_minus_utc(), 2 * 3600);
    }

    #[test]
    fn is_day_zero_means_night() {
        let body = SAMPLE.replace("\"is_day\": 1", "\"is_day\": 0");
        assert!(!parse_response(&body).unwrap().is_daytime);
    }

    #[test]
    fn null_precipitation_probability_reads_as_zero() {
        let body = SAMPLE.replace(
            "\"precipitation_probability\": 0",
            "\"precipitation_probability\": null",
        );
        assert_eq!(parse_response(&body).unwrap().precipitation_probability_pct, 0.0);
    }

    #[test]
    fn unknown_zone_is_a_timezone_error() {
        let body = SAMPLE.replace("Europe/Madrid", "Nowhere/Special");
        assert!(matches!(parse_response(&body), Err(Error::Timezone(_))));
    }

    #[test]
    fn malformed_time_is_a_time_parse_error() {
        let body = SAMPLE.replace("2024-06-01T14:15", "yesterday");
        assert!(matches!(parse_response(&body), Err(Error::TimeParse { .. })));
    }

    #[test]
    fn skipped_local_time_is_a_time_parse_error() {
        // Clocks jump from 02:00 to 03:00 in Madrid on this date.
        let body = SAMPLE.replace("2024-06-01T14:15", "2024-03-31T02:30");
        assert!(matches!(parse_response(&body), Err(Error::TimeParse { .. })));
    }

    #[test]
    fn malformed_json_is_a_decode_error() {
        assert!(matches!(parse_response("{\"current\":"), Err(Error::Decode { .. })));
    }

    #[tokio::test]
    async fn unreachable_service_is_a_network_error() {
        let provider = OpenMeteoProvider::new(Duration::from_secs(2))
            .unwrap()
            .with_base_url("http://127.0.0.1:9/v1/forecast");

        let err = provider
            .current(Coordinates {
                latitude: 0.0,
                longitude: 0.0,
            })
            .await
            .unwrap_err();

        assert!(err.is_network());
    }
}
