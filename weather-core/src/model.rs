use chrono::DateTime;
use chrono_tz::Tz;

/// A point on the globe, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Current conditions at a point, as reported by the forecast service.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherObservation {
    /// Observation instant in the zone the forecast service reported.
    pub observed_at: DateTime<Tz>,
    pub temperature_c: f64,
    pub apparent_temperature_c: f64,
    pub relative_humidity_pct: f64,
    pub precipitation_probability_pct: f64,
    pub is_daytime: bool,
    /// WMO weather interpretation code.
    pub weather_code: i32,
    pub wind_speed_kmh: f64,
    /// Degrees clockwise from north the wind blows from.
    pub wind_direction_deg: f64,
}

/// Display name for a coordinate. Empty when geocoding was skipped or found nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceName(String);

impl PlaceName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for PlaceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
