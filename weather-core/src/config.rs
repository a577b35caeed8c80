use chrono_tz::Tz;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    error::{Error, Result},
    model::Coordinates,
};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Options for one run, as read from a TOML file or collected from flags.
///
/// Every field is optional so that a file and the command line can be layered;
/// [`Config::resolve`] enforces what is actually required.
///
/// Example TOML:
/// latitude = 40.4168
/// longitude = -3.7038
/// file = "/tmp/weather.png"
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Output PNG path.
    pub file: Option<PathBuf>,
    pub verbose: Option<bool>,
    /// IANA zone name used to print the timestamp, or "auto" for the forecast's zone.
    pub timezone: Option<String>,
    pub geocode: Option<bool>,
    pub compass: Option<bool>,
    /// Directory with `light/` and `dark/` pictogram sets.
    pub pictograms: Option<PathBuf>,
    /// Font file used instead of the per-platform default.
    pub font: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
}

/// What the composer needs besides the observation itself.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub output_path: PathBuf,
    /// Only gates logging.
    pub verbose: bool,
    /// Zone the timestamp is shown in; `None` keeps the observation's zone.
    pub timezone: Option<Tz>,
    pub compass: bool,
}

impl RenderConfig {
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
            verbose: false,
            timezone: None,
            compass: true,
        }
    }
}

/// Fully validated options for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub coordinates: Coordinates,
    pub render: RenderConfig,
    pub geocode: bool,
    pub pictograms: Option<PathBuf>,
    pub font: Option<PathBuf>,
    pub timeout: Duration,
}

impl Config {
    /// Load config from `explicit`, or from the platform config path if a file exists there.
    ///
    /// An explicit path that cannot be read is an error; a missing default file is not.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match Self::config_file_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(Self::default()),
            },
        };

        let contents = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
        tracing::info!(path = %path.display(), "loaded config file");

        Self::from_toml_str(&contents)
            .map_err(|e| Error::decode(format!("config file {}", path.display()), e))
    }

    pub fn from_toml_str(contents: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Path to the default config file.
    pub fn config_file_path() -> Option<PathBuf> {
        ProjectDirs::from("dev", "weather-card", "weather-card")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Layer `overrides` on top of `self`; any value set in `overrides` wins.
    pub fn merge(self, overrides: Config) -> Config {
        Config {
            latitude: overrides.latitude.or(self.latitude),
            longitude: overrides.longitude.or(self.longitude),
            file: overrides.file.or(self.file),
            verbose: overrides.verbose.or(self.verbose),
            timezone: overrides.timezone.or(self.timezone),
            geocode: overrides.geocode.or(self.geocode),
            compass: overrides.compass.or(self.compass),
            pictograms: overrides.pictograms.or(self.pictograms),
            font: overrides.font.or(self.font),
            timeout_secs: overrides.timeout_secs.or(self.timeout_secs),
        }
    }

    /// Validate and fill defaults. Runs before any network activity.
    pub fn resolve(self) -> Result<Settings> {
        let output_path = self
            .file
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| Error::Config("missing output file option".into()))?;

        let latitude = self
            .latitude
            .ok_or_else(|| Error::Config("missing latitude option".into()))?;
        let longitude = self
            .longitude
            .ok_or_else(|| Error::Config("missing longitude option".into()))?;

        if !(-90.0..=90.0).contains(&latitude) {
            return Err(Error::Config(format!(
                "latitude {latitude} is outside [-90, 90]"
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(Error::Config(format!(
                "longitude {longitude} is outside [-180, 180]"
            )));
        }

        let timezone = match self.timezone.as_deref() {
            None | Some("") | Some("auto") => None,
            Some(name) => Some(parse_timezone(name)?),
        };

        Ok(Settings {
            coordinates: Coordinates {
                latitude,
                longitude,
            },
            render: RenderConfig {
                output_path,
                verbose: self.verbose.unwrap_or(false),
                timezone,
                compass: self.compass.unwrap_or(true),
            },
            geocode: self.geocode.unwrap_or(true),
            pictograms: self.pictograms,
            font: self.font,
            timeout: Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        })
    }
}

pub(crate) fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|_| Error::Timezone(name.to_string()))
}
