//! Core library for the `weather-card` CLI.
//!
//! This crate defines:
//! - Configuration layering and validation
//! - Abstractions over the forecast and reverse-geocoding services
//! - Shared domain models (observations, place names)
//! - The composer that turns an observation into a 300x300 PNG card
//!
//! It is used by `weather-card-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod geocoder;
pub mod model;
pub mod provider;
pub mod render;

pub use config::{Config, RenderConfig, Settings};
pub use error::{Error, Result};
pub use geocoder::{NoGeocoder, NominatimGeocoder, ReverseGeocoder};
pub use model::{Coordinates, PlaceName, WeatherObservation};
pub use provider::{OpenMeteoProvider, WeatherProvider};
pub use render::Composer;
