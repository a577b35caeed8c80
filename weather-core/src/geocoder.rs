use async_trait::async_trait;
use reqwest::{Client, header};
use serde::Deserialize;
use std::{fmt::Debug, time::Duration};

use crate::{
    error::{Error, Result},
    model::{Coordinates, PlaceName},
    provider::truncate_body,
};

const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org/reverse";

// Nominatim's usage policy rejects anonymous clients.
const USER_AGENT: &str = concat!("weather-card/", env!("CARGO_PKG_VERSION"));

/// Looks up a display name for a coordinate.
#[async_trait]
pub trait ReverseGeocoder: Send + Sync + Debug {
    async fn place_name(&self, location: Coordinates) -> Result<PlaceName>;
}

/// Stand-in used when geocoding is switched off.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGeocoder;

#[async_trait]
impl ReverseGeocoder for NoGeocoder {
    async fn place_name(&self, _location: Coordinates) -> Result<PlaceName> {
        Ok(PlaceName::default())
    }
}

#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    base_url: String,
    http: Client,
}

impl NominatimGeocoder {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|source| Error::Network {
                stage: "building reverse geocode client",
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

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NmAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    municipality: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NmResponse {
    #[serde(default)]
    address: NmAddress,
}

/// Extract the most specific settlement name from a reverse geocode body.
pub fn parse_response(body: &str) -> Result<PlaceName> {
    let parsed: NmResponse =
        serde_json::from_str(body).map_err(|e| Error::decode("reverse geocode response", e))?;

    let address = parsed.address;
    let name = address
        .city
        .or(address.town)
        .or(address.village)
        .or(address.municipality)
        .unwrap_or_default();

    Ok(PlaceName::new(name))
}

#[async_trait]
impl ReverseGeocoder for NominatimGeocoder {
    async fn place_name(&self, location: Coordinates) -> Result<PlaceName> {
        let lat = location.latitude.to_string();
        let lon = location.longitude.to_string();

        tracing::info!(url = %self.base_url, %lat, %lon, "reverse geocode request");

        let res = self
            .http
            .get(&self.base_url)
            .header(header::ACCEPT, "application/json")
            .query(&[("format", "json"), ("lat", lat.as_str()), ("lon", lon.as_str())])
            .send()
            .await
            .map_err(|source| Error::Network {
                stage: "requesting reverse geocode info",
                source,
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|source| Error::Network {
            stage: "reading reverse geocode response",
            source,
        })?;

        tracing::info!(%body, "reverse geocode response body");

        if !status.is_success() {
            return Err(Error::Status {
                stage: "reverse geocode",
                status,
                body: truncate_body(&body),
            });
        }

        parse_response(&body)
    }
}
