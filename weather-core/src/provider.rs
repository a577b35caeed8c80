use crate::{
    error::Result,
    model::{Coordinates, WeatherObservation},
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod open_meteo;

pub use open_meteo::OpenMeteoProvider;

/// Source of current conditions for a coordinate.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, location: Coordinates) -> Result<WeatherObservation>;
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
