use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

use weather_core::{
    Composer, Config, NoGeocoder, NominatimGeocoder, OpenMeteoProvider, ReverseGeocoder, Settings,
    WeatherProvider,
    render::{DirPictograms, EmbeddedPictograms, FileFont, FontProvider, PictogramStore, PlatformFonts},
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weather-card",
    version,
    about = "Render current weather conditions into a 300x300 PNG card"
)]
pub struct Cli {
    /// Config file (TOML); command-line flags take precedence over it.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output PNG file.
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Log raw service responses and rendering steps.
    #[arg(short, long)]
    pub verbose: bool,

    #[arg(long, allow_negative_numbers = true)]
    pub latitude: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    pub longitude: Option<f64>,

    /// IANA zone for the timestamp, or "auto" for the forecast's own zone.
    #[arg(long)]
    pub timezone: Option<String>,

    /// Skip reverse geocoding; the place name stays empty.
    #[arg(long)]
    pub no_geocode: bool,

    /// Leave out the wind compass rose.
    #[arg(long)]
    pub no_compass: bool,

    /// Directory with `light/` and `dark/` pictogram sets instead of the built-in ones.
    #[arg(long)]
    pub pictograms: Option<PathBuf>,

    /// Font file instead of the platform default.
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Network timeout in seconds.
    #[arg(long = "timeout")]
    pub timeout_secs: Option<u64>,
}

impl Cli {
    /// Flags as a config layer; unset flags stay `None`.
    pub fn overrides(&self) -> Config {
        Config {
            latitude: self.latitude,
            longitude: self.longitude,
            file: self.file.clone(),
            verbose: self.verbose.then_some(true),
            timezone: self.timezone.clone(),
            geocode: self.no_geocode.then_some(false),
            compass: self.no_compass.then_some(false),
            pictograms: self.pictograms.clone(),
            font: self.font.clone(),
            timeout_secs: self.timeout_secs,
        }
    }

    /// Config file merged with flags, before validation.
    pub fn load_config(&self) -> anyhow::Result<Config> {
        let file = Config::load(self.config.as_deref()).context("failed reading config file")?;
        Ok(file.merge(self.overrides()))
    }

    pub async fn run(self, config: Config) -> anyhow::Result<()> {
        let settings = config.resolve().context("invalid configuration")?;
        tracing::info!(?settings, "resolved settings");

        let provider = OpenMeteoProvider::new(settings.timeout)?;
        let geocoder = geocoder(&settings)?;
        let composer = composer(&settings);

        let observation = provider
            .current(settings.coordinates)
            .await
            .context("failed retrieving weather data")?;

        let place = geocoder
            .place_name(settings.coordinates)
            .await
            .context("failed retrieving reverse geocode data")?;

        composer
            .render(&observation, &place, &settings.render)
            .context("failed writing image")?;

        Ok(())
    }
}

fn geocoder(settings: &Settings) -> anyhow::Result<Box<dyn ReverseGeocoder>> {
    if settings.geocode {
        Ok(Box::new(NominatimGeocoder::new(settings.timeout)?))
    } else {
        Ok(Box::new(NoGeocoder))
    }
}

fn composer(settings: &Settings) -> Composer {
    let fonts: Box<dyn FontProvider> = match &settings.font {
        Some(path) => Box::new(FileFont::new(path)),
        None => Box::new(PlatformFonts::current()),
    };
    let pictograms: Box<dyn PictogramStore> = match &settings.pictograms {
        Some(dir) => Box::new(DirPictograms::new(dir)),
        None => Box::new(EmbeddedPictograms),
    };
    Composer::new(fonts, pictograms)
}
