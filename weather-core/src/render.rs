//! The weather card composer.
//!
//! Composition is split in two: [`Composer::compose`] records a [`Scene`]
//! of draw commands at fixed positions, and [`Composer::render`] rasterizes
//! that scene, encodes it as PNG and writes it out. Nothing touches the
//! output path until the PNG is fully encoded.

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    config::RenderConfig,
    error::{Error, Result},
    model::{PlaceName, WeatherObservation},
};

pub mod compass;
pub mod fonts;
pub mod layout;
pub mod pictogram;
pub mod raster;
pub mod scene;
pub mod theme;

pub use compass::{cardinal_name, draw_compass_rose};
pub use fonts::{FileFont, FontProvider, PlatformFonts};
pub use pictogram::{DirPictograms, EmbeddedPictograms, Pictogram, PictogramStore, resolve_pictogram};
pub use scene::{Anchor, Canvas, DrawCommand, FontSize, Point, Scene};
pub use theme::{Theme, ThemeKind, select_theme};

/// Width and height of the card in pixels.
pub const CANVAS_SIZE: u32 = 300;

const PICTOGRAM_AT: Point = Point::new(120.0, 150.0);
const PICTOGRAM_ANCHOR: Anchor = Anchor::new(0.5, 0.20);
const COMPASS_CENTER: Point = Point::new(265.0, 190.0);
const COMPASS_RADIUS: f32 = 20.0;

#[derive(Debug)]
pub struct Composer {
    fonts: Box<dyn FontProvider>,
    pictograms: Box<dyn PictogramStore>,
}

impl Composer {
    pub fn new(fonts: Box<dyn FontProvider>, pictograms: Box<dyn PictogramStore>) -> Self {
        Self { fonts, pictograms }
    }

    /// Platform font registry and the embedded pictogram set.
    pub fn with_defaults() -> Self {
        Self::new(Box::new(PlatformFonts::current()), Box::new(EmbeddedPictograms))
    }

    /// Record every element of the card for `observation`.
    pub fn compose(
        &self,
        observation: &WeatherObservation,
        place: &PlaceName,
        config: &RenderConfig,
    ) -> Result<Scene> {
        let mut canvas = Canvas::new(CANVAS_SIZE, CANVAS_SIZE);

        let theme = select_theme(observation.is_daytime);
        canvas.set_color(theme.background);
        canvas.clear();
        canvas.set_color(theme.foreground);

        let fields = layout::text_fields(observation);
        tracing::debug!(?fields, "laying out text fields");
        layout::draw_text_fields(&mut canvas, &fields);

        let pictogram =
            resolve_pictogram(self.pictograms.as_ref(), theme.kind, observation.weather_code)?;
        canvas.draw_image_anchored(
            pictogram.name,
            pictogram.image,
            PICTOGRAM_AT.x,
            PICTOGRAM_AT.y,
            PICTOGRAM_ANCHOR,
        );

        canvas.set_font_size(FontSize::Secondary);
        if config.compass {
            draw_compass_rose(
                &mut canvas,
                COMPASS_CENTER,
                COMPASS_RADIUS,
                observation.wind_direction_deg,
            );
        }

        let timestamp = layout::format_timestamp(&observation.observed_at, config.timezone);
        layout::draw_footer(&mut canvas, place, &timestamp);

        Ok(canvas.finish())
    }

    /// Compose, rasterize and write the card to `config.output_path`.
    pub fn render(
        &self,
        observation: &WeatherObservation,
        place: &PlaceName,
        config: &RenderConfig,
    ) -> Result<()> {
        let font = self.fonts.load()?;
        let scene = self.compose(observation, place, config)?;
        let img = raster::rasterize(&scene, &font);
        let png = raster::encode_png(&img)?;

        write_atomically(&config.output_path, &png)?;
        tracing::info!(path = %config.output_path.display(), bytes = png.len(), "wrote image");
        Ok(())
    }
}

/// Write `bytes` to a temporary sibling of `path`, then rename it into place.
pub fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir: PathBuf = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(|e| Error::io(&dir, e))?;
    tmp.write_all(bytes).map_err(|e| Error::io(tmp.path(), e))?;
    tmp.flush().map_err(|e| Error::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| Error::io(path, e.error))?;
    Ok(())
}

/// A DejaVu font from the usual system locations, for tests that rasterize.
#[cfg(test)]
pub(crate) fn test_font() -> Option<PathBuf> {
    [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    ]
    .into_iter()
    .map(PathBuf::from)
    .find(|p| p.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::theme::{GRAY20, GRAY80};
    use chrono::TimeZone;

    fn observation() -> WeatherObservation {
        WeatherObservation {
            observed_at: chrono_tz::Europe::Madrid
                .with_ymd_and_hms(2024, 6, 1, 14, 15, 0)
                .unwrap(),
            temperature_c: 21.5,
            apparent_temperature_c: 21.0,
            relative_humidity_pct: 40.0,
            precipitation_probability_pct: 0.0,
            is_daytime: true,
            weather_code: 0,
            wind_speed_kmh: 10.0,
            wind_direction_deg: 0.0,
        }
    }

    fn composer() -> Composer {
        Composer::new(Box::new(PlatformFonts::new("plan9")), Box::new(EmbeddedPictograms))
    }

    fn pictogram_name(scene: &Scene) -> &str {
        scene
            .commands
            .iter()
            .find_map(|c| match c {
                DrawCommand::Image { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .expect("scene must contain the pictogram")
    }

    /// Drawing geometry with colors stripped.
    fn geometry(scene: &Scene) -> Vec<String> {
        scene
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Clear(_) => None,
                DrawCommand::Text {
                    text, at, anchor, size, ..
                } => Some(format!("text {text} {at:?} {anchor:?} {size:?}")),
                DrawCommand::Image { at, anchor, .. } => Some(format!("image {at:?} {anchor:?}")),
                DrawCommand::Circle { center, radius, .. } => {
                    Some(format!("circle {center:?} {radius}"))
                }
                DrawCommand::Line { from, to, .. } => Some(format!("line {from:?} {to:?}")),
            })
            .collect()
    }

    #[test]
    fn daytime_clear_sky_scene() {
        let config = RenderConfig::new("unused.png");
        let scene = composer()
            .compose(&observation(), &PlaceName::new("Madrid"), &config)
            .unwrap();

        assert_eq!((scene.width, scene.height), (300, 300));
        assert_eq!(scene.background(), Some(GRAY80));
        assert_eq!(pictogram_name(&scene), "0-clear-sky.png");

        // Wind direction row, right-anchored at (290, 130).
        let direction = scene
            .texts("N")
            .find(|c| matches!(c, DrawCommand::Text { at, .. } if *at == Point::new(290.0, 130.0)));
        assert!(direction.is_some());

        assert!(scene.texts("Madrid").next().is_some());
        assert!(scene.texts("2024-06-01T14:15:00+02:00").next().is_some());
    }

    #[test]
    fn night_swaps_colors_but_not_geometry() {
        let config = RenderConfig::new("unused.png");
        let place = PlaceName::new("Madrid");
        let day = composer().compose(&observation(), &place, &config).unwrap();

        let night_obs = WeatherObservation {
            is_daytime: false,
            ..observation()
        };
        let night = composer().compose(&night_obs, &place, &config).unwrap();

        assert_eq!(night.background(), Some(GRAY20));
        assert_eq!(geometry(&day), geometry(&night));
        let ink = night.commands.iter().find_map(|c| match c {
            DrawCommand::Text { color, .. } => Some(*color),
            _ => None,
        });
        assert_eq!(ink, Some(GRAY80));
    }

    #[test]
    fn unknown_code_uses_fallback_pictogram() {
        let obs = WeatherObservation {
            weather_code: 9999,
            ..observation()
        };
        let scene = composer()
            .compose(&obs, &PlaceName::default(), &RenderConfig::new("unused.png"))
            .unwrap();
        assert_eq!(pictogram_name(&scene), pictogram::UNKNOWN_PICTOGRAM);
    }

    #[test]
    fn compass_can_be_switched_off() {
        let config = RenderConfig {
            compass: false,
            ..RenderConfig::new("unused.png")
        };
        let scene = composer()
            .compose(&observation(), &PlaceName::default(), &config)
            .unwrap();

        assert!(!scene
            .commands
            .iter()
            .any(|c| matches!(c, DrawCommand::Circle { .. } | DrawCommand::Line { .. })));
        assert!(scene.texts("E").next().is_none());
    }

    #[test]
    fn unsupported_platform_fails_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("card.png");

        let err = composer()
            .render(&observation(), &PlaceName::default(), &RenderConfig::new(&out))
            .unwrap_err();

        assert!(matches!(err, Error::UnsupportedPlatform(_)));
        assert!(!out.exists());
    }

    #[test]
    fn unwritable_destination_is_an_io_error() {
        let Some(font) = test_font() else {
            eprintln!("skipping: no system font");
            return;
        };
        let composer = Composer::new(Box::new(FileFont::new(font)), Box::new(EmbeddedPictograms));
        let out = PathBuf::from("/nonexistent-dir/for/sure/card.png");

        let err = composer
            .render(&observation(), &PlaceName::default(), &RenderConfig::new(&out))
            .unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    fn render_to_file(obs: &WeatherObservation) -> Option<image::RgbaImage> {
        let font = test_font()?;
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("card.png");

        let composer = Composer::new(Box::new(FileFont::new(font)), Box::new(EmbeddedPictograms));
        composer
            .render(obs, &PlaceName::new("Madrid"), &RenderConfig::new(&out))
            .expect("render must succeed");

        let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1, "temporary file left behind");

        let img = image::open(&out).expect("output must be a PNG").to_rgba8();
        Some(img)
    }

    #[test]
    fn end_to_end_day_and_night() {
        let Some(day) = render_to_file(&observation()) else {
            eprintln!("skipping: no system font");
            return;
        };
        assert_eq!(day.dimensions(), (300, 300));
        assert_eq!(*day.get_pixel(0, 0), GRAY80);
        assert_eq!(*day.get_pixel(299, 299), GRAY80);

        let night_obs = WeatherObservation {
            is_daytime: false,
            ..observation()
        };
        let night = render_to_file(&night_obs).expect("font was found above");
        assert_eq!(*night.get_pixel(0, 0), GRAY20);
    }

    #[test]
    fn end_to_end_unknown_code_still_writes_png() {
        let obs = WeatherObservation {
            weather_code: 9999,
            ..observation()
        };
        let Some(img) = render_to_file(&obs) else {
            eprintln!("skipping: no system font");
            return;
        };
        assert_eq!(img.dimensions(), (300, 300));
    }

    #[test]
    fn atomic_write_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("card.png");
        std::fs::write(&out, b"old").unwrap();

        write_atomically(&out, b"new").unwrap();
        assert_eq!(std::fs::read(&out).unwrap(), b"new");
    }
}
