//! Weather-code pictograms.
//!
//! A store holds one PNG collection per theme. Resolution scans the
//! collection in name order for the first entry whose name starts with the
//! decimal weather code and falls back to [`UNKNOWN_PICTOGRAM`] on a miss.
//! Decoding failures are fatal.

use image::{ImageFormat, RgbaImage};
use std::{
    fmt::Debug,
    fs,
    path::{Path, PathBuf},
};

use super::theme::ThemeKind;
use crate::error::{Error, Result};

pub const UNKNOWN_PICTOGRAM: &str = "unknown.png";

/// Read-only source of pictogram files keyed by theme and file name.
pub trait PictogramStore: Send + Sync + Debug {
    /// File names available for `theme`, in any order.
    fn entries(&self, theme: ThemeKind) -> Result<Vec<String>>;

    fn read(&self, theme: ThemeKind, name: &str) -> Result<Vec<u8>>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pictogram {
    pub name: String,
    pub image: RgbaImage,
}

pub fn resolve_pictogram(
    store: &dyn PictogramStore,
    theme: ThemeKind,
    code: i32,
) -> Result<Pictogram> {
    let fail = |reason: String| Error::PictogramResolution {
        theme: theme.as_str(),
        code,
        reason,
    };

    let mut entries = store.entries(theme).map_err(|e| fail(e.to_string()))?;
    entries.sort();

    let prefix = code.to_string();
    let name = entries
        .into_iter()
        .find(|entry| entry.starts_with(&prefix))
        .unwrap_or_else(|| {
            tracing::debug!(code, %theme, "no pictogram for weather code, using fallback");
            UNKNOWN_PICTOGRAM.to_string()
        });

    let bytes = store.read(theme, &name).map_err(|e| fail(e.to_string()))?;
    let image = image::load_from_memory_with_format(&bytes, ImageFormat::Png)
        .map_err(|e| fail(format!("error decoding png '{name}': {e}")))?
        .to_rgba8();

    tracing::info!(%name, code, %theme, "resolved pictogram");
    Ok(Pictogram { name, image })
}

macro_rules! embed {
    ($theme:literal, $name:literal) => {
        (
            $name,
            include_bytes!(concat!("../../assets/pictograms/", $theme, "/", $name)) as &[u8],
        )
    };
}

macro_rules! embedded_set {
    ($theme:literal) => {
        &[
            embed!($theme, "0-clear-sky.png"),
            embed!($theme, "1-mainly-clear.png"),
            embed!($theme, "2-partly-cloudy.png"),
            embed!($theme, "3-overcast.png"),
            embed!($theme, "45-fog.png"),
            embed!($theme, "48-depositing-rime-fog.png"),
            embed!($theme, "51-light-drizzle.png"),
            embed!($theme, "53-moderate-drizzle.png"),
            embed!($theme, "55-dense-drizzle.png"),
            embed!($theme, "56-light-freezing-drizzle.png"),
            embed!($theme, "57-dense-freezing-drizzle.png"),
            embed!($theme, "61-slight-rain.png"),
            embed!($theme, "63-moderate-rain.png"),
            embed!($theme, "65-heavy-rain.png"),
            embed!($theme, "66-light-freezing-rain.png"),
            embed!($theme, "67-heavy-freezing-rain.png"),
            embed!($theme, "71-slight-snow.png"),
            embed!($theme, "73-moderate-snow.png"),
            embed!($theme, "75-heavy-snow.png"),
            embed!($theme, "77-snow-grains.png"),
            embed!($theme, "80-slight-rain-showers.png"),
            embed!($theme, "81-moderate-rain-showers.png"),
            embed!($theme, "82-violent-rain-showers.png"),
            embed!($theme, "85-slight-snow-showers.png"),
            embed!($theme, "86-heavy-snow-showers.png"),
            embed!($theme, "95-thunderstorm.png"),
            embed!($theme, "96-thunderstorm-slight-hail.png"),
            embed!($theme, "99-thunderstorm-heavy-hail.png"),
            embed!($theme, "unknown.png"),
        ]
    };
}

static LIGHT: &[(&str, &[u8])] = embedded_set!("light");
static DARK: &[(&str, &[u8])] = embedded_set!("dark");

/// The pictogram set compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedPictograms;

impl EmbeddedPictograms {
    fn set(theme: ThemeKind) -> &'static [(&'static str, &'static [u8])] {
        match theme {
            ThemeKind::Light => LIGHT,
            ThemeKind::Dark => DARK,
        }
    }
}

impl PictogramStore for EmbeddedPictograms {
    fn entries(&self, theme: ThemeKind) -> Result<Vec<String>> {
        Ok(Self::set(theme)
            .iter()
            .map(|(name, _)| name.to_string())
            .collect())
    }

    fn read(&self, theme: ThemeKind, name: &str) -> Result<Vec<u8>> {
        Self::set(theme)
            .iter()
            .find(|(entry, _)| *entry == name)
            .map(|(_, bytes)| bytes.to_vec())
            .ok_or_else(|| {
                Error::io(
                    format!("{theme}/{name}"),
                    std::io::Error::new(std::io::ErrorKind::NotFound, "no such embedded pictogram"),
                )
            })
    }
}

/// Pictograms read from `<root>/light` and `<root>/dark`.
#[derive(Debug, Clone)]
pub struct DirPictograms {
    root: PathBuf,
}

impl DirPictograms {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn folder(&self, theme: ThemeKind) -> PathBuf {
        self.root.join(theme.as_str())
    }
}

impl PictogramStore for DirPictograms {
    fn entries(&self, theme: ThemeKind) -> Result<Vec<String>> {
        let folder = self.folder(theme);
        let dir = fs::read_dir(&folder).map_err(|e| Error::io(&folder, e))?;

        let mut names = Vec::new();
        for entry in dir {
            let entry = entry.map_err(|e| Error::io(&folder, e))?;
            if entry.path().is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        Ok(names)
    }

    fn read(&self, theme: ThemeKind, name: &str) -> Result<Vec<u8>> {
        let path = self.folder(theme).join(Path::new(name));
        fs::read(&path).map_err(|e| Error::io(&path, e))
    }
}
