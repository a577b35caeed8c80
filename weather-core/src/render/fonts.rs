use rusttype::Font;
use std::{
    fmt::Debug,
    fs,
    path::{Path, PathBuf},
};

use crate::error::{Error, Result};

const UBUNTU_FONT_PATH: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf";
const TERMUX_FONT_PATH: &str = "/data/data/com.termux/files/usr/share/fonts/TTF/DejaVuSans.ttf";

/// Default font file per operating system name, as in `std::env::consts::OS`.
static PLATFORM_FONTS: &[(&str, &str)] = &[
    ("linux", UBUNTU_FONT_PATH),
    ("android", TERMUX_FONT_PATH),
];

/// Supplies the typeface used for every string on the card.
pub trait FontProvider: Send + Sync + Debug {
    fn load(&self) -> Result<Font<'static>>;
}

/// Picks the font registered for a platform.
#[derive(Debug, Clone)]
pub struct PlatformFonts {
    platform: String,
}

impl PlatformFonts {
    pub fn new(platform: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
        }
    }

    /// Registry lookup for the platform this binary was built for.
    pub fn current() -> Self {
        Self::new(std::env::consts::OS)
    }

    pub fn font_path(&self) -> Result<&'static Path> {
        PLATFORM_FONTS
            .iter()
            .find(|(platform, _)| *platform == self.platform)
            .map(|(_, path)| Path::new(*path))
            .ok_or_else(|| Error::UnsupportedPlatform(self.platform.clone()))
    }
}

impl FontProvider for PlatformFonts {
    fn load(&self) -> Result<Font<'static>> {
        load_font_file(self.font_path()?)
    }
}

/// A fixed font file, independent of the platform.
#[derive(Debug, Clone)]
pub struct FileFont {
    path: PathBuf,
}

impl FileFont {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl FontProvider for FileFont {
    fn load(&self) -> Result<Font<'static>> {
        load_font_file(&self.path)
    }
}

fn load_font_file(path: &Path) -> Result<Font<'static>> {
    let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
    tracing::debug!(path = %path.display(), "loaded font");
    Font::try_from_vec(bytes)
        .ok_or_else(|| Error::decode(format!("font {}", path.display()), "not a TrueType font"))
}
