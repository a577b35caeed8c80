use image::Rgba;

pub const GRAY20: Rgba<u8> = Rgba([51, 51, 51, 255]);
pub const GRAY80: Rgba<u8> = Rgba([204, 204, 204, 255]);

/// The only palette: (light tone, dark tone).
const PALETTE: (Rgba<u8>, Rgba<u8>) = (GRAY80, GRAY20);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThemeKind {
    Light,
    Dark,
}

impl ThemeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeKind::Light => "light",
            ThemeKind::Dark => "dark",
        }
    }

    pub const fn all() -> &'static [ThemeKind] {
        &[ThemeKind::Light, ThemeKind::Dark]
    }
}

impl std::fmt::Display for ThemeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub kind: ThemeKind,
    pub foreground: Rgba<u8>,
    pub background: Rgba<u8>,
}

/// Light background with dark ink by day, the same pair swapped at night.
pub fn select_theme(is_daytime: bool) -> Theme {
    let (light, dark) = PALETTE;
    if is_daytime {
        Theme {
            kind: ThemeKind::Light,
            foreground: dark,
            background: light,
        }
    } else {
        Theme {
            kind: ThemeKind::Dark,
            foreground: light,
            background: dark,
        }
    }
}
