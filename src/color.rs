//! RGB colors and per-zone color sets

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// RGB color as stored by the firmware
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn to_bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Look up a built-in color name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        NAMED_COLORS
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|&(_, c)| c)
    }

    /// Parse a 6-digit hex code, with or without a leading '#'
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        u32::from_str_radix(hex, 16).ok().map(Self::from)
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

/// From a packed 0xRRGGBB value; higher bits are ignored
impl From<u32> for Color {
    fn from(value: u32) -> Self {
        Self::new((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }
}

impl From<Color> for u32 {
    fn from(c: Color) -> Self {
        (c.r as u32) << 16 | (c.g as u32) << 8 | c.b as u32
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Accepts a color name ("red", "DarkOrange") or a hex code ("#FF8000", "ff8000")
impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::from_name(s)
            .or_else(|| Self::from_hex(s))
            .ok_or_else(|| Error::InvalidColor(s.to_string()))
    }
}

const NAMED_COLORS: &[(&str, Color)] = &[
    ("black", Color::new(0x00, 0x00, 0x00)),
    ("white", Color::new(0xFF, 0xFF, 0xFF)),
    ("red", Color::new(0xFF, 0x00, 0x00)),
    ("lime", Color::new(0x00, 0xFF, 0x00)),
    ("green", Color::new(0x00, 0x80, 0x00)),
    ("blue", Color::new(0x00, 0x00, 0xFF)),
    ("yellow", Color::new(0xFF, 0xFF, 0x00)),
    ("cyan", Color::new(0x00, 0xFF, 0xFF)),
    ("aqua", Color::new(0x00, 0xFF, 0xFF)),
    ("magenta", Color::new(0xFF, 0x00, 0xFF)),
    ("fuchsia", Color::new(0xFF, 0x00, 0xFF)),
    ("silver", Color::new(0xC0, 0xC0, 0xC0)),
    ("gray", Color::new(0x80, 0x80, 0x80)),
    ("grey", Color::new(0x80, 0x80, 0x80)),
    ("maroon", Color::new(0x80, 0x00, 0x00)),
    ("olive", Color::new(0x80, 0x80, 0x00)),
    ("navy", Color::new(0x00, 0x00, 0x80)),
    ("purple", Color::new(0x80, 0x00, 0x80)),
    ("teal", Color::new(0x00, 0x80, 0x80)),
    ("orange", Color::new(0xFF, 0xA5, 0x00)),
    ("darkorange", Color::new(0xFF, 0x8C, 0x00)),
    ("orangered", Color::new(0xFF, 0x45, 0x00)),
    ("gold", Color::new(0xFF, 0xD7, 0x00)),
    ("pink", Color::new(0xFF, 0xC0, 0xCB)),
    ("hotpink", Color::new(0xFF, 0x69, 0xB4)),
    ("deeppink", Color::new(0xFF, 0x14, 0x93)),
    ("crimson", Color::new(0xDC, 0x14, 0x3C)),
    ("violet", Color::new(0xEE, 0x82, 0xEE)),
    ("indigo", Color::new(0x4B, 0x00, 0x82)),
    ("turquoise", Color::new(0x40, 0xE0, 0xD0)),
    ("skyblue", Color::new(0x87, 0xCE, 0xEB)),
    ("deepskyblue", Color::new(0x00, 0xBF, 0xFF)),
    ("dodgerblue", Color::new(0x1E, 0x90, 0xFF)),
    ("royalblue", Color::new(0x41, 0x69, 0xE1)),
    ("springgreen", Color::new(0x00, 0xFF, 0x7F)),
    ("chartreuse", Color::new(0x7F, 0xFF, 0x00)),
    ("limegreen", Color::new(0x32, 0xCD, 0x32)),
    ("forestgreen", Color::new(0x22, 0x8B, 0x22)),
    ("coral", Color::new(0xFF, 0x7F, 0x50)),
    ("tomato", Color::new(0xFF, 0x63, 0x47)),
    ("salmon", Color::new(0xFA, 0x80, 0x72)),
    ("khaki", Color::new(0xF0, 0xE6, 0x8C)),
    ("lavender", Color::new(0xE6, 0xE6, 0xFA)),
    ("brown", Color::new(0xA5, 0x2A, 0x2A)),
    ("chocolate", Color::new(0xD2, 0x69, 0x1E)),
];

/// Keyboard backlight zones, in firmware buffer order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Right,
    Center,
    Left,
    Game,
}

impl Zone {
    pub const ALL: [Zone; 4] = [Zone::Right, Zone::Center, Zone::Left, Zone::Game];

    /// Position of the zone in the color buffer
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Zone::Right => "right",
            Zone::Center => "center",
            Zone::Left => "left",
            Zone::Game => "game",
        }
    }
}

/// Colors for the four keyboard zones. `None` leaves a zone as it is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZoneColors {
    pub right: Option<Color>,
    pub center: Option<Color>,
    pub left: Option<Color>,
    pub game: Option<Color>,
}

impl ZoneColors {
    /// All four zones set to the same color
    pub fn uniform(color: Color) -> Self {
        Self {
            right: Some(color),
            center: Some(color),
            left: Some(color),
            game: Some(color),
        }
    }

    pub fn get(&self, zone: Zone) -> Option<Color> {
        match zone {
            Zone::Right => self.right,
            Zone::Center => self.center,
            Zone::Left => self.left,
            Zone::Game => self.game,
        }
    }

    pub fn set(&mut self, zone: Zone, color: Option<Color>) {
        match zone {
            Zone::Right => self.right = color,
            Zone::Center => self.center = color,
            Zone::Left => self.left = color,
            Zone::Game => self.game = color,
        }
    }

    /// Fill unset zones with `fallback`
    pub fn or(self, fallback: Option<Color>) -> Self {
        Self {
            right: self.right.or(fallback),
            center: self.center.or(fallback),
            left: self.left.or(fallback),
            game: self.game.or(fallback),
        }
    }

    pub fn is_empty(&self) -> bool {
        Zone::ALL.iter().all(|&z| self.get(z).is_none())
    }
}

impl fmt::Display for ZoneColors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, zone) in Zone::ALL.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match self.get(*zone) {
                Some(c) => write!(f, "{}={}", zone.name(), c)?,
                None => write!(f, "{}=unset", zone.name())?,
            }
        }
        Ok(())
    }
}
