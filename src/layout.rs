//! Fixed-layout firmware buffers and single-byte reply values
//!
//! Zone color state buffer (returned by GetZoneColors, sent back by SetZoneColors):
//! - bytes 0..25: undocumented state, must round-trip unchanged
//! - bytes 25..28: right zone RGB
//! - bytes 28..31: center zone RGB
//! - bytes 31..34: left zone RGB
//! - bytes 34..37: game zone RGB
//! - remainder: undocumented state
//!
//! Light bar frame (SetLightBarColors, 128 bytes, built from scratch):
//! - byte 1: mode
//! - byte 3: brightness
//! - byte 6: color count
//! - bytes 7..19: four RGB triples

use std::fmt;

use crate::color::{Color, Zone, ZoneColors};
use crate::error::{Error, Result};

/// Offset of the first zone color in the state buffer
pub const ZONE_COLORS_OFFSET: usize = 25;
/// Bytes per RGB triple
pub const COLOR_SIZE: usize = 3;
/// Minimum state buffer length covering all four zones
pub const ZONE_BUFFER_MIN_LEN: usize = ZONE_COLORS_OFFSET + Zone::ALL.len() * COLOR_SIZE;

pub const LIGHT_BAR_FRAME_LEN: usize = 128;
pub const LIGHT_BAR_MODE_OFFSET: usize = 1;
pub const LIGHT_BAR_BRIGHTNESS_OFFSET: usize = 3;
pub const LIGHT_BAR_COLOR_COUNT_OFFSET: usize = 6;
pub const LIGHT_BAR_COLORS_OFFSET: usize = 7;
pub const LIGHT_BAR_ZONES: usize = 4;

const LIGHT_BAR_STATIC_MODE: u8 = 0;
const LIGHT_BAR_FULL_BRIGHTNESS: u8 = 100;

/// Keyboard layout reported by the firmware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyboardType {
    Normal = 0,
    WithNumpad = 1,
    WithoutNumpad = 2,
    Rgb = 3,
    OneZoneWithNumpad = 4,
    OneZoneWithoutNumpad = 5,
}

impl KeyboardType {
    /// Human-readable name
    pub fn name(self) -> &'static str {
        match self {
            KeyboardType::Normal => "Normal",
            KeyboardType::WithNumpad => "With numpad",
            KeyboardType::WithoutNumpad => "Without numpad",
            KeyboardType::Rgb => "RGB",
            KeyboardType::OneZoneWithNumpad => "One zone with numpad",
            KeyboardType::OneZoneWithoutNumpad => "One zone without numpad",
        }
    }
}

impl TryFrom<u8> for KeyboardType {
    type Error = Error;

    fn try_from(tag: u8) -> Result<Self> {
        match tag {
            0 => Ok(KeyboardType::Normal),
            1 => Ok(KeyboardType::WithNumpad),
            2 => Ok(KeyboardType::WithoutNumpad),
            3 => Ok(KeyboardType::Rgb),
            4 => Ok(KeyboardType::OneZoneWithNumpad),
            5 => Ok(KeyboardType::OneZoneWithoutNumpad),
            _ => Err(Error::UnknownKeyboardType(tag)),
        }
    }
}

impl fmt::Display for KeyboardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Backlight level byte used by Status and SetBrightness
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightingLevel {
    On,
    Off,
}

impl LightingLevel {
    const ON: u8 = 228;
    const OFF: u8 = 100;

    /// Level for a backlight on/off switch
    pub fn from_enabled(enabled: bool) -> Self {
        if enabled {
            LightingLevel::On
        } else {
            LightingLevel::Off
        }
    }

    /// Raw level byte
    pub fn byte(self) -> u8 {
        match self {
            LightingLevel::On => Self::ON,
            LightingLevel::Off => Self::OFF,
        }
    }

    /// True for the on level
    pub fn is_on(self) -> bool {
        self == LightingLevel::On
    }

    /// SetBrightness payload: level byte followed by three zero bytes
    pub fn payload(self) -> [u8; 4] {
        [self.byte(), 0, 0, 0]
    }
}

impl TryFrom<u8> for LightingLevel {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            Self::ON => Ok(LightingLevel::On),
            Self::OFF => Ok(LightingLevel::Off),
            _ => Err(Error::UnexpectedValue(value)),
        }
    }
}

/// Feature flags byte from a PlatformInfo reply. Undefined bits are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformInfo(pub u8);

impl PlatformInfo {
    const LIGHTING: u8 = 1 << 0;
    const LIGHT_BAR: u8 = 1 << 1;

    /// Bit 0: keyboard backlight present
    pub fn lighting_supported(self) -> bool {
        self.0 & Self::LIGHTING != 0
    }

    /// Bit 1: light bar present
    pub fn light_bar_supported(self) -> bool {
        self.0 & Self::LIGHT_BAR != 0
    }
}

/// Zone color state buffer as fetched from the firmware
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneColorBuffer {
    data: Vec<u8>,
}

impl ZoneColorBuffer {
    /// Wrap a fetched buffer; it must reach the last zone color byte
    pub fn new(data: Vec<u8>) -> Result<Self> {
        if data.len() < ZONE_BUFFER_MIN_LEN {
            return Err(Error::ShortReply {
                needed: ZONE_BUFFER_MIN_LEN,
                actual: data.len(),
            });
        }
        Ok(Self { data })
    }

    /// Byte offset of a zone's RGB triple
    pub const fn offset(zone: Zone) -> usize {
        ZONE_COLORS_OFFSET + zone.index() * COLOR_SIZE
    }

    /// Color stored for one zone
    pub fn zone(&self, zone: Zone) -> Color {
        let at = Self::offset(zone);
        Color::from([self.data[at], self.data[at + 1], self.data[at + 2]])
    }

    /// Overwrite the color of one zone
    pub fn set_zone(&mut self, zone: Zone, color: Color) {
        let at = Self::offset(zone);
        self.data[at..at + COLOR_SIZE].copy_from_slice(&color.to_bytes());
    }

    /// Colors of all four zones
    pub fn colors(&self) -> ZoneColors {
        let mut colors = ZoneColors::default();
        for zone in Zone::ALL {
            colors.set(zone, Some(self.zone(zone)));
        }
        colors
    }

    /// Overwrite the zones that have a color, leave the rest untouched
    pub fn apply(&mut self, colors: &ZoneColors) {
        for zone in Zone::ALL {
            if let Some(color) = colors.get(zone) {
                self.set_zone(zone, color);
            }
        }
    }

    /// Whole buffer, as sent back to the firmware
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

/// Light bar color frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightBarFrame {
    data: [u8; LIGHT_BAR_FRAME_LEN],
}

impl LightBarFrame {
    /// Static mode, full brightness, one color per light bar zone
    pub fn new(colors: &[Color; LIGHT_BAR_ZONES]) -> Self {
        let mut data = [0u8; LIGHT_BAR_FRAME_LEN];
        data[LIGHT_BAR_MODE_OFFSET] = LIGHT_BAR_STATIC_MODE;
        data[LIGHT_BAR_BRIGHTNESS_OFFSET] = LIGHT_BAR_FULL_BRIGHTNESS;
        data[LIGHT_BAR_COLOR_COUNT_OFFSET] = LIGHT_BAR_ZONES as u8;
        for (i, color) in colors.iter().enumerate() {
            let at = LIGHT_BAR_COLORS_OFFSET + i * COLOR_SIZE;
            data[at..at + COLOR_SIZE].copy_from_slice(&color.to_bytes());
        }
        Self { data }
    }

    /// Lighting mode byte
    pub fn mode(&self) -> u8 {
        self.data[LIGHT_BAR_MODE_OFFSET]
    }

    /// Brightness byte
    pub fn brightness(&self) -> u8 {
        self.data[LIGHT_BAR_BRIGHTNESS_OFFSET]
    }

    /// Number of colors in the frame
    pub fn color_count(&self) -> u8 {
        self.data[LIGHT_BAR_COLOR_COUNT_OFFSET]
    }

    /// Color of one light bar zone, `None` past the last zone
    pub fn color(&self, index: usize) -> Option<Color> {
        if index >= LIGHT_BAR_ZONES {
            return None;
        }
        let at = LIGHT_BAR_COLORS_OFFSET + index * COLOR_SIZE;
        Some(Color::from([self.data[at], self.data[at + 1], self.data[at + 2]]))
    }

    /// Frame bytes to send
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}
