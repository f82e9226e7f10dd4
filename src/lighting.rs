//! Keyboard and light bar lighting operations

use crate::color::{Color, ZoneColors};
use crate::error::Result;
use crate::layout::{
    KeyboardType, LightBarFrame, LightingLevel, PlatformInfo, ZoneColorBuffer, LIGHT_BAR_ZONES,
};
use crate::protocol::{Command, CommandGroup};
use crate::transport::{PlatformCall, Transport};

/// Snapshot of what the firmware reports about the backlight.
///
/// `None` marks an optional value the firmware could not report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightingStatus {
    pub keyboard_type: KeyboardType,
    pub lighting_supported: bool,
    pub light_bar_supported: Option<bool>,
    pub lighting_on: Option<bool>,
    pub colors: ZoneColors,
}

/// Stateless lighting service; every call queries or mutates the firmware directly
pub struct KeyboardLighting<P> {
    transport: Transport<P>,
}

impl<P: PlatformCall> KeyboardLighting<P> {
    /// Create the service on top of a platform call
    pub fn new(platform: P) -> Self {
        Self {
            transport: Transport::new(platform),
        }
    }

    /// Get the underlying transport
    pub fn transport(&self) -> &Transport<P> {
        &self.transport
    }

    /// Read the keyboard layout type
    pub fn keyboard_type(&mut self) -> Result<KeyboardType> {
        let reply = self.transport.submit(Command::GetKeyboardType, None)?;
        KeyboardType::try_from(reply.byte(0)?)
    }

    fn platform_info(&mut self, group: CommandGroup) -> Result<PlatformInfo> {
        let reply = self.transport.submit(Command::PlatformInfo(group), None)?;
        Ok(PlatformInfo(reply.byte(0)?))
    }

    /// Check whether the keyboard backlight is supported
    pub fn is_lighting_supported(&mut self) -> Result<bool> {
        Ok(self.platform_info(CommandGroup::Common)?.lighting_supported())
    }

    /// Check whether a light bar is present
    pub fn is_light_bar_supported(&mut self) -> Result<bool> {
        Ok(self.platform_info(CommandGroup::Gaming)?.light_bar_supported())
    }

    /// Check whether the keyboard backlight is currently on
    pub fn is_lighting_on(&mut self) -> Result<bool> {
        let reply = self.transport.submit(Command::Status, None)?;
        Ok(LightingLevel::try_from(reply.byte(0)?)?.is_on())
    }

    /// Switch the keyboard backlight on or off
    pub fn set_lighting_on(&mut self, enabled: bool) -> Result<()> {
        let payload = LightingLevel::from_enabled(enabled).payload();
        self.transport.submit(Command::SetBrightness, Some(&payload))?;
        log::info!("Keyboard lighting {}", if enabled { "on" } else { "off" });
        Ok(())
    }

    fn zone_buffer(&mut self) -> Result<ZoneColorBuffer> {
        let reply = self.transport.submit(Command::GetZoneColors, None)?;
        ZoneColorBuffer::new(reply.into_data())
    }

    /// Current color of every zone
    pub fn colors(&mut self) -> Result<ZoneColors> {
        Ok(self.zone_buffer()?.colors())
    }

    /// Set zone colors. Zones left as `None` keep their current color.
    ///
    /// The state buffer holds more than the zone colors, so it is always
    /// fetched first and written back with only the zone bytes changed.
    pub fn set_colors(&mut self, colors: &ZoneColors) -> Result<()> {
        let mut buffer = self.zone_buffer()?;
        buffer.apply(colors);
        self.transport
            .submit(Command::SetZoneColors, Some(buffer.as_bytes()))?;
        log::info!("Zone colors set: {}", colors);
        Ok(())
    }

    /// Set the four light bar zone colors
    pub fn set_light_bar_colors(&mut self, colors: &[Color; LIGHT_BAR_ZONES]) -> Result<()> {
        let frame = LightBarFrame::new(colors);
        self.transport
            .submit(Command::SetLightBarColors, Some(frame.as_bytes()))?;
        log::info!(
            "Light bar colors set: {} {} {} {}",
            colors[0],
            colors[1],
            colors[2],
            colors[3]
        );
        Ok(())
    }

    /// Query every readable value.
    ///
    /// Keyboard type, lighting support and zone colors are required and the
    /// first failure among them aborts. Light bar support and the on/off
    /// state are reported as `None` when their query fails.
    pub fn status(&mut self) -> Result<LightingStatus> {
        let keyboard_type = self.keyboard_type()?;
        let lighting_supported = self.is_lighting_supported()?;
        let colors = self.colors()?;
        let light_bar_supported = optional("light bar support", self.is_light_bar_supported());
        let lighting_on = optional("lighting state", self.is_lighting_on());
        Ok(LightingStatus {
            keyboard_type,
            lighting_supported,
            light_bar_supported,
            lighting_on,
            colors,
        })
    }
}

fn optional<T>(what: &str, result: Result<T>) -> Option<T> {
    result
        .map_err(|e| log::warn!("Could not read {}: {}", what, e))
        .ok()
}
