//! Platform management call backends
//!
//! On Windows the firmware is reached through the HP BIOS WMI method
//! `hpqBIntM.hpqBIOSInt128` in the `root\wmi` namespace. Other systems have
//! no supported route and fail every call.

use crate::error::{Error, Result};
use crate::protocol::{CommandEnvelope, CommandReply};
use crate::transport::PlatformCall;

#[cfg(windows)]
pub use self::hp_wmi::WmiPlatform;

/// Backend used by the command line tool on this system
#[cfg(windows)]
pub type DefaultPlatform = WmiPlatform;
#[cfg(not(windows))]
pub type DefaultPlatform = UnsupportedPlatform;

/// Open the default backend for this system
pub fn connect() -> Result<DefaultPlatform> {
    DefaultPlatform::connect()
}

#[cfg(windows)]
mod hp_wmi {
    use wmi::{COMLibrary, IWbemClassWrapper, Variant, WMIConnection};

    use super::*;

    const NAMESPACE: &str = r"root\wmi";
    const DATA_IN_CLASS: &str = "hpqBDataIn";
    const METHOD_CLASS: &str = "hpqBIntM";
    const METHOD: &str = "hpqBIOSInt128";
    const INSTANCE_PATH: &str = r"hpqBIntM.InstanceName='ACPI\PNP0C14\0_0'";

    /// HP BIOS WMI interface. COM handles are bound to the creating thread.
    pub struct WmiPlatform {
        connection: WMIConnection,
    }

    impl WmiPlatform {
        pub fn connect() -> Result<Self> {
            let com = COMLibrary::new()?;
            let connection = WMIConnection::with_namespace_path(NAMESPACE, com)?;
            log::debug!("Connected to WMI namespace {}", NAMESPACE);
            Ok(Self { connection })
        }

        fn data_in(&self, envelope: &CommandEnvelope) -> Result<IWbemClassWrapper> {
            let data_in = self.connection.get_object(DATA_IN_CLASS)?.spawn_instance()?;
            data_in.put_property("Sign", bytes_to_variant(&envelope.sign))?;
            data_in.put_property("Command", Variant::UI4(envelope.command))?;
            data_in.put_property("CommandType", Variant::UI4(envelope.command_type))?;
            data_in.put_property("Size", Variant::UI4(envelope.size()))?;
            let payload = envelope
                .data
                .as_deref()
                .map_or(Variant::Null, bytes_to_variant);
            data_in.put_property("hpqBData", payload)?;
            Ok(data_in)
        }
    }

    impl PlatformCall for WmiPlatform {
        fn invoke(&mut self, envelope: &CommandEnvelope) -> Result<CommandReply> {
            let in_params = self
                .connection
                .get_object(METHOD_CLASS)?
                .get_method(METHOD)?
                .ok_or_else(|| Error::Transport(format!("{} not found on {}", METHOD, METHOD_CLASS)))?
                .spawn_instance()?;
            in_params.put_property("InData", self.data_in(envelope)?)?;

            // No timeout: the BIOS call may take arbitrarily long
            let out_params = self
                .connection
                .exec_method(INSTANCE_PATH, METHOD, Some(&in_params))?
                .ok_or_else(|| Error::Transport(format!("{} returned no output", METHOD)))?;

            let out_data: IWbemClassWrapper = out_params.get_property("OutData")?.try_into()?;
            let status: u32 = out_data.get_property("rwReturnCode")?.try_into()?;
            let data = match out_data.get_property("Data")? {
                Variant::Null | Variant::Empty => None,
                v => Some(variant_to_bytes(v)?),
            };
            Ok(CommandReply { status, data })
        }
    }

    fn bytes_to_variant(bytes: &[u8]) -> Variant {
        Variant::Array(bytes.iter().copied().map(Variant::UI1).collect())
    }

    fn variant_to_bytes(value: Variant) -> Result<Vec<u8>> {
        let Variant::Array(items) = value else {
            return Err(Error::Transport(format!("Expected byte array, got {:?}", value)));
        };
        items
            .into_iter()
            .map(|item| match item {
                Variant::UI1(b) => Ok(b),
                other => Err(Error::Transport(format!("Expected byte, got {:?}", other))),
            })
            .collect()
    }
}

/// Placeholder backend for systems without the HP BIOS WMI interface
#[cfg(not(windows))]
pub struct UnsupportedPlatform;

#[cfg(not(windows))]
impl UnsupportedPlatform {
    pub fn connect() -> Result<Self> {
        Err(unsupported())
    }
}

#[cfg(not(windows))]
impl PlatformCall for UnsupportedPlatform {
    fn invoke(&mut self, _: &CommandEnvelope) -> Result<CommandReply> {
        Err(unsupported())
    }
}

#[cfg(not(windows))]
fn unsupported() -> Error {
    Error::Transport("HP BIOS WMI interface is only available on Windows".into())
}

#[cfg(all(test, not(windows)))]
mod tests {
    use super::*;
    use crate::protocol::Command;

    #[test]
    fn test_unsupported_platform() {
        assert!(matches!(connect(), Err(Error::Transport(_))));
        let mut platform = UnsupportedPlatform;
        let envelope = CommandEnvelope::new(Command::Status, None);
        assert!(matches!(platform.invoke(&envelope), Err(Error::Transport(_))));
    }
}
