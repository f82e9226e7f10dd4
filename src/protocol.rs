//! HP BIOS command envelope and reply definitions
//!
//! Every request to the firmware is a `hpqBDataIn` record:
//! - Sign: 4 bytes, always "SECU"
//! - Command: command group (0x20009 common, 0x20008 gaming)
//! - CommandType: sub-operation within the group
//! - Size: payload length, 0 when there is no payload
//! - Data: payload bytes
//!
//! The reply is `rwReturnCode` (0 = success) plus optional data bytes.

use crate::error::{Error, Result};

/// Protocol signature sent with every command ("SECU")
pub const SIGN: [u8; 4] = [83, 69, 67, 85];

/// Command group namespaces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandGroup {
    /// Platform commands shared by all models
    Common,
    /// Gaming-specific commands
    Gaming,
}

impl CommandGroup {
    /// Value of the `Command` field
    pub const fn code(self) -> u32 {
        match self {
            CommandGroup::Common => 0x20009,
            CommandGroup::Gaming => 0x20008,
        }
    }
}

/// The fixed set of lighting commands understood by the firmware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Feature flags; the group selects which flag byte is returned
    PlatformInfo(CommandGroup),
    GetZoneColors,
    SetZoneColors,
    /// Current lighting level
    Status,
    SetBrightness,
    SetLightBarColors,
    GetKeyboardType,
}

impl Command {
    /// Group the command is sent in
    pub const fn group(self) -> CommandGroup {
        match self {
            Command::PlatformInfo(group) => group,
            Command::GetKeyboardType => CommandGroup::Gaming,
            _ => CommandGroup::Common,
        }
    }

    /// Value of the `CommandType` field
    pub const fn command_type(self) -> u32 {
        match self {
            Command::PlatformInfo(_) => 1,
            Command::GetZoneColors => 2,
            Command::SetZoneColors => 3,
            Command::Status => 4,
            Command::SetBrightness => 5,
            Command::SetLightBarColors => 11,
            Command::GetKeyboardType => 43,
        }
    }
}

/// Input record for the platform call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandEnvelope {
    pub sign: [u8; 4],
    pub command: u32,
    pub command_type: u32,
    pub data: Option<Vec<u8>>,
}

impl CommandEnvelope {
    /// Envelope for `command`, signed and sized for `payload`
    pub fn new(command: Command, payload: Option<&[u8]>) -> Self {
        Self {
            sign: SIGN,
            command: command.group().code(),
            command_type: command.command_type(),
            data: payload.map(<[u8]>::to_vec),
        }
    }

    /// Payload length as recorded in the `Size` field
    pub fn size(&self) -> u32 {
        self.data.as_ref().map_or(0, |d| d.len() as u32)
    }
}

/// Output record of the platform call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandReply {
    pub status: u32,
    pub data: Option<Vec<u8>>,
}

impl CommandReply {
    /// Successful reply carrying `data`
    pub fn ok(data: Option<Vec<u8>>) -> Self {
        Self { status: 0, data }
    }

    /// Status code 0
    pub fn is_success(&self) -> bool {
        self.status == 0
    }

    /// Reply data, empty when the firmware returned none
    pub fn data(&self) -> &[u8] {
        self.data.as_deref().unwrap_or_default()
    }

    /// Take the reply data, empty when there is none
    pub fn into_data(self) -> Vec<u8> {
        self.data.unwrap_or_default()
    }

    /// Read a single byte of the reply data
    pub fn byte(&self, index: usize) -> Result<u8> {
        let data = self.data();
        data.get(index).copied().ok_or(Error::ShortReply {
            needed: index + 1,
            actual: data.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_codes() {
        assert_eq!(CommandGroup::Common.code(), 131081);
        assert_eq!(CommandGroup::Gaming.code(), 131080);

        let table = [
            (Command::PlatformInfo(CommandGroup::Common), CommandGroup::Common, 1),
            (Command::PlatformInfo(CommandGroup::Gaming), CommandGroup::Gaming, 1),
            (Command::GetZoneColors, CommandGroup::Common, 2),
            (Command::SetZoneColors, CommandGroup::Common, 3),
            (Command::Status, CommandGroup::Common, 4),
            (Command::SetBrightness, CommandGroup::Common, 5),
            (Command::SetLightBarColors, CommandGroup::Common, 11),
            (Command::GetKeyboardType, CommandGroup::Gaming, 43),
        ];
        for (cmd, group, ty) in table {
            assert_eq!(cmd.group(), group, "{:?}", cmd);
            assert_eq!(cmd.command_type(), ty, "{:?}", cmd);
        }
    }

    #[test]
    fn test_envelope_without_payload() {
        let env = CommandEnvelope::new(Command::GetKeyboardType, None);
        assert_eq!(&env.sign, b"SECU");
        assert_eq!(env.command, 0x20008);
        assert_eq!(env.command_type, 43);
        assert_eq!(env.size(), 0);
        assert_eq!(env.data, None);
    }

    #[test]
    fn test_envelope_size_tracks_payload() {
        let env = CommandEnvelope::new(Command::SetBrightness, Some(&[228, 0, 0, 0]));
        assert_eq!(env.size(), 4);
        assert_eq!(env.data.as_deref(), Some(&[228u8, 0, 0, 0][..]));
    }

    #[test]
    fn test_reply_byte() {
        let reply = CommandReply::ok(Some(vec![7, 8]));
        assert_eq!(reply.byte(1).unwrap(), 8);
        assert!(matches!(
            reply.byte(2),
            Err(Error::ShortReply { needed: 3, actual: 2 })
        ));

        let empty = CommandReply::ok(None);
        assert!(matches!(
            empty.byte(0),
            Err(Error::ShortReply { needed: 1, actual: 0 })
        ));
    }
}
