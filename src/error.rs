//! Error types for lighting operations

use std::time::Duration;

use thiserror::Error;

/// Errors surfaced by the command transport and zone codec
#[derive(Error, Debug)]
pub enum Error {
    /// The platform management call could not be issued
    #[error("Platform call failed: {0}")]
    Transport(String),

    /// The firmware rejected a well-formed command
    #[error("Firmware returned status {status}")]
    Protocol { status: u32 },

    /// Keyboard type tag outside the known set
    #[error("Unknown keyboard type: {0}")]
    UnknownKeyboardType(u8),

    /// Lighting level byte that is neither on nor off
    #[error("Unexpected lighting level: {0}")]
    UnexpectedValue(u8),

    /// Reply data too short for the field being decoded
    #[error("Reply too short: need {needed} bytes, got {actual}")]
    ShortReply { needed: usize, actual: usize },

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// No reply from the lighting worker within the timeout
    #[error("No reply after {0:?}")]
    Timeout(Duration),

    #[error("Lighting worker stopped")]
    WorkerStopped,
}

impl Error {
    /// True for errors caused by a reply byte outside its known enumeration
    pub fn is_decode(&self) -> bool {
        matches!(self, Error::UnknownKeyboardType(_) | Error::UnexpectedValue(_))
    }
}

#[cfg(windows)]
impl From<wmi::WMIError> for Error {
    fn from(e: wmi::WMIError) -> Self {
        Error::Transport(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
