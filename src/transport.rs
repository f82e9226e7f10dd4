//! Command submission over the platform management call

use crate::error::{Error, Result};
use crate::protocol::{Command, CommandEnvelope, CommandReply};

/// The host's firmware call: one envelope in, one raw reply out.
///
/// Implementations report failures to reach the firmware as
/// [`Error::Transport`] and return non-zero status codes untouched;
/// [`Transport`] applies the status check.
pub trait PlatformCall {
    fn invoke(&mut self, envelope: &CommandEnvelope) -> Result<CommandReply>;
}

impl<P: PlatformCall + ?Sized> PlatformCall for Box<P> {
    fn invoke(&mut self, envelope: &CommandEnvelope) -> Result<CommandReply> {
        (**self).invoke(envelope)
    }
}

/// Builds envelopes, submits them and checks the return code
pub struct Transport<P> {
    platform: P,
}

impl<P: PlatformCall> Transport<P> {
    /// Wrap a platform call
    pub fn new(platform: P) -> Self {
        Self { platform }
    }

    /// Get the wrapped platform call
    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Submit a command and wait for the reply.
    ///
    /// A reply with a non-zero status becomes [`Error::Protocol`] and its data
    /// is dropped unread. No retries.
    pub fn submit(&mut self, command: Command, payload: Option<&[u8]>) -> Result<CommandReply> {
        let envelope = CommandEnvelope::new(command, payload);
        log::debug!(
            "Submitting {:?} (command 0x{:05X}, type {}, size {})",
            command,
            envelope.command,
            envelope.command_type,
            envelope.size()
        );
        if let Some(data) = &envelope.data {
            log::trace!("Payload: {:02x?}", data);
        }

        let reply = self.platform.invoke(&envelope)?;
        if !reply.is_success() {
            log::warn!("{:?} failed with status {}", command, reply.status);
            return Err(Error::Protocol {
                status: reply.status,
            });
        }

        log::trace!("Reply: {:02x?}", reply.data());
        Ok(reply)
    }
}


#[cfg(test)]
mod tests {
    use super::fake::FakeDevice;
    use super::*;

    struct Unreachable;

    impl PlatformCall for Unreachable {
        fn invoke(&mut self, _: &CommandEnvelope) -> Result<CommandReply> {
            Err(Error::Transport("instance not found".into()))
        }
    }

    #[test]
    fn test_submit_success() {
        let mut transport = Transport::new(FakeDevice::new());
        let reply = transport.submit(Command::GetKeyboardType, None).unwrap();
        assert_eq!(reply.byte(0).unwrap(), 3);

        let sent = &transport.platform().sent;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].command, 0x20008);
        assert_eq!(sent[0].command_type, 43);
        assert_eq!(sent[0].size(), 0);
    }

    #[test]
    fn test_nonzero_status_is_protocol_error() {
        let mut transport = Transport::new(FakeDevice::failing(2, 0x13));
        match transport.submit(Command::GetZoneColors, None) {
            Err(Error::Protocol { status }) => assert_eq!(status, 0x13),
            other => panic!("expected protocol error, got {:?}", other),
        }
    }

    #[test]
    fn test_transport_error_passes_through() {
        let mut transport = Transport::new(Unreachable);
        let err = transport.submit(Command::Status, None).unwrap_err();
        assert!(matches!(err, Error::Transport(ref msg) if msg == "instance not found"));
    }

    #[test]
    fn test_boxed_platform() {
        let boxed: Box<dyn PlatformCall> = Box::new(FakeDevice::new());
        let mut transport = Transport::new(boxed);
        let reply = transport
            .submit(Command::PlatformInfo(crate::protocol::CommandGroup::Common), None)
            .unwrap();
        assert_eq!(reply.byte(0).unwrap(), 0x01);
    }
}
