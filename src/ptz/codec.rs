use super::command::LogicalCommand;
use super::frame::WireFrame;
use super::pelco::PelcoCodec;
use crate::config::Protocol;

/// Frames produced for one command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodedCommand {
    pub frame: WireFrame,
    /// Sent after the caller's delay when the command starts a movement
    pub auto_stop: Option<WireFrame>,
}

/// Turns validated logical commands into wire frames for one protocol
pub trait PtzProtocolCodec: Send + Sync {
    fn protocol(&self) -> Protocol;

    fn encode(&self, address: u8, command: &LogicalCommand) -> EncodedCommand;
}

static CODECS: &[&dyn PtzProtocolCodec] = &[&PelcoCodec];

pub fn codec_for(protocol: Protocol) -> Option<&'static dyn PtzProtocolCodec> {
    CODECS.iter().copied().find(|codec| codec.protocol() == protocol)
}
