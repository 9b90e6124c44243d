pub mod codec;
pub mod command;
pub mod frame;
pub mod pelco;
pub mod transmit;

pub use codec::{codec_for, EncodedCommand, PtzProtocolCodec};
pub use command::{CommandBuilder, Direction, Directions, LogicalCommand, PresetAction, Speeds};
pub use frame::WireFrame;
pub use pelco::PelcoCodec;
pub use transmit::{send, send_with};

use uuid::Uuid;

use crate::config::ConfigRejection;

#[derive(Debug, thiserror::Error)]
pub enum PtzError {
    #[error("PTZ configuration rejected: {0}")]
    ConfigRejected(#[from] ConfigRejection),

    #[error("No PTZ device configured")]
    NoDevice,

    #[error("Invalid PTZ command: {0}")]
    InvalidCommand(&'static str),

    #[error("PTZ device {path} unavailable: {source}")]
    DeviceUnavailable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("PTZ transmission to {path} failed: {source}")]
    TransmitFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown camera: {0}")]
    UnknownCamera(Uuid),

    #[error("PTZ task failed: {0}")]
    TaskFailed(String),
}

pub type Result<T> = std::result::Result<T, PtzError>;
