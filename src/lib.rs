//! Pan-tilt-zoom camera control over serial links.
//!
//! Camera configuration is validated once into a [`config::PtzLinkConfig`];
//! logical commands are then encoded into checksummed Pelco frames and written
//! to the camera, with an automatic stop after timed moves.

pub mod config;
pub mod device;
pub mod ptz;
pub mod serial;

pub use config::{validate_ptz_config, PtzLinkConfig, RawPtzConfig};
pub use device::{send_ptz_command, CameraHandle, PtzManager};
pub use ptz::{send, LogicalCommand, PtzError, WireFrame};
