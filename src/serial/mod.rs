pub mod interface;
pub mod session;

#[cfg(test)]
pub mod mock;

pub use interface::{SerialPortLink, SerialportOpener};
pub use session::LinkSession;

use std::io;

use crate::config::PtzLinkConfig;

/// An open serial link to a PTZ camera.
///
/// Closing happens on drop.
pub trait LinkPort {
    /// Discard any bytes received but not yet read
    fn clear_input(&mut self) -> io::Result<()>;

    /// Apply the validated line settings immediately
    fn apply_settings(&mut self, link: &PtzLinkConfig) -> io::Result<()>;

    /// Write bytes and wait for them to be transmitted, returning how many were accepted
    fn write(&mut self, data: &[u8]) -> io::Result<usize>;
}

/// Opens links to serial devices
pub trait LinkOpener {
    type Port: LinkPort;

    /// Open the configured device for read/write without making it the controlling terminal
    fn open(&self, link: &PtzLinkConfig) -> io::Result<Self::Port>;
}
