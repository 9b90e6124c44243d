use std::io;

use super::{LinkOpener, LinkPort};
use crate::config::PtzLinkConfig;

/// A link held open for the duration of one command.
///
/// Releasing flushes pending input and closes the port. It runs exactly once,
/// either through [`LinkSession::close`] or on drop.
pub struct LinkSession<P: LinkPort> {
    port: Option<P>,
    path: String,
}

impl<P: LinkPort> LinkSession<P> {
    pub fn open<O>(opener: &O, link: &PtzLinkConfig) -> io::Result<Self>
    where
        O: LinkOpener<Port = P>,
    {
        let port = opener.open(link)?;
        Ok(Self {
            port: Some(port),
            path: link.device_path().to_string(),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn clear_input(&mut self) -> io::Result<()> {
        self.port()?.clear_input()
    }

    pub fn apply_settings(&mut self, link: &PtzLinkConfig) -> io::Result<()> {
        self.port()?.apply_settings(link)
    }

    /// Write a whole frame; a short write is an error
    pub fn write_frame(&mut self, frame: &[u8]) -> io::Result<()> {
        let written = self.port()?.write(frame)?;
        if written != frame.len() {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                format!("short write: {} of {} bytes", written, frame.len()),
            ));
        }
        Ok(())
    }

    pub fn close(mut self) {
        self.release();
    }

    fn port(&mut self) -> io::Result<&mut P> {
        self.port
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "PTZ link already closed"))
    }

    fn release(&mut self) {
        if let Some(mut port) = self.port.take() {
            if let Err(e) = port.clear_input() {
                log::warn!("Failed to flush PTZ link {} before close: {}", self.path, e);
            }
            drop(port);
            log::debug!("Closed PTZ link {}", self.path);
        }
    }
}

impl<P: LinkPort> Drop for LinkSession<P> {
    fn drop(&mut self) {
        self.release();
    }
}
