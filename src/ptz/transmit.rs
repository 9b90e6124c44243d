use std::io;
use std::thread;
use std::time::Duration;

use super::codec::{codec_for, EncodedCommand};
use super::command::LogicalCommand;
use super::{PtzError, Result};
use crate::config::PtzLinkConfig;
use crate::serial::{LinkOpener, LinkPort, LinkSession, SerialportOpener};

/// Send a command to the camera on `link`, blocking until the link is closed.
///
/// Move commands hold the link for `delay_ms` and then send a stop frame, so
/// the camera never keeps moving once this returns. Only one send per link
/// may be in flight.
pub fn send(link: &PtzLinkConfig, command: LogicalCommand, delay_ms: u32) -> Result<()> {
    send_with(&SerialportOpener, link, command, delay_ms)
}

pub fn send_with<O: LinkOpener>(
    opener: &O,
    link: &PtzLinkConfig,
    command: LogicalCommand,
    delay_ms: u32,
) -> Result<()> {
    let codec = codec_for(link.protocol())
        .ok_or(PtzError::InvalidCommand("unsupported PTZ protocol"))?;
    command.validate()?;
    let encoded = codec.encode(link.address(), &command);

    let mut session = LinkSession::open(opener, link).map_err(|source| {
        log::error!("Failed to open PTZ link {}: {}", link.device_path(), source);
        PtzError::DeviceUnavailable {
            path: link.device_path().to_string(),
            source,
        }
    })?;

    if let Err(e) = session.clear_input() {
        log::warn!("Failed to flush PTZ link {}: {}", link.device_path(), e);
    }

    let result = transmit(&mut session, link, &encoded, delay_ms).map_err(|source| {
        log::error!("PTZ transmission to {} failed: {}", link.device_path(), source);
        PtzError::TransmitFailed {
            path: link.device_path().to_string(),
            source,
        }
    });

    session.close();
    result
}

fn transmit<P: LinkPort>(
    session: &mut LinkSession<P>,
    link: &PtzLinkConfig,
    encoded: &EncodedCommand,
    delay_ms: u32,
) -> io::Result<()> {
    session.apply_settings(link)?;
    session.write_frame(encoded.frame.as_bytes())?;
    log::debug!("Sent [{}] to {}", encoded.frame, session.path());

    if let Some(stop) = encoded.auto_stop {
        log::debug!("Stopping {} in {} ms", session.path(), delay_ms);
        thread::sleep(Duration::from_millis(u64::from(delay_ms)));
        session.write_frame(stop.as_bytes())?;
        log::debug!("Sent [{}] to {}", stop, session.path());
    }

    Ok(())
}
