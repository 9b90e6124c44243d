use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::config::{validate_ptz_config, PtzLinkConfig, RawPtzConfig};
use crate::ptz::{self, LogicalCommand, PtzError, Result};
use crate::serial::{LinkOpener, SerialportOpener};

/// One camera and its PTZ link, if it has a usable one
#[derive(Debug, Clone, Serialize)]
pub struct CameraHandle {
    pub id: Uuid,
    pub name: String,
    pub ptz: Option<PtzLinkConfig>,
    pub last_command_at: Option<DateTime<Utc>>,
}

impl CameraHandle {
    pub fn new(name: impl Into<String>, raw: &RawPtzConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            ptz: validate_ptz_config(raw),
            last_command_at: None,
        }
    }

    /// Replace the PTZ link wholesale from fresh configuration
    pub fn reconfigure(&mut self, raw: &RawPtzConfig) {
        self.ptz = validate_ptz_config(raw);
    }

    pub fn ptz_enabled(&self) -> bool {
        self.ptz.is_some()
    }

    pub fn link(&self) -> Result<&PtzLinkConfig> {
        self.ptz.as_ref().ok_or(PtzError::NoDevice)
    }
}

/// Validate configuration and report why it was declined, for callers that
/// want to surface the reason instead of silently disabling PTZ
pub fn check_ptz_config(raw: &RawPtzConfig) -> Result<PtzLinkConfig> {
    Ok(PtzLinkConfig::from_raw(raw)?)
}

/// Decode and send an integer command to a camera.
///
/// `delay_ms` is how long a move runs before the automatic stop. Speeds
/// outside 0..=255 use the default; `preset_id` is only read for presets.
pub fn send_ptz_command(
    handle: &CameraHandle,
    command_bits: u32,
    delay_ms: u32,
    pan_speed: i32,
    tilt_speed: i32,
    preset_id: i32,
) -> Result<()> {
    send_ptz_command_with(
        &SerialportOpener,
        handle,
        command_bits,
        delay_ms,
        pan_speed,
        tilt_speed,
        preset_id,
    )
}

pub fn send_ptz_command_with<O: LinkOpener>(
    opener: &O,
    handle: &CameraHandle,
    command_bits: u32,
    delay_ms: u32,
    pan_speed: i32,
    tilt_speed: i32,
    preset_id: i32,
) -> Result<()> {
    let link = handle.link()?;
    let command = LogicalCommand::from_bits(command_bits, pan_speed, tilt_speed, preset_id)?;
    log::debug!("Camera {} ({}): {:?}", handle.name, handle.id, command);
    ptz::send_with(opener, link, command, delay_ms)
}
