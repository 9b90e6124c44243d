use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use super::RawPtzConfig;

/// One camera entry in a device configuration file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceEntry {
    pub name: String,
    #[serde(flatten)]
    pub ptz: RawPtzConfig,
}

/// Load camera entries from a JSON file.
///
/// The file holds an array of objects with a `name` plus the store keys
/// `ptz_control_path`, `ptz_control_protocol` and `ptz_serial_values`. Entries
/// are returned unchecked; validation happens when a camera is registered.
pub fn load_devices(path: impl AsRef<Path>) -> anyhow::Result<Vec<DeviceEntry>> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read device config {}", path.display()))?;
    parse_devices(&contents)
        .with_context(|| format!("Failed to parse device config {}", path.display()))
}

pub fn parse_devices(contents: &str) -> anyhow::Result<Vec<DeviceEntry>> {
    let entries: Vec<DeviceEntry> = serde_json::from_str(contents)?;
    log::debug!("Loaded {} device entries", entries.len());
    Ok(entries)
}
