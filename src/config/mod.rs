pub mod link;
pub mod store;

pub use link::{
    validate_ptz_config, BaudRate, DataBits, Parity, Protocol, PtzLinkConfig, StopBits,
};
pub use store::{load_devices, DeviceEntry};

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Store key holding the serial device path
pub const KEY_CONTROL_PATH: &str = "ptz_control_path";
/// Store key holding the protocol name
pub const KEY_CONTROL_PROTOCOL: &str = "ptz_control_protocol";
/// Store key holding `addr,baud,databits,parity,stopbits`
pub const KEY_SERIAL_VALUES: &str = "ptz_serial_values";

/// PTZ settings for one camera as read from the configuration store, unchecked
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPtzConfig {
    #[serde(rename = "ptz_control_path", default)]
    pub device_path: Option<String>,
    #[serde(rename = "ptz_control_protocol", default)]
    pub protocol_name: Option<String>,
    #[serde(rename = "ptz_serial_values", default)]
    pub serial_params: Option<String>,
}

impl RawPtzConfig {
    /// Build from any key/value source, e.g. a database row accessor
    pub fn from_lookup<'a, F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        Self {
            device_path: lookup(KEY_CONTROL_PATH).map(str::to_string),
            protocol_name: lookup(KEY_CONTROL_PROTOCOL).map(str::to_string),
            serial_params: lookup(KEY_SERIAL_VALUES).map(str::to_string),
        }
    }

    pub fn from_row(row: &HashMap<String, String>) -> Self {
        Self::from_lookup(|key| row.get(key).map(String::as_str))
    }
}

/// Why a raw configuration did not produce a PTZ link
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigRejection {
    #[error("no PTZ control path configured")]
    MissingDevicePath,

    #[error("control path {0} is not a serial device")]
    NotASerialDevice(String),

    #[error("no PTZ control protocol configured")]
    MissingProtocol,

    #[error("unsupported PTZ protocol: {0}")]
    UnsupportedProtocol(String),

    #[error("no serial parameters configured")]
    MissingSerialParams,

    #[error("malformed serial parameters: {0:?}")]
    MalformedSerialParams(String),

    #[error("unsupported baud rate: {0}")]
    UnsupportedBaudRate(u32),

    #[error("invalid data bits: {0}")]
    InvalidDataBits(i64),

    #[error("invalid parity: {0:?}")]
    InvalidParity(char),

    #[error("invalid stop bits: {0}")]
    InvalidStopBits(i64),

    #[error("camera address out of range: {0}")]
    AddressOutOfRange(i64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_row_reads_store_keys() {
        let mut row = HashMap::new();
        row.insert(KEY_CONTROL_PATH.to_string(), "/dev/ttyS0".to_string());
        row.insert(KEY_CONTROL_PROTOCOL.to_string(), "PELCO".to_string());
        row.insert(KEY_SERIAL_VALUES.to_string(), "1,9600,8,n,1".to_string());
        row.insert("device_name".to_string(), "Lobby".to_string());

        let raw = RawPtzConfig::from_row(&row);
        assert_eq!(raw.device_path.as_deref(), Some("/dev/ttyS0"));
        assert_eq!(raw.protocol_name.as_deref(), Some("PELCO"));
        assert_eq!(raw.serial_params.as_deref(), Some("1,9600,8,n,1"));
    }

    #[test]
    fn test_missing_keys_stay_empty() {
        let raw = RawPtzConfig::from_lookup(|_| None);
        assert_eq!(raw, RawPtzConfig::default());
        assert!(validate_ptz_config(&raw).is_none());
    }

    #[test]
    fn test_deserializes_store_key_names() {
        let raw: RawPtzConfig = serde_json::from_str(
            r#"{"ptz_control_path":"/dev/ttyUSB1","ptz_control_protocol":"pelco"}"#,
        )
        .expect("raw config should deserialize");
        assert_eq!(raw.device_path.as_deref(), Some("/dev/ttyUSB1"));
        assert_eq!(raw.protocol_name.as_deref(), Some("pelco"));
        assert!(raw.serial_params.is_none());
    }
}
