use serde::{Deserialize, Serialize};

use super::{ConfigRejection, RawPtzConfig};

/// Serial device nodes must live under this namespace
pub const DEVICE_PATH_PREFIX: &str = "/dev/";

/// Name of the only supported control protocol, matched case-insensitively
pub const PELCO_PROTOCOL_NAME: &str = "PELCO";

/// PTZ control protocols understood by this crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Protocol {
    Pelco,
}

impl Protocol {
    pub fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case(PELCO_PROTOCOL_NAME) {
            Some(Protocol::Pelco)
        } else {
            None
        }
    }
}

/// Line rates a PTZ link may be configured with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BaudRate {
    B50,
    B75,
    B110,
    B134,
    B150,
    B200,
    B300,
    B600,
    B1200,
    B1800,
    B2400,
    B9600,
    B19200,
    B38400,
}

impl BaudRate {
    pub const ALL: [BaudRate; 14] = [
        BaudRate::B50,
        BaudRate::B75,
        BaudRate::B110,
        BaudRate::B134,
        BaudRate::B150,
        BaudRate::B200,
        BaudRate::B300,
        BaudRate::B600,
        BaudRate::B1200,
        BaudRate::B1800,
        BaudRate::B2400,
        BaudRate::B9600,
        BaudRate::B19200,
        BaudRate::B38400,
    ];

    pub fn from_u32(rate: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.as_u32() == rate)
    }

    pub fn as_u32(self) -> u32 {
        match self {
            BaudRate::B50 => 50,
            BaudRate::B75 => 75,
            BaudRate::B110 => 110,
            BaudRate::B134 => 134,
            BaudRate::B150 => 150,
            BaudRate::B200 => 200,
            BaudRate::B300 => 300,
            BaudRate::B600 => 600,
            BaudRate::B1200 => 1200,
            BaudRate::B1800 => 1800,
            BaudRate::B2400 => 2400,
            BaudRate::B9600 => 9600,
            BaudRate::B19200 => 19200,
            BaudRate::B38400 => 38400,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataBits {
    Five,
    Six,
    Seven,
    Eight,
}

impl DataBits {
    pub fn from_u8(bits: u8) -> Option<Self> {
        match bits {
            5 => Some(DataBits::Five),
            6 => Some(DataBits::Six),
            7 => Some(DataBits::Seven),
            8 => Some(DataBits::Eight),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        match self {
            DataBits::Five => 5,
            DataBits::Six => 6,
            DataBits::Seven => 7,
            DataBits::Eight => 8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Parity {
    None,
    Even,
    Odd,
}

impl Parity {
    /// Map a parity character ('n', 'e' or 'o', any case)
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'n' => Some(Parity::None),
            'e' => Some(Parity::Even),
            'o' => Some(Parity::Odd),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Parity::None => 'n',
            Parity::Even => 'e',
            Parity::Odd => 'o',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StopBits {
    One,
    Two,
}

impl StopBits {
    pub fn from_u8(bits: u8) -> Option<Self> {
        match bits {
            1 => Some(StopBits::One),
            2 => Some(StopBits::Two),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        match self {
            StopBits::One => 1,
            StopBits::Two => 2,
        }
    }
}

/// Validated PTZ link parameters for one camera.
///
/// Fields are private: a value only exists if every setting maps onto a
/// supported serial configuration, and it is never edited in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PtzLinkConfig {
    device_path: String,
    protocol: Protocol,
    address: u8,
    baud_rate: BaudRate,
    data_bits: DataBits,
    parity: Parity,
    stop_bits: StopBits,
}

impl PtzLinkConfig {
    /// Validate raw configuration values, reporting why they were declined
    pub fn from_raw(raw: &RawPtzConfig) -> Result<Self, ConfigRejection> {
        let device_path = raw
            .device_path
            .as_deref()
            .ok_or(ConfigRejection::MissingDevicePath)?;
        if !has_device_prefix(device_path) {
            return Err(ConfigRejection::NotASerialDevice(device_path.to_string()));
        }

        let protocol_name = raw
            .protocol_name
            .as_deref()
            .ok_or(ConfigRejection::MissingProtocol)?;
        let protocol = Protocol::from_name(protocol_name)
            .ok_or_else(|| ConfigRejection::UnsupportedProtocol(protocol_name.to_string()))?;

        let params = raw
            .serial_params
            .as_deref()
            .ok_or(ConfigRejection::MissingSerialParams)?;
        let fields = SerialFields::parse(params)?;

        let baud_rate = BaudRate::from_u32(fields.baud)
            .ok_or(ConfigRejection::UnsupportedBaudRate(fields.baud))?;
        let data_bits = u8::try_from(fields.data_bits)
            .ok()
            .and_then(DataBits::from_u8)
            .ok_or(ConfigRejection::InvalidDataBits(fields.data_bits))?;
        let parity =
            Parity::from_char(fields.parity).ok_or(ConfigRejection::InvalidParity(fields.parity))?;
        let stop_bits = u8::try_from(fields.stop_bits)
            .ok()
            .and_then(StopBits::from_u8)
            .ok_or(ConfigRejection::InvalidStopBits(fields.stop_bits))?;
        let address = u8::try_from(fields.address)
            .map_err(|_| ConfigRejection::AddressOutOfRange(fields.address))?;

        Ok(Self {
            device_path: device_path.to_string(),
            protocol,
            address,
            baud_rate,
            data_bits,
            parity,
            stop_bits,
        })
    }

    pub fn device_path(&self) -> &str {
        &self.device_path
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn baud_rate(&self) -> BaudRate {
        self.baud_rate
    }

    pub fn data_bits(&self) -> DataBits {
        self.data_bits
    }

    pub fn parity(&self) -> Parity {
        self.parity
    }

    pub fn stop_bits(&self) -> StopBits {
        self.stop_bits
    }

    /// Render the settings back into the `addr,baud,databits,parity,stopbits` form
    pub fn serial_params(&self) -> String {
        format!(
            "{},{},{},{},{}",
            self.address,
            self.baud_rate.as_u32(),
            self.data_bits.as_u8(),
            self.parity.as_char(),
            self.stop_bits.as_u8()
        )
    }
}

/// Validate raw configuration for a camera.
///
/// `None` means PTZ is not in use for the device. Invalid values are not an
/// error here, they simply leave the camera without PTZ control.
pub fn validate_ptz_config(raw: &RawPtzConfig) -> Option<PtzLinkConfig> {
    match PtzLinkConfig::from_raw(raw) {
        Ok(config) => {
            log::info!(
                "PTZ enabled on {} ({:?}, {})",
                config.device_path(),
                config.protocol(),
                config.serial_params()
            );
            Some(config)
        }
        Err(reason) => {
            log::debug!("PTZ disabled: {}", reason);
            None
        }
    }
}

fn has_device_prefix(path: &str) -> bool {
    path.get(..DEVICE_PATH_PREFIX.len())
        .map(|head| head.eq_ignore_ascii_case(DEVICE_PATH_PREFIX))
        .unwrap_or(false)
}

/// The five comma separated fields of a serial parameter string, before range checks
struct SerialFields {
    address: i64,
    baud: u32,
    data_bits: i64,
    parity: char,
    stop_bits: i64,
}

impl SerialFields {
    // Format: addr,baud,databits,parity,stopbits
    fn parse(params: &str) -> Result<Self, ConfigRejection> {
        let malformed = || ConfigRejection::MalformedSerialParams(params.to_string());

        let parts: Vec<&str> = params.split(',').map(str::trim).collect();
        let [address, baud, data_bits, parity, stop_bits] = parts.as_slice() else {
            return Err(malformed());
        };

        let mut parity_chars = parity.chars();
        let parity = match (parity_chars.next(), parity_chars.next()) {
            (Some(c), None) => c,
            _ => return Err(malformed()),
        };

        Ok(Self {
            address: address.parse().map_err(|_| malformed())?,
            baud: baud.parse().map_err(|_| malformed())?,
            data_bits: data_bits.parse().map_err(|_| malformed())?,
            parity,
            stop_bits: stop_bits.parse().map_err(|_| malformed())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(path: &str, proto: &str, params: &str) -> RawPtzConfig {
        RawPtzConfig {
            device_path: Some(path.to_string()),
            protocol_name: Some(proto.to_string()),
            serial_params: Some(params.to_string()),
        }
    }

    #[test]
    fn test_accepts_reference_config() {
        let config = validate_ptz_config(&raw("/dev/ttyS0", "PELCO", "5,9600,8,n,1"))
            .expect("config should be accepted");
        assert_eq!(config.device_path(), "/dev/ttyS0");
        assert_eq!(config.protocol(), Protocol::Pelco);
        assert_eq!(config.address(), 5);
        assert_eq!(config.baud_rate(), BaudRate::B9600);
        assert_eq!(config.data_bits(), DataBits::Eight);
        assert_eq!(config.parity(), Parity::None);
        assert_eq!(config.stop_bits(), StopBits::One);
        assert_eq!(config.serial_params(), "5,9600,8,n,1");
    }

    #[test]
    fn test_protocol_and_prefix_are_case_insensitive() {
        let config = PtzLinkConfig::from_raw(&raw("/DEV/ttyUSB0", "pelco", "0,2400,7,E,2"))
            .expect("config should be accepted");
        assert_eq!(config.parity(), Parity::Even);
        assert_eq!(config.stop_bits(), StopBits::Two);
    }

    #[test]
    fn test_missing_fields_disable_ptz() {
        let mut cfg = raw("/dev/ttyS0", "PELCO", "5,9600,8,n,1");
        cfg.device_path = None;
        assert!(matches!(PtzLinkConfig::from_raw(&cfg), Err(ConfigRejection::MissingDevicePath)));

        let mut cfg = raw("/dev/ttyS0", "PELCO", "5,9600,8,n,1");
        cfg.protocol_name = None;
        assert!(matches!(PtzLinkConfig::from_raw(&cfg), Err(ConfigRejection::MissingProtocol)));

        let mut cfg = raw("/dev/ttyS0", "PELCO", "5,9600,8,n,1");
        cfg.serial_params = None;
        assert!(matches!(PtzLinkConfig::from_raw(&cfg), Err(ConfigRejection::MissingSerialParams)));
    }

    #[test]
    fn test_rejects_paths_outside_dev() {
        let result = PtzLinkConfig::from_raw(&raw("/tmp/ttyS0", "PELCO", "5,9600,8,n,1"));
        assert!(matches!(result, Err(ConfigRejection::NotASerialDevice(_))));
        assert!(validate_ptz_config(&raw("/de", "PELCO", "5,9600,8,n,1")).is_none());
    }

    #[test]
    fn test_rejects_other_protocols() {
        let result = PtzLinkConfig::from_raw(&raw("/dev/ttyS0", "VISCA", "5,9600,8,n,1"));
        assert!(matches!(result, Err(ConfigRejection::UnsupportedProtocol(_))));
    }

    #[test]
    fn test_rejects_malformed_params() {
        let malformed = [
            "5,9600,8,n",
            "5,9600,8,n,1,0",
            "x,9600,8,n,1",
            "5,9600,8,no,1",
            "5,9600,8,,1",
            "",
        ];
        for params in malformed {
            let result = PtzLinkConfig::from_raw(&raw("/dev/ttyS0", "PELCO", params));
            assert!(
                matches!(result, Err(ConfigRejection::MalformedSerialParams(_))),
                "params {:?} should be malformed, got {:?}",
                params,
                result
            );
        }
    }

    #[test]
    fn test_rejects_out_of_domain_values() {
        let cases = [
            ("5,9601,8,n,1", "baud"),
            ("5,115200,8,n,1", "baud"),
            ("5,9600,9,n,1", "data bits"),
            ("5,9600,4,n,1", "data bits"),
            ("5,9600,8,m,1", "parity"),
            ("5,9600,8,n,3", "stop bits"),
            ("5,9600,8,n,0", "stop bits"),
            ("256,9600,8,n,1", "address"),
            ("-1,9600,8,n,1", "address"),
        ];
        for (params, what) in cases {
            assert!(
                validate_ptz_config(&raw("/dev/ttyS0", "PELCO", params)).is_none(),
                "invalid {} in {:?} should be rejected",
                what,
                params
            );
        }
    }

    #[test]
    fn test_every_supported_tuple_round_trips() {
        for baud in BaudRate::ALL {
            for bits in 5u8..=8 {
                for parity in ['n', 'e', 'o'] {
                    for stop in [1u8, 2] {
                        for addr in [0u16, 1, 127, 255] {
                            let params = format!(
                                "{},{},{},{},{}",
                                addr,
                                baud.as_u32(),
                                bits,
                                parity,
                                stop
                            );
                            let config =
                                PtzLinkConfig::from_raw(&raw("/dev/ttyS1", "Pelco", &params))
                                    .expect("supported tuple should validate");
                            assert_eq!(u16::from(config.address()), addr);
                            assert_eq!(config.baud_rate(), baud);
                            assert_eq!(config.data_bits().as_u8(), bits);
                            assert_eq!(config.parity().as_char(), parity);
                            assert_eq!(config.stop_bits().as_u8(), stop);
                            assert_eq!(config.serial_params(), params);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_fields_are_trimmed() {
        let config = validate_ptz_config(&raw("/dev/ttyS0", "PELCO", " 12, 19200 ,8, O ,1"))
            .expect("config should be accepted");
        assert_eq!(config.address(), 12);
        assert_eq!(config.parity(), Parity::Odd);
    }
}
