use std::fmt;

pub const FRAME_LEN: usize = 7;
pub const SYNC_BYTE: u8 = 0xFF;
pub const PROTOCOL_MARKER: u8 = 0x01;

/// A checksummed 7-byte control frame:
/// `[sync, marker, address, command, data1, data2, checksum]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WireFrame([u8; FRAME_LEN]);

impl WireFrame {
    pub fn new(address: u8, command: u8, data1: u8, data2: u8) -> Self {
        let mut bytes = [SYNC_BYTE, PROTOCOL_MARKER, address, command, data1, data2, 0];
        bytes[6] = checksum(&bytes[1..6]);
        Self(bytes)
    }

    /// All-zero stop frame sent after a timed move
    pub fn stop() -> Self {
        Self::new(0, 0, 0, 0)
    }

    pub fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.0
    }

    pub fn address(&self) -> u8 {
        self.0[2]
    }

    pub fn command(&self) -> u8 {
        self.0[3]
    }

    pub fn data(&self) -> (u8, u8) {
        (self.0[4], self.0[5])
    }

    pub fn checksum(&self) -> u8 {
        self.0[6]
    }

    pub fn is_checksum_valid(&self) -> bool {
        checksum(&self.0[1..6]) == self.0[6]
    }
}

impl fmt::Display for WireFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{:02X}", byte)?;
        }
        Ok(())
    }
}

/// Modulo-256 sum of the bytes
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |sum, b| sum.wrapping_add(*b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_wraps() {
        assert_eq!(checksum(&[0xFF, 0x02]), 0x01);
        assert_eq!(checksum(&[]), 0);
    }

    #[test]
    fn test_stop_frame_layout() {
        assert_eq!(WireFrame::stop().as_bytes(), &[0xFF, 0x01, 0x00, 0x00, 0x00, 0x00, 0x01]);
    }

    #[test]
    fn test_checksum_covers_bytes_one_to_five() {
        for address in [0u8, 1, 0x7F, 0xFF] {
            for command in [0u8, 0x02, 0x07, 0x7E] {
                for data in [0u8, 0x20, 0xFF] {
                    let frame = WireFrame::new(address, command, data, data.wrapping_add(3));
                    assert!(frame.is_checksum_valid());
                    let expected = [PROTOCOL_MARKER, address, command, data, data.wrapping_add(3)]
                        .iter()
                        .map(|b| u32::from(*b))
                        .sum::<u32>()
                        % 256;
                    assert_eq!(u32::from(frame.checksum()), expected);
                }
            }
        }
    }

    #[test]
    fn test_display_is_hex() {
        assert_eq!(WireFrame::new(5, 2, 0x64, 0x20).to_string(), "FF 01 05 02 64 20 8C");
    }
}
