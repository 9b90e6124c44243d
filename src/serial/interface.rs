use std::io::{self, Write};
use std::time::Duration;

use serialport::{ClearBuffer, FlowControl, SerialPort};

use super::{LinkOpener, LinkPort};
use crate::config::{DataBits, Parity, PtzLinkConfig, StopBits};

/// Upper bound on a single blocking write to the camera
pub const WRITE_TIMEOUT: Duration = Duration::from_millis(1000);

impl From<DataBits> for serialport::DataBits {
    fn from(bits: DataBits) -> Self {
        match bits {
            DataBits::Five => serialport::DataBits::Five,
            DataBits::Six => serialport::DataBits::Six,
            DataBits::Seven => serialport::DataBits::Seven,
            DataBits::Eight => serialport::DataBits::Eight,
        }
    }
}

impl From<Parity> for serialport::Parity {
    fn from(parity: Parity) -> Self {
        match parity {
            Parity::None => serialport::Parity::None,
            Parity::Even => serialport::Parity::Even,
            Parity::Odd => serialport::Parity::Odd,
        }
    }
}

impl From<StopBits> for serialport::StopBits {
    fn from(bits: StopBits) -> Self {
        match bits {
            StopBits::One => serialport::StopBits::One,
            StopBits::Two => serialport::StopBits::Two,
        }
    }
}

/// Opens real serial devices through the `serialport` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialportOpener;

impl LinkOpener for SerialportOpener {
    type Port = SerialPortLink;

    fn open(&self, link: &PtzLinkConfig) -> io::Result<SerialPortLink> {
        let mut port = open_tty(link.device_path())?;
        port.set_timeout(WRITE_TIMEOUT)?;

        log::debug!("Opened PTZ link {}", link.device_path());
        Ok(SerialPortLink { port })
    }
}

/// Open the device node without touching its line settings; those are
/// applied later through [`LinkPort::apply_settings`]
#[cfg(unix)]
fn open_tty(path: &str) -> io::Result<Box<dyn SerialPort>> {
    use std::fs::OpenOptions;
    use std::os::unix::fs::OpenOptionsExt;
    use std::os::unix::io::{FromRawFd, IntoRawFd};

    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .custom_flags(libc::O_NOCTTY)
        .open(path)?;

    // SAFETY: the descriptor comes from `into_raw_fd`, so the port is its only owner
    let port = unsafe { serialport::TTYPort::from_raw_fd(file.into_raw_fd()) };
    Ok(Box::new(port))
}

#[cfg(not(unix))]
fn open_tty(path: &str) -> io::Result<Box<dyn SerialPort>> {
    Ok(serialport::new(path, 9600).flow_control(FlowControl::None).open()?)
}

/// A PTZ link backed by an OS serial port
pub struct SerialPortLink {
    port: Box<dyn SerialPort>,
}

impl LinkPort for SerialPortLink {
    fn clear_input(&mut self) -> io::Result<()> {
        self.port.clear(ClearBuffer::Input)?;
        Ok(())
    }

    fn apply_settings(&mut self, link: &PtzLinkConfig) -> io::Result<()> {
        self.port.set_baud_rate(link.baud_rate().as_u32())?;
        self.port.set_data_bits(link.data_bits().into())?;
        self.port.set_parity(link.parity().into())?;
        self.port.set_stop_bits(link.stop_bits().into())?;
        self.port.set_flow_control(FlowControl::None)?;
        Ok(())
    }

    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let bytes_written = self.port.write(data)?;
        self.port.flush()?;
        Ok(bytes_written)
    }
}
