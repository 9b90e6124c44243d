//! Recording link used by tests in place of a real serial device.

use std::io;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use super::{LinkOpener, LinkPort};
use crate::config::PtzLinkConfig;

type EventLog = Vec<(LinkEvent, Instant)>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    Opened(String),
    ClearedInput,
    Configured(String),
    Wrote(Vec<u8>),
    Closed,
}

#[derive(Debug, Clone, Default)]
struct Failures {
    open: bool,
    configure: bool,
    write: Option<usize>,
    short_write: Option<usize>,
}

/// Hands out [`MockPort`]s that share one event log
#[derive(Debug, Clone, Default)]
pub struct MockOpener {
    events: Arc<Mutex<EventLog>>,
    failures: Failures,
}

impl MockOpener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_open(mut self) -> Self {
        self.failures.open = true;
        self
    }

    pub fn failing_configure(mut self) -> Self {
        self.failures.configure = true;
        self
    }

    /// Fail the write with the given zero-based index
    pub fn failing_write(mut self, index: usize) -> Self {
        self.failures.write = Some(index);
        self
    }

    /// Accept one byte less than requested on the write with the given index
    pub fn short_write(mut self, index: usize) -> Self {
        self.failures.short_write = Some(index);
        self
    }

    pub fn events(&self) -> Vec<LinkEvent> {
        lock(&self.events).iter().map(|(e, _)| e.clone()).collect()
    }

    /// Frames that reached the device, with the time each write completed
    pub fn writes(&self) -> Vec<(Vec<u8>, Instant)> {
        lock(&self.events)
            .iter()
            .filter_map(|(e, at)| match e {
                LinkEvent::Wrote(bytes) => Some((bytes.clone(), *at)),
                _ => None,
            })
            .collect()
    }
}

impl LinkOpener for MockOpener {
    type Port = MockPort;

    fn open(&self, link: &PtzLinkConfig) -> io::Result<MockPort> {
        if self.failures.open {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "mock open failure"));
        }
        record(&self.events, LinkEvent::Opened(link.device_path().to_string()));
        Ok(MockPort {
            events: Arc::clone(&self.events),
            failures: self.failures.clone(),
            writes: 0,
        })
    }
}

pub struct MockPort {
    events: Arc<Mutex<EventLog>>,
    failures: Failures,
    writes: usize,
}

impl LinkPort for MockPort {
    fn clear_input(&mut self) -> io::Result<()> {
        record(&self.events, LinkEvent::ClearedInput);
        Ok(())
    }

    fn apply_settings(&mut self, link: &PtzLinkConfig) -> io::Result<()> {
        if self.failures.configure {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "mock tcsetattr failure"));
        }
        record(&self.events, LinkEvent::Configured(link.serial_params()));
        Ok(())
    }

    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let index = self.writes;
        self.writes += 1;

        if self.failures.write == Some(index) {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "mock write failure"));
        }
        let accepted = if self.failures.short_write == Some(index) {
            data.len().saturating_sub(1)
        } else {
            data.len()
        };
        record(&self.events, LinkEvent::Wrote(data[..accepted].to_vec()));
        Ok(accepted)
    }
}

impl Drop for MockPort {
    fn drop(&mut self) {
        record(&self.events, LinkEvent::Closed);
    }
}

fn lock(events: &Mutex<EventLog>) -> MutexGuard<'_, EventLog> {
    events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn record(events: &Mutex<EventLog>, event: LinkEvent) {
    lock(events).push((event, Instant::now()));
}
