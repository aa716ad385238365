//! Device message queue
//!
//! The transport pushes raw lines and connection changes through a
//! [`DeviceSender`] from whatever thread it runs on. The simulation owns
//! the [`DeviceLink`] and drains it once per frame.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use super::parser::parse_angle;
use crate::sim::AngleSample;

/// Raw traffic from the transport
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceMessage {
    /// One text line, without its terminator
    Line(String),
    /// Connect attempt result or disconnect (`false`)
    Connection(bool),
}

/// Connection state changes seen while draining
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkEvent {
    Connected,
    Disconnected,
}

/// Everything pulled out of the queue in one drain
#[derive(Debug, Clone, Default)]
pub struct Drained {
    /// Parsed readings in arrival order
    pub samples: Vec<AngleSample>,
    /// Connection transitions in arrival order
    pub events: Vec<LinkEvent>,
    /// Lines that could not be parsed
    pub malformed: u32,
}

/// Transport-side handle
#[derive(Debug, Clone)]
pub struct DeviceSender {
    tx: Sender<DeviceMessage>,
}

impl DeviceSender {
    /// Queue a raw line. Returns false once the simulation side is gone.
    pub fn send_line(&self, line: impl Into<String>) -> bool {
        self.tx.send(DeviceMessage::Line(line.into())).is_ok()
    }

    /// Queue a connection change. Returns false once the simulation side is gone.
    pub fn send_connection(&self, success: bool) -> bool {
        self.tx.send(DeviceMessage::Connection(success)).is_ok()
    }
}

/// Simulation-side end of the device queue
#[derive(Debug)]
pub struct DeviceLink {
    rx: Receiver<DeviceMessage>,
    connected: bool,
    closed: bool,
    malformed_total: u64,
}

impl DeviceLink {
    /// Create a connected sender/link pair
    pub fn channel() -> (DeviceSender, DeviceLink) {
        let (tx, rx) = mpsc::channel();
        let link = DeviceLink {
            rx,
            connected: false,
            closed: false,
            malformed_total: 0,
        };
        (DeviceSender { tx }, link)
    }

    /// Whether the last connection event reported success
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Whether every sender has been dropped
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Lines dropped as malformed since creation
    pub fn malformed_total(&self) -> u64 {
        self.malformed_total
    }

    /// Pull every queued message without blocking
    ///
    /// Malformed lines are logged and dropped. A closed transport counts
    /// as a disconnect if the link was connected.
    pub fn drain(&mut self) -> Drained {
        let mut drained = Drained::default();

        loop {
            match self.rx.try_recv() {
                Ok(DeviceMessage::Line(line)) => match parse_angle(&line) {
                    Ok(raw_angle) => drained.samples.push(AngleSample { raw_angle }),
                    Err(err) => {
                        log::warn!("Dropping device sample: {}", err);
                        drained.malformed += 1;
                        self.malformed_total += 1;
                    }
                },
                Ok(DeviceMessage::Connection(success)) => {
                    self.connected = success;
                    if success {
                        log::info!("Connection established");
                        drained.events.push(LinkEvent::Connected);
                    } else {
                        log::info!("Connection attempt failed or disconnection detected");
                        drained.events.push(LinkEvent::Disconnected);
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if !self.closed {
                        self.closed = true;
                        log::info!("Device transport closed");
                        if self.connected {
                            self.connected = false;
                            drained.events.push(LinkEvent::Disconnected);
                        }
                    }
                    break;
                }
            }
        }

        drained
    }
}
