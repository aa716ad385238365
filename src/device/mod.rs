//! Sensor device plumbing
//!
//! The device sends one text line per reading, `Angle=<degrees>`. Lines
//! and connection changes are queued by the transport and drained on the
//! simulation thread once per frame.

pub mod link;
pub mod parser;
pub mod simulated;

pub use link::{DeviceLink, DeviceMessage, DeviceSender, Drained, LinkEvent};
pub use parser::parse_angle;
pub use simulated::SimulatedTilt;
