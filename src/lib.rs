//! Tilt Bowl - a bowling lane toy steered by keyboard or a tilt sensor
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movables, switching, pin tally)
//! - `device`: Sensor line protocol and the message queue feeding the sim
//! - `input`: Keyboard edge detection and UI focus handling
//! - `game`: Wiring of the simulation to its host collaborators
//! - `settings`: Data-driven tuning

pub mod device;
pub mod error;
pub mod game;
pub mod input;
pub mod settings;
pub mod sim;

pub use error::{Error, ParseError, Result, ScriptError, SettingsError, WiringError};
pub use game::{Game, GameBuilder, Scoreboard};
pub use settings::Settings;

use glam::{Quat, Vec3};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Events the game keeps for the host between drains
    pub const MAX_PENDING_EVENTS: usize = 1024;

    /// Spawn point shared by the ball and the car (lane start)
    pub const SPAWN_POSITION: [f32; 3] = [0.0, 0.69, 0.74];

    /// Lateral force per degree of sensor rotation (ball)
    pub const LATERAL_FORCE_SCALE: f32 = 50.0;
    /// Sensor degrees per degree of car yaw
    pub const YAW_DIVISOR: f32 = 15.0;
    /// Forward push applied when the ball is thrown
    pub const THROW_FORCE: f32 = 56.0;
    /// Ball mass (kg)
    pub const BALL_MASS: f32 = 7.0;

    /// Car speeds (units/s) and turn rate (degrees/s)
    pub const FORWARD_SPEED: f32 = 2.0;
    pub const BACKWARD_SPEED: f32 = 1.0;
    pub const ROTATION_SPEED: f32 = 90.0;

    /// Pins on the deck
    pub const PIN_COUNT: u32 = 10;
    /// Largest deck a settings file may ask for (ten rows)
    pub const MAX_PIN_COUNT: u32 = 55;
    /// Distance of the head pin from the spawn point along the lane
    pub const PIN_DECK_DISTANCE: f32 = 18.0;
    /// Spacing between neighbouring pins
    pub const PIN_SPACING: f32 = 0.3;
    /// Radius used when sweeping a body against a pin
    pub const PIN_RADIUS: f32 = 0.06;
}

/// Lane forward axis (+Z), matching an identity spawn orientation
pub const LANE_FORWARD: Vec3 = Vec3::Z;
/// Lane lateral axis (+X)
pub const LANE_RIGHT: Vec3 = Vec3::X;

/// Yaw rotation of `degrees` about the vertical axis
#[inline]
pub fn yaw(degrees: f32) -> Quat {
    Quat::from_rotation_y(degrees.to_radians())
}

/// Yaw angle (degrees) of an orientation, in [-180, 180]
#[inline]
pub fn yaw_degrees(orientation: Quat) -> f32 {
    let (y, _, _) = orientation.to_euler(glam::EulerRot::YXZ);
    y.to_degrees()
}
