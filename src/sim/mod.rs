//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - Fixed timestep only
//! - Exactly one live movable at a time
//! - No rendering, transport or platform dependencies

pub mod body;
pub mod entity;
pub mod motion;
pub mod state;
pub mod switch;
pub mod targets;
pub mod tick;

pub use body::{HostBody, SimBody};
pub use entity::{ControllableEntity, DeviceSink};
pub use motion::{ForceMotion, Motion, MotionIntegrator, PoseMotion};
pub use state::{
    AngleSample, ControllerState, EntityKind, GameEvent, GameState, Pose, Velocity,
};
pub use switch::ActiveEntitySwitch;
pub use targets::{Displacement, FallDetector, Sweep, TargetArray};
pub use tick::{HeldKeys, TickInput, tick};
