//! Simulation state and core types

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::body::HostBody;
use super::switch::ActiveEntitySwitch;
use super::targets::{FallDetector, TargetArray};
use crate::settings::Settings;

/// Which movable an operation refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Bowling ball, moved by impulses
    Projectile,
    /// Car, moved by setting its pose
    Vehicle,
}

impl EntityKind {
    /// The other movable
    pub fn other(self) -> Self {
        match self {
            EntityKind::Projectile => EntityKind::Vehicle,
            EntityKind::Vehicle => EntityKind::Projectile,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Projectile => "ball",
            EntityKind::Vehicle => "car",
        }
    }
}

/// Position and orientation of a body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Pose {
    /// Pose at `position` with identity orientation
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            orientation: Quat::IDENTITY,
        }
    }

    /// Local forward axis in world space
    pub fn forward(&self) -> Vec3 {
        self.orientation * crate::LANE_FORWARD
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::at(Vec3::ZERO)
    }
}

/// Linear and angular velocity of a body
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Velocity {
    pub linear: Vec3,
    pub angular: Vec3,
}

impl Velocity {
    pub const ZERO: Self = Self {
        linear: Vec3::ZERO,
        angular: Vec3::ZERO,
    };
}

/// One sensor reading, consumed as soon as it is delivered
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngleSample {
    pub raw_angle: f32,
}

/// Per-movable sensor bookkeeping
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ControllerState {
    /// Last absolute angle seen (degrees)
    pub previous_angle: f32,
    /// Control delta produced by the last sample
    pub last_delta: f32,
}

impl ControllerState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Things collaborators may want to react to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Ball was thrown
    Thrown,
    /// Active movable changed
    EntitySwitched(EntityKind),
    /// Movable was put back at its spawn
    EntityReset(EntityKind),
    /// Ball reached the pin deck for the first time this round
    PinsHit,
    /// A pin fell; carries the new tally
    TargetDisplaced { count: u32, total: u32 },
    /// Every pin is down (fires once per round)
    Win,
    /// Sensor link came up
    ConnectionEstablished,
    /// Sensor link failed or went away
    ConnectionLost,
}

/// Complete simulation state
pub struct GameState<B> {
    /// Both movables and which one is live
    pub movables: ActiveEntitySwitch<B>,
    /// Pin deck
    pub targets: TargetArray,
    /// Fallen pin tally
    pub fall_detector: FallDetector,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events raised since the last drain
    pub events: Vec<GameEvent>,
}

impl<B: HostBody> GameState<B> {
    /// Create the simulation around the host's ball and car bodies
    pub fn new(settings: &Settings, ball: B, car: B) -> Self {
        Self {
            movables: ActiveEntitySwitch::new(settings, ball, car),
            targets: TargetArray::new(settings),
            fall_detector: FallDetector::new(settings.pin_count),
            time_ticks: 0,
            events: Vec::new(),
        }
    }

    /// Host reports that a pin has been knocked over
    pub fn on_target_displaced(&mut self) {
        let outcome = self.fall_detector.on_target_displaced();
        self.events.push(GameEvent::TargetDisplaced {
            count: outcome.count,
            total: outcome.total,
        });
        if outcome.won {
            self.events.push(GameEvent::Win);
        }
    }

    /// Collision stand-in: sweep the `kind` movable's sphere through the
    /// deck and report every pin it knocks over
    pub fn sweep_targets(&mut self, kind: EntityKind, position: Vec3, radius: f32) -> usize {
        let sweep = self.targets.sweep(kind, position, radius);
        if sweep.first_contact {
            self.events.push(GameEvent::PinsHit);
        }
        for _ in &sweep.fallen {
            self.on_target_displaced();
        }
        sweep.fallen.len()
    }

    /// Stand the pins back up and clear the tally
    pub fn new_round(&mut self) {
        self.targets.reset();
        self.fall_detector.reset();
        log::info!("New round");
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
