//! Motion integrators
//!
//! Two ways of turning the same control stream into movement:
//! - [`ForceMotion`] pushes the ball with impulses and lets the host
//!   physics integrate velocity and position.
//! - [`PoseMotion`] drives the car by editing its pose directly.
//!
//! Both consume keyboard input and sensor samples through
//! [`MotionIntegrator`]. Every incremental rotation is a yaw quaternion
//! composed onto the current orientation.

use glam::Vec3;

use super::body::HostBody;
use super::state::{AngleSample, ControllerState, Pose};
use super::tick::HeldKeys;
use crate::settings::Settings;
use crate::{LANE_FORWARD, LANE_RIGHT};

/// Control contract shared by both movables
pub trait MotionIntegrator {
    fn controller(&self) -> &ControllerState;

    /// Discrete throw command
    fn on_throw<B: HostBody>(&mut self, body: &mut B);

    /// Per-frame keyboard input
    fn on_tick<B: HostBody>(&mut self, body: &mut B, dt: f32, held: HeldKeys);

    /// One sensor reading; returns the control delta that was applied
    fn on_angle_sample<B: HostBody>(&mut self, body: &mut B, sample: AngleSample) -> f32;

    /// Put the body back at `spawn` and forget sensor history
    fn reset<B: HostBody>(&mut self, body: &mut B, spawn: Pose);
}

/// Impulse-driven ball control
#[derive(Debug, Clone, PartialEq)]
pub struct ForceMotion {
    pub controller: ControllerState,
    /// Forward push on throw
    pub throw_force: f32,
    /// Lateral force per degree of sensor change
    pub force_scale: f32,
}

impl ForceMotion {
    pub fn new(settings: &Settings) -> Self {
        Self {
            controller: ControllerState::default(),
            throw_force: settings.throw_force,
            force_scale: settings.lateral_force_scale,
        }
    }
}

impl MotionIntegrator for ForceMotion {
    fn controller(&self) -> &ControllerState {
        &self.controller
    }

    fn on_throw<B: HostBody>(&mut self, body: &mut B) {
        log::info!("Throwing ball!");
        body.apply_impulse(LANE_FORWARD * self.throw_force);
    }

    fn on_tick<B: HostBody>(&mut self, _body: &mut B, _dt: f32, _held: HeldKeys) {
        // Host physics owns the ball between impulses
    }

    fn on_angle_sample<B: HostBody>(&mut self, body: &mut B, sample: AngleSample) -> f32 {
        let force = (self.controller.previous_angle - sample.raw_angle) * self.force_scale;
        self.controller.previous_angle = sample.raw_angle;
        self.controller.last_delta = force;

        log::debug!("Ball sample {:.2} -> lateral force {:.2}", sample.raw_angle, force);
        body.apply_impulse(LANE_RIGHT * force);
        force
    }

    fn reset<B: HostBody>(&mut self, body: &mut B, spawn: Pose) {
        body.set_pose(spawn);
        body.clear_velocity();
        self.controller.reset();
    }
}

/// Pose-driven car control
#[derive(Debug, Clone, PartialEq)]
pub struct PoseMotion {
    pub controller: ControllerState,
    /// Units per second while forward is held
    pub forward_speed: f32,
    /// Units per second while backward is held
    pub backward_speed: f32,
    /// Degrees per second while a turn key is held
    pub rotation_speed: f32,
    /// Sensor degrees per degree of yaw
    pub yaw_divisor: f32,
}

impl PoseMotion {
    pub fn new(settings: &Settings) -> Self {
        Self {
            controller: ControllerState::default(),
            forward_speed: settings.forward_speed,
            backward_speed: settings.backward_speed,
            rotation_speed: settings.rotation_speed,
            yaw_divisor: settings.yaw_divisor,
        }
    }
}

impl MotionIntegrator for PoseMotion {
    fn controller(&self) -> &ControllerState {
        &self.controller
    }

    fn on_throw<B: HostBody>(&mut self, _body: &mut B) {}

    fn on_tick<B: HostBody>(&mut self, body: &mut B, dt: f32, held: HeldKeys) {
        let mut distance = 0.0;
        if held.forward {
            distance += self.forward_speed * dt;
        }
        if held.backward {
            distance -= self.backward_speed * dt;
        }
        if distance != 0.0 {
            body.translate_local(Vec3::new(0.0, 0.0, distance));
        }

        let mut turn = 0.0;
        if held.left {
            turn -= self.rotation_speed * dt;
        }
        if held.right {
            turn += self.rotation_speed * dt;
        }
        if turn != 0.0 {
            body.rotate_yaw(turn);
        }
    }

    fn on_angle_sample<B: HostBody>(&mut self, body: &mut B, sample: AngleSample) -> f32 {
        // Absolute angle, not a difference: the car steers while tilted
        let delta = -sample.raw_angle / self.yaw_divisor;
        self.controller.last_delta = delta;

        log::debug!("Car sample {:.2} -> yaw {:.3} deg", sample.raw_angle, delta);
        body.rotate_yaw(delta);
        delta
    }

    fn reset<B: HostBody>(&mut self, body: &mut B, spawn: Pose) {
        body.set_pose(Pose::at(spawn.position));
        body.clear_velocity();
        self.controller.reset();
    }
}

/// Either integrator, chosen per movable
#[derive(Debug, Clone, PartialEq)]
pub enum Motion {
    Force(ForceMotion),
    Pose(PoseMotion),
}

impl MotionIntegrator for Motion {
    fn controller(&self) -> &ControllerState {
        match self {
            Motion::Force(m) => m.controller(),
            Motion::Pose(m) => m.controller(),
        }
    }

    fn on_throw<B: HostBody>(&mut self, body: &mut B) {
        match self {
            Motion::Force(m) => m.on_throw(body),
            Motion::Pose(m) => m.on_throw(body),
        }
    }

    fn on_tick<B: HostBody>(&mut self, body: &mut B, dt: f32, held: HeldKeys) {
        match self {
            Motion::Force(m) => m.on_tick(body, dt, held),
            Motion::Pose(m) => m.on_tick(body, dt, held),
        }
    }

    fn on_angle_sample<B: HostBody>(&mut self, body: &mut B, sample: AngleSample) -> f32 {
        match self {
            Motion::Force(m) => m.on_angle_sample(body, sample),
            Motion::Pose(m) => m.on_angle_sample(body, sample),
        }
    }

    fn reset<B: HostBody>(&mut self, body: &mut B, spawn: Pose) {
        match self {
            Motion::Force(m) => m.reset(body, spawn),
            Motion::Pose(m) => m.reset(body, spawn),
        }
    }
}
