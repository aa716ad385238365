//! Controllable movables
//!
//! The ball and the car share one capability surface (activate,
//! deactivate, reset, receive sensor samples) and differ only in the
//! [`Motion`] variant they carry.

use super::body::HostBody;
use super::motion::{ForceMotion, Motion, MotionIntegrator, PoseMotion};
use super::state::{AngleSample, ControllerState, EntityKind, Pose};
use super::tick::HeldKeys;
use crate::settings::Settings;

/// Anything the device stream can be pointed at
pub trait DeviceSink {
    /// Consume one reading; returns the control delta applied
    fn on_angle_sample(&mut self, sample: AngleSample) -> f32;
}

/// One movable: integrator, host body and spawn pose
#[derive(Debug, Clone)]
pub struct ControllableEntity<B> {
    kind: EntityKind,
    motion: Motion,
    body: B,
    spawn: Pose,
    active: bool,
}

impl<B: HostBody> ControllableEntity<B> {
    /// Impulse-driven ball
    pub fn projectile(settings: &Settings, body: B) -> Self {
        Self::new(
            EntityKind::Projectile,
            Motion::Force(ForceMotion::new(settings)),
            body,
            settings,
        )
    }

    /// Pose-driven car
    pub fn vehicle(settings: &Settings, body: B) -> Self {
        Self::new(
            EntityKind::Vehicle,
            Motion::Pose(PoseMotion::new(settings)),
            body,
            settings,
        )
    }

    fn new(kind: EntityKind, motion: Motion, body: B, settings: &Settings) -> Self {
        let mut entity = Self {
            kind,
            motion,
            body,
            spawn: Pose::at(settings.spawn_position),
            active: false,
        };
        entity.reset();
        entity.deactivate();
        entity
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn spawn(&self) -> Pose {
        self.spawn
    }

    pub fn body(&self) -> &B {
        &self.body
    }

    /// Host access, e.g. to step its physics
    pub fn body_mut(&mut self) -> &mut B {
        &mut self.body
    }

    pub fn controller(&self) -> &ControllerState {
        self.motion.controller()
    }

    /// Show the body and start taking input
    pub fn activate(&mut self) {
        self.active = true;
        self.body.set_visible(true);
    }

    /// Hide the body and stop taking input
    pub fn deactivate(&mut self) {
        self.active = false;
        self.body.set_visible(false);
    }

    /// Back to spawn with no velocity and no sensor history
    pub fn reset(&mut self) {
        self.motion.reset(&mut self.body, self.spawn);
    }

    /// Whether the body sits at spawn, at rest
    pub fn is_at_spawn(&self) -> bool {
        let pose = self.body.pose();
        let velocity = self.body.velocity();
        pose.position == self.spawn.position
            && pose.orientation == self.spawn.orientation
            && velocity == super::state::Velocity::ZERO
    }

    pub fn throw(&mut self) {
        self.motion.on_throw(&mut self.body);
    }

    pub fn tick(&mut self, dt: f32, held: HeldKeys) {
        self.motion.on_tick(&mut self.body, dt, held);
    }
}

impl<B: HostBody> DeviceSink for ControllableEntity<B> {
    fn on_angle_sample(&mut self, sample: AngleSample) -> f32 {
        self.motion.on_angle_sample(&mut self.body, sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimBody;
    use glam::Vec3;

    fn body() -> SimBody {
        SimBody::new(Pose::default(), 1.0)
    }

    #[test]
    fn test_new_entity_starts_hidden_at_spawn() {
        let settings = Settings::default();
        let ball = ControllableEntity::projectile(&settings, body());
        assert!(!ball.is_active());
        assert!(!ball.body().is_visible());
        assert!(ball.is_at_spawn());
        assert_eq!(ball.body().pose.position, settings.spawn_position);
    }

    #[test]
    fn test_activate_deactivate_toggle_visibility() {
        let mut car = ControllableEntity::vehicle(&Settings::default(), body());
        car.activate();
        assert!(car.is_active());
        assert!(car.body().is_visible());
        car.deactivate();
        assert!(!car.is_active());
        assert!(!car.body().is_visible());
    }

    #[test]
    fn test_device_sink_routes_to_motion() {
        let mut ball = ControllableEntity::projectile(&Settings::default(), body());
        ball.on_angle_sample(AngleSample { raw_angle: -2.0 });
        assert_eq!(ball.controller().previous_angle, -2.0);
        assert_eq!(ball.body().impulse_total, Vec3::new(100.0, 0.0, 0.0));
    }

    #[test]
    fn test_reset_after_motion() {
        let mut ball = ControllableEntity::projectile(&Settings::default(), body());
        ball.activate();
        ball.throw();
        ball.body_mut().integrate(0.1);
        assert!(!ball.is_at_spawn());

        ball.reset();
        assert!(ball.is_at_spawn());
    }
}
