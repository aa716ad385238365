//! Host body boundary
//!
//! The physics/render host owns transforms and integrates motion. The
//! simulation only touches a body through [`HostBody`].

use glam::Vec3;

use super::state::{Pose, Velocity};

/// What the simulation needs from a host physics body
pub trait HostBody {
    fn pose(&self) -> Pose;

    /// Teleport the body
    fn set_pose(&mut self, pose: Pose);

    /// Add an instantaneous momentum change (world space)
    fn apply_impulse(&mut self, impulse: Vec3);

    fn velocity(&self) -> Velocity;

    /// Zero linear and angular velocity
    fn clear_velocity(&mut self);

    /// Show or hide the body (hidden bodies are not simulated)
    fn set_visible(&mut self, visible: bool);

    fn is_visible(&self) -> bool;

    /// Move along the body's own axes
    fn translate_local(&mut self, offset: Vec3) {
        let mut pose = self.pose();
        pose.position += pose.orientation * offset;
        self.set_pose(pose);
    }

    /// Compose a yaw rotation onto the current orientation
    fn rotate_yaw(&mut self, degrees: f32) {
        let mut pose = self.pose();
        pose.orientation = (pose.orientation * crate::yaw(degrees)).normalize();
        self.set_pose(pose);
    }
}

/// Minimal rigid body used headless and in tests
///
/// Impulses change velocity by `impulse / mass`; [`SimBody::integrate`]
/// moves the body. No gravity or contacts.
#[derive(Debug, Clone, PartialEq)]
pub struct SimBody {
    pub pose: Pose,
    pub velocity: Velocity,
    pub mass: f32,
    pub visible: bool,
    /// Sum of every impulse applied since creation
    pub impulse_total: Vec3,
    /// Fraction of linear velocity lost per second (rolling friction)
    pub damping: f32,
}

impl SimBody {
    pub fn new(pose: Pose, mass: f32) -> Self {
        Self {
            pose,
            velocity: Velocity::ZERO,
            mass,
            visible: true,
            impulse_total: Vec3::ZERO,
            damping: 0.0,
        }
    }

    /// Advance position by the current velocity
    pub fn integrate(&mut self, dt: f32) {
        if !self.visible {
            return;
        }
        self.pose.position += self.velocity.linear * dt;
        let spin = self.velocity.angular * dt;
        if spin != Vec3::ZERO {
            let delta = glam::Quat::from_scaled_axis(spin);
            self.pose.orientation = (delta * self.pose.orientation).normalize();
        }
        self.velocity.linear *= (1.0 - self.damping * dt).max(0.0);
    }
}

impl HostBody for SimBody {
    fn pose(&self) -> Pose {
        self.pose
    }

    fn set_pose(&mut self, pose: Pose) {
        self.pose = pose;
    }

    fn apply_impulse(&mut self, impulse: Vec3) {
        self.impulse_total += impulse;
        self.velocity.linear += impulse / self.mass;
    }

    fn velocity(&self) -> Velocity {
        self.velocity
    }

    fn clear_velocity(&mut self) {
        self.velocity = Velocity::ZERO;
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_impulse_changes_velocity() {
        let mut body = SimBody::new(Pose::default(), 2.0);
        body.apply_impulse(Vec3::new(4.0, 0.0, 0.0));
        assert_eq!(body.velocity.linear, Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(body.impulse_total, Vec3::new(4.0, 0.0, 0.0));

        body.integrate(0.5);
        assert_eq!(body.pose.position, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_hidden_body_does_not_move() {
        let mut body = SimBody::new(Pose::default(), 1.0);
        body.apply_impulse(Vec3::Z);
        body.set_visible(false);
        body.integrate(1.0);
        assert_eq!(body.pose.position, Vec3::ZERO);
    }

    #[test]
    fn test_translate_local_follows_orientation() {
        let mut body = SimBody::new(Pose::default(), 1.0);
        body.rotate_yaw(90.0);
        body.translate_local(Vec3::new(0.0, 0.0, 1.0));
        // +Z rotated 90 degrees about +Y points along +X
        assert!((body.pose.position - Vec3::X).length() < 1e-5);
    }
}
