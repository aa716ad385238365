//! Active movable selection
//!
//! Exactly one of the two movables is live at any time: visible, taking
//! keyboard input and subscribed to the sensor stream. The other one is
//! hidden and parked at its spawn. All changes go through
//! [`ActiveEntitySwitch::switch_movable`].

use super::body::HostBody;
use super::entity::{ControllableEntity, DeviceSink};
use super::state::EntityKind;
use crate::settings::Settings;

/// Owner of both movables and of the sensor subscription
#[derive(Debug, Clone)]
pub struct ActiveEntitySwitch<B> {
    projectile: ControllableEntity<B>,
    vehicle: ControllableEntity<B>,
    active: EntityKind,
    /// Movable the device stream is delivered to
    subscriber: EntityKind,
}

impl<B: HostBody> ActiveEntitySwitch<B> {
    /// Start with the ball live and the car parked
    pub fn new(settings: &Settings, ball: B, car: B) -> Self {
        let mut switch = Self {
            projectile: ControllableEntity::projectile(settings, ball),
            vehicle: ControllableEntity::vehicle(settings, car),
            active: EntityKind::Projectile,
            subscriber: EntityKind::Projectile,
        };
        switch.projectile.activate();
        switch
    }

    /// Currently live movable kind
    pub fn active_kind(&self) -> EntityKind {
        self.active
    }

    /// Movable the sensor stream currently reaches
    pub fn subscriber(&self) -> EntityKind {
        self.subscriber
    }

    pub fn get(&self, kind: EntityKind) -> &ControllableEntity<B> {
        match kind {
            EntityKind::Projectile => &self.projectile,
            EntityKind::Vehicle => &self.vehicle,
        }
    }

    pub fn get_mut(&mut self, kind: EntityKind) -> &mut ControllableEntity<B> {
        match kind {
            EntityKind::Projectile => &mut self.projectile,
            EntityKind::Vehicle => &mut self.vehicle,
        }
    }

    pub fn active(&self) -> &ControllableEntity<B> {
        self.get(self.active)
    }

    pub fn active_mut(&mut self) -> &mut ControllableEntity<B> {
        self.get_mut(self.active)
    }

    pub fn inactive(&self) -> &ControllableEntity<B> {
        self.get(self.active.other())
    }

    /// Sink for the next sensor reading
    pub fn device_sink(&mut self) -> &mut dyn DeviceSink {
        self.get_mut(self.subscriber)
    }

    /// Swap the live movable
    ///
    /// The outgoing movable is reset, hidden and unsubscribed. The
    /// incoming one is reset, shown and receives the sensor stream.
    /// Returns the new active kind.
    pub fn switch_movable(&mut self) -> EntityKind {
        let outgoing = self.active;
        let incoming = outgoing.other();

        {
            let old = self.get_mut(outgoing);
            old.reset();
            old.deactivate();
        }
        {
            let new = self.get_mut(incoming);
            new.reset();
            new.activate();
        }
        self.subscriber = incoming;
        self.active = incoming;

        log::info!("Switched movable: {} -> {}", outgoing.as_str(), incoming.as_str());
        debug_assert!(self.invariant_holds());
        incoming
    }

    /// Exactly one movable live, the subscription follows it, and the
    /// idle one is parked
    pub fn invariant_holds(&self) -> bool {
        let active = self.active();
        let inactive = self.inactive();
        active.is_active()
            && !inactive.is_active()
            && self.subscriber == self.active
            && inactive.is_at_spawn()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{AngleSample, Pose, SimBody};
    use glam::Vec3;
    use proptest::prelude::*;

    fn new_switch() -> ActiveEntitySwitch<SimBody> {
        let settings = Settings::default();
        ActiveEntitySwitch::new(
            &settings,
            SimBody::new(Pose::default(), 1.0),
            SimBody::new(Pose::default(), 1.0),
        )
    }

    #[test]
    fn test_initial_state_is_ball() {
        let switch = new_switch();
        assert_eq!(switch.active_kind(), EntityKind::Projectile);
        assert_eq!(switch.subscriber(), EntityKind::Projectile);
        assert!(switch.invariant_holds());
        assert!(switch.active().body().is_visible());
        assert!(!switch.inactive().body().is_visible());
    }

    #[test]
    fn test_switch_moves_subscription() {
        let mut switch = new_switch();
        assert_eq!(switch.switch_movable(), EntityKind::Vehicle);
        assert_eq!(switch.subscriber(), EntityKind::Vehicle);

        switch.device_sink().on_angle_sample(AngleSample { raw_angle: 30.0 });
        // Car turned, ball untouched
        assert_eq!(switch.get(EntityKind::Vehicle).controller().last_delta, -2.0);
        assert_eq!(
            switch.get(EntityKind::Projectile).body().impulse_total,
            Vec3::ZERO
        );
    }

    #[test]
    fn test_switch_parks_moving_ball() {
        let mut switch = new_switch();
        switch.active_mut().throw();
        switch
            .device_sink()
            .on_angle_sample(AngleSample { raw_angle: 12.0 });
        switch.active_mut().body_mut().integrate(0.2);

        switch.switch_movable();
        let ball = switch.get(EntityKind::Projectile);
        assert!(ball.is_at_spawn());
        assert_eq!(ball.body().velocity().linear, Vec3::ZERO);
        assert_eq!(ball.controller().previous_angle, 0.0);
        assert!(!ball.body().is_visible());
    }

    #[test]
    fn test_switch_back_resets_car() {
        let mut switch = new_switch();
        switch.switch_movable();
        switch.device_sink().on_angle_sample(AngleSample { raw_angle: 45.0 });
        switch
            .active_mut()
            .body_mut()
            .translate_local(Vec3::new(0.0, 0.0, 3.0));

        assert_eq!(switch.switch_movable(), EntityKind::Projectile);
        assert!(switch.get(EntityKind::Vehicle).is_at_spawn());
        assert!(switch.invariant_holds());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Switch,
        Throw,
        Sample(f32),
        Drive(f32),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::Switch),
            Just(Op::Throw),
            (-90.0f32..90.0).prop_map(Op::Sample),
            (0.0f32..0.5).prop_map(Op::Drive),
        ]
    }

    proptest! {
        #[test]
        fn prop_exactly_one_active(ops in proptest::collection::vec(op(), 0..40)) {
            let mut switch = new_switch();
            for op in ops {
                match op {
                    Op::Switch => {
                        switch.switch_movable();
                    }
                    Op::Throw => switch.active_mut().throw(),
                    Op::Sample(angle) => {
                        switch.device_sink().on_angle_sample(AngleSample { raw_angle: angle });
                    }
                    Op::Drive(dt) => {
                        let held = crate::sim::HeldKeys { forward: true, right: true, ..Default::default() };
                        let active = switch.active_mut();
                        active.tick(dt, held);
                        active.body_mut().integrate(dt);
                    }
                }
                prop_assert!(switch.invariant_holds());
                prop_assert_eq!(switch.inactive().body().velocity(), crate::sim::Velocity::ZERO);
            }
        }
    }
}
