//! Fixed timestep simulation tick
//!
//! Applies one step of commands, sensor readings and held keys to the
//! live movable. Host physics runs after this, outside the simulation.

use super::body::HostBody;
use super::state::{AngleSample, EntityKind, GameEvent, GameState};

/// Level-held driving keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldKeys {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Throw the ball (edge)
    pub throw: bool,
    /// Swap ball and car (edge)
    pub switch_movable: bool,
    /// Put the live movable back at spawn (edge)
    pub reset: bool,
    /// Driving keys held this tick
    pub held: HeldKeys,
    /// Sensor readings delivered since the previous tick
    pub angle_samples: Vec<AngleSample>,
}

impl TickInput {
    /// Drop one-shot commands and consumed samples, keep held keys
    pub fn clear_one_shots(&mut self) {
        self.throw = false;
        self.switch_movable = false;
        self.reset = false;
        self.angle_samples.clear();
    }
}

/// Advance the game state by one fixed timestep
pub fn tick<B: HostBody>(state: &mut GameState<B>, input: &TickInput, dt: f32) {
    state.time_ticks += 1;

    if input.switch_movable {
        let now_active = state.movables.switch_movable();
        state.events.push(GameEvent::EntitySwitched(now_active));
    }

    if input.reset {
        let kind = state.movables.active_kind();
        state.movables.active_mut().reset();
        state.events.push(GameEvent::EntityReset(kind));
        log::info!("Reset {}", kind.as_str());
    }

    if input.throw && state.movables.active_kind() == EntityKind::Projectile {
        state.movables.active_mut().throw();
        state.events.push(GameEvent::Thrown);
    }

    // One reading per delivered message, in arrival order
    for sample in &input.angle_samples {
        state.movables.device_sink().on_angle_sample(*sample);
    }

    state.movables.active_mut().tick(dt, input.held);
}
