//! Game wiring
//!
//! [`Game`] ties the simulation to its collaborators: host bodies, the
//! sensor queue, the scoreboard and the UI focus hook. Everything is
//! checked once in [`GameBuilder::build`]; a missing piece is a startup
//! error, never a silent no-op at runtime.

use crate::consts::{MAX_PENDING_EVENTS, MAX_SUBSTEPS, SIM_DT};
use crate::device::{DeviceLink, LinkEvent};
use crate::error::WiringError;
use crate::input::{Command, InputDispatcher, Key, UiFocus};
use crate::settings::Settings;
use crate::sim::{EntityKind, GameEvent, GameState, HostBody, TickInput, tick};

/// Presentation side of the pin tally
pub trait Scoreboard {
    /// New fallen-pin count
    fn set_tally(&mut self, count: u32, total: u32);

    /// Every pin is down
    fn show_win(&mut self);

    /// Live movable changed
    fn entity_switched(&mut self, _kind: EntityKind) {}
}

/// Collects collaborators before a [`Game`] is created
pub struct GameBuilder<B> {
    settings: Settings,
    ball: Option<B>,
    car: Option<B>,
    scoreboard: Option<Box<dyn Scoreboard>>,
    ui_focus: Option<Box<dyn UiFocus>>,
    device: Option<DeviceLink>,
}

impl<B: HostBody> GameBuilder<B> {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            ball: None,
            car: None,
            scoreboard: None,
            ui_focus: None,
            device: None,
        }
    }

    pub fn ball(mut self, body: B) -> Self {
        self.ball = Some(body);
        self
    }

    pub fn car(mut self, body: B) -> Self {
        self.car = Some(body);
        self
    }

    pub fn scoreboard(mut self, scoreboard: impl Scoreboard + 'static) -> Self {
        self.scoreboard = Some(Box::new(scoreboard));
        self
    }

    pub fn ui_focus(mut self, ui_focus: impl UiFocus + 'static) -> Self {
        self.ui_focus = Some(Box::new(ui_focus));
        self
    }

    /// Sensor queue; without one the game is keyboard-only
    pub fn device(mut self, link: DeviceLink) -> Self {
        self.device = Some(link);
        self
    }

    pub fn build(self) -> Result<Game<B>, WiringError> {
        let ball = self.ball.ok_or(WiringError::MissingCollaborator("ball body"))?;
        let car = self.car.ok_or(WiringError::MissingCollaborator("car body"))?;
        let scoreboard = self
            .scoreboard
            .ok_or(WiringError::MissingCollaborator("scoreboard"))?;
        let ui_focus = self
            .ui_focus
            .ok_or(WiringError::MissingCollaborator("ui focus"))?;

        if self.device.is_none() {
            log::info!("No sensor device attached, keyboard control only");
        }

        let mut game = Game {
            state: GameState::new(&self.settings, ball, car),
            settings: self.settings,
            dispatcher: InputDispatcher::new(),
            device: self.device,
            scoreboard,
            ui_focus,
            accumulator: 0.0,
            input: TickInput::default(),
            events: Vec::new(),
        };
        let total = game.state.fall_detector.total();
        game.scoreboard.set_tally(0, total);
        Ok(game)
    }
}

/// Running game instance
pub struct Game<B> {
    pub state: GameState<B>,
    settings: Settings,
    dispatcher: InputDispatcher,
    device: Option<DeviceLink>,
    scoreboard: Box<dyn Scoreboard>,
    ui_focus: Box<dyn UiFocus>,
    accumulator: f32,
    input: TickInput,
    /// Events already shown on the scoreboard, kept for the host until
    /// [`Game::drain_events`]; only the newest `MAX_PENDING_EVENTS` stay
    events: Vec<GameEvent>,
}

impl<B: HostBody> Game<B> {
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn device(&self) -> Option<&DeviceLink> {
        self.device.as_ref()
    }

    /// Keyboard transition from the host
    pub fn key_event(&mut self, key: Key, pressed: bool) {
        self.dispatcher.key_event(key, pressed, self.ui_focus.as_mut());
    }

    /// On-screen button from the host
    pub fn ui_button(&mut self, command: Command) {
        self.dispatcher.ui_button(command, self.ui_focus.as_mut());
    }

    /// Run as many fixed ticks as `dt` covers
    ///
    /// `host_step` runs after every tick so the host can integrate
    /// physics and report collisions. Returns the number of ticks run.
    pub fn update(&mut self, dt: f32, mut host_step: impl FnMut(&mut GameState<B>, f32)) -> u32 {
        self.pull_device();
        self.merge_input();

        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &self.input, SIM_DT);
            host_step(&mut self.state, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Commands and readings are consumed by the first tick
            self.input.clear_one_shots();
        }

        self.dispatch_events();
        substeps
    }

    /// Collision callback from the host: one pin went down
    pub fn report_target_displaced(&mut self) {
        self.state.on_target_displaced();
        self.dispatch_events();
    }

    /// Start a new round after a win
    pub fn new_round(&mut self) {
        self.state.new_round();
        let total = self.state.fall_detector.total();
        self.scoreboard.set_tally(0, total);
    }

    /// Events raised since the last call
    ///
    /// Hosts should drain once per frame. A host that never drains loses
    /// the oldest events once `MAX_PENDING_EVENTS` are waiting; the
    /// scoreboard has already seen them either way.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn pull_device(&mut self) {
        let Some(link) = self.device.as_mut() else {
            return;
        };
        let drained = link.drain();
        for event in drained.events {
            self.state.events.push(match event {
                LinkEvent::Connected => GameEvent::ConnectionEstablished,
                LinkEvent::Disconnected => GameEvent::ConnectionLost,
            });
        }
        self.input.angle_samples.extend(drained.samples);
    }

    fn merge_input(&mut self) {
        let fresh = self.dispatcher.take_input();
        self.input.throw |= fresh.throw;
        self.input.switch_movable |= fresh.switch_movable;
        self.input.reset |= fresh.reset;
        self.input.held = fresh.held;
        self.input.angle_samples.extend(fresh.angle_samples);
    }

    fn dispatch_events(&mut self) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::TargetDisplaced { count, total } => {
                    self.scoreboard.set_tally(count, total);
                }
                GameEvent::Win => self.scoreboard.show_win(),
                GameEvent::EntitySwitched(kind) => self.scoreboard.entity_switched(kind),
                _ => {}
            }
            self.events.push(event);
        }

        if self.events.len() > MAX_PENDING_EVENTS {
            let excess = self.events.len() - MAX_PENDING_EVENTS;
            self.events.drain(..excess);
            log::warn!("Dropped {} undrained game events", excess);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Pose, SimBody};

    struct NullScoreboard;

    impl Scoreboard for NullScoreboard {
        fn set_tally(&mut self, _count: u32, _total: u32) {}
        fn show_win(&mut self) {}
    }

    struct NullUi;

    impl UiFocus for NullUi {
        fn clear_selection(&mut self) {}
    }

    fn body() -> SimBody {
        SimBody::new(Pose::default(), 1.0)
    }

    #[test]
    fn test_missing_scoreboard_is_fatal() {
        let result = GameBuilder::new(Settings::default())
            .ball(body())
            .car(body())
            .ui_focus(NullUi)
            .build();
        assert_eq!(
            result.err(),
            Some(WiringError::MissingCollaborator("scoreboard"))
        );
    }

    #[test]
    fn test_missing_bodies_are_fatal() {
        let result = GameBuilder::<SimBody>::new(Settings::default())
            .scoreboard(NullScoreboard)
            .ui_focus(NullUi)
            .build();
        assert_eq!(
            result.err(),
            Some(WiringError::MissingCollaborator("ball body"))
        );
    }

    #[test]
    fn test_keyboard_only_game_runs() {
        let mut game = GameBuilder::new(Settings::default())
            .ball(body())
            .car(body())
            .scoreboard(NullScoreboard)
            .ui_focus(NullUi)
            .build()
            .unwrap();

        game.key_event(Key::Space, true);
        let ticks = game.update(SIM_DT * 2.5, |_, _| {});
        assert_eq!(ticks, 2);
        assert_eq!(game.drain_events(), vec![GameEvent::Thrown]);
    }

    #[test]
    fn test_short_frame_keeps_commands_pending() {
        let mut game = GameBuilder::new(Settings::default())
            .ball(body())
            .car(body())
            .scoreboard(NullScoreboard)
            .ui_focus(NullUi)
            .build()
            .unwrap();

        game.ui_button(Command::SwitchMovable);
        assert_eq!(game.update(SIM_DT * 0.5, |_, _| {}), 0);
        assert_eq!(game.state.movables.active_kind(), EntityKind::Projectile);

        assert_eq!(game.update(SIM_DT * 0.6, |_, _| {}), 1);
        assert_eq!(game.state.movables.active_kind(), EntityKind::Vehicle);
    }

    #[test]
    fn test_undrained_events_are_capped() {
        let mut game = GameBuilder::new(Settings::default())
            .ball(body())
            .car(body())
            .scoreboard(NullScoreboard)
            .ui_focus(NullUi)
            .build()
            .unwrap();

        for _ in 0..MAX_PENDING_EVENTS + 100 {
            game.report_target_displaced();
        }
        let events = game.drain_events();
        assert_eq!(events.len(), MAX_PENDING_EVENTS);
        assert_eq!(
            events.last(),
            Some(&GameEvent::TargetDisplaced { count: 10, total: 10 })
        );
        assert!(game.drain_events().is_empty());
    }
}
