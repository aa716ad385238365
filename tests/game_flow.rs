use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec3;
use tilt_bowl::consts::SIM_DT;
use tilt_bowl::device::DeviceLink;
use tilt_bowl::input::{Command, Key, UiFocus};
use tilt_bowl::sim::{EntityKind, GameEvent, HostBody, Pose, SimBody, Velocity};
use tilt_bowl::{Game, GameBuilder, Scoreboard, Settings, yaw_degrees};

#[derive(Default)]
struct Board {
    tallies: Vec<(u32, u32)>,
    wins: u32,
    switches: Vec<EntityKind>,
}

#[derive(Clone, Default)]
struct SharedBoard(Rc<RefCell<Board>>);

impl Scoreboard for SharedBoard {
    fn set_tally(&mut self, count: u32, total: u32) {
        self.0.borrow_mut().tallies.push((count, total));
    }

    fn show_win(&mut self) {
        self.0.borrow_mut().wins += 1;
    }

    fn entity_switched(&mut self, kind: EntityKind) {
        self.0.borrow_mut().switches.push(kind);
    }
}

#[derive(Clone, Default)]
struct SharedUi(Rc<RefCell<u32>>);

impl UiFocus for SharedUi {
    fn clear_selection(&mut self) {
        *self.0.borrow_mut() += 1;
    }
}

fn body(mass: f32) -> SimBody {
    SimBody::new(Pose::default(), mass)
}

fn build(link: Option<DeviceLink>) -> (Game<SimBody>, SharedBoard, SharedUi) {
    let board = SharedBoard::default();
    let ui = SharedUi::default();
    let settings = Settings::default();
    let ball = body(settings.ball_mass);
    let mut builder = GameBuilder::new(settings)
        .ball(ball)
        .car(body(1.0))
        .scoreboard(board.clone())
        .ui_focus(ui.clone());
    if let Some(link) = link {
        builder = builder.device(link);
    }
    (builder.build().unwrap(), board, ui)
}

fn integrate_active(state: &mut tilt_bowl::sim::GameState<SimBody>, dt: f32) {
    state.movables.active_mut().body_mut().integrate(dt);
}

#[test]
fn test_sensor_steers_ball_then_car() {
    let (tx, link) = DeviceLink::channel();
    let (mut game, board, ui) = build(Some(link));

    tx.send_connection(true);
    tx.send_line("Angle=10");
    tx.send_line("Angle=7");
    game.update(SIM_DT, |_, _| {});

    let ball = game.state.movables.get(EntityKind::Projectile);
    // (0-10)*50 + (10-7)*50
    assert_eq!(ball.body().impulse_total, Vec3::new(-350.0, 0.0, 0.0));
    assert_eq!(ball.controller().previous_angle, 7.0);
    assert!(game.drain_events().contains(&GameEvent::ConnectionEstablished));

    // Switch with the on-screen button, then steer the car
    game.ui_button(Command::SwitchMovable);
    game.update(SIM_DT, |_, _| {});
    assert_eq!(*ui.0.borrow(), 1);
    assert_eq!(board.0.borrow().switches, vec![EntityKind::Vehicle]);

    tx.send_line("Angle=30");
    game.update(SIM_DT, |_, _| {});
    let car = game.state.movables.get(EntityKind::Vehicle);
    assert!((yaw_degrees(car.body().pose().orientation) + 2.0).abs() < 1e-4);

    // Ball was parked when it lost control
    let ball = game.state.movables.get(EntityKind::Projectile);
    assert!(ball.is_at_spawn());
    assert_eq!(ball.body().velocity(), Velocity::ZERO);
    assert!(!ball.body().is_visible());
}

#[test]
fn test_noisy_or_lost_device_keeps_keyboard_working() {
    let (tx, link) = DeviceLink::channel();
    let (mut game, _board, _ui) = build(Some(link));

    tx.send_line("Angle=abc");
    tx.send_line("garbage");
    tx.send_connection(false);
    drop(tx);

    game.key_event(Key::Tab, true);
    game.key_event(Key::Up, true);
    let ticks = game.update(SIM_DT * 60.0, |_, _| {});
    assert_eq!(ticks, 8);

    let car = game.state.movables.active();
    assert_eq!(car.kind(), EntityKind::Vehicle);
    assert_eq!(car.controller().last_delta, 0.0);
    assert!(car.body().pose().position.z > Settings::default().spawn_position.z);

    assert_eq!(game.device().map(|d| d.malformed_total()), Some(2));
    assert!(game.drain_events().contains(&GameEvent::ConnectionLost));
}

#[test]
fn test_throw_knocks_down_rack_and_wins_once() {
    let (mut game, board, _ui) = build(None);

    game.key_event(Key::Space, true);
    let mut seconds = 0.0;
    while seconds < 5.0 {
        game.update(1.0 / 60.0, |state, dt| {
            integrate_active(state, dt);
            let active = state.movables.active();
            let (kind, position) = (active.kind(), active.body().pose().position);
            // Generous radius: the stand-in has no pin-on-pin contacts
            state.sweep_targets(kind, position, 0.5);
        });
        seconds += 1.0 / 60.0;
    }

    {
        let board = board.0.borrow();
        assert_eq!(board.wins, 1);
        assert_eq!(board.tallies.first(), Some(&(0, 10)));
        assert_eq!(board.tallies.last(), Some(&(10, 10)));
    }

    // Further reports never re-fire the win
    game.report_target_displaced();
    assert_eq!(board.0.borrow().wins, 1);
    let events = game.drain_events();
    assert_eq!(events.iter().filter(|e| **e == GameEvent::Win).count(), 1);
    assert!(events.contains(&GameEvent::PinsHit));
}

#[test]
fn test_reset_button_parks_ball_and_clears_focus() {
    let (mut game, _board, ui) = build(None);

    game.key_event(Key::Space, true);
    game.update(SIM_DT * 10.0, integrate_active);
    assert!(!game.state.movables.active().is_at_spawn());

    game.ui_button(Command::Reset);
    game.update(SIM_DT, |_, _| {});
    assert!(game.state.movables.active().is_at_spawn());
    assert_eq!(*ui.0.borrow(), 1);

    // Holding Space after the reset does not throw again
    game.update(SIM_DT, |_, _| {});
    assert!(game.state.movables.active().is_at_spawn());
}
