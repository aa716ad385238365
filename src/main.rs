//! Tilt Bowl headless runner
//!
//! Drives the simulation with stand-in host bodies, a scripted keyboard
//! and either stdin or a simulated tilt sensor as the device transport.

use std::io::BufRead;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use tilt_bowl::device::{DeviceLink, DeviceSender, SimulatedTilt};
use tilt_bowl::input::{UiFocus, parse_script};
use tilt_bowl::sim::{EntityKind, GameEvent, HostBody, Pose, SimBody};
use tilt_bowl::{Error, GameBuilder, Result, Scoreboard, Settings};

/// Bowling lane toy driven by keyboard or a serial tilt sensor.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON tuning file (defaults apply when omitted)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Where `Angle=` lines come from
    #[arg(long, value_enum, default_value_t = DeviceSource::Simulated)]
    device: DeviceSource,

    /// Simulated seconds to run
    #[arg(long, default_value_t = 6.0)]
    seconds: f32,

    /// Seed for the simulated sensor
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Peak tilt of the simulated sensor (degrees)
    #[arg(long, default_value_t = 0.05)]
    tilt: f32,

    /// Key script, comma separated `<seconds>:<key>:<down|up>`
    #[arg(long, value_delimiter = ',', default_values = ["0.5:space:down", "0.6:space:up"])]
    script: Vec<String>,

    /// Write the effective settings as JSON to this path and exit
    #[arg(long)]
    write_settings: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum DeviceSource {
    /// Read lines from standard input
    Stdin,
    /// Seeded fake sensor
    Simulated,
    /// Keyboard only
    None,
}

struct LogScoreboard;

impl Scoreboard for LogScoreboard {
    fn set_tally(&mut self, count: u32, total: u32) {
        log::info!("Pins down: {}/{}", count, total);
    }

    fn show_win(&mut self) {
        println!("Strike! All pins down.");
    }

    fn entity_switched(&mut self, kind: EntityKind) {
        log::info!("Now controlling the {}", kind.as_str());
    }
}

struct HeadlessUi;

impl UiFocus for HeadlessUi {
    fn clear_selection(&mut self) {
        log::debug!("UI selection cleared");
    }
}

/// Forward stdin lines to the device queue on a background thread
fn spawn_stdin_transport(tx: DeviceSender) {
    std::thread::spawn(move || {
        tx.send_connection(true);
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if !tx.send_line(line) {
                return;
            }
        }
        tx.send_connection(false);
    });
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        log::error!("{}", err);
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    log::info!("Tilt Bowl (headless) starting...");

    let settings = match &cli.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if let Some(path) = &cli.write_settings {
        settings.save(path)?;
        println!("settings written to {}", path.display());
        return Ok(());
    }

    if !(cli.tilt.is_finite() && cli.tilt >= 0.0) {
        return Err(Error::InvalidArgument {
            name: "tilt",
            reason: "must be a non-negative number of degrees",
        });
    }
    if !(cli.seconds.is_finite() && cli.seconds >= 0.0) {
        return Err(Error::InvalidArgument {
            name: "seconds",
            reason: "must be a non-negative number",
        });
    }
    let script = parse_script(cli.script.as_slice())?;

    let mut ball = SimBody::new(Pose::default(), settings.ball_mass);
    ball.damping = 0.1;
    let car = SimBody::new(Pose::default(), 1.0);

    let mut builder = GameBuilder::new(settings)
        .ball(ball)
        .car(car)
        .scoreboard(LogScoreboard)
        .ui_focus(HeadlessUi);

    let mut simulated = None;
    if cli.device != DeviceSource::None {
        let (tx, link) = DeviceLink::channel();
        builder = builder.device(link);
        match cli.device {
            DeviceSource::Stdin => spawn_stdin_transport(tx),
            _ => {
                tx.send_connection(true);
                let mut tilt = SimulatedTilt::new(cli.seed);
                tilt.amplitude = cli.tilt;
                tilt.jitter = cli.tilt * 0.1;
                simulated = Some((tilt, tx));
            }
        }
    }

    let mut game = builder.build()?;

    let frame_dt = 1.0 / 60.0;
    let frames = (cli.seconds / frame_dt).ceil() as u32;
    let mut script = script.into_iter().peekable();
    let mut sensor_clock = 0.0;

    for frame in 0..frames {
        let now = frame as f32 * frame_dt;

        while let Some(event) = script.next_if(|e| e.at <= now) {
            game.key_event(event.key, event.pressed);
        }

        // Sensor streams at 50 Hz
        if let Some((tilt, tx)) = simulated.as_mut() {
            sensor_clock += frame_dt;
            while sensor_clock >= 0.02 {
                sensor_clock -= 0.02;
                tx.send_line(tilt.next_line(0.02));
            }
        }

        game.update(frame_dt, |state, dt| {
            let kind = state.movables.active_kind();
            let body = state.movables.active_mut().body_mut();
            body.integrate(dt);
            let position = body.pose().position;
            let radius = match kind {
                EntityKind::Projectile => 0.11,
                EntityKind::Vehicle => 0.25,
            };
            state.sweep_targets(kind, position, radius);
        });

        for event in game.drain_events() {
            match event {
                GameEvent::Win => log::info!("Win after {:.2}s", now),
                GameEvent::PinsHit => log::info!("Pins hit at {:.2}s", now),
                other => log::debug!("{:?}", other),
            }
        }
    }

    let state = &game.state;
    let pose = state.movables.active().body().pose();
    println!(
        "{} ticks, {} pins down, {} at ({:.2}, {:.2}, {:.2})",
        state.time_ticks,
        state.fall_detector.count(),
        state.movables.active_kind().as_str(),
        pose.position.x,
        pose.position.y,
        pose.position.z,
    );
    if let Some(link) = game.device() {
        println!("dropped {} malformed device lines", link.malformed_total());
    }
    Ok(())
}
