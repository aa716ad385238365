//! Simulated tilt sensor
//!
//! Stands in for the hardware when running headless: a slowly drifting
//! angle with jitter, and the occasional garbled line a flaky serial
//! link produces.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Seeded fake sensor producing `Angle=` lines
#[derive(Debug, Clone)]
pub struct SimulatedTilt {
    rng: Pcg32,
    time: f32,
    /// Peak tilt in degrees
    pub amplitude: f32,
    /// Oscillation period in seconds
    pub period: f32,
    /// Largest jitter added to each reading (degrees)
    pub jitter: f32,
    /// Probability of emitting a garbled line
    pub garble_chance: f64,
}

impl SimulatedTilt {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            time: 0.0,
            amplitude: 20.0,
            period: 4.0,
            jitter: 0.5,
            garble_chance: 0.02,
        }
    }

    /// Advance the sensor clock and produce the next line
    pub fn next_line(&mut self, dt: f32) -> String {
        self.time += dt;

        let garble_chance = if (0.0..=1.0).contains(&self.garble_chance) {
            self.garble_chance
        } else {
            0.0
        };
        if self.rng.random_bool(garble_chance) {
            return match self.rng.random_range(0..3) {
                0 => "Angle=".to_string(),
                1 => "Ang".to_string(),
                _ => "Angle=1a.3".to_string(),
            };
        }

        let phase = self.time / self.period * std::f32::consts::TAU;
        // Jitter is a spread: sign is ignored, NaN means none
        let jitter = self.jitter.abs();
        let noise = if jitter > 0.0 && jitter.is_finite() {
            self.rng.random_range(-jitter..=jitter)
        } else {
            0.0
        };
        format!("Angle={:.2}", self.amplitude * phase.sin() + noise)
    }
}
