//! Pin deck and fallen-pin tally
//!
//! Deciding *that* a pin fell is the physics host's job (collision
//! layers keep the ball itself from counting). [`TargetArray::sweep`]
//! is a stand-in for that when running without a physics engine.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::state::EntityKind;
use crate::consts::PIN_RADIUS;
use crate::settings::Settings;

/// Result of one displacement report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Displacement {
    pub count: u32,
    pub total: u32,
    /// True only for the report that completed the deck
    pub won: bool,
}

/// Counts fallen pins and fires the win once
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallDetector {
    count: u32,
    total: u32,
    won: bool,
}

impl FallDetector {
    pub fn new(total: u32) -> Self {
        Self {
            count: 0,
            total,
            won: false,
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn has_won(&self) -> bool {
        self.won
    }

    /// Record one fallen pin
    ///
    /// The tally stops at `total`; later reports leave it there and never
    /// fire the win again.
    pub fn on_target_displaced(&mut self) -> Displacement {
        if self.count < self.total {
            self.count += 1;
        }

        let won = !self.won && self.count >= self.total;
        if won {
            self.won = true;
            log::info!("All {} pins down!", self.total);
        }

        Displacement {
            count: self.count,
            total: self.total,
            won,
        }
    }

    /// Start a new round
    pub fn reset(&mut self) {
        self.count = 0;
        self.won = false;
    }
}

/// Outcome of sweeping a body through the deck
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sweep {
    /// Pins knocked over by this sweep
    pub fallen: Vec<usize>,
    /// First time the ball reached the deck this round
    pub first_contact: bool,
}

/// Fixed pin layout with standing/fallen flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetArray {
    /// Pin positions on the lane (world space)
    pub positions: Vec<Vec3>,
    standing: Vec<bool>,
    /// Ball has reached the deck this round
    touched: bool,
}

impl TargetArray {
    /// Triangle rack in front of the spawn point
    pub fn new(settings: &Settings) -> Self {
        let positions = rack(
            settings.pin_count,
            settings.spawn_position,
            settings.pin_deck_distance,
            settings.pin_spacing,
        );
        let standing = vec![true; positions.len()];
        Self {
            positions,
            standing,
            touched: false,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn is_standing(&self, index: usize) -> bool {
        self.standing.get(index).copied().unwrap_or(false)
    }

    pub fn standing_count(&self) -> usize {
        self.standing.iter().filter(|s| **s).count()
    }

    /// Mark a pin fallen; true only the first time
    pub fn knock_over(&mut self, index: usize) -> bool {
        match self.standing.get_mut(index) {
            Some(standing) if *standing => {
                *standing = false;
                true
            }
            _ => false,
        }
    }

    /// Knock over every standing pin a sphere at `position` touches
    ///
    /// Any movable can knock pins over, but only the ball counts as
    /// reaching the deck.
    pub fn sweep(&mut self, by: EntityKind, position: Vec3, radius: f32) -> Sweep {
        let reach = radius + PIN_RADIUS;
        let center = Vec2::new(position.x, position.z);

        let mut sweep = Sweep::default();
        for (index, pin) in self.positions.iter().enumerate() {
            let hit = Vec2::new(pin.x, pin.z).distance(center) <= reach;
            if hit && self.standing[index] {
                self.standing[index] = false;
                sweep.fallen.push(index);
            }
        }

        if by == EntityKind::Projectile && !sweep.fallen.is_empty() && !self.touched {
            self.touched = true;
            sweep.first_contact = true;
            log::info!("Pins hit!");
        }
        sweep
    }

    /// Stand every pin back up
    pub fn reset(&mut self) {
        self.standing.iter_mut().for_each(|s| *s = true);
        self.touched = false;
    }
}

/// Rows of 1, 2, 3, ... pins, head pin nearest the bowler
fn rack(count: u32, spawn: Vec3, distance: f32, spacing: f32) -> Vec<Vec3> {
    let row_depth = spacing * 3f32.sqrt() / 2.0;
    let mut positions = Vec::with_capacity(count as usize);
    let mut row = 0u32;
    while positions.len() < count as usize {
        for i in 0..=row {
            if positions.len() == count as usize {
                break;
            }
            let x = (i as f32 - row as f32 / 2.0) * spacing;
            let z = distance + row as f32 * row_depth;
            positions.push(Vec3::new(spawn.x + x, spawn.y, spawn.z + z));
        }
        row += 1;
    }
    positions
}
