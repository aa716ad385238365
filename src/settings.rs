//! Tuning and preferences
//!
//! Loaded from a JSON file; every field falls back to the reference value.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SettingsError;

/// Game tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Ball ===
    /// Forward push applied on throw
    pub throw_force: f32,
    /// Lateral force per degree of sensor change
    pub lateral_force_scale: f32,
    /// Ball mass handed to the host body
    pub ball_mass: f32,

    // === Car ===
    /// Forward driving speed (units/s)
    pub forward_speed: f32,
    /// Backward driving speed (units/s)
    pub backward_speed: f32,
    /// Keyboard turn rate (degrees/s)
    pub rotation_speed: f32,
    /// Sensor degrees per degree of car yaw
    pub yaw_divisor: f32,

    // === Lane ===
    /// Where both movables respawn
    pub spawn_position: Vec3,
    /// Pins that must fall for a win
    pub pin_count: u32,
    /// Distance from spawn to the head pin
    pub pin_deck_distance: f32,
    /// Spacing between pins
    pub pin_spacing: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            throw_force: THROW_FORCE,
            lateral_force_scale: LATERAL_FORCE_SCALE,
            ball_mass: BALL_MASS,

            forward_speed: FORWARD_SPEED,
            backward_speed: BACKWARD_SPEED,
            rotation_speed: ROTATION_SPEED,
            yaw_divisor: YAW_DIVISOR,

            spawn_position: Vec3::from_array(SPAWN_POSITION),
            pin_count: PIN_COUNT,
            pin_deck_distance: PIN_DECK_DISTANCE,
            pin_spacing: PIN_SPACING,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file and validate them
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Parse settings from a JSON string and validate them
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Settings saved");
        Ok(())
    }

    /// Reject values that would make the simulation meaningless
    pub fn validate(&self) -> Result<(), SettingsError> {
        let finite = [
            ("throw_force", self.throw_force),
            ("lateral_force_scale", self.lateral_force_scale),
            ("forward_speed", self.forward_speed),
            ("backward_speed", self.backward_speed),
            ("rotation_speed", self.rotation_speed),
            ("pin_deck_distance", self.pin_deck_distance),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(SettingsError::Invalid {
                    field,
                    reason: "must be finite",
                });
            }
        }
        if !self.spawn_position.is_finite() {
            return Err(SettingsError::Invalid {
                field: "spawn_position",
                reason: "must be finite",
            });
        }
        if !(self.yaw_divisor.is_finite() && self.yaw_divisor > 0.0) {
            return Err(SettingsError::Invalid {
                field: "yaw_divisor",
                reason: "must be positive",
            });
        }
        if !(self.ball_mass.is_finite() && self.ball_mass > 0.0) {
            return Err(SettingsError::Invalid {
                field: "ball_mass",
                reason: "must be positive",
            });
        }
        if !(self.pin_spacing.is_finite() && self.pin_spacing > 0.0) {
            return Err(SettingsError::Invalid {
                field: "pin_spacing",
                reason: "must be positive",
            });
        }
        if self.pin_count == 0 {
            return Err(SettingsError::Invalid {
                field: "pin_count",
                reason: "must be at least one",
            });
        }
        if self.pin_count > MAX_PIN_COUNT {
            return Err(SettingsError::Invalid {
                field: "pin_count",
                reason: "too many pins for the deck",
            });
        }
        Ok(())
    }
}
