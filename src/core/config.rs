//! Engine tunables with documented defaults
//!
//! Every pacing constant lives here so a host can load alternatives from a
//! TOML file without touching simulation code.

use serde::Deserialize;

use crate::core::error::Result;

/// Configuration for the simulation core.
///
/// Defaults reproduce the pacing of the original game.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// World speed setting, 0 (fastest) through 8 (slowest).
    ///
    /// `World::update` only runs a full tick when its countdown (reset to
    /// this value after every tick) reaches zero.
    pub speed: u8,

    /// Instruction budget handed to each scripted thing per execution.
    ///
    /// Only discrete "step" instructions consume budget; labels, comments
    /// and name lines are free.
    pub instruction_budget: i32,

    /// Ticks a lit torch lasts.
    pub torch_cycles: i16,

    /// Ticks an energizer lasts.
    pub energizer_cycles: i16,

    /// Ticks a one-line board message stays on screen.
    pub message_cycles: u8,

    /// Health lost when an enemy or projectile reaches the player.
    pub contact_damage: i16,

    /// Ammunition granted per ammo pickup.
    pub ammo_per_pickup: i16,

    /// Score granted per gem pickup.
    pub gem_score: i32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            speed: 4,
            instruction_budget: 4,
            torch_cycles: 200,
            energizer_cycles: 75,
            message_cycles: 24,
            contact_damage: 10,
            ammo_per_pickup: 5,
            gem_score: 10,
        }
    }
}

impl EngineConfig {
    /// Parse a config from TOML text. Missing fields fall back to defaults.
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let config = EngineConfig::from_toml("speed = 2\ntorch_cycles = 50\n").unwrap();
        assert_eq!(config.speed, 2);
        assert_eq!(config.torch_cycles, 50);
        assert_eq!(config.instruction_budget, EngineConfig::default().instruction_budget);
    }

    #[test]
    fn bad_toml_is_an_error() {
        assert!(EngineConfig::from_toml("speed = \"fast").is_err());
    }
}
