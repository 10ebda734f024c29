//! Race settings
//!
//! Everything that is data rather than physics: who is racing, where they
//! spawn, which themes are in rotation and what to fall back to when the
//! parameter source is down. Stored as JSON; missing fields take defaults.

use std::path::Path;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::LEVEL_THEMES;
use crate::consts::{P1_SPAWN, P2_SPAWN};
use crate::error::Result;
use crate::params::LevelParams;

/// One runner's identity and start position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub id: u32,
    pub name: String,
    /// CSS-style color string, only used by the presentation layer
    pub color: String,
    pub spawn: Vec2,
}

/// Race setup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceSettings {
    pub players: [PlayerProfile; 2],
    /// Theme rotation
    pub themes: Vec<String>,
    /// Used when the parameter source fails
    pub fallback_params: LevelParams,
}

impl Default for RaceSettings {
    fn default() -> Self {
        Self {
            players: [
                PlayerProfile {
                    id: 1,
                    name: "Player 1".to_string(),
                    color: "#3b82f6".to_string(),
                    spawn: Vec2::new(P1_SPAWN.0, P1_SPAWN.1),
                },
                PlayerProfile {
                    id: 2,
                    name: "Player 2".to_string(),
                    color: "#ec4899".to_string(),
                    spawn: Vec2::new(P2_SPAWN.0, P2_SPAWN.1),
                },
            ],
            themes: LEVEL_THEMES.iter().map(|t| t.to_string()).collect(),
            fallback_params: LevelParams::default(),
        }
    }
}

impl RaceSettings {
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.fallback_params.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Pick a random theme from the rotation
    pub fn pick_theme<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        if self.themes.is_empty() {
            return LEVEL_THEMES[0];
        }
        let index = rng.random_range(0..self.themes.len());
        &self.themes[index]
    }
}
