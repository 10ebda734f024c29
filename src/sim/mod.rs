//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure:
//! - One step per player per frame, no internal timer
//! - Level randomness only through an injected or seeded RNG
//! - Platforms resolved in their stored order
//! - No rendering, input devices or network calls

pub mod autopilot;
pub mod collision;
pub mod generate;
pub mod race;
pub mod state;
pub mod step;

pub use autopilot::Autopilot;
pub use collision::{Contact, contact, overlaps};
pub use generate::{build_level, classify_platform, generate_level, generate_level_seeded, max_rise_for_gap};
pub use race::{Race, RaceEvent, RaceInput, RacePhase, tick};
pub use state::{JumpState, Level, Platform, PlatformKind, Player, PlayerInput};
pub use step::{step, step_at};
