//! Neon Duel - two runners, one procedurally generated course
//!
//! Core modules:
//! - `sim`: Deterministic simulation (player physics, collisions, level generation, race flow)
//! - `params`: Level difficulty parameters and the source they are fetched from
//! - `settings`: Data-driven race setup (player profiles, themes, fallback params)
//! - `narration`: Fallbacks around the external victory-line writer
//!
//! Rendering, menus and text generation live outside this crate and only
//! consume the plain data produced here.

pub mod error;
pub mod narration;
pub mod params;
pub mod settings;
pub mod sim;

pub use error::Error;
pub use narration::{VictoryNarrator, victory_message};
pub use params::{LevelParams, LevelParamsSource, fetch_level_params, fetch_level_params_or};
pub use settings::{PlayerProfile, RaceSettings};

/// Game configuration constants
///
/// All physics values are per simulation step (one step per rendered frame).
pub mod consts {
    /// Downward acceleration added to vertical velocity every step
    pub const GRAVITY: f32 = 0.6;
    /// Vertical velocity set by a jump or double jump (negative = up)
    pub const JUMP_FORCE: f32 = -14.0;
    /// Vertical velocity set when landing on a bounce pad
    pub const BOUNCE_FORCE: f32 = -22.0;
    /// Horizontal acceleration per pressed direction
    pub const MOVE_ACCEL: f32 = 0.8;
    /// Horizontal damping while grounded
    pub const FRICTION: f32 = 0.85;
    /// Horizontal damping while airborne
    pub const AIR_RESISTANCE: f32 = 0.95;
    /// Horizontal speed cap (magnitude)
    pub const MAX_RUN_SPEED: f32 = 10.0;

    /// Playfield dimensions
    pub const CANVAS_WIDTH: f32 = 1200.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Player bounding box
    pub const PLAYER_WIDTH: f32 = 30.0;
    pub const PLAYER_HEIGHT: f32 = 45.0;

    /// How far below the playfield a player may fall before respawning
    pub const FALL_RESPAWN_MARGIN: f32 = 500.0;
    /// Minimum forward distance between checkpoints
    pub const CHECKPOINT_SPACING: f32 = 400.0;

    /// Safe starting platform
    pub const START_PLATFORM_WIDTH: f32 = 800.0;
    pub const START_PLATFORM_HEIGHT: f32 = 100.0;
    pub const START_PLATFORM_Y: f32 = 500.0;

    /// Generated platform shape
    pub const PLATFORM_HEIGHT: f32 = 40.0;
    pub const MIN_PLATFORM_WIDTH: f32 = 150.0;
    pub const PLATFORM_WIDTH_RANGE: f32 = 200.0;
    pub const MIN_GAP: f32 = 80.0;

    /// Reachability ceiling derived from the run speed cap and jump arc
    pub const MAX_REACHABLE_GAP: f32 = 320.0;
    pub const MAX_REACHABLE_RISE: f32 = 120.0;
    /// Share of the rise allowance lost at the widest gap
    pub const RISE_PENALTY_AT_MAX_GAP: f32 = 0.7;
    /// Lava only spawns after gaps narrower than this share of the max gap
    pub const LAVA_GAP_LIMIT: f32 = 0.8;

    /// Playable vertical band for platform tops
    pub const MIN_PLATFORM_Y: f32 = 150.0;
    pub const MAX_PLATFORM_Y: f32 = 520.0;

    /// Landing platform that follows every lava platform
    pub const LAVA_SAFETY_GAP: f32 = 50.0;
    pub const LAVA_SAFETY_WIDTH: f32 = 150.0;

    /// Goal platform at the finish line
    pub const GOAL_PLATFORM_WIDTH: f32 = 800.0;
    pub const GOAL_PLATFORM_HEIGHT: f32 = 400.0;
    /// Longest course accepted from a parameter source
    pub const MAX_LEVEL_LENGTH: f32 = 1_000_000.0;

    /// Spawn points (top-left of the player box)
    pub const P1_SPAWN: (f32, f32) = (100.0, 400.0);
    pub const P2_SPAWN: (f32, f32) = (150.0, 400.0);
}

/// Course themes handed to the parameter source and the presentation layer
pub const LEVEL_THEMES: [&str; 5] = [
    "Neon City Highrise",
    "Cyber Void",
    "Molten Factory",
    "Glacial Peak",
    "Digital Forest",
];

/// Wall-clock time in milliseconds since the Unix epoch
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}
