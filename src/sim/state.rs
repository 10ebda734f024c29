//! Simulation state types
//!
//! Everything here is plain data: players are advanced by value through
//! `step`, platforms are immutable once generated.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::params::LevelParams;

/// Jump state machine
///
/// Grounded players always hold their aerial jump in reserve; landing on any
/// surface restores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JumpState {
    /// Resting on a platform top this step
    #[default]
    Grounded,
    /// In the air, double jump still available
    AirborneWithReserve,
    /// In the air, double jump used
    AirborneSpent,
}

impl JumpState {
    /// Compose from the airborne flag and reserve flag
    pub fn from_flags(airborne: bool, reserve: bool) -> Self {
        match (airborne, reserve) {
            (false, _) => JumpState::Grounded,
            (true, true) => JumpState::AirborneWithReserve,
            (true, false) => JumpState::AirborneSpent,
        }
    }

    pub fn is_airborne(self) -> bool {
        self != JumpState::Grounded
    }

    pub fn can_double_jump(self) -> bool {
        self != JumpState::AirborneSpent
    }
}

/// Per-step input sample for one player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInput {
    pub up: bool,
    pub left: bool,
    pub right: bool,
}

impl PlayerInput {
    /// Net horizontal direction (-1, 0 or 1)
    pub fn horizontal(&self) -> f32 {
        let mut dir = 0.0;
        if self.left {
            dir -= 1.0;
        }
        if self.right {
            dir += 1.0;
        }
        dir
    }
}

/// One competitor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: u32,
    pub name: String,
    /// Display color, opaque to physics
    pub color: String,
    /// Top-left corner of the bounding box
    pub pos: Vec2,
    pub vel: Vec2,
    pub width: f32,
    pub height: f32,
    pub jump: JumpState,
    /// Previous step's `up` level, for edge detection
    pub jump_key_was_down: bool,
    /// Respawn anchor
    pub last_checkpoint_pos: Vec2,
    #[serde(default)]
    pub checkpoints_reached: u32,
    pub finished: bool,
    /// Wall-clock ms when the finish line was first crossed
    pub finish_time: Option<f64>,
}

impl Player {
    /// A fresh player standing at `spawn`, which is also its first checkpoint
    pub fn new(id: u32, name: impl Into<String>, color: impl Into<String>, spawn: Vec2) -> Self {
        Self {
            id,
            name: name.into(),
            color: color.into(),
            pos: spawn,
            vel: Vec2::ZERO,
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            jump: JumpState::Grounded,
            jump_key_was_down: false,
            last_checkpoint_pos: spawn,
            checkpoints_reached: 0,
            finished: false,
            finish_time: None,
        }
    }

    /// Reset kinematics and race progress, keeping identity
    pub fn respawn_at_start(&mut self, spawn: Vec2) {
        self.pos = spawn;
        self.vel = Vec2::ZERO;
        self.jump = JumpState::Grounded;
        self.jump_key_was_down = false;
        self.last_checkpoint_pos = spawn;
        self.checkpoints_reached = 0;
        self.finished = false;
        self.finish_time = None;
    }

    pub fn is_jumping(&self) -> bool {
        self.jump.is_airborne()
    }

    pub fn can_double_jump(&self) -> bool {
        self.jump.can_double_jump()
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size() / 2.0
    }
}

/// Platform surface types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlatformKind {
    #[default]
    Normal,
    /// Launches the player upward on landing
    Bounce,
    /// Sends the player back to their checkpoint on landing
    Lava,
    /// Looks different, behaves like `Normal`
    Ice,
}

/// A static axis-aligned platform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub kind: PlatformKind,
}

impl Platform {
    pub fn new(x: f32, y: f32, width: f32, height: f32, kind: PlatformKind) -> Self {
        Self {
            x,
            y,
            width,
            height,
            kind,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// A generated course, immutable for the duration of a race
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    /// Seed the layout was drawn from
    pub seed: u64,
    pub theme: String,
    pub params: LevelParams,
    pub platforms: Vec<Platform>,
    pub finish_line_x: f32,
}
