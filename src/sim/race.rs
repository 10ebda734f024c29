//! Two-player race flow
//!
//! Owns the level and both runners, steps them once per frame and decides
//! who won. The per-player physics stays in `step`; this module only adds
//! bookkeeping on top.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Level, Player, PlayerInput};
use super::step::step_at;
use crate::settings::RaceSettings;

/// Current phase of a race
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RacePhase {
    /// Waiting for players to start
    Lobby,
    /// Parameters are being fetched and the course generated
    Generating,
    /// Both runners are on the course
    Playing,
    /// Both runners crossed the line
    Finished,
}

/// Input for both players for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceInput {
    pub p1: PlayerInput,
    pub p2: PlayerInput,
}

/// Things worth telling the presentation layer about
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RaceEvent {
    CheckpointReached { player_id: u32, pos: Vec2 },
    PlayerFinished { player_id: u32, finish_time: f64 },
    /// First runner across the line; provisional until the other finishes
    LeaderDecided { player_id: u32 },
    RaceFinished { winner_id: u32 },
}

/// Complete race state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Race {
    pub phase: RacePhase,
    pub theme: Option<String>,
    pub level: Option<Level>,
    pub players: [Player; 2],
    pub spawns: [Vec2; 2],
    /// First finisher
    pub leader: Option<u32>,
    /// Earliest finish time once both are done
    pub winner: Option<u32>,
    /// Frames stepped since `start`
    pub frame: u64,
}

impl Race {
    pub fn new(settings: &RaceSettings) -> Self {
        let [a, b] = &settings.players;
        Self {
            phase: RacePhase::Lobby,
            theme: None,
            level: None,
            players: [
                Player::new(a.id, a.name.clone(), a.color.clone(), a.spawn),
                Player::new(b.id, b.name.clone(), b.color.clone(), b.spawn),
            ],
            spawns: [a.spawn, b.spawn],
            leader: None,
            winner: None,
            frame: 0,
        }
    }

    /// Enter the generating phase for `theme`
    pub fn begin_generating(&mut self, theme: impl Into<String>) {
        let theme = theme.into();
        log::info!("Generating course for theme '{}'", theme);
        self.theme = Some(theme);
        self.phase = RacePhase::Generating;
    }

    /// Put both runners on their spawn points of a fresh level and go
    pub fn start(&mut self, level: Level) {
        for (player, spawn) in self.players.iter_mut().zip(self.spawns) {
            player.respawn_at_start(spawn);
        }
        log::info!(
            "Race started on '{}' ({} platforms, finish at {})",
            level.theme,
            level.platforms.len(),
            level.finish_line_x
        );
        self.theme = Some(level.theme.clone());
        self.level = Some(level);
        self.leader = None;
        self.winner = None;
        self.frame = 0;
        self.phase = RacePhase::Playing;
    }

    pub fn player(&self, id: u32) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn winner_player(&self) -> Option<&Player> {
        self.winner.and_then(|id| self.player(id))
    }
}

/// Advance the race by one frame
///
/// Both players are stepped exactly once, finished or not. Outside
/// `Playing` this does nothing.
pub fn tick(race: &mut Race, input: &RaceInput, now_ms: f64) -> Vec<RaceEvent> {
    let mut events = Vec::new();
    if race.phase != RacePhase::Playing {
        return events;
    }
    let Some(level) = race.level.as_ref() else {
        return events;
    };

    let inputs = [input.p1, input.p2];
    for (player, input) in race.players.iter_mut().zip(inputs) {
        let next = step_at(player, &level.platforms, &input, level.finish_line_x, now_ms);

        if next.checkpoints_reached > player.checkpoints_reached {
            log::debug!("{} checkpoint at {:?}", next.name, next.last_checkpoint_pos);
            events.push(RaceEvent::CheckpointReached {
                player_id: next.id,
                pos: next.last_checkpoint_pos,
            });
        }
        if next.finished && !player.finished {
            let finish_time = next.finish_time.unwrap_or(now_ms);
            log::info!("{} crossed the finish line", next.name);
            events.push(RaceEvent::PlayerFinished {
                player_id: next.id,
                finish_time,
            });
        }

        *player = next;
    }
    race.frame += 1;

    if race.leader.is_none() {
        if let Some(first) = race.players.iter().find(|p| p.finished) {
            race.leader = Some(first.id);
            events.push(RaceEvent::LeaderDecided { player_id: first.id });
        }
    }

    let [p1, p2] = &race.players;
    if p1.finished && p2.finished {
        // Strictly earlier wins; a tie goes to the second runner
        let winner = match (p1.finish_time, p2.finish_time) {
            (Some(t1), Some(t2)) if t1 < t2 => p1.id,
            _ => p2.id,
        };
        log::info!("Race finished after {} frames, winner: player {}", race.frame, winner);
        race.winner = Some(winner);
        race.phase = RacePhase::Finished;
        events.push(RaceEvent::RaceFinished { winner_id: winner });
    }

    events
}
