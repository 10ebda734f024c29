//! Autopilot - a bot that drives a player for demos and soak tests
//!
//! On the ground the bot runs right until it nears the edge of its platform.
//! There it replays a fan of candidate jumps through `step_at` and commits to
//! the one that comes to rest most squarely on a platform further along.
//! Stepping is deterministic, so a committed plan plays out exactly as it was
//! simulated.

use std::collections::VecDeque;

use super::state::{JumpState, Platform, Player, PlayerInput};
use super::step::step_at;
use crate::consts::{BOUNCE_FORCE, CANVAS_HEIGHT};

/// Distance from a platform's right edge at which the bot looks for a takeoff
const TAKEOFF_MARGIN: f32 = 40.0;
/// With nothing reachable, start braking this close to the edge
const BRAKE_MARGIN: f32 = 12.0;
/// Vertical tolerance for "standing on" checks
const FOOT_TOLERANCE: f32 = 1.0;
/// Longest maneuver simulated, in frames (a bounce pad flight fits)
const HORIZON: usize = 180;
/// Frames of held `right` before the bot lets go
const HOLD_FRAMES: [usize; 18] = [0, 3, 6, 10, 14, 18, 23, 28, 34, 40, 47, 55, 64, 74, 85, 97, 110, 125];
/// Frame offsets tried for the mid-air jump
const DOUBLE_JUMP_FRAMES: [usize; 13] = [4, 8, 12, 16, 20, 24, 29, 34, 40, 47, 56, 68, 82];

const RUN: PlayerInput = PlayerInput {
    up: false,
    left: false,
    right: true,
};

/// What happens to the run key once `right` is let go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Release {
    Coast,
    Brake,
}

/// One open-loop input script
#[derive(Debug, Clone, Copy)]
struct Maneuver {
    jump_now: bool,
    /// `None` holds right for the whole flight
    hold: Option<usize>,
    release: Release,
    double_jump: Option<usize>,
}

impl Maneuver {
    fn input(&self, frame: usize) -> PlayerInput {
        let holding = self.hold.is_none_or(|hold| frame < hold);
        PlayerInput {
            up: (self.jump_now && frame == 0) || self.double_jump == Some(frame),
            left: !holding && self.release == Release::Brake,
            right: holding,
        }
    }
}

fn maneuvers(jump_now: bool, double_jump: bool) -> Vec<Maneuver> {
    let mut steering: Vec<(Option<usize>, Release)> = HOLD_FRAMES
        .iter()
        .flat_map(|&hold| [(Some(hold), Release::Coast), (Some(hold), Release::Brake)])
        .collect();
    steering.push((None, Release::Coast));

    let mut doubles = vec![None];
    if double_jump {
        doubles.extend(DOUBLE_JUMP_FRAMES.iter().map(|&frame| Some(frame)));
    }

    steering
        .iter()
        .flat_map(|&(hold, release)| {
            doubles.iter().map(move |&double_jump| Maneuver {
                jump_now,
                hold,
                release,
                double_jump,
            })
        })
        .collect()
}

/// A simulated maneuver that ends on `platform`
#[derive(Debug, Clone)]
struct Landing {
    inputs: Vec<PlayerInput>,
    platform: Platform,
    /// Distance to the nearer edge of `platform`
    clearance: f32,
}

impl Landing {
    fn on(player: &Player, platform: Platform, inputs: Vec<PlayerInput>) -> Self {
        let clearance = (player.pos.x - platform.x).min(platform.right() - (player.pos.x + player.width));
        Self {
            inputs,
            platform,
            clearance,
        }
    }
}

enum Outcome {
    /// Came to rest on a platform
    Landed(Landing),
    /// Never came to rest safely, but reached a bounce pad first
    Launched(Landing),
}

/// Run `maneuver` from `player` until it comes to rest, dies or runs out of frames
fn simulate(player: &Player, platforms: &[Platform], maneuver: &Maneuver) -> Option<Outcome> {
    let mut current = player.clone();
    let mut inputs = Vec::new();
    let mut launch = None;

    for frame in 0..HORIZON {
        let input = maneuver.input(frame);
        let next = step_at(&current, platforms, &input, f32::INFINITY, 0.0);
        inputs.push(input);

        if respawned(&current, &next) || next.pos.y > CANVAS_HEIGHT {
            break;
        }
        if next.jump == JumpState::Grounded {
            let platform = *support(&next, platforms)?;
            return Some(Outcome::Landed(Landing::on(&next, platform, inputs)));
        }
        if launch.is_none() && next.vel.y == BOUNCE_FORCE {
            launch = support(&next, platforms).map(|pad| Landing::on(&next, *pad, inputs.clone()));
        }
        current = next;
    }

    launch.map(Outcome::Launched)
}

/// Best maneuver whose resting platform passes `accept`
///
/// A full landing always beats a bounce-pad launch; ties keep the first found.
fn plan(player: &Player, platforms: &[Platform], jump_now: bool, accept: impl Fn(&Platform) -> bool) -> Option<Landing> {
    let double_jump = jump_now || player.can_double_jump();
    let mut landed: Option<Landing> = None;
    let mut launched: Option<Landing> = None;

    for maneuver in maneuvers(jump_now, double_jump) {
        match simulate(player, platforms, &maneuver) {
            Some(Outcome::Landed(l)) if accept(&l.platform) => keep_best(&mut landed, l),
            Some(Outcome::Launched(l)) if accept(&l.platform) => keep_best(&mut launched, l),
            _ => {}
        }
    }

    landed.or(launched)
}

fn keep_best(best: &mut Option<Landing>, candidate: Landing) {
    if best.as_ref().is_none_or(|b| candidate.clearance > b.clearance) {
        *best = Some(candidate);
    }
}

/// Lava and fall respawns both put the player back on their checkpoint
fn respawned(before: &Player, after: &Player) -> bool {
    after.pos == after.last_checkpoint_pos
        && after.pos != before.pos
        && after.checkpoints_reached == before.checkpoints_reached
}

/// The platform the player is standing on, if any
fn support<'a>(player: &Player, platforms: &'a [Platform]) -> Option<&'a Platform> {
    let feet = player.pos.y + player.height;
    platforms.iter().find(|p| {
        player.pos.x + player.width > p.x && player.pos.x < p.right() && (p.y - feet).abs() < FOOT_TOLERANCE
    })
}

/// Input source for one runner
///
/// Keep one per player for the whole race; it holds the committed plan.
#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    plan: VecDeque<PlayerInput>,
    /// Left edge of the platform last stood on or bounced off
    last_floor_x: Option<f32>,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames left in the committed plan
    pub fn planned_frames(&self) -> usize {
        self.plan.len()
    }

    /// Choose this frame's input for `player`
    pub fn next_input(&mut self, player: &Player, platforms: &[Platform]) -> PlayerInput {
        if player.finished {
            self.plan.clear();
            return PlayerInput::default();
        }
        if let Some(input) = self.plan.pop_front() {
            return input;
        }

        let floor = support(player, platforms)
            .filter(|_| player.jump == JumpState::Grounded)
            .copied();
        let Some(floor) = floor else {
            return self.recover(player, platforms);
        };
        self.last_floor_x = Some(floor.x);

        let room = floor.right() - (player.pos.x + player.width);
        if room > TAKEOFF_MARGIN {
            return RUN;
        }
        match plan(player, platforms, true, |p| p.x > floor.x) {
            Some(landing) => self.commit(landing),
            None if room < BRAKE_MARGIN => PlayerInput {
                left: player.vel.x > 0.0,
                ..Default::default()
            },
            None => RUN,
        }
    }

    /// Airborne with nothing committed: spawn drop or a bounce pad launch
    fn recover(&mut self, player: &Player, platforms: &[Platform]) -> PlayerInput {
        let floor_x = self.last_floor_x.unwrap_or(f32::NEG_INFINITY);
        let landing = plan(player, platforms, false, |p| p.x > floor_x).or_else(|| plan(player, platforms, false, |_| true));
        match landing {
            Some(landing) => self.commit(landing),
            None => RUN,
        }
    }

    fn commit(&mut self, landing: Landing) -> PlayerInput {
        log::trace!(
            "Autopilot committed {} frames toward platform at x = {}",
            landing.inputs.len(),
            landing.platform.x
        );
        let x = landing.platform.x;
        self.last_floor_x = Some(self.last_floor_x.map_or(x, |prev| prev.max(x)));
        self.plan = landing.inputs.into();
        self.plan.pop_front().unwrap_or(RUN)
    }
}
