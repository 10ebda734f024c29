//! Per-frame player physics
//!
//! `step` is a pure state transition: it reads the previous player snapshot
//! and returns the next one. The order of the phases below is part of the
//! game feel and must not be rearranged.

use glam::Vec2;

use super::collision::{Contact, contact};
use super::state::{JumpState, Platform, PlatformKind, Player, PlayerInput};
use crate::consts::*;

/// Advance one player by one frame, stamping a finish with the wall clock
pub fn step(player: &Player, platforms: &[Platform], input: &PlayerInput, finish_line_x: f32) -> Player {
    step_at(player, platforms, input, finish_line_x, crate::now_ms())
}

/// Advance one player by one frame; `now_ms` is recorded if the finish line is crossed
pub fn step_at(
    player: &Player,
    platforms: &[Platform],
    input: &PlayerInput,
    finish_line_x: f32,
    now_ms: f64,
) -> Player {
    let mut next = player.clone();
    let size = next.size();

    // Run input, then damping based on last frame's contact
    next.vel.x += input.horizontal() * MOVE_ACCEL;
    next.vel.x *= if player.is_jumping() {
        AIR_RESISTANCE
    } else {
        FRICTION
    };
    next.vel.x = next.vel.x.clamp(-MAX_RUN_SPEED, MAX_RUN_SPEED);

    next.vel.y += GRAVITY;
    next.pos += next.vel;

    let mut grounded = false;
    let mut reserve = player.can_double_jump();

    // Platforms resolve one at a time in order; later ones see the corrected position
    for plat in platforms {
        let Some(hit) = contact(next.pos, size, plat) else {
            continue;
        };
        match hit {
            Contact::Side { x } => {
                next.pos.x = x;
                next.vel.x = 0.0;
            }
            Contact::Top { y } => {
                next.pos.y = y;
                next.vel.y = 0.0;
                grounded = true;
                reserve = true;

                match plat.kind {
                    PlatformKind::Bounce => {
                        next.vel.y = BOUNCE_FORCE;
                        grounded = false;
                    }
                    PlatformKind::Lava => {
                        next.pos = next.last_checkpoint_pos;
                        next.vel = Vec2::ZERO;
                    }
                    PlatformKind::Normal | PlatformKind::Ice => {}
                }
            }
            Contact::Bottom { y } => {
                next.pos.y = y;
                next.vel.y = 0.0;
            }
        }
    }

    let mut airborne = !grounded;

    // Jumps fire on the press edge only
    let jump_pressed = input.up && !player.jump_key_was_down;
    if jump_pressed {
        if grounded {
            next.vel.y = JUMP_FORCE;
            airborne = true;
            reserve = true;
        } else if reserve {
            next.vel.y = JUMP_FORCE;
            reserve = false;
        }
    }
    next.jump_key_was_down = input.up;

    if next.pos.y > CANVAS_HEIGHT + FALL_RESPAWN_MARGIN {
        next.pos = next.last_checkpoint_pos;
        next.vel = Vec2::ZERO;
        reserve = true;
    }

    next.jump = JumpState::from_flags(airborne, reserve);

    // Checkpoints only move forward, and only from solid ground
    if grounded && next.pos.x > next.last_checkpoint_pos.x + CHECKPOINT_SPACING {
        next.last_checkpoint_pos = next.pos;
        next.checkpoints_reached += 1;
    }

    if next.pos.x >= finish_line_x && !next.finished {
        next.finished = true;
        next.finish_time = Some(now_ms);
    }

    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const FINISH: f32 = 5000.0;

    fn floor() -> Platform {
        Platform::new(0.0, 500.0, 800.0, 100.0, PlatformKind::Normal)
    }

    fn player_at(x: f32, y: f32) -> Player {
        Player::new(1, "Player 1", "#3b82f6", Vec2::new(x, y))
    }

    fn airborne(x: f32, y: f32, jump: JumpState) -> Player {
        let mut p = player_at(x, y);
        p.jump = jump;
        p
    }

    const UP: PlayerInput = PlayerInput {
        up: true,
        left: false,
        right: false,
    };
    const RIGHT: PlayerInput = PlayerInput {
        up: false,
        left: false,
        right: true,
    };

    #[test]
    fn test_rest_on_platform() {
        let p = player_at(100.0, 455.0);
        let next = step_at(&p, &[floor()], &PlayerInput::default(), FINISH, 0.0);
        assert_eq!(next.pos.y, 455.0);
        assert_eq!(next.vel.y, 0.0);
        assert!(!next.is_jumping());
        assert_eq!(next.jump, JumpState::Grounded);
    }

    #[test]
    fn test_does_not_mutate_input() {
        let p = player_at(100.0, 455.0);
        let before = p.clone();
        let platforms = vec![floor()];
        let _ = step_at(&p, &platforms, &RIGHT, FINISH, 0.0);
        assert_eq!(p, before);
        assert_eq!(platforms, vec![floor()]);
    }

    #[test]
    fn test_ground_jump() {
        let p = player_at(100.0, 455.0);
        let next = step_at(&p, &[floor()], &UP, FINISH, 0.0);
        assert_eq!(next.vel.y, JUMP_FORCE);
        assert_eq!(next.jump, JumpState::AirborneWithReserve);
        assert!(next.jump_key_was_down);
    }

    #[test]
    fn test_double_jump_on_press_edge() {
        let p = airborne(100.0, 100.0, JumpState::AirborneWithReserve);
        let next = step_at(&p, &[floor()], &UP, FINISH, 0.0);
        assert_eq!(next.vel.y, -14.0);
        assert!(!next.can_double_jump());
        assert_eq!(next.jump, JumpState::AirborneSpent);
    }

    #[test]
    fn test_held_jump_does_not_retrigger() {
        let mut p = airborne(100.0, 100.0, JumpState::AirborneWithReserve);
        p.jump_key_was_down = true;
        p.vel.y = 3.0;
        let next = step_at(&p, &[], &UP, FINISH, 0.0);
        assert_eq!(next.vel.y, 3.0 + GRAVITY);
        assert_eq!(next.jump, JumpState::AirborneWithReserve);

        // Same for a grounded player holding the key since last frame
        let mut g = player_at(100.0, 455.0);
        g.jump_key_was_down = true;
        let next = step_at(&g, &[floor()], &UP, FINISH, 0.0);
        assert_eq!(next.vel.y, 0.0);
        assert_eq!(next.jump, JumpState::Grounded);
    }

    #[test]
    fn test_jump_sequence_press_release_press() {
        let platforms = [floor()];
        let mut p = player_at(100.0, 455.0);
        p = step_at(&p, &platforms, &UP, FINISH, 0.0);
        assert_eq!(p.jump, JumpState::AirborneWithReserve);
        p = step_at(&p, &platforms, &UP, FINISH, 0.0);
        assert_eq!(p.jump, JumpState::AirborneWithReserve);
        p = step_at(&p, &platforms, &PlayerInput::default(), FINISH, 0.0);
        p = step_at(&p, &platforms, &UP, FINISH, 0.0);
        assert_eq!(p.vel.y, JUMP_FORCE);
        assert_eq!(p.jump, JumpState::AirborneSpent);
        // A third press does nothing
        p = step_at(&p, &platforms, &PlayerInput::default(), FINISH, 0.0);
        let vy = p.vel.y;
        p = step_at(&p, &platforms, &UP, FINISH, 0.0);
        assert_eq!(p.vel.y, vy + GRAVITY);
    }

    #[test]
    fn test_spent_double_jump_is_noop() {
        let p = airborne(100.0, 100.0, JumpState::AirborneSpent);
        let pressed = step_at(&p, &[], &UP, FINISH, 0.0);
        let idle = step_at(&p, &[], &PlayerInput::default(), FINISH, 0.0);
        assert_eq!(pressed.vel, idle.vel);
        assert_eq!(pressed.jump, JumpState::AirborneSpent);
    }

    #[test]
    fn test_bounce_landing() {
        let pad = Platform::new(0.0, 500.0, 400.0, 40.0, PlatformKind::Bounce);
        let mut p = airborne(100.0, 456.0, JumpState::AirborneSpent);
        p.vel.y = 2.0;
        let next = step_at(&p, &[pad], &PlayerInput::default(), FINISH, 0.0);
        assert_eq!(next.vel.y, BOUNCE_FORCE);
        assert_eq!(next.pos.y, 455.0);
        assert!(next.is_jumping());
        assert!(next.can_double_jump());
    }

    #[test]
    fn test_lava_sends_to_checkpoint() {
        let lava = Platform::new(900.0, 500.0, 200.0, 40.0, PlatformKind::Lava);
        let mut p = airborne(1000.0, 456.0, JumpState::AirborneSpent);
        p.last_checkpoint_pos = Vec2::new(100.0, 400.0);
        p.vel = Vec2::new(0.0, 1.0);
        let next = step_at(&p, &[lava], &PlayerInput::default(), FINISH, 0.0);
        assert_eq!(next.pos, Vec2::new(100.0, 400.0));
        assert_eq!(next.vel, Vec2::ZERO);
        assert!(next.can_double_jump());
    }

    #[test]
    fn test_ice_behaves_like_normal() {
        let ice = Platform::new(0.0, 500.0, 800.0, 100.0, PlatformKind::Ice);
        let p = player_at(100.0, 455.0);
        let on_ice = step_at(&p, &[ice], &RIGHT, FINISH, 0.0);
        let on_floor = step_at(&p, &[floor()], &RIGHT, FINISH, 0.0);
        assert_eq!(on_ice, on_floor);
    }

    #[test]
    fn test_run_accel_friction_and_cap() {
        let p = player_at(100.0, 455.0);
        let next = step_at(&p, &[floor()], &RIGHT, FINISH, 0.0);
        assert!((next.vel.x - 0.8 * FRICTION).abs() < 1e-6);

        let mut fast = airborne(100.0, 100.0, JumpState::AirborneWithReserve);
        fast.vel.x = -20.0;
        let next = step_at(&fast, &[], &PlayerInput::default(), FINISH, 0.0);
        assert_eq!(next.vel.x, -MAX_RUN_SPEED);
        assert_eq!(next.pos.x, 90.0);
    }

    #[test]
    fn test_damping_uses_previous_frame_contact() {
        // Coasting in the air
        let mut p = airborne(100.0, 100.0, JumpState::AirborneWithReserve);
        p.vel.x = 4.0;
        let next = step_at(&p, &[], &PlayerInput::default(), FINISH, 0.0);
        assert_eq!(next.vel.x, 4.0 * AIR_RESISTANCE);

        // Landing frame: airborne before, grounded after, still air damping
        let mut p = airborne(100.0, 450.0, JumpState::AirborneSpent);
        p.vel = Vec2::new(4.0, 5.0);
        let next = step_at(&p, &[floor()], &PlayerInput::default(), FINISH, 0.0);
        assert_eq!(next.jump, JumpState::Grounded);
        assert_eq!(next.vel.x, 4.0 * AIR_RESISTANCE);

        // Takeoff frame: grounded before, airborne after, still ground friction
        let mut p = player_at(100.0, 455.0);
        p.vel.x = 4.0;
        let next = step_at(&p, &[floor()], &UP, FINISH, 0.0);
        assert_eq!(next.jump, JumpState::AirborneWithReserve);
        assert_eq!(next.vel.x, 4.0 * FRICTION);
    }

    #[test]
    fn test_both_directions_cancel() {
        let both = PlayerInput {
            left: true,
            right: true,
            ..Default::default()
        };
        let mut p = player_at(100.0, 455.0);
        p.vel.x = 2.0;
        let next = step_at(&p, &[floor()], &both, FINISH, 0.0);
        assert!((next.vel.x - 2.0 * FRICTION).abs() < 1e-6);
    }

    #[test]
    fn test_wall_stops_horizontal() {
        let wall = Platform::new(140.0, 300.0, 40.0, 300.0, PlatformKind::Normal);
        let mut p = player_at(105.0, 455.0);
        p.vel.x = 8.0;
        let next = step_at(&p, &[floor(), wall], &RIGHT, FINISH, 0.0);
        assert_eq!(next.pos.x, 110.0);
        assert_eq!(next.vel.x, 0.0);
        assert_eq!(next.jump, JumpState::Grounded);
    }

    #[test]
    fn test_head_hit() {
        let ceiling = Platform::new(0.0, 200.0, 800.0, 40.0, PlatformKind::Normal);
        let mut p = airborne(100.0, 250.0, JumpState::AirborneWithReserve);
        p.vel.y = -14.0;
        let next = step_at(&p, &[ceiling], &PlayerInput::default(), FINISH, 0.0);
        assert_eq!(next.pos.y, 240.0);
        assert_eq!(next.vel.y, 0.0);
        assert!(next.is_jumping());
    }

    #[test]
    fn test_fall_respawn() {
        let mut p = airborne(2000.0, 1100.0, JumpState::AirborneSpent);
        p.last_checkpoint_pos = Vec2::new(1500.0, 300.0);
        p.vel = Vec2::new(3.0, 12.0);
        let next = step_at(&p, &[], &PlayerInput::default(), FINISH, 0.0);
        assert_eq!(next.pos, Vec2::new(1500.0, 300.0));
        assert_eq!(next.vel, Vec2::ZERO);
        assert!(next.can_double_jump());
    }

    #[test]
    fn test_checkpoint_advances_only_when_grounded() {
        let mut p = player_at(600.0, 455.0);
        p.last_checkpoint_pos = Vec2::new(100.0, 400.0);
        let next = step_at(&p, &[floor()], &PlayerInput::default(), FINISH, 0.0);
        assert_eq!(next.last_checkpoint_pos, Vec2::new(600.0, 455.0));
        assert_eq!(next.checkpoints_reached, 1);

        let mut air = airborne(600.0, 100.0, JumpState::AirborneWithReserve);
        air.last_checkpoint_pos = Vec2::new(100.0, 400.0);
        let next = step_at(&air, &[floor()], &PlayerInput::default(), FINISH, 0.0);
        assert_eq!(next.last_checkpoint_pos, Vec2::new(100.0, 400.0));
        assert_eq!(next.checkpoints_reached, 0);
    }

    #[test]
    fn test_checkpoint_needs_spacing() {
        let mut p = player_at(450.0, 455.0);
        p.last_checkpoint_pos = Vec2::new(100.0, 400.0);
        let next = step_at(&p, &[floor()], &PlayerInput::default(), FINISH, 0.0);
        assert_eq!(next.last_checkpoint_pos, Vec2::new(100.0, 400.0));
    }

    #[test]
    fn test_finish_latch() {
        let goal = Platform::new(5000.0, 500.0, 800.0, 400.0, PlatformKind::Normal);
        let p = player_at(5001.0, 455.0);
        let done = step_at(&p, &[goal], &PlayerInput::default(), FINISH, 1234.0);
        assert!(done.finished);
        assert_eq!(done.finish_time, Some(1234.0));

        // Walking back behind the line keeps the latch and the first stamp
        let mut back = done.clone();
        back.pos.x = 10.0;
        let later = step_at(&back, &[floor()], &PlayerInput::default(), FINISH, 9999.0);
        assert!(later.finished);
        assert_eq!(later.finish_time, Some(1234.0));
    }

    #[test]
    fn test_finished_player_keeps_moving() {
        let goal = Platform::new(5000.0, 500.0, 800.0, 400.0, PlatformKind::Normal);
        let mut p = player_at(5001.0, 455.0);
        p.finished = true;
        p.finish_time = Some(1.0);
        let next = step_at(&p, &[goal], &RIGHT, FINISH, 2.0);
        assert!(next.pos.x > p.pos.x);
        assert_eq!(next.finish_time, Some(1.0));
    }

    #[test]
    fn test_wall_clock_step_stamps_finish() {
        let p = player_at(5001.0, 100.0);
        let next = step(&p, &[], &PlayerInput::default(), FINISH);
        assert!(next.finish_time.is_some_and(|t| t > 0.0));
    }

    #[test]
    fn test_deterministic() {
        let platforms = [floor(), Platform::new(900.0, 420.0, 200.0, 40.0, PlatformKind::Bounce)];
        let mut a = player_at(100.0, 455.0);
        let mut b = a.clone();
        for i in 0..240 {
            let input = PlayerInput {
                up: i % 30 < 3,
                left: false,
                right: true,
            };
            a = step_at(&a, &platforms, &input, FINISH, 0.0);
            b = step_at(&b, &platforms, &input, FINISH, 0.0);
        }
        assert_eq!(a, b);
    }

    fn input_strategy() -> impl Strategy<Value = PlayerInput> {
        (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(up, left, right)| PlayerInput {
            up,
            left,
            right,
        })
    }

    fn course() -> Vec<Platform> {
        vec![
            floor(),
            Platform::new(950.0, 450.0, 200.0, 40.0, PlatformKind::Bounce),
            Platform::new(1300.0, 420.0, 250.0, 40.0, PlatformKind::Lava),
            Platform::new(1600.0, 420.0, 150.0, 40.0, PlatformKind::Normal),
            Platform::new(1900.0, 380.0, 300.0, 40.0, PlatformKind::Ice),
            Platform::new(2400.0, 400.0, 800.0, 400.0, PlatformKind::Normal),
        ]
    }

    proptest! {
        #[test]
        fn prop_checkpoint_monotonic_and_finish_latched(
            inputs in prop::collection::vec(input_strategy(), 1..400)
        ) {
            let platforms = course();
            let finish = 2400.0;
            let mut p = player_at(100.0, 400.0);
            let mut stamp: Option<f64> = None;
            for (i, input) in inputs.iter().enumerate() {
                let next = step_at(&p, &platforms, input, finish, i as f64);
                prop_assert!(next.last_checkpoint_pos.x >= p.last_checkpoint_pos.x);
                prop_assert!(next.checkpoints_reached >= p.checkpoints_reached);
                if p.finished {
                    prop_assert!(next.finished);
                    prop_assert_eq!(next.finish_time, stamp);
                }
                if next.finished && stamp.is_none() {
                    stamp = next.finish_time;
                }
                if next.jump == JumpState::Grounded {
                    prop_assert!(next.can_double_jump());
                }
                prop_assert_eq!(next.jump_key_was_down, input.up);
                p = next;
            }
        }

        #[test]
        fn prop_spent_jump_ignores_press(
            x in 0.0f32..3000.0,
            y in -200.0f32..100.0,
            vx in -10.0f32..10.0,
            vy in -20.0f32..20.0,
        ) {
            // Above every platform in the course, so nothing is touched this step
            let mut p = airborne(x, y, JumpState::AirborneSpent);
            p.vel = Vec2::new(vx, vy);
            let pressed = step_at(&p, &course(), &UP, 10_000.0, 0.0);
            let idle = step_at(&p, &course(), &PlayerInput::default(), 10_000.0, 0.0);
            prop_assert_eq!(pressed.vel, idle.vel);
            prop_assert_eq!(pressed.jump, JumpState::AirborneSpent);
        }
    }
}
