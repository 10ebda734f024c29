//! Procedural course generation
//!
//! Courses run left to right from a wide spawn platform to a goal platform at
//! `level_length`. Every gap and height change is kept inside what a single
//! run-up jump can clear.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{Level, Platform, PlatformKind};
use crate::consts::*;
use crate::params::LevelParams;

/// Upward height change still reachable after a gap of `gap` units
///
/// Wider gaps eat into the jump arc, so they leave less room to climb.
#[inline]
pub fn max_rise_for_gap(gap: f32) -> f32 {
    let difficulty = gap / MAX_REACHABLE_GAP;
    MAX_REACHABLE_RISE * (1.0 - RISE_PENALTY_AT_MAX_GAP * difficulty)
}

/// Pick a surface type from a uniform roll in [0, 1)
///
/// Bands: lava `[0, 0.3d)`, bounce `[0.3d, 0.6d)`, ice `[0.6d, 0.7d)`,
/// normal for the rest. Lava is refused after wide gaps; such rolls fall
/// through to the bounce band.
pub fn classify_platform(roll: f32, hazard_density: f32, gap: f32) -> PlatformKind {
    if roll < hazard_density * 0.3 && gap < MAX_REACHABLE_GAP * LAVA_GAP_LIMIT {
        PlatformKind::Lava
    } else if roll < hazard_density * 0.6 {
        PlatformKind::Bounce
    } else if roll < hazard_density * 0.7 {
        PlatformKind::Ice
    } else {
        PlatformKind::Normal
    }
}

/// Generate the platform sequence for a course
///
/// The theme only flavours logging; layout is driven by `params` and `rng`.
pub fn generate_level<R: Rng + ?Sized>(theme: &str, params: &LevelParams, rng: &mut R) -> Vec<Platform> {
    let mut platforms = vec![Platform::new(
        0.0,
        START_PLATFORM_Y,
        START_PLATFORM_WIDTH,
        START_PLATFORM_HEIGHT,
        PlatformKind::Normal,
    )];

    // Negative knobs would let the cursor stall or run backwards
    let gap_range = params.gap_size.max(0.0);

    // f64 so long courses keep advancing by whole gaps
    let level_length = f64::from(params.level_length);
    let mut cursor_x = f64::from(START_PLATFORM_WIDTH);
    let mut current_y = START_PLATFORM_Y;

    while cursor_x < level_length {
        let segment_start = cursor_x;
        let gap = (rng.random::<f32>() * gap_range + MIN_GAP).min(MAX_REACHABLE_GAP);
        let width = rng.random::<f32>() * PLATFORM_WIDTH_RANGE + MIN_PLATFORM_WIDTH;

        let max_rise = max_rise_for_gap(gap);
        let dy = ((rng.random::<f32>() - 0.5) * params.platform_height_variance).max(-max_rise);
        let next_y = (current_y + dy).clamp(MIN_PLATFORM_Y, MAX_PLATFORM_Y);

        cursor_x += f64::from(gap);

        let kind = classify_platform(rng.random::<f32>(), params.hazard_density, gap);
        platforms.push(Platform::new(cursor_x as f32, next_y, width, PLATFORM_HEIGHT, kind));

        if kind == PlatformKind::Lava {
            // Lava always has a landing right behind it
            cursor_x += f64::from(width + LAVA_SAFETY_GAP);
            platforms.push(Platform::new(
                cursor_x as f32,
                next_y,
                LAVA_SAFETY_WIDTH,
                PLATFORM_HEIGHT,
                PlatformKind::Normal,
            ));
            cursor_x += f64::from(LAVA_SAFETY_WIDTH);
        } else {
            cursor_x += f64::from(width);
        }

        current_y = next_y;
        if cursor_x <= segment_start {
            break;
        }
    }

    platforms.push(Platform::new(
        params.level_length,
        current_y,
        GOAL_PLATFORM_WIDTH,
        GOAL_PLATFORM_HEIGHT,
        PlatformKind::Normal,
    ));

    log::debug!(
        "Generated '{}' course: {} platforms over {} units",
        theme,
        platforms.len(),
        params.level_length
    );

    platforms
}

/// Generate a replayable platform sequence from `seed`
pub fn generate_level_seeded(theme: &str, params: &LevelParams, seed: u64) -> Vec<Platform> {
    let mut rng = Pcg32::seed_from_u64(seed);
    generate_level(theme, params, &mut rng)
}

/// Generate a full course; the finish line sits at the goal platform's left edge
pub fn build_level(theme: &str, params: &LevelParams, seed: u64) -> Level {
    let platforms = generate_level_seeded(theme, params, seed);
    log::info!(
        "Built level '{}' (seed {}): {} platforms, finish at {}",
        theme,
        seed,
        platforms.len(),
        params.level_length
    );
    Level {
        seed,
        theme: theme.to_string(),
        params: *params,
        platforms,
        finish_line_x: params.level_length,
    }
}
