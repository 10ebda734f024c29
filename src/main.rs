//! Neon Duel headless runner
//!
//! Generates a course and lets two autopilots race it. Useful for checking
//! course generation and physics without a renderer.
//!
//! Usage: `neon-duel [seed] [settings.json]`
//! Set `NEON_DUEL_PARAMS` to a level-parameter JSON object to skip the defaults.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use neon_duel::error::{Error, Result};
use neon_duel::sim::{Autopilot, Race, RaceEvent, RaceInput, RacePhase, build_level, tick};
use neon_duel::{LevelParams, RaceSettings, fetch_level_params_or, now_ms, victory_message};

/// Give up after this many frames (two minutes at 60 fps)
const MAX_FRAMES: u64 = 60 * 120;
/// Synthetic frame length, keeps finish times reproducible
const FRAME_MS: f64 = 1000.0 / 60.0;

fn main() {
    env_logger::init();
    log::info!("Neon Duel (headless) starting...");

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(|| now_ms() as u64);
    let settings = match args.next() {
        Some(path) => RaceSettings::load(path)?,
        None => RaceSettings::default(),
    };

    let mut rng = Pcg32::seed_from_u64(seed);
    let theme = settings.pick_theme(&mut rng).to_string();

    let mut race = Race::new(&settings);
    race.begin_generating(theme.clone());

    let source = |_: &str| -> Result<LevelParams> {
        let json = std::env::var("NEON_DUEL_PARAMS")
            .map_err(|_| Error::Unavailable("no level parameter service configured".to_string()))?;
        LevelParams::from_json(&json)
    };
    let params = fetch_level_params_or(&source, &theme, settings.fallback_params);
    race.start(build_level(&theme, &params, seed));

    let mut bots = [Autopilot::new(), Autopilot::new()];
    while race.phase == RacePhase::Playing && race.frame < MAX_FRAMES {
        let Some(level) = race.level.as_ref() else {
            break;
        };
        let input = RaceInput {
            p1: bots[0].next_input(&race.players[0], &level.platforms),
            p2: bots[1].next_input(&race.players[1], &level.platforms),
        };
        let now = race.frame as f64 * FRAME_MS;
        for event in tick(&mut race, &input, now) {
            if let RaceEvent::PlayerFinished { player_id, finish_time } = event {
                log::info!("Player {} finished at {:.2}s", player_id, finish_time / 1000.0);
            }
        }
    }

    match race.winner_player() {
        Some(winner) => {
            let narrator = |_: &str, _: &str| -> Result<String> {
                Err(Error::Unavailable("no narration service configured".to_string()))
            };
            log::info!("{} wins '{}' (seed {})", winner.name, theme, seed);
            log::info!("{}", victory_message(&narrator, &winner.name, &theme));
        }
        None => {
            for p in &race.players {
                log::info!(
                    "{}: x = {:.0}, {} checkpoints, finished = {}",
                    p.name,
                    p.pos.x,
                    p.checkpoints_reached,
                    p.finished
                );
            }
            log::info!("No winner after {} frames", race.frame);
        }
    }

    Ok(())
}
