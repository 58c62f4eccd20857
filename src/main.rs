//! Keyshot entry point
//!
//! Headless native runner: loads settings and levels, then lets the seeded
//! autopilot play for a fixed number of frames while logging what happens.
//! Drawing and windowing live outside this crate.

use keyshot::Settings;
use keyshot::sim::{
    Autopilot, DirLevelSource, GameEvent, GameState, LevelSource, StaticLevels, tick,
};

fn main() {
    env_logger::init();
    log::info!("Keyshot (headless) starting...");

    let settings_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| Settings::FILE_NAME.to_string());
    let settings = Settings::load(&settings_path);

    match settings.level_dir.as_deref() {
        Some(dir) => {
            log::info!("Loading levels from {}", dir);
            run(&settings, &DirLevelSource::new(dir));
        }
        None => run(&settings, &StaticLevels::bundled()),
    }
}

fn run(settings: &Settings, levels: &impl LevelSource) {
    let start = settings.effective_start_level();
    let mut state = GameState::new(settings.variant, start, levels.load(start));
    state.spark_ends_flight = settings.spark_ends_flight;
    let mut pilot = Autopilot::new(settings.seed);

    log::info!(
        "Game initialized: {:?} variant, level {}, seed {}",
        settings.variant,
        start,
        settings.seed
    );

    let mut launches = 0u32;
    let mut cleared = 0u32;
    let mut best_level = start;

    for _ in 0..settings.frames {
        let input = pilot.next_input(&state);
        for event in tick(&mut state, &input, levels) {
            match event {
                GameEvent::Launched { .. } => launches += 1,
                GameEvent::LevelCleared { .. } => cleared += 1,
                GameEvent::LevelLoaded { level } => best_level = best_level.max(level),
                _ => {}
            }
        }

        if settings.hud_every > 0 && state.frame % settings.hud_every == 0 {
            let hud = state.hud();
            log::info!(
                "frame {}: level {} shots {} power {:.2} [{}] key {}",
                state.frame,
                hud.level,
                hud.shots,
                hud.power,
                "#".repeat(hud.bar_len as usize),
                hud.has_key
            );
        }
    }

    log::info!(
        "Done after {} frames: {} launches, {} levels cleared, furthest level {}",
        state.frame,
        launches,
        cleared,
        best_level
    );
}
