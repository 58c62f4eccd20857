//! Fixed-step frame update
//!
//! Core game loop that advances the simulation one display frame at a time.
//! There is no delta time: every constant is per frame.

use glam::Vec2;

use super::collision::{integrate, resolve_obstacles, resolve_walls};
use super::level::LevelSource;
use super::state::{Burst, GameEvent, GameState, ProjectileMode};
use crate::consts::*;

/// Input snapshot for a single frame (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Aim rotation held: 1 (W), -1 (S) or 0
    pub angle_dir: i8,
    /// Power change held: 1 (D), -1 (A) or 0
    pub power_dir: i8,
    /// Left mouse held: aim follows the cursor
    pub mouse_dragging: bool,
    /// Aim button held (Space or left mouse). Press aims, release launches.
    pub aim_held: bool,
    /// Cursor position in world units
    pub cursor: Vec2,
    /// Reload the current level (R). From level 0 this starts level 1.
    pub restart: bool,
}

/// Advance the game state by one frame, returning what happened
pub fn tick(state: &mut GameState, input: &TickInput, levels: &impl LevelSource) -> Vec<GameEvent> {
    let mut events = Vec::new();
    state.frame += 1;

    let pressed = input.aim_held && !state.aim_held_prev;
    let released = !input.aim_held && state.aim_held_prev;
    state.aim_held_prev = input.aim_held;

    // Pressing again mid-flight abandons the ball
    if pressed && state.projectile.is_flying() {
        log::debug!("Flight abandoned at frame {}", state.frame);
        state.projectile.recall(&state.aim);
    }

    state.aim.update(input);

    if released && state.projectile.mode == ProjectileMode::Aiming {
        state.projectile.launch(&state.aim);
        if state.variant.has_shots() && state.level_index != 0 {
            state.shots = state.shots.saturating_sub(1);
        }
        log::debug!(
            "Launch: angle {:.3} power {:.3}, {} shots left",
            state.aim.angle,
            state.aim.power,
            state.shots
        );
        events.push(GameEvent::Launched {
            angle: state.aim.angle,
            power: state.aim.power,
        });
    }

    match state.projectile.mode {
        ProjectileMode::Aiming => state.projectile.follow_aim(&state.aim),
        ProjectileMode::Flying => {
            if !state.variant.has_shots() || state.shots > 0 {
                step_flight(state, &mut events);
            }
        }
    }

    if state.variant.has_sparks() {
        check_sparks(state, &mut events);
    }

    if let Some(burst) = state.burst.as_mut() {
        if !burst.step() {
            state.burst = None;
            events.push(GameEvent::BurstFinished);
        }
    }

    check_key_and_exit(state, &mut events);

    if input.restart {
        log::info!("Restart requested on level {}", state.level_index);
        state.reload_pending = true;
    }

    if state.reload_pending {
        state.reload_pending = false;
        if state.level_index == 0 {
            state.level_index = 1;
        }
        load_level(state, levels, &mut events);
    }

    if state.variant.has_shots() && state.shots == 0 {
        log::info!("Out of shots on level {}, back to level 0", state.level_index);
        events.push(GameEvent::ShotsExhausted);
        state.level_index = 0;
        load_level(state, levels, &mut events);
    }

    events
}

/// Integrate and collide the flying projectile
fn step_flight(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let bounds = state.variant.bounds();
    let projectile = &mut state.projectile;

    integrate(&mut projectile.pos, &mut projectile.vel);

    if resolve_walls(&mut projectile.pos, &mut projectile.vel, &bounds) {
        events.push(GameEvent::WallBounce);
    }

    if let Some(hit) = resolve_obstacles(&mut projectile.pos, &mut projectile.vel, &state.level.obstacles) {
        log::debug!("Obstacle {} hit from {:?}", hit.index, hit.side);
        events.push(GameEvent::ObstacleBounce { index: hit.index });
    }
}

/// Refresh spark contact flags and start a burst on a fresh contact
fn check_sparks(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let mut triggered = None;
    for (index, spark) in state.level.sparks.iter_mut().enumerate() {
        let touching = state.projectile.distance_to(spark.pos) < SPARK_RADIUS;
        if touching && !spark.touching && triggered.is_none() && state.burst.is_none() {
            triggered = Some(index);
        }
        spark.touching = touching;
    }

    if let Some(index) = triggered {
        state.burst = Some(Burst::new(state.projectile.pos));
        if state.spark_ends_flight && state.projectile.is_flying() {
            state.projectile.recall(&state.aim);
        }
        events.push(GameEvent::SparkTouched { index });
    }
}

/// Key pickup, then exit (only with the key in hand)
fn check_key_and_exit(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let key = &mut state.level.key;
    if key.present && state.projectile.distance_to(key.pos) < KEY_RADIUS {
        key.present = false;
        state.pass = true;
        log::info!("Key collected on level {}", state.level_index);
        events.push(GameEvent::KeyCollected);
    }

    if state.pass && state.projectile.distance_to(state.level.exit) < state.variant.exit_radius() {
        state.pass = false;
        events.push(GameEvent::LevelCleared {
            level: state.level_index,
        });
        log::info!("Level {} cleared", state.level_index);
        if state.variant.has_levels() {
            state.level_index += 1;
            state.reload_pending = true;
        }
    }
}

fn load_level(state: &mut GameState, levels: &impl LevelSource, events: &mut Vec<GameEvent>) {
    let layout = levels.load(state.variant.layout_level(state.level_index));
    state.apply_layout(layout);
    events.push(GameEvent::LevelLoaded {
        level: state.level_index,
    });
}
