//! Idle/demo mode - a seeded player that aims and shoots on its own

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{GameState, ProjectileMode};
use super::tick::TickInput;

/// Frames a shot is allowed to fly before the autopilot re-aims
const MAX_FLIGHT_FRAMES: u32 = 600;
/// Speed below which the projectile counts as settled
const REST_SPEED: f32 = 0.05;
/// Consecutive settled frames before the autopilot gives up on the shot
const REST_FRAMES: u32 = 20;
/// Angle tolerance before releasing (radians)
const ANGLE_TOLERANCE: f32 = 0.01;
/// Power tolerance before releasing
const POWER_TOLERANCE: f32 = 0.03;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Plan {
    /// Waiting for the projectile to come back to the anchor or settle
    Watching { frames: u32, settled: u32 },
    /// Holding the aim button, steering toward a target
    Aiming { angle: f32, power: f32 },
}

/// Deterministic demo player
#[derive(Debug, Clone)]
pub struct Autopilot {
    rng: Pcg32,
    plan: Plan,
}

impl Autopilot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            plan: Plan::Watching { frames: 0, settled: 0 },
        }
    }

    /// Produce the input for the next frame
    pub fn next_input(&mut self, state: &GameState) -> TickInput {
        if state.level_index == 0 {
            // Idle screen: start over
            self.plan = Plan::Watching { frames: 0, settled: 0 };
            return TickInput {
                restart: true,
                ..Default::default()
            };
        }

        match self.plan {
            Plan::Watching { frames, settled } => {
                let settled = if state.projectile.vel.length() < REST_SPEED {
                    settled + 1
                } else {
                    0
                };
                let done = state.projectile.mode == ProjectileMode::Aiming
                    || frames >= MAX_FLIGHT_FRAMES
                    || settled >= REST_FRAMES;
                if done {
                    let angle = self.rng.random_range(0.15f32..1.4);
                    let power = self.rng.random_range(1.0f32..2.2);
                    log::debug!("Autopilot aiming at {:.2} rad, power {:.2}", angle, power);
                    self.plan = Plan::Aiming { angle, power };
                    TickInput {
                        aim_held: true,
                        ..Default::default()
                    }
                } else {
                    self.plan = Plan::Watching {
                        frames: frames + 1,
                        settled,
                    };
                    TickInput::default()
                }
            }
            Plan::Aiming { angle, power } => {
                let angle_err = angle - state.aim.angle;
                let power_err = power - state.aim.power;
                if angle_err.abs() <= ANGLE_TOLERANCE && power_err.abs() <= POWER_TOLERANCE {
                    // Release launches
                    self.plan = Plan::Watching { frames: 0, settled: 0 };
                    return TickInput::default();
                }
                TickInput {
                    aim_held: true,
                    angle_dir: steer(angle_err, ANGLE_TOLERANCE),
                    power_dir: steer(power_err, POWER_TOLERANCE),
                    ..Default::default()
                }
            }
        }
    }
}

fn steer(err: f32, tolerance: f32) -> i8 {
    if err > tolerance {
        1
    } else if err < -tolerance {
        -1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use crate::sim::level::{LevelSource, StaticLevels};
    use crate::sim::state::{GameEvent, Variant};
    use crate::sim::tick::tick;

    #[test]
    fn test_autopilot_launches() {
        let levels = StaticLevels::bundled();
        let mut state = GameState::new(Variant::Full, 1, levels.load(1));
        let mut pilot = Autopilot::new(7);
        let mut launches = 0;
        for _ in 0..3000 {
            let input = pilot.next_input(&state);
            let events = tick(&mut state, &input, &levels);
            launches += events
                .iter()
                .filter(|e| matches!(e, GameEvent::Launched { .. }))
                .count();
        }
        assert!(launches >= 2, "only {launches} launches");
    }

    #[test]
    fn test_autopilot_restarts_idle_screen() {
        let levels = StaticLevels::bundled();
        let state = GameState::new(Variant::Full, 0, levels.load(0));
        let mut pilot = Autopilot::new(1);
        assert!(pilot.next_input(&state).restart);
    }

    fn flying_state(vel: Vec2) -> GameState {
        let levels = StaticLevels::bundled();
        let mut state = GameState::new(Variant::Full, 1, levels.load(1));
        state.projectile.launch(&state.aim);
        state.projectile.vel = vel;
        state
    }

    #[test]
    fn test_autopilot_reaims_once_ball_settles() {
        let state = flying_state(Vec2::ZERO);
        let mut pilot = Autopilot::new(3);
        let frame = (0..MAX_FLIGHT_FRAMES)
            .position(|_| pilot.next_input(&state).aim_held)
            .expect("autopilot never re-aimed");
        assert_eq!(frame as u32, REST_FRAMES - 1);
    }

    #[test]
    fn test_autopilot_waits_while_ball_moves() {
        let state = flying_state(Vec2::new(0.4, -0.2));
        let mut pilot = Autopilot::new(3);
        for _ in 0..MAX_FLIGHT_FRAMES {
            assert!(!pilot.next_input(&state).aim_held);
        }
        assert!(pilot.next_input(&state).aim_held);
    }

    #[test]
    fn test_same_seed_same_game() {
        let levels = StaticLevels::bundled();
        let mut a = GameState::new(Variant::Full, 1, levels.load(1));
        let mut b = GameState::new(Variant::Full, 1, levels.load(1));
        let mut pa = Autopilot::new(42);
        let mut pb = Autopilot::new(42);
        for _ in 0..2000 {
            let ia = pa.next_input(&a);
            let ib = pb.next_input(&b);
            assert_eq!(ia, ib);
            tick(&mut a, &ia, &levels);
            tick(&mut b, &ib, &levels);
        }
        assert_eq!(a.projectile.pos, b.projectile.pos);
        assert_eq!(a.level_index, b.level_index);
        assert_eq!(a.shots, b.shots);
    }
}
