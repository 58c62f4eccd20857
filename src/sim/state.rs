//! Game state and core simulation types
//!
//! Everything the frame update reads or writes lives here. Positions of the
//! projectile are kept in the anchor-relative flight frame; level entities are
//! stored in world space.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::aim::AimState;
use super::level::LevelLayout;
use crate::consts::*;
use crate::{to_flight_frame, to_world};

/// Game variant: the single-map prototype or the full leveled game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// One map, no shot limit, no sparks
    Prototype,
    /// Levels, shot counter, sparks
    #[default]
    Full,
}

impl Variant {
    /// Wall bounds for the projectile (flight frame)
    pub fn bounds(&self) -> WallBounds {
        match self {
            Variant::Prototype => WallBounds {
                min: Vec2::new(-4.5, -4.5),
                max: Vec2::new(90.5, 41.5),
            },
            Variant::Full => WallBounds {
                min: Vec2::new(-3.5, -3.5),
                max: Vec2::new(89.5, 39.5),
            },
        }
    }

    /// Distance to the exit that completes a level
    pub fn exit_radius(&self) -> f32 {
        match self {
            Variant::Prototype => 2.6,
            Variant::Full => 2.3,
        }
    }

    /// Whether clearing a level advances to the next one
    pub fn has_levels(&self) -> bool {
        matches!(self, Variant::Full)
    }

    /// Whether launches consume shots
    pub fn has_shots(&self) -> bool {
        matches!(self, Variant::Full)
    }

    /// Whether sparks are active
    pub fn has_sparks(&self) -> bool {
        matches!(self, Variant::Full)
    }

    /// Which level file backs a given level index
    pub fn layout_level(&self, level: u32) -> u32 {
        match self {
            Variant::Prototype => 1,
            Variant::Full => level,
        }
    }
}

/// Axis-aligned wall bounds in the flight frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl WallBounds {
    pub fn contains(&self, p: Vec2) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }
}

/// Projectile mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileMode {
    /// Orbiting the anchor, following the aim
    Aiming,
    /// Simulated under gravity, drag and collisions
    Flying,
}

/// The single projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    /// Position in the flight frame (relative to the anchor)
    pub pos: Vec2,
    /// Velocity in world units per frame
    pub vel: Vec2,
    pub mode: ProjectileMode,
}

impl Projectile {
    pub fn new(aim: &AimState) -> Self {
        let mut projectile = Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            mode: ProjectileMode::Aiming,
        };
        projectile.follow_aim(aim);
        projectile
    }

    /// Re-derive position and velocity from the aim (aiming only)
    pub fn follow_aim(&mut self, aim: &AimState) {
        self.pos = aim.orbit_position();
        self.vel = aim.launch_velocity();
    }

    /// Switch to flight from the current aim
    pub fn launch(&mut self, aim: &AimState) {
        self.follow_aim(aim);
        self.mode = ProjectileMode::Flying;
    }

    /// Drop back to aiming, abandoning any flight
    pub fn recall(&mut self, aim: &AimState) {
        self.mode = ProjectileMode::Aiming;
        self.follow_aim(aim);
    }

    #[inline]
    pub fn is_flying(&self) -> bool {
        self.mode == ProjectileMode::Flying
    }

    #[inline]
    pub fn world_pos(&self) -> Vec2 {
        to_world(self.pos)
    }

    /// Distance from the projectile to a world-space point
    #[inline]
    pub fn distance_to(&self, world: Vec2) -> f32 {
        self.pos.distance(to_flight_frame(world))
    }
}

/// The level key
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Key {
    pub pos: Vec2,
    /// Still on the board (not yet collected)
    pub present: bool,
}

/// A spark pickup
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Spark {
    pub pos: Vec2,
    /// Projectile was inside the pickup radius last frame
    pub touching: bool,
}

/// Directions of the eight burst particles
const BURST_DIRECTIONS: [Vec2; 8] = [
    Vec2::new(1.0, 0.0),
    Vec2::new(std::f32::consts::FRAC_1_SQRT_2, std::f32::consts::FRAC_1_SQRT_2),
    Vec2::new(0.0, 1.0),
    Vec2::new(-std::f32::consts::FRAC_1_SQRT_2, std::f32::consts::FRAC_1_SQRT_2),
    Vec2::new(-1.0, 0.0),
    Vec2::new(-std::f32::consts::FRAC_1_SQRT_2, -std::f32::consts::FRAC_1_SQRT_2),
    Vec2::new(0.0, -1.0),
    Vec2::new(std::f32::consts::FRAC_1_SQRT_2, -std::f32::consts::FRAC_1_SQRT_2),
];

/// Decaying 8-point burst started by a spark
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Burst {
    /// Burst center (flight frame)
    pub origin: Vec2,
    /// Outward particle speed, decays every frame
    pub speed: f32,
    /// Distance each particle has travelled
    pub travelled: f32,
}

impl Burst {
    pub fn new(origin: Vec2) -> Self {
        Self {
            origin,
            speed: BURST_START_SPEED,
            travelled: 0.0,
        }
    }

    /// Advance one frame. Returns false once the burst has died out.
    pub fn step(&mut self) -> bool {
        self.speed -= BURST_DECAY * self.speed;
        self.travelled += self.speed;
        self.speed >= BURST_MIN_SPEED
    }

    /// Particle positions in world space
    pub fn particles(&self) -> [Vec2; 8] {
        BURST_DIRECTIONS.map(|dir| to_world(self.origin + dir * self.travelled))
    }
}

/// Entities of the loaded level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    /// Obstacle centers (world), in load order
    pub obstacles: Vec<Vec2>,
    pub key: Key,
    /// Exit position (world)
    pub exit: Vec2,
    pub sparks: Vec<Spark>,
}

impl Level {
    pub fn from_layout(layout: LevelLayout) -> Self {
        let key = match layout.key {
            Some(pos) => Key { pos, present: true },
            None => Key {
                pos: OFF_BOARD,
                present: false,
            },
        };
        Self {
            obstacles: layout.obstacles,
            key,
            exit: layout.exit.unwrap_or(OFF_BOARD),
            sparks: layout
                .sparks
                .into_iter()
                .map(|pos| Spark {
                    pos,
                    touching: false,
                })
                .collect(),
        }
    }
}

/// Things that happened during a tick (for logging, audio, tests)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Launched { angle: f32, power: f32 },
    /// Projectile bounced off an obstacle (index in load order)
    ObstacleBounce { index: usize },
    WallBounce,
    KeyCollected,
    LevelCleared { level: u32 },
    SparkTouched { index: usize },
    BurstFinished,
    ShotsExhausted,
    LevelLoaded { level: u32 },
}

/// HUD readout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hud {
    pub level: u32,
    pub shots: u32,
    pub power: f32,
    pub bar_len: i32,
    pub has_key: bool,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub variant: Variant,
    /// Current level (0 = idle / game over screen)
    pub level_index: u32,
    /// Shots remaining on this level load
    pub shots: u32,
    /// Key collected on this level
    pub pass: bool,
    pub aim: AimState,
    pub projectile: Projectile,
    pub level: Level,
    /// Active spark burst, if any
    pub burst: Option<Burst>,
    /// Whether touching a spark returns the projectile to the anchor
    pub spark_ends_flight: bool,
    /// Frame counter
    pub frame: u64,
    /// Aim button state last frame (edge detection)
    pub(crate) aim_held_prev: bool,
    /// Reload the current level at the end of this frame
    pub(crate) reload_pending: bool,
}

impl GameState {
    /// Create a new game on the given level
    pub fn new(variant: Variant, level_index: u32, layout: LevelLayout) -> Self {
        let aim = AimState::default();
        let mut state = Self {
            variant,
            level_index,
            shots: SHOTS_PER_LEVEL,
            pass: false,
            aim,
            projectile: Projectile::new(&aim),
            level: Level::from_layout(LevelLayout::empty()),
            burst: None,
            spark_ends_flight: true,
            frame: 0,
            aim_held_prev: false,
            reload_pending: false,
        };
        state.apply_layout(layout);
        state
    }

    /// Replace the level with a freshly loaded layout and reset per-level state
    pub fn apply_layout(&mut self, layout: LevelLayout) {
        self.level = Level::from_layout(layout);
        self.shots = SHOTS_PER_LEVEL;
        self.pass = false;
        self.burst = None;
        self.projectile.recall(&self.aim);
        log::info!(
            "Level {} loaded: {} obstacles, {} sparks",
            self.level_index,
            self.level.obstacles.len(),
            self.level.sparks.len()
        );
    }

    #[inline]
    pub fn projectile_world_pos(&self) -> Vec2 {
        self.projectile.world_pos()
    }

    /// Burst particle positions (world), empty when no burst is running
    pub fn burst_particles(&self) -> Vec<Vec2> {
        self.burst
            .map(|b| b.particles().to_vec())
            .unwrap_or_default()
    }

    pub fn hud(&self) -> Hud {
        Hud {
            level: self.level_index,
            shots: self.shots,
            power: self.aim.power,
            bar_len: self.aim.bar_len(),
            has_key: self.pass,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_decays_monotonically() {
        let mut burst = Burst::new(Vec2::ZERO);
        let mut last_speed = burst.speed;
        let mut last_travelled = 0.0;
        let mut frames = 0;
        while burst.step() {
            assert!(burst.speed < last_speed);
            assert!(burst.travelled > last_travelled);
            last_speed = burst.speed;
            last_travelled = burst.travelled;
            frames += 1;
            assert!(frames < 1000);
        }
        // 0.93^n < 0.01 first at n = 64
        assert_eq!(frames, 63);
    }

    #[test]
    fn test_burst_particles_spread() {
        let mut burst = Burst::new(Vec2::new(10.0, 10.0));
        burst.step();
        let parts = burst.particles();
        let center = to_world(burst.origin);
        for p in parts {
            assert!((p.distance(center) - burst.travelled).abs() < 1e-5);
        }
    }

    #[test]
    fn test_empty_layout_parks_key_and_exit() {
        let level = Level::from_layout(LevelLayout::empty());
        assert!(!level.key.present);
        assert_eq!(level.key.pos, OFF_BOARD);
        assert_eq!(level.exit, OFF_BOARD);
    }

    #[test]
    fn test_new_state_is_aiming() {
        let state = GameState::new(Variant::Full, 1, LevelLayout::empty());
        assert_eq!(state.projectile.mode, ProjectileMode::Aiming);
        assert_eq!(state.shots, SHOTS_PER_LEVEL);
        assert!((state.projectile.pos.length() - AIM_ORBIT_RADIUS).abs() < 1e-5);
    }

    #[test]
    fn test_variant_bounds_differ() {
        assert_eq!(Variant::Prototype.bounds().max.x, 90.5);
        assert_eq!(Variant::Full.bounds().max.x, 89.5);
        assert!(Variant::Full.bounds().contains(Vec2::ZERO));
    }
}
