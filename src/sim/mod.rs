//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed per-frame step only
//! - Seeded RNG only (autopilot)
//! - Stable iteration order (level file order)
//! - No rendering or platform dependencies

pub mod aim;
pub mod autopilot;
pub mod collision;
pub mod level;
pub mod state;
pub mod tick;

pub use aim::AimState;
pub use autopilot::Autopilot;
pub use collision::{HitSide, ObstacleHit, resolve_obstacles, resolve_walls};
pub use level::{DirLevelSource, LevelLayout, LevelSource, StaticLevels};
pub use state::{
    Burst, GameEvent, GameState, Hud, Key, Level, Projectile, ProjectileMode, Spark, Variant,
    WallBounds,
};
pub use tick::{TickInput, tick};
