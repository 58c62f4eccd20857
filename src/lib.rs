//! Keyshot - launch, bounce, grab the key, reach the exit
//!
//! Core modules:
//! - `sim`: Deterministic simulation (aiming, physics, collisions, level state)
//! - `settings`: JSON-configurable run settings

pub mod settings;
pub mod sim;

pub use settings::Settings;
pub use sim::Variant;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// World canvas size (world units)
    pub const WORLD_WIDTH: f32 = 96.0;
    pub const WORLD_HEIGHT: f32 = 54.0;

    /// Launch anchor the projectile orbits while aiming
    pub const AIM_ANCHOR: Vec2 = Vec2::new(5.0, 5.0);
    /// Orbit radius of the projectile around the anchor while aiming
    pub const AIM_ORBIT_RADIUS: f32 = 6.0;
    /// Angle change per frame while a rotate key is held (radians)
    pub const AIM_ANGLE_RATE: f32 = 0.01;
    /// Power change per frame while a power key is held
    pub const AIM_POWER_RATE: f32 = 0.025;
    /// Launch power limits
    pub const POWER_MIN: f32 = 0.0;
    pub const POWER_MAX: f32 = 2.2;
    /// Starting launch power
    pub const POWER_START: f32 = 1.0;
    /// Power bar readout limits (segments)
    pub const BAR_LEN_MIN: i32 = 1;
    pub const BAR_LEN_MAX: i32 = 12;

    /// Downward acceleration per frame
    pub const GRAVITY: f32 = 0.03;
    /// Horizontal velocity damping per frame
    pub const DRAG: f32 = 0.015;
    /// Wall restitution
    pub const WALL_RESTITUTION_X: f32 = 0.7;
    pub const WALL_RESTITUTION_Y: f32 = 0.8;

    /// Obstacle restitution
    pub const OBSTACLE_RESTITUTION: f32 = 0.8;
    /// Corner-inclusive reach around a unit square center (0.5 + 1/sqrt(2))
    pub const OBSTACLE_REACH: f32 = 1.207_106_7;
    /// Side classification offset (0.5 + 1/(2 sqrt(2)))
    pub const OBSTACLE_SIDE_OFFSET: f32 = 0.853_553_3;
    /// Vertical slack when deciding a hit came from above
    pub const OBSTACLE_TOP_SLACK: f32 = 0.6;

    /// Pickup radii
    pub const KEY_RADIUS: f32 = 1.8;
    pub const SPARK_RADIUS: f32 = 1.0;

    /// Burst animation
    pub const BURST_START_SPEED: f32 = 1.0;
    pub const BURST_DECAY: f32 = 0.07;
    pub const BURST_MIN_SPEED: f32 = 0.01;

    /// Shots per level load
    pub const SHOTS_PER_LEVEL: u32 = 20;

    /// Where level 0 parks the key and exit (off the board)
    pub const OFF_BOARD: Vec2 = Vec2::new(-5.0, -5.0);
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert a world position into the anchor-relative flight frame
#[inline]
pub fn to_flight_frame(world: Vec2) -> Vec2 {
    world - consts::AIM_ANCHOR
}

/// Convert a flight-frame position back into world space
#[inline]
pub fn to_world(relative: Vec2) -> Vec2 {
    relative + consts::AIM_ANCHOR
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f32::consts::PI;

    #[test]
    fn test_polar_to_cartesian() {
        let p = polar_to_cartesian(6.0, 0.0);
        assert!((p.x - 6.0).abs() < 1e-6);
        assert!(p.y.abs() < 1e-6);
    }

    #[test]
    fn test_flight_frame_roundtrip_anchor() {
        assert_eq!(to_flight_frame(consts::AIM_ANCHOR), Vec2::ZERO);
        assert_eq!(to_world(Vec2::ZERO), consts::AIM_ANCHOR);
    }

    proptest! {
        #[test]
        fn normalized_angle_in_range(angle in -100.0f32..100.0) {
            let a = normalize_angle(angle);
            prop_assert!(a >= -PI && a < PI);
            // Same direction after normalization
            prop_assert!((a.cos() - angle.cos()).abs() < 1e-3);
            prop_assert!((a.sin() - angle.sin()).abs() < 1e-3);
        }
    }
}
