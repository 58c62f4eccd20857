//! Aim controller
//!
//! Angle and launch power, driven either by a mouse drag (absolute) or by
//! held keys (rate per frame).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::tick::TickInput;
use crate::consts::*;
use crate::{normalize_angle, polar_to_cartesian};

/// Current aim: launch angle around the anchor and launch power
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AimState {
    /// Launch angle (radians, normalized to [-π, π))
    pub angle: f32,
    /// Launch speed in world units per frame
    pub power: f32,
}

impl Default for AimState {
    fn default() -> Self {
        Self {
            angle: 0.0,
            power: POWER_START,
        }
    }
}

impl AimState {
    /// Apply one frame of aim input
    pub fn update(&mut self, input: &TickInput) {
        if input.mouse_dragging {
            let to_cursor = input.cursor - AIM_ANCHOR;
            self.angle = to_cursor.y.atan2(to_cursor.x);
            self.power = cursor_power(input.cursor);
        }
        // Held keys still apply on top of a drag
        self.angle = normalize_angle(self.angle + AIM_ANGLE_RATE * input.angle_dir.signum() as f32);
        self.power += AIM_POWER_RATE * input.power_dir.signum() as f32;
        self.power = self.power.clamp(POWER_MIN, POWER_MAX);
    }

    /// Unit launch direction
    #[inline]
    pub fn direction(&self) -> Vec2 {
        polar_to_cartesian(1.0, self.angle)
    }

    /// Launch velocity for the current aim
    #[inline]
    pub fn launch_velocity(&self) -> Vec2 {
        self.direction() * self.power
    }

    /// Projectile position (flight frame) while orbiting the anchor
    #[inline]
    pub fn orbit_position(&self) -> Vec2 {
        polar_to_cartesian(AIM_ORBIT_RADIUS, self.angle)
    }

    /// Power bar length in segments (HUD only)
    pub fn bar_len(&self) -> i32 {
        bar_len(self.power)
    }
}

/// Map a cursor position (world units) to launch power, unclamped
pub fn cursor_power(cursor: Vec2) -> f32 {
    10.0 * ((cursor.x / WORLD_WIDTH) / 6.0 + (cursor.y / WORLD_HEIGHT) / 5.5)
}

/// Power bar segments for a given power
pub fn bar_len(power: f32) -> i32 {
    ((power * 10.0 - 10.0) as i32).clamp(BAR_LEN_MIN, BAR_LEN_MAX)
}
