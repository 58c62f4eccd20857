//! Projectile integration and collision response
//!
//! One point-approximated projectile against four walls and a list of unit
//! square obstacles. Obstacles are scanned in load order and only the first
//! one in reach is resolved each frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::WallBounds;
use crate::consts::*;
use crate::to_flight_frame;

/// Which face of an obstacle the projectile was resolved against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitSide {
    Above,
    Left,
    Right,
    Below,
}

/// Result of an obstacle check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstacleHit {
    /// Index of the obstacle in load order
    pub index: usize,
    pub side: HitSide,
}

/// One semi-implicit Euler step: gravity on y, drag on x, then move
#[inline]
pub fn integrate(pos: &mut Vec2, vel: &mut Vec2) {
    vel.y -= GRAVITY;
    vel.x -= vel.x * DRAG;
    *pos += *vel;
}

/// Clamp to the walls and reflect the offending velocity components.
/// Returns true if any wall was hit.
pub fn resolve_walls(pos: &mut Vec2, vel: &mut Vec2, bounds: &WallBounds) -> bool {
    let mut hit = false;
    if pos.x > bounds.max.x {
        vel.x = -WALL_RESTITUTION_X * vel.x;
        pos.x = bounds.max.x;
        hit = true;
    }
    if pos.x < bounds.min.x {
        vel.x = -WALL_RESTITUTION_X * vel.x;
        pos.x = bounds.min.x;
        hit = true;
    }
    if pos.y > bounds.max.y {
        vel.y = -WALL_RESTITUTION_Y * vel.y;
        pos.y = bounds.max.y;
        hit = true;
    }
    if pos.y < bounds.min.y {
        vel.y = -WALL_RESTITUTION_Y * vel.y;
        pos.y = bounds.min.y;
        hit = true;
    }
    hit
}

/// Decide which face of an obstacle (flight-frame center) a contact belongs to.
/// Order matters: above, then left, then right, else below.
pub fn classify_side(pos: Vec2, center: Vec2) -> HitSide {
    if pos.y > center.y + OBSTACLE_SIDE_OFFSET - OBSTACLE_TOP_SLACK {
        HitSide::Above
    } else if pos.x < center.x {
        HitSide::Left
    } else if pos.x > center.x + OBSTACLE_SIDE_OFFSET {
        HitSide::Right
    } else {
        HitSide::Below
    }
}

/// Resolve a contact with one obstacle (flight-frame center).
///
/// The reflected axis is scaled by the obstacle restitution; the snap side is
/// picked from the velocity sign before reflection, so a projectile moving
/// into the face gets pushed back out the way it came.
pub fn resolve_contact(pos: &mut Vec2, vel: &mut Vec2, center: Vec2, side: HitSide) {
    match side {
        HitSide::Above => {
            pos.y = if vel.y > 0.0 {
                center.y - OBSTACLE_REACH
            } else {
                center.y + OBSTACLE_REACH
            };
            vel.y = -OBSTACLE_RESTITUTION * vel.y;
        }
        HitSide::Left => {
            pos.x = if vel.x < 0.0 {
                center.x + OBSTACLE_REACH
            } else {
                center.x - OBSTACLE_REACH
            };
            vel.x = -OBSTACLE_RESTITUTION * vel.x;
        }
        HitSide::Right => {
            pos.x = if vel.x > 0.0 {
                center.x - OBSTACLE_REACH
            } else {
                center.x + OBSTACLE_REACH
            };
            vel.x = -OBSTACLE_RESTITUTION * vel.x;
        }
        HitSide::Below => {
            pos.y = if vel.y < 0.0 {
                center.y + OBSTACLE_REACH
            } else {
                center.y - OBSTACLE_REACH
            };
            vel.y = -OBSTACLE_RESTITUTION * vel.y;
        }
    }
}

/// Scan obstacles (world centers) in order and resolve the first one in reach
pub fn resolve_obstacles(pos: &mut Vec2, vel: &mut Vec2, obstacles: &[Vec2]) -> Option<ObstacleHit> {
    let (index, center) = obstacles
        .iter()
        .map(|&o| to_flight_frame(o))
        .enumerate()
        .find(|(_, center)| pos.distance(*center) < OBSTACLE_REACH)?;

    let side = classify_side(*pos, center);
    resolve_contact(pos, vel, center, side);
    Some(ObstacleHit { index, side })
}
