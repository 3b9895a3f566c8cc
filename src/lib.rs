//! Paintball - a top-down paintball shooter
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (collision, vision, entities, level scripts)
//! - `persistence`: Typed key/value storage
//! - `platform`: Logging, input mapping and the browser bindings
//! - `settings`: Player preferences

pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;

pub use settings::Settings;
pub use sim::{RenderFrame, Simulation, TickInput};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Side length of one tile in world units
    pub const SCALE: f32 = 60.0;
    /// Half extent of the player's square hitbox
    pub const PLAYER_HALF_EXTENT: f32 = SCALE / 2.5;

    /// Player movement
    pub const PLAYER_SPEED: f32 = 4.0;
    pub const PLAYER_ACCEL: f32 = 0.3;

    /// Enemy defaults
    pub const ENEMY_SIZE: f32 = SCALE / 1.25;
    pub const ENEMY_SPEED: f32 = 2.0;
    /// Patrol turn rate (degrees per frame)
    pub const ENEMY_TURN_DEG: f32 = 1.5;
    pub const ENEMY_VISION_DISTANCE: f32 = 200.0;

    /// Door animation step per frame
    pub const DOOR_STEP: f32 = 0.05;

    /// Bullets
    pub const BULLET_SIZE: f32 = 5.0;
    pub const BULLET_SPEED: f32 = 8.0;

    /// Raycast defaults
    pub const RAY_STEP: f32 = 23.0;
    pub const RAY_MAX_DISTANCE: f32 = 100.0;
    /// Angle between neighbouring rays of a vision fan (degrees)
    pub const DISH_SPACING_DEG: f32 = 5.0;
    /// Rays on each side of the center ray
    pub const DISH_HALF_RAYS: usize = 10;

    /// Weapons
    pub const RELOAD_MS: f64 = 1000.0;
    pub const SPREAD_DEG: f32 = 5.0;

    /// Default frame time when the driver does not report one
    pub const FRAME_MS: f64 = 1000.0 / 60.0;
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

/// Angle of the vector pointing from `from` to `to`
#[inline]
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    (to.y - from.y).atan2(to.x - from.x)
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (a - b).length()
}

/// Unit vector for an angle in radians
#[inline]
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_normalize_angle_wraps() {
        assert!((normalize_angle(2.5 * PI) - 0.5 * PI).abs() < 1e-5);
        assert!((normalize_angle(-2.5 * PI) + 0.5 * PI).abs() < 1e-5);

        // 3π lands on the seam; either end is the same direction
        let seam = normalize_angle(3.0 * PI);
        assert!((-PI..=PI).contains(&seam));
        assert!((seam.abs() - PI).abs() < 1e-5);
        assert!((normalize_angle(-PI / 2.0) + PI / 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_angle_between_points() {
        let a = angle_between(Vec2::ZERO, Vec2::new(0.0, 10.0));
        assert!((a - PI / 2.0).abs() < 1e-6);
        assert_eq!(distance(Vec2::ZERO, Vec2::new(3.0, 4.0)), 5.0);
    }
}
