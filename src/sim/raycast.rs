//! Stepped raycasts and the fan-shaped vision cone built from them

use glam::Vec2;

use super::collision::{CollisionQuery, Hit, World, resolve};
use super::entity::EntityId;
use crate::consts::{DISH_HALF_RAYS, DISH_SPACING_DEG, RAY_MAX_DISTANCE, RAY_STEP};
use crate::{direction, distance};

/// What a ray stopped on
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RayTarget {
    Hit(Hit),
    /// Travelled past the maximum distance
    MaxDistance,
}

impl RayTarget {
    pub fn is_player(&self) -> bool {
        matches!(self, RayTarget::Hit(Hit::Player))
    }
}

/// Result of one raycast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisionRay {
    pub end: Vec2,
    pub target: RayTarget,
}

/// Ray parameters
#[derive(Debug, Clone, Copy)]
pub struct RayParams {
    pub max_distance: f32,
    pub step: f32,
    pub ignore: Option<EntityId>,
}

impl Default for RayParams {
    fn default() -> Self {
        Self {
            max_distance: RAY_MAX_DISTANCE,
            step: RAY_STEP,
            ignore: None,
        }
    }
}

/// March from `origin` along `angle` until something is hit or the ray
/// passes `max_distance`. A hit on the step that crosses the limit still
/// reports `MaxDistance`.
pub fn raycast(world: &World<'_>, origin: Vec2, angle: f32, params: RayParams) -> VisionRay {
    let step = direction(angle) * params.step.max(f32::EPSILON);
    let mut pos = origin;

    loop {
        pos += step;

        let points = [pos];
        let query = CollisionQuery::new(&points)
            .ignoring(params.ignore)
            .against_player();
        let hit = resolve(world, &query).hit;

        if distance(origin, pos) > params.max_distance {
            return VisionRay {
                end: pos,
                target: RayTarget::MaxDistance,
            };
        }
        if let Some(hit) = hit {
            return VisionRay {
                end: pos,
                target: RayTarget::Hit(hit),
            };
        }
    }
}

/// Lazily cast a fan of `2 * DISH_HALF_RAYS + 1` rays centered on `angle`,
/// ordered from the most counter-clockwise ray to the most clockwise one.
/// Every call starts a fresh cast.
pub fn dishcast<'a>(
    world: &'a World<'a>,
    origin: Vec2,
    angle: f32,
    params: RayParams,
) -> impl Iterator<Item = VisionRay> + 'a {
    let half = DISH_HALF_RAYS as i32;
    (-half..=half).map(move |i| {
        let offset = (DISH_SPACING_DEG * i as f32).to_radians();
        raycast(world, origin, angle + offset, params)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tile::{Tile, TileGrid};

    fn open_world(grid: &TileGrid) -> World<'_> {
        World {
            grid,
            entities: &[],
            player: Vec2::new(-1000.0, -1000.0),
        }
    }

    #[test]
    fn test_raycast_without_obstacles_hits_max_distance() {
        let grid = TileGrid::default();
        let world = open_world(&grid);
        let ray = raycast(&world, Vec2::ZERO, 0.0, RayParams::default());

        assert_eq!(ray.target, RayTarget::MaxDistance);
        // 23 * 5 = 115 is the first step beyond 100
        assert!((ray.end.x - 115.0).abs() < 1e-3);
        assert!(ray.end.y.abs() < 1e-3);
    }

    #[test]
    fn test_raycast_stops_on_wall() {
        let grid = TileGrid::from_codes(&[vec![0, 0, 1]]).unwrap();
        let world = open_world(&grid);
        let params = RayParams {
            max_distance: 500.0,
            ..Default::default()
        };
        let ray = raycast(&world, Vec2::new(30.0, 30.0), 0.0, params);
        match ray.target {
            RayTarget::Hit(hit) => assert_eq!(hit.tile(), Some(Tile::Wall)),
            other => panic!("expected wall hit, got {other:?}"),
        }
        assert!(ray.end.x >= 120.0);
    }

    #[test]
    fn test_raycast_sees_player() {
        let grid = TileGrid::default();
        let world = World {
            grid: &grid,
            entities: &[],
            player: Vec2::new(60.0, 0.0),
        };
        let ray = raycast(&world, Vec2::ZERO, 0.0, RayParams::default());
        assert!(ray.target.is_player());
    }

    #[test]
    fn test_dishcast_has_21_rays_centered_on_angle() {
        let grid = TileGrid::default();
        let world = open_world(&grid);
        let rays: Vec<_> = dishcast(&world, Vec2::ZERO, 0.0, RayParams::default()).collect();
        assert_eq!(rays.len(), 21);

        let center = rays[10];
        assert!(center.end.y.abs() < 1e-3);
        assert!(rays[0].end.y < 0.0);
        assert!(rays[20].end.y > 0.0);
        assert!((rays[0].end.y + rays[20].end.y).abs() < 1e-3);
    }
}
