//! Patrolling guards with a cone of vision
//!
//! Each frame a guard casts its vision fan. Seeing the player turns it to face
//! them and halts its patrol; otherwise it turns toward the next waypoint and
//! walks there, cycling through its path.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{EntityId, FrameContext};
use super::raycast::{RayParams, VisionRay, dishcast};
use crate::consts::{ENEMY_SPEED, ENEMY_TURN_DEG, ENEMY_VISION_DISTANCE, RAY_STEP};
use crate::{angle_between, direction, normalize_angle};

/// Patrol state, recomputed from the vision cast every frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EnemyState {
    #[default]
    Patrolling,
    Detected,
}

/// Where the guard is along its path
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatrolCursor {
    pub index: usize,
    pub last: Vec2,
    pub next: Vec2,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub health: u32,
    pub max_health: u32,
    /// Facing angle (radians)
    pub angle: f32,
    /// Waypoints (top-left positions), walked cyclically
    pub path: Vec<Vec2>,
    pub cursor: PatrolCursor,
    pub state: EnemyState,
    /// Ray endpoints of the last vision cast, for the overlay polygon
    pub vision: Vec<Vec2>,
}

impl Enemy {
    pub const COLOR: &'static str = "#b33";

    /// `path` should start at the guard's spawn position; an empty or
    /// single-point path leaves the guard standing still
    pub fn new(health: u32, angle: f32, path: Vec<Vec2>) -> Self {
        let health = health.max(1);
        let first = path.first().copied().unwrap_or_default();
        let second = path.get(1).copied().unwrap_or(first);

        Self {
            health,
            max_health: health,
            angle,
            path,
            cursor: PatrolCursor {
                index: 0,
                last: first,
                next: second,
            },
            state: EnemyState::Patrolling,
            vision: Vec::new(),
        }
    }

    /// Take a hit; true once health runs out
    pub fn shot(&mut self) -> bool {
        self.health = self.health.saturating_sub(1);
        self.health == 0
    }

    pub fn is_detected(&self) -> bool {
        self.state == EnemyState::Detected
    }

    pub(crate) fn frame(
        &mut self,
        id: EntityId,
        pos: &mut Vec2,
        size: Vec2,
        ctx: &FrameContext<'_>,
    ) {
        let center = *pos + size / 2.0;
        let world = ctx.world();
        let params = RayParams {
            max_distance: ENEMY_VISION_DISTANCE,
            step: RAY_STEP,
            ignore: Some(id),
        };
        let rays: Vec<VisionRay> = dishcast(&world, center, self.angle, params).collect();
        self.vision = rays.iter().map(|r| r.end).collect();

        if rays.iter().any(|r| r.target.is_player()) {
            if self.state != EnemyState::Detected {
                log::debug!("Enemy {:?} spotted the player", id);
            }
            self.state = EnemyState::Detected;
            self.angle = angle_between(center, ctx.player);
            return;
        }

        self.state = EnemyState::Patrolling;
        self.patrol(pos);
    }

    fn patrol(&mut self, pos: &mut Vec2) {
        let PatrolCursor { last, next, .. } = self.cursor;
        if last == next {
            return;
        }

        if *pos == next {
            self.advance();
            return;
        }

        let target = angle_between(last, next);
        if !facing(self.angle, target) {
            let turn = if target < 0.0 { -ENEMY_TURN_DEG } else { ENEMY_TURN_DEG };
            self.angle = normalize_angle(self.angle + turn.to_radians());
            if facing(self.angle, target) {
                self.angle = target;
            }
            return;
        }

        self.angle = target;
        let dir = direction(target);
        if (next - *pos).dot(dir) <= ENEMY_SPEED {
            *pos = next;
        } else {
            *pos += dir * ENEMY_SPEED;
        }
    }

    fn advance(&mut self) {
        if self.path.is_empty() {
            return;
        }
        let mut index = self.cursor.index + 1;
        if index >= self.path.len() {
            index = 0;
        }
        self.cursor = PatrolCursor {
            index,
            last: self.path[index],
            next: self.path.get(index + 1).copied().unwrap_or(self.path[0]),
        };
    }
}

/// Facing counts as aligned within half a turn step
fn facing(angle: f32, target: f32) -> bool {
    normalize_angle(angle - target).abs() <= (ENEMY_TURN_DEG / 2.0).to_radians()
}
