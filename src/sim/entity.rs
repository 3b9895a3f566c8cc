//! Entities and event dispatch
//!
//! Every entity shares a box (position + size) and an id; the variant
//! decides how it reacts to the three events the simulation emits.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bullet::Bullet;
use super::collision::World;
use super::door::Door;
use super::enemy::Enemy;
use super::frame::RenderShape;
use super::geometry::Rect;
use super::paint::PaintColor;
use super::tile::TileGrid;

/// Unique id within the live entity list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Per-variant state
#[derive(Debug, Clone, PartialEq)]
pub enum EntityKind {
    Enemy(Enemy),
    Door(Door),
    Bullet(Bullet),
}

impl EntityKind {
    /// Whether this entity stops movement, bullets and rays
    pub fn blocks(&self) -> bool {
        match self {
            EntityKind::Enemy(_) => true,
            EntityKind::Door(door) => door.blocks(),
            EntityKind::Bullet(_) => false,
        }
    }
}

/// A simulated object
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    /// Top-left corner in world space
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: EntityKind,
}

/// Mutable view handed to frame handlers
pub struct FrameContext<'w> {
    pub grid: &'w mut TileGrid,
    /// Entity list as it stood when the frame began
    pub entities: &'w [Entity],
    pub player: Vec2,
    /// Currently selected paint color
    pub paint: PaintColor,
}

impl FrameContext<'_> {
    pub fn world(&self) -> World<'_> {
        World {
            grid: self.grid,
            entities: self.entities,
            player: self.player,
        }
    }
}

/// Events an entity can react to
pub enum EntityEvent<'c, 'w> {
    Frame(&'c mut FrameContext<'w>),
    Shot,
    Collide,
}

/// What the dispatcher should do after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityUpdate {
    Unchanged,
    /// Answer to `Collide`
    Blocking(bool),
    /// Answer to `Shot`; true when the entity must be removed
    Dead(bool),
    /// Remove this entity
    Despawn,
    /// Remove this entity and shoot the target
    Strike(EntityId),
}

impl Entity {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.rect().center()
    }

    pub fn blocks(&self) -> bool {
        self.kind.blocks()
    }

    pub fn as_door_mut(&mut self) -> Option<&mut Door> {
        match &mut self.kind {
            EntityKind::Door(door) => Some(door),
            _ => None,
        }
    }

    pub fn as_enemy(&self) -> Option<&Enemy> {
        match &self.kind {
            EntityKind::Enemy(enemy) => Some(enemy),
            _ => None,
        }
    }

    /// Dispatch an event to the variant's handler
    pub fn handle(&mut self, event: EntityEvent<'_, '_>) -> EntityUpdate {
        let Entity { id, pos, size, kind } = self;

        match (kind, event) {
            (kind, EntityEvent::Collide) => EntityUpdate::Blocking(kind.blocks()),
            (EntityKind::Enemy(enemy), EntityEvent::Frame(ctx)) => {
                enemy.frame(*id, pos, *size, ctx);
                EntityUpdate::Unchanged
            }
            (EntityKind::Enemy(enemy), EntityEvent::Shot) => EntityUpdate::Dead(enemy.shot()),
            (EntityKind::Door(door), EntityEvent::Frame(_)) => {
                door.frame();
                EntityUpdate::Unchanged
            }
            (EntityKind::Bullet(bullet), EntityEvent::Frame(ctx)) => bullet.frame(*id, pos, ctx),
            (EntityKind::Door(_) | EntityKind::Bullet(_), EntityEvent::Shot) => {
                EntityUpdate::Dead(false)
            }
        }
    }

    /// How the renderer should draw this entity
    pub fn render_shape(&self) -> RenderShape {
        match &self.kind {
            EntityKind::Enemy(enemy) => RenderShape::Circle {
                color: Enemy::COLOR,
                health: Some((enemy.health, enemy.max_health)),
            },
            EntityKind::Door(door) => RenderShape::Door {
                color: door.color.css(),
                vertical: door.vertical,
                open: door.open,
            },
            EntityKind::Bullet(bullet) => RenderShape::Circle {
                color: bullet.color.css(),
                health: None,
            },
        }
    }
}
