//! Paint pellets fired by the player

use glam::Vec2;

use super::collision::{CollisionQuery, Hit, resolve};
use super::entity::{EntityId, EntityUpdate, FrameContext};
use super::paint::PaintColor;
use crate::consts::BULLET_SPEED;
use crate::direction;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bullet {
    /// Travel direction (radians)
    pub angle: f32,
    /// Color selected when it was fired; drives rendering only
    pub color: PaintColor,
}

impl Bullet {
    pub fn new(angle: f32, color: PaintColor) -> Self {
        Self { angle, color }
    }

    /// Move one step and resolve whatever the pellet lands on.
    ///
    /// Wool is repainted with the color selected *now*, not the one the
    /// pellet was fired with.
    pub(crate) fn frame(
        &mut self,
        id: EntityId,
        pos: &mut Vec2,
        ctx: &mut FrameContext<'_>,
    ) -> EntityUpdate {
        *pos += direction(self.angle) * BULLET_SPEED;

        let points = [*pos];
        let hit = resolve(&ctx.world(), &CollisionQuery::new(&points).ignoring(Some(id))).hit;

        match hit {
            None => EntityUpdate::Unchanged,
            Some(Hit::Tile { col, row, tile }) => {
                if tile.is_wool() {
                    ctx.grid.set(col as i64, row as i64, ctx.paint.wool());
                }
                EntityUpdate::Despawn
            }
            Some(Hit::Entity(target)) => EntityUpdate::Strike(target),
            Some(Hit::Player) => EntityUpdate::Despawn,
        }
    }
}
