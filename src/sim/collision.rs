//! Point-in-box collision against the player, the tile grid and entities
//!
//! A query is a handful of points (the player's hitbox corners, a bullet tip,
//! a ray sample). The resolver reports at most one hit, checking in order:
//! the player hitbox, the tile grid (row-major), then entities (list order).

use glam::Vec2;

use super::entity::{Entity, EntityId};
use super::geometry::Rect;
use super::tile::{Tile, TileGrid};
use crate::consts::PLAYER_HALF_EXTENT;

/// Read-only view of everything a query can hit
#[derive(Debug, Clone, Copy)]
pub struct World<'a> {
    pub grid: &'a TileGrid,
    pub entities: &'a [Entity],
    /// Player center in world space
    pub player: Vec2,
}

impl World<'_> {
    pub fn player_hitbox(&self) -> Rect {
        Rect::centered(self.player, PLAYER_HALF_EXTENT)
    }
}

/// What a query ran into
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Hit {
    Player,
    Tile { col: usize, row: usize, tile: Tile },
    Entity(EntityId),
}

impl Hit {
    /// Tile code carried by the hit, if it was a tile
    pub fn tile(&self) -> Option<Tile> {
        match self {
            Hit::Tile { tile, .. } => Some(*tile),
            _ => None,
        }
    }
}

/// Flags for a collision query
#[derive(Debug, Clone, Copy)]
pub struct CollisionQuery<'p> {
    pub points: &'p [Vec2],
    /// Query comes from player movement (finish tiles trigger level advance)
    pub is_player: bool,
    /// Entity excluded from the entity pass
    pub ignore: Option<EntityId>,
    /// Test against the player hitbox first
    pub collides_with_player: bool,
}

impl<'p> CollisionQuery<'p> {
    pub fn new(points: &'p [Vec2]) -> Self {
        Self {
            points,
            is_player: false,
            ignore: None,
            collides_with_player: false,
        }
    }

    pub fn player_movement(mut self) -> Self {
        self.is_player = true;
        self
    }

    pub fn ignoring(mut self, id: Option<EntityId>) -> Self {
        self.ignore = id;
        self
    }

    pub fn against_player(mut self) -> Self {
        self.collides_with_player = true;
        self
    }
}

/// Result of a collision query
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CollisionOutcome {
    /// The single highest-priority hit, if any
    pub hit: Option<Hit>,
    /// A player query touched a finish tile
    pub reached_finish: bool,
}

impl CollisionOutcome {
    pub fn miss() -> Self {
        Self::default()
    }

    fn with_hit(self, hit: Hit) -> Self {
        Self {
            hit: Some(hit),
            ..self
        }
    }
}

/// Resolve a query against the world
pub fn resolve(world: &World<'_>, query: &CollisionQuery<'_>) -> CollisionOutcome {
    let mut outcome = CollisionOutcome::miss();

    if query.points.is_empty() {
        return outcome;
    }

    if query.collides_with_player && world.player_hitbox().contains_any(query.points) {
        return outcome.with_hit(Hit::Player);
    }

    for (col, row, tile) in world.grid.cells() {
        if !TileGrid::cell_rect(col, row).contains_any(query.points) {
            continue;
        }
        if tile.is_solid() {
            return outcome.with_hit(Hit::Tile { col, row, tile });
        }
        if tile == Tile::Finish && query.is_player {
            outcome.reached_finish = true;
        }
    }

    let blocking = world.entities.iter().find(|e| {
        Some(e.id) != query.ignore && e.rect().contains_any(query.points) && e.blocks()
    });
    if let Some(entity) = blocking {
        return outcome.with_hit(Hit::Entity(entity.id));
    }

    outcome
}
