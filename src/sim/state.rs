//! Live simulation state
//!
//! Everything that changes while a level is played lives here. Level templates
//! are cloned into it on selection and never mutated.

use glam::Vec2;

use super::bullet::Bullet;
use super::entity::{Entity, EntityId, EntityKind};
use super::level::Level;
use super::paint::PaintSelector;
use super::tile::TileGrid;
use super::weapon::{FirePattern, Loadout};
use crate::angle_between;
use crate::consts::BULLET_SIZE;

/// The player avatar
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Player {
    /// Center in world space
    pub pos: Vec2,
    pub vel: Vec2,
}

/// Complete mutable game state
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub level_index: usize,
    pub level_name: String,
    pub grid: TileGrid,
    /// Script lines, parsed afresh every frame
    pub behavior: Vec<String>,
    /// Live entities in update order
    pub entities: Vec<Entity>,
    pub player: Player,
    /// Carried across levels
    pub loadout: Loadout,
    pub paint: PaintSelector,
    /// Simulation clock (ms), advanced by `TickInput::dt_ms`
    pub clock_ms: f64,
    next_id: u32,
}

impl Default for SimulationState {
    fn default() -> Self {
        Self {
            level_index: 0,
            level_name: String::new(),
            grid: TileGrid::default(),
            behavior: Vec::new(),
            entities: Vec::new(),
            player: Player::default(),
            loadout: Loadout::default(),
            paint: PaintSelector::default(),
            clock_ms: 0.0,
            next_id: 1,
        }
    }
}

impl SimulationState {
    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Replace the map, script and entities with a fresh copy of `level` and
    /// put the player on its spawn tile
    pub fn load_level(&mut self, index: usize, level: &Level) {
        self.level_index = index;
        self.level_name = level.name.clone();
        self.grid = level.map.clone();
        self.behavior = level.behavior.clone();

        self.entities.clear();
        for spec in &level.entities {
            let id = self.next_entity_id();
            self.entities.push(spec.build(id));
        }

        self.player = Player {
            pos: level.spawn_point().unwrap_or_default(),
            vel: Vec2::ZERO,
        };

        log::info!(
            "Level {} \"{}\" loaded ({} entities)",
            index,
            level.name,
            self.entities.len()
        );
    }

    /// Spawn the pellets of one trigger pull, aimed from the player at `target`
    pub fn spawn_volley(&mut self, pattern: FirePattern, target: Vec2) {
        let aim = angle_between(self.player.pos, target);
        let color = self.paint.selected();
        for angle in pattern.angles(aim) {
            let id = self.next_entity_id();
            self.entities.push(Entity {
                id,
                pos: self.player.pos,
                size: Vec2::splat(BULLET_SIZE),
                kind: EntityKind::Bullet(Bullet::new(angle, color)),
            });
        }
    }

    /// Outline of every guard's last vision cast
    pub fn vision_cones(&self) -> Vec<Vec<Vec2>> {
        self.entities
            .iter()
            .filter_map(|e| {
                let enemy = e.as_enemy()?;
                if enemy.vision.is_empty() {
                    return None;
                }
                let mut polygon = Vec::with_capacity(enemy.vision.len() + 1);
                polygon.push(e.center());
                polygon.extend_from_slice(&enemy.vision);
                Some(polygon)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::builtin_levels;

    #[test]
    fn test_load_level_assigns_unique_ids() {
        let levels = builtin_levels().unwrap();
        let mut state = SimulationState::default();
        state.load_level(0, &levels[0]);
        state.load_level(0, &levels[0]);

        let ids: Vec<u32> = state.entities.iter().map(|e| e.id.0).collect();
        assert_eq!(ids, vec![4, 5, 6], "ids keep counting across reloads");
        assert_eq!(state.player.pos, Vec2::new(390.0, 270.0));
        assert_eq!(state.level_name, "Guard Post");
    }

    #[test]
    fn test_volley_spawns_at_player_center() {
        let mut state = SimulationState::default();
        state.player.pos = Vec2::new(100.0, 100.0);
        state.spawn_volley(
            FirePattern::Spread {
                count: 3,
                spacing_deg: 5.0,
            },
            Vec2::new(200.0, 100.0),
        );
        assert_eq!(state.entities.len(), 3);
        assert!(state.entities.iter().all(|e| e.pos == Vec2::new(100.0, 100.0)));
        assert!(state.entities.iter().all(|e| !e.blocks()));
    }
}
