//! Render contract
//!
//! Everything an external renderer needs to draw one frame. Built fresh at the
//! end of every tick and serialized to JSON for the browser.

use glam::Vec2;
use serde::Serialize;

use super::entity::{Entity, EntityId};
use super::paint::PaintSelector;
use super::tile::TileGrid;
use super::weapon::Loadout;

/// Drawing descriptor of an entity
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum RenderShape {
    Circle {
        color: &'static str,
        /// `(health, max_health)` for guards
        #[serde(skip_serializing_if = "Option::is_none")]
        health: Option<(u32, u32)>,
    },
    Door {
        color: &'static str,
        vertical: bool,
        open: f32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntitySprite {
    pub id: EntityId,
    pub pos: Vec2,
    pub size: Vec2,
    #[serde(flatten)]
    pub shape: RenderShape,
}

impl From<&Entity> for EntitySprite {
    fn from(entity: &Entity) -> Self {
        Self {
            id: entity.id,
            pos: entity.pos,
            size: entity.size,
            shape: entity.render_shape(),
        }
    }
}

/// One row of the weapon HUD
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeaponHud {
    pub name: String,
    pub magazine: u32,
    pub reserve: u32,
    pub reloading: bool,
    pub selected: bool,
}

impl WeaponHud {
    pub fn from_loadout(loadout: &Loadout) -> Vec<Self> {
        loadout
            .weapons
            .iter()
            .enumerate()
            .map(|(i, w)| Self {
                name: w.name.clone(),
                magazine: w.magazine,
                reserve: w.reserve,
                reloading: w.reloading,
                selected: i == loadout.selected,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderFrame {
    /// Index of the live level
    pub level: usize,
    pub level_name: String,
    pub tiles: TileGrid,
    /// Player center
    pub player: Vec2,
    pub entities: Vec<EntitySprite>,
    pub weapons: Vec<WeaponHud>,
    pub selected_weapon: usize,
    pub paint: PaintSelector,
    /// Closed polygons: guard center followed by its ray endpoints
    pub vision_cones: Vec<Vec<Vec2>>,
}

impl RenderFrame {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::door::Door;
    use crate::sim::entity::EntityKind;
    use crate::sim::paint::PaintColor;

    #[test]
    fn test_sprite_serializes_flat_shape() {
        let entity = Entity {
            id: EntityId(7),
            pos: Vec2::new(60.0, 120.0),
            size: Vec2::splat(60.0),
            kind: EntityKind::Door(Door::new("door".into(), PaintColor::Red, true)),
        };
        let json = serde_json::to_value(EntitySprite::from(&entity)).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["shape"], "door");
        assert_eq!(json["color"], "#a00");
        assert_eq!(json["vertical"], true);
        assert_eq!(json["pos"], serde_json::json!([60.0, 120.0]));
    }

    #[test]
    fn test_hud_marks_selected_weapon() {
        let mut loadout = Loadout::default();
        loadout.select(1);
        let hud = WeaponHud::from_loadout(&loadout);
        assert_eq!(hud.len(), 3);
        assert_eq!(hud[1].name, "Shotgun");
        assert!(hud[1].selected);
        assert!(!hud[0].selected && !hud[2].selected);
        assert_eq!((hud[0].magazine, hud[0].reserve), (30, 240));
    }
}
