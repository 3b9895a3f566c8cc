//! Level definitions and loading
//!
//! Levels are plain JSON (see `assets/levels.json`). Positions in level files
//! are in tiles; everything is converted to world units when a level is
//! instantiated.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::door::Door;
use super::enemy::Enemy;
use super::entity::{Entity, EntityId, EntityKind};
use super::paint::PaintColor;
use super::tile::{Tile, TileGrid};
use crate::consts::{ENEMY_SIZE, SCALE};

const BUILTIN_LEVELS: &str = include_str!("../../assets/levels.json");

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("bad waypoint \"{0}\" (expected \"<col> <row>\")")]
    BadWaypoint(String),
    #[error("level \"{0}\" has no spawn tile")]
    NoSpawn(String),
    #[error("no levels defined")]
    Empty,
    #[error("level data: {0}")]
    Json(#[from] serde_json::Error),
}

/// A patrol waypoint written as `"<col> <row>"`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Waypoint {
    pub col: f32,
    pub row: f32,
}

impl TryFrom<String> for Waypoint {
    type Error = LevelError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        let mut parts = text.split_whitespace().map(str::parse::<f32>);
        match (parts.next(), parts.next(), parts.next()) {
            (Some(Ok(col)), Some(Ok(row)), None) => Ok(Self { col, row }),
            _ => Err(LevelError::BadWaypoint(text)),
        }
    }
}

impl From<Waypoint> for String {
    fn from(w: Waypoint) -> Self {
        format!("{} {}", w.col, w.row)
    }
}

impl Waypoint {
    fn world(self) -> Vec2 {
        Vec2::new(self.col * SCALE, self.row * SCALE)
    }
}

fn default_health() -> u32 {
    1
}

/// Initial entity of a level, in tile units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum EntitySpec {
    Enemy {
        x: f32,
        y: f32,
        #[serde(default = "default_health")]
        health: u32,
        /// Initial facing (degrees)
        #[serde(default)]
        rotate: f32,
        #[serde(default)]
        path: Vec<Waypoint>,
    },
    Door {
        x: f32,
        y: f32,
        #[serde(default)]
        color: PaintColor,
        /// Tag used by `open`/`close` in scripts
        id: String,
        #[serde(default)]
        vertical: bool,
        #[serde(default)]
        open: f32,
    },
}

impl EntitySpec {
    /// Build the live entity
    pub fn build(&self, id: EntityId) -> Entity {
        match self {
            EntitySpec::Enemy {
                x,
                y,
                health,
                rotate,
                path,
            } => {
                let pos = Vec2::new(x * SCALE, y * SCALE);
                let mut path: Vec<Vec2> = path.iter().map(|w| w.world()).collect();
                if path.is_empty() {
                    path.push(pos);
                }
                Entity {
                    id,
                    pos,
                    size: Vec2::splat(ENEMY_SIZE),
                    kind: EntityKind::Enemy(Enemy::new(*health, rotate.to_radians(), path)),
                }
            }
            EntitySpec::Door {
                x,
                y,
                color,
                id: tag,
                vertical,
                open,
            } => {
                let mut door = Door::new(tag.clone(), *color, *vertical);
                door.open = open.clamp(0.0, 1.0);
                Entity {
                    id,
                    pos: Vec2::new(x * SCALE, y * SCALE),
                    size: Vec2::splat(SCALE),
                    kind: EntityKind::Door(door),
                }
            }
        }
    }
}

/// Immutable level template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub behavior: Vec<String>,
    #[serde(default)]
    pub map: TileGrid,
    #[serde(default)]
    pub entities: Vec<EntitySpec>,
}

impl Level {
    /// World-space center of the first spawn tile (row-major)
    pub fn spawn_point(&self) -> Option<Vec2> {
        self.map.find(Tile::Spawn).map(|(col, row)| {
            Vec2::new(
                col as f32 * SCALE + SCALE / 2.0,
                row as f32 * SCALE + SCALE / 2.0,
            )
        })
    }
}

/// Decode and validate a JSON level list
pub fn load_levels(json: &str) -> Result<Vec<Level>, LevelError> {
    let levels: Vec<Level> = serde_json::from_str(json)?;
    if levels.is_empty() {
        return Err(LevelError::Empty);
    }
    if let Some(level) = levels.iter().find(|l| l.spawn_point().is_none()) {
        return Err(LevelError::NoSpawn(level.name.clone()));
    }
    log::info!("Loaded {} levels", levels.len());
    Ok(levels)
}

/// Levels shipped with the game
pub fn builtin_levels() -> Result<Vec<Level>, LevelError> {
    load_levels(BUILTIN_LEVELS)
}
