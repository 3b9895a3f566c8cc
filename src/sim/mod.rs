//! Frame-driven simulation module
//!
//! All gameplay logic lives here:
//! - Frame clock driven by the caller (`TickInput::dt_ms`)
//! - Stable iteration order (entity list order)
//! - No rendering or platform dependencies

pub mod behavior;
pub mod bullet;
pub mod collision;
pub mod door;
pub mod enemy;
pub mod entity;
pub mod frame;
pub mod geometry;
pub mod level;
pub mod paint;
pub mod raycast;
pub mod state;
pub mod tick;
pub mod tile;
pub mod weapon;

pub use behavior::{BehaviorError, BehaviorReport, MAX_BEHAVIOR_STEPS, run_frame};
pub use collision::{CollisionOutcome, CollisionQuery, Hit, World, resolve};
pub use entity::{Entity, EntityEvent, EntityId, EntityKind, EntityUpdate};
pub use frame::{EntitySprite, RenderFrame, RenderShape, WeaponHud};
pub use level::{EntitySpec, Level, LevelError, builtin_levels, load_levels};
pub use paint::{PaintColor, PaintSelector};
pub use raycast::{RayParams, RayTarget, VisionRay, dishcast, raycast};
pub use state::{Player, SimulationState};
pub use tick::{Simulation, TickInput};
pub use tile::{Tile, TileError, TileGrid};
pub use weapon::{FirePattern, Loadout, Weapon};
