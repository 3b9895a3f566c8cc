//! Per-frame simulation tick
//!
//! Order within a tick: timers, discrete input events, player movement, entity
//! frames, level script, paint wheel, render frame.

use std::collections::HashSet;

use glam::Vec2;

use super::behavior;
use super::collision::{CollisionQuery, World, resolve};
use super::entity::{EntityEvent, EntityUpdate, FrameContext};
use super::frame::{EntitySprite, RenderFrame, WeaponHud};
use super::geometry::Rect;
use super::level::{Level, LevelError, builtin_levels};
use super::state::{Player, SimulationState};
use crate::consts::{FRAME_MS, PLAYER_ACCEL, PLAYER_HALF_EXTENT, PLAYER_SPEED};

/// Input snapshot for a single tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Pointer position in world space
    pub mouse: Vec2,
    /// Weapon slot chosen this tick
    pub select_weapon: Option<usize>,
    pub reload: bool,
    /// Restore the current level from its template
    pub reset_map: bool,
    pub fire_down: bool,
    pub fire_up: bool,
    /// Turn the paint wheel
    pub secondary_down: bool,
    /// Elapsed time since the previous tick (ms)
    pub dt_ms: f64,
}

impl Default for TickInput {
    fn default() -> Self {
        Self {
            up: false,
            down: false,
            left: false,
            right: false,
            mouse: Vec2::ZERO,
            select_weapon: None,
            reload: false,
            reset_map: false,
            fire_down: false,
            fire_up: false,
            secondary_down: false,
            dt_ms: FRAME_MS,
        }
    }
}

/// Level templates plus the live state built from them
#[derive(Debug, Clone)]
pub struct Simulation {
    levels: Vec<Level>,
    state: SimulationState,
}

impl Simulation {
    /// Start on the first level
    pub fn new(levels: Vec<Level>) -> Result<Self, LevelError> {
        if levels.is_empty() {
            return Err(LevelError::Empty);
        }
        let mut sim = Self {
            levels,
            state: SimulationState::default(),
        };
        sim.select_level(0);
        Ok(sim)
    }

    pub fn with_builtin_levels() -> Result<Self, LevelError> {
        Self::new(builtin_levels()?)
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn player(&self) -> &Player {
        &self.state.player
    }

    /// Load level `index` from its template; out-of-range indices are ignored
    pub fn select_level(&mut self, index: usize) -> bool {
        match self.levels.get(index) {
            Some(level) => {
                self.state.load_level(index, level);
                true
            }
            None => {
                log::warn!("No level {} (have {})", index, self.levels.len());
                false
            }
        }
    }

    /// Restore the current level
    pub fn reset_level(&mut self) {
        self.select_level(self.state.level_index);
    }

    /// Move on to the next level, wrapping to the first after the last
    pub fn advance_level(&mut self) {
        let next = (self.state.level_index + 1) % self.levels.len();
        log::info!("Level {} finished", self.state.level_index);
        self.select_level(next);
    }

    /// Advance the game by one frame
    pub fn tick(&mut self, input: &TickInput) -> RenderFrame {
        self.state.clock_ms += input.dt_ms.max(0.0);
        let now = self.state.clock_ms;

        // Deferred timers: reload completion and automatic fire
        for pattern in self.state.loadout.update(now) {
            self.state.spawn_volley(pattern, input.mouse);
        }

        if input.reset_map {
            self.reset_level();
        }
        self.apply_events(input, now);

        if move_player(&mut self.state, input) {
            self.advance_level();
        }

        update_entities(&mut self.state);

        let state = &mut self.state;
        behavior::run_frame(&state.behavior, &mut state.grid, &mut state.entities);

        state.paint.update();

        self.frame()
    }

    fn apply_events(&mut self, input: &TickInput, now: f64) {
        let state = &mut self.state;

        if let Some(slot) = input.select_weapon {
            state.loadout.select(slot);
        }
        if input.reload {
            state.loadout.reload(now);
        }
        if input.fire_down {
            if let Some(pattern) = state.loadout.shoot(now) {
                state.spawn_volley(pattern, input.mouse);
            }
        }
        if input.fire_up {
            state.loadout.release();
        }
        if input.secondary_down {
            state.paint.press();
        }
    }

    /// Snapshot of the live state for the renderer
    pub fn frame(&self) -> RenderFrame {
        let state = &self.state;
        RenderFrame {
            level: state.level_index,
            level_name: state.level_name.clone(),
            tiles: state.grid.clone(),
            player: state.player.pos,
            entities: state.entities.iter().map(EntitySprite::from).collect(),
            weapons: WeaponHud::from_loadout(&state.loadout),
            selected_weapon: state.loadout.selected,
            paint: state.paint.clone(),
            vision_cones: state.vision_cones(),
        }
    }
}

/// New velocity along one axis given the keys pulling each way
fn axis_velocity(vel: f32, neg: bool, pos: bool) -> f32 {
    let mut v = vel;
    v += if neg { -PLAYER_ACCEL } else { PLAYER_ACCEL };
    v += if pos { PLAYER_ACCEL } else { -PLAYER_ACCEL };
    v = v.clamp(-PLAYER_SPEED, PLAYER_SPEED);

    if !neg && !pos && v != 0.0 {
        v = if v > 0.0 {
            (v - PLAYER_ACCEL).max(0.0)
        } else {
            (v + PLAYER_ACCEL).min(0.0)
        };
    }

    (v * 10.0).round() / 10.0
}

/// Move the player one axis at a time, undoing a step that collides.
/// Returns true when a finish tile was touched.
fn move_player(state: &mut SimulationState, input: &TickInput) -> bool {
    let vel = Vec2::new(
        axis_velocity(state.player.vel.x, input.left, input.right),
        axis_velocity(state.player.vel.y, input.up, input.down),
    );
    state.player.vel = vel;

    let mut reached_finish = false;
    for step in [Vec2::new(vel.x, 0.0), Vec2::new(0.0, vel.y)] {
        let from = state.player.pos;
        let to = (from + step).round();
        let corners = Rect::centered(to, PLAYER_HALF_EXTENT).corners();

        let world = World {
            grid: &state.grid,
            entities: &state.entities,
            player: from,
        };
        let outcome = resolve(&world, &CollisionQuery::new(&corners).player_movement());
        reached_finish |= outcome.reached_finish;

        if outcome.hit.is_none() {
            state.player.pos = to;
        }
    }

    reached_finish
}

/// Run every entity's frame handler, then drop the ones that died.
///
/// Handlers see the entity list as it stood before the pass; removals are
/// collected by id and applied once every entity has run.
fn update_entities(state: &mut SimulationState) {
    let snapshot = state.entities.clone();
    let paint = state.paint.selected();
    let player = state.player.pos;
    let mut removed = HashSet::new();

    for i in 0..state.entities.len() {
        let mut ctx = FrameContext {
            grid: &mut state.grid,
            entities: &snapshot,
            player,
            paint,
        };
        let id = state.entities[i].id;

        match state.entities[i].handle(EntityEvent::Frame(&mut ctx)) {
            EntityUpdate::Despawn => {
                removed.insert(id);
            }
            EntityUpdate::Strike(target) => {
                removed.insert(id);
                let killed = state
                    .entities
                    .iter_mut()
                    .find(|e| e.id == target)
                    .map(|e| e.handle(EntityEvent::Shot));
                if killed == Some(EntityUpdate::Dead(true)) {
                    log::debug!("Entity {:?} destroyed", target);
                    removed.insert(target);
                }
            }
            _ => {}
        }
    }

    if !removed.is_empty() {
        state.entities.retain(|e| !removed.contains(&e.id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::load_levels;
    use crate::sim::tile::Tile;

    fn sim_from(json: &str) -> Simulation {
        Simulation::new(load_levels(json).unwrap()).unwrap()
    }

    const CORRIDOR: &str = r#"[
        { "name": "corridor", "map": [
            [1, 1, 1, 1, 1, 1, 1],
            [1, 5, 0, 0, 0, 11, 1],
            [1, 1, 1, 1, 1, 1, 1]
        ] }
    ]"#;

    fn run(sim: &mut Simulation, input: &TickInput, frames: usize) -> RenderFrame {
        let mut frame = sim.frame();
        for _ in 0..frames {
            frame = sim.tick(input);
        }
        frame
    }

    #[test]
    fn test_axis_velocity_accelerates_and_decays() {
        assert_eq!(axis_velocity(0.0, false, true), 0.6);
        assert_eq!(axis_velocity(3.9, false, true), 4.0);
        assert_eq!(axis_velocity(-1.2, true, false), -1.8);
        assert_eq!(axis_velocity(1.0, false, false), 0.7);
        assert_eq!(axis_velocity(0.2, false, false), 0.0);
        assert_eq!(axis_velocity(2.0, true, true), 2.0);
    }

    #[test]
    fn test_walls_block_movement() {
        let mut sim = sim_from(
            r#"[{ "map": [
                [1, 1, 1, 1, 1],
                [1, 0, 5, 0, 1],
                [1, 1, 1, 1, 1]
            ] }]"#,
        );
        assert_eq!(sim.player().pos, Vec2::new(150.0, 90.0));

        let up = TickInput {
            up: true,
            ..Default::default()
        };
        run(&mut sim, &up, 30);
        assert_eq!(sim.player().pos, Vec2::new(150.0, 86.0));
        assert!(sim.player().pos.y - PLAYER_HALF_EXTENT > 60.0);
    }

    #[test]
    fn test_finish_advances_level() {
        let mut sim = sim_from(
            r#"[
                { "map": [
                    [1, 1, 1, 1, 1, 1],
                    [1, 5, 0, 6, 0, 1],
                    [1, 1, 1, 1, 1, 1]
                ] },
                { "name": "second", "map": [[0, 0], [0, 5]] }
            ]"#,
        );
        let right = TickInput {
            right: true,
            ..Default::default()
        };

        let mut frame = sim.frame();
        for _ in 0..100 {
            frame = sim.tick(&right);
            if frame.level == 1 {
                break;
            }
        }
        assert_eq!(frame.level, 1);
        assert_eq!(frame.level_name, "second");
        assert_eq!(frame.player, Vec2::new(90.0, 90.0));
        assert_eq!(sim.player().vel, Vec2::ZERO);
    }

    #[test]
    fn test_advance_past_last_level_wraps() {
        let mut sim = Simulation::with_builtin_levels().unwrap();
        assert!(sim.select_level(2));
        sim.advance_level();
        assert_eq!(sim.state().level_index, 0);
        assert!(!sim.select_level(9));
        assert_eq!(sim.state().level_index, 0);
    }

    #[test]
    fn test_bullet_repaints_wool() {
        let mut sim = sim_from(CORRIDOR);
        let fire = TickInput {
            fire_down: true,
            mouse: Vec2::new(400.0, 90.0),
            ..Default::default()
        };
        let frame = sim.tick(&fire);
        assert_eq!(frame.entities.len(), 1);
        assert_eq!(frame.weapons[0].magazine, 29);

        let frame = run(&mut sim, &TickInput::default(), 40);
        assert!(frame.entities.is_empty());
        assert_eq!(frame.tiles.get(5, 1), Some(Tile::WhiteWool));
    }

    #[test]
    fn test_bullets_kill_enemy() {
        let mut sim = sim_from(
            r#"[{ "map": [
                [1, 1, 1, 1, 1, 1, 1, 1],
                [1, 5, 0, 0, 0, 0, 0, 1],
                [1, 1, 1, 1, 1, 1, 1, 1]
            ], "entities": [
                { "kind": "enemy", "x": 5, "y": 1, "health": 2, "rotate": 180 }
            ] }]"#,
        );
        let fire = TickInput {
            fire_down: true,
            mouse: Vec2::new(400.0, 90.0),
            ..Default::default()
        };
        sim.tick(&fire);
        sim.tick(&fire);
        assert_eq!(sim.state().entities.len(), 3);

        let frame = run(&mut sim, &TickInput::default(), 60);
        assert!(frame.entities.is_empty());
        assert!(frame.vision_cones.is_empty());
    }

    fn shotgun_at_guard(health: u32) -> Simulation {
        let mut sim = sim_from(&format!(
            r#"[{{ "map": [
                [1, 1, 1, 1, 1, 1, 1, 1],
                [1, 5, 0, 0, 0, 0, 0, 1],
                [1, 1, 1, 1, 1, 1, 1, 1]
            ], "entities": [
                {{ "kind": "enemy", "x": 3, "y": 1, "health": {health} }}
            ] }}]"#
        ));
        sim.tick(&TickInput {
            select_weapon: Some(1),
            fire_down: true,
            mouse: Vec2::new(400.0, 90.0),
            ..Default::default()
        });
        assert_eq!(sim.state().entities.len(), 4, "guard plus three pellets");
        sim
    }

    #[test]
    fn test_pellets_killing_in_same_tick_remove_guard_once() {
        let mut sim = shotgun_at_guard(1);
        let guard = sim.state().entities[0].id;

        let mut before = sim.state().entities.len();
        for _ in 0..60 {
            sim.tick(&TickInput::default());
            if sim.state().entities.iter().all(|e| e.id != guard) {
                break;
            }
            before = sim.state().entities.len();
        }

        // Later pellets still hit the dead guard because handlers see the
        // list as it stood before the pass; removing its id twice is harmless
        let after = &sim.state().entities;
        assert!(after.iter().all(|e| e.id != guard));
        assert!(after.iter().all(|e| e.as_enemy().is_none()));
        assert!(before - after.len() >= 3, "guard and striking pellets gone");
    }

    #[test]
    fn test_pellets_wound_surviving_guard() {
        let mut sim = shotgun_at_guard(5);
        run(&mut sim, &TickInput::default(), 40);

        let entities = &sim.state().entities;
        assert_eq!(entities.len(), 1, "every pellet struck");
        assert_eq!(entities[0].as_enemy().map(|e| e.health), Some(2));
    }

    #[test]
    fn test_reload_through_tick() {
        let mut sim = sim_from(CORRIDOR);
        let fire = TickInput {
            fire_down: true,
            mouse: Vec2::new(400.0, 90.0),
            ..Default::default()
        };
        run(&mut sim, &fire, 5);
        assert_eq!(sim.state().loadout.current().magazine, 25);

        sim.tick(&TickInput {
            reload: true,
            ..Default::default()
        });
        assert!(sim.state().loadout.current().reloading);

        let frame = sim.tick(&TickInput {
            dt_ms: 1000.0,
            ..Default::default()
        });
        assert_eq!((frame.weapons[0].magazine, frame.weapons[0].reserve), (30, 210));
        assert!(!frame.weapons[0].reloading);
    }

    #[test]
    fn test_rifle_fires_while_held() {
        let mut sim = sim_from(CORRIDOR);
        let press = TickInput {
            select_weapon: Some(2),
            fire_down: true,
            mouse: Vec2::new(400.0, 90.0),
            dt_ms: 50.0,
            ..Default::default()
        };
        let hold = TickInput {
            mouse: Vec2::new(400.0, 90.0),
            dt_ms: 50.0,
            ..Default::default()
        };
        sim.tick(&press);
        run(&mut sim, &hold, 2);
        assert_eq!(sim.state().loadout.weapons[2].magazine, 28);

        // Timers run before input, so the release tick still fires once
        sim.tick(&TickInput {
            fire_up: true,
            dt_ms: 50.0,
            ..Default::default()
        });
        assert_eq!(sim.state().loadout.weapons[2].magazine, 27);
        run(&mut sim, &hold, 5);
        assert_eq!(sim.state().loadout.weapons[2].magazine, 27);
    }

    #[test]
    fn test_script_opens_door() {
        let mut sim = Simulation::with_builtin_levels().unwrap();
        let door_open = |sim: &Simulation| {
            sim.state()
                .entities
                .iter()
                .find_map(|e| match &e.kind {
                    crate::sim::entity::EntityKind::Door(d) => Some(d.open),
                    _ => None,
                })
                .unwrap()
        };

        run(&mut sim, &TickInput::default(), 5);
        assert_eq!(door_open(&sim), 0.0);

        sim.state.grid.set(2, 6, Tile::RedWool);
        run(&mut sim, &TickInput::default(), 25);
        assert_eq!(door_open(&sim), 1.0);

        sim.state.grid.set(2, 6, Tile::WhiteWool);
        run(&mut sim, &TickInput::default(), 25);
        assert_eq!(door_open(&sim), 0.0);
    }

    #[test]
    fn test_reset_restores_template() {
        let mut sim = Simulation::with_builtin_levels().unwrap();
        let template = sim.levels()[0].map.clone();
        let spawn = sim.player().pos;

        sim.state.grid.set(3, 3, Tile::YellowWool);
        run(
            &mut sim,
            &TickInput {
                right: true,
                ..Default::default()
            },
            5,
        );
        assert_ne!(sim.player().pos, spawn);

        let frame = sim.tick(&TickInput {
            reset_map: true,
            ..Default::default()
        });
        assert_eq!(frame.tiles, template);
        assert_eq!(frame.player, spawn);
        assert_eq!(frame.level, 0);
    }

    #[test]
    fn test_secondary_turns_paint_wheel() {
        let mut sim = sim_from(CORRIDOR);
        sim.tick(&TickInput {
            secondary_down: true,
            ..Default::default()
        });
        let frame = run(&mut sim, &TickInput::default(), 60);
        assert_eq!(frame.paint.selected(), crate::sim::paint::PaintColor::Red);
    }

    #[test]
    fn test_frame_serializes() {
        let mut sim = Simulation::with_builtin_levels().unwrap();
        let json = sim.tick(&TickInput::default()).to_json().unwrap();
        assert!(json.contains("\"level_name\":\"Guard Post\""));
        assert!(json.contains("\"shape\":\"door\""));
    }
}
