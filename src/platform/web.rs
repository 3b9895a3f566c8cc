//! JavaScript bindings
//!
//! The page owns the canvas, the event listeners and the animation loop. It
//! forwards raw events here, calls `tick` once per animation frame and draws
//! the JSON frame it gets back.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use super::input::InputState;
use super::storage::LocalStore;
use crate::Settings;
use crate::persistence::WebData;
use crate::sim::Simulation;

/// Key of the last level the player reached
const LAST_LEVEL: &str = "last_level";

#[wasm_bindgen(start)]
pub fn start() {
    super::init_logging();
    log::info!("Paintball starting...");
}

#[wasm_bindgen]
pub struct WebGame {
    sim: Simulation,
    input: InputState,
    viewport: Vec2,
    settings: Settings,
    data: Option<WebData<LocalStore>>,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32) -> Result<WebGame, JsError> {
        let data = match LocalStore::open() {
            Ok(store) => Some(WebData::new(store)),
            Err(e) => {
                log::warn!("Progress will not be saved: {}", e);
                None
            }
        };

        let settings = data
            .as_ref()
            .map(|d| Settings::load(d.store()))
            .unwrap_or_default();

        let mut sim = Simulation::with_builtin_levels()?;
        let start = data
            .as_ref()
            .and_then(|d| d.load_int(LAST_LEVEL).ok().flatten())
            .and_then(|level| usize::try_from(level).ok())
            .unwrap_or(settings.start_level);
        if start != 0 {
            sim.select_level(start);
        }

        Ok(WebGame {
            sim,
            input: InputState::new(),
            viewport: Vec2::new(width, height),
            settings,
            data,
        })
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width, height);
    }

    pub fn key_down(&mut self, code: &str) -> bool {
        self.input.key_down(code)
    }

    pub fn key_up(&mut self, code: &str) -> bool {
        self.input.key_up(code)
    }

    /// Pointer position in canvas pixels
    pub fn mouse_move(&mut self, x: f32, y: f32) {
        self.input.pointer_move(Vec2::new(x, y) - self.viewport / 2.0);
    }

    pub fn mouse_down(&mut self, button: i16) {
        self.input.mouse_down(button);
    }

    pub fn mouse_up(&mut self, button: i16) {
        self.input.mouse_up(button);
    }

    /// Advance one frame and return it as JSON
    pub fn tick(&mut self, dt_ms: f64) -> Result<String, JsError> {
        let level = self.sim.state().level_index;
        let input = self.input.take(self.sim.player().pos, dt_ms);
        let frame = self.sim.tick(&input);

        if frame.level != level {
            if let Some(data) = self.data.as_mut() {
                if let Err(e) = data.save_int(LAST_LEVEL, frame.level as i64) {
                    log::warn!("Could not save progress: {}", e);
                }
            }
        }

        Ok(frame.to_json()?)
    }

    pub fn settings(&self) -> Result<String, JsError> {
        Ok(serde_json::to_string(&self.settings)?)
    }

    pub fn set_settings(&mut self, json: &str) -> Result<(), JsError> {
        self.settings = serde_json::from_str(json)?;
        if let Some(data) = self.data.as_mut() {
            self.settings.save(data.store_mut())?;
        }
        Ok(())
    }
}
