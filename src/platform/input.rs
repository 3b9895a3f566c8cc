//! Browser key and pointer events folded into tick inputs
//!
//! Held keys persist between ticks; one-shot events (clicks, weapon keys,
//! reload, reset) are delivered to exactly one tick and then cleared.

use glam::Vec2;

use crate::sim::TickInput;

/// What a key does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    Reload,
    ResetMap,
    SelectWeapon(usize),
}

impl Action {
    /// Map a `KeyboardEvent.code`
    pub fn from_code(code: &str) -> Option<Self> {
        let action = match code {
            "KeyW" | "ArrowUp" => Action::Up,
            "KeyS" | "ArrowDown" => Action::Down,
            "KeyA" | "ArrowLeft" => Action::Left,
            "KeyD" | "ArrowRight" => Action::Right,
            "KeyR" => Action::Reload,
            "KeyK" => Action::ResetMap,
            "Digit1" => Action::SelectWeapon(0),
            "Digit2" => Action::SelectWeapon(1),
            "Digit3" => Action::SelectWeapon(2),
            _ => return None,
        };
        Some(action)
    }
}

/// Mouse buttons as reported by `MouseEvent.button`
const PRIMARY_BUTTON: i16 = 0;
const SECONDARY_BUTTON: i16 = 2;

/// Accumulated input between two ticks
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pending: TickInput,
    /// Pointer relative to the viewport center
    pointer: Vec2,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false for keys the game does not use
    pub fn key_down(&mut self, code: &str) -> bool {
        let Some(action) = Action::from_code(code) else {
            return false;
        };
        let input = &mut self.pending;
        match action {
            Action::Up => input.up = true,
            Action::Down => input.down = true,
            Action::Left => input.left = true,
            Action::Right => input.right = true,
            Action::Reload => input.reload = true,
            Action::ResetMap => input.reset_map = true,
            Action::SelectWeapon(slot) => input.select_weapon = Some(slot),
        }
        true
    }

    pub fn key_up(&mut self, code: &str) -> bool {
        let Some(action) = Action::from_code(code) else {
            return false;
        };
        let input = &mut self.pending;
        match action {
            Action::Up => input.up = false,
            Action::Down => input.down = false,
            Action::Left => input.left = false,
            Action::Right => input.right = false,
            Action::Reload | Action::ResetMap | Action::SelectWeapon(_) => {}
        }
        true
    }

    /// Pointer moved; `offset` is measured from the viewport center
    pub fn pointer_move(&mut self, offset: Vec2) {
        self.pointer = offset;
    }

    pub fn mouse_down(&mut self, button: i16) {
        match button {
            PRIMARY_BUTTON => self.pending.fire_down = true,
            SECONDARY_BUTTON => self.pending.secondary_down = true,
            _ => {}
        }
    }

    pub fn mouse_up(&mut self, button: i16) {
        if button == PRIMARY_BUTTON {
            self.pending.fire_up = true;
        }
    }

    /// Input for the next tick. The view is centered on the player, so the
    /// pointer's world position is the player plus the pointer offset.
    pub fn take(&mut self, player: Vec2, dt_ms: f64) -> TickInput {
        let input = TickInput {
            mouse: player + self.pointer,
            dt_ms,
            ..self.pending.clone()
        };

        let pending = &mut self.pending;
        pending.select_weapon = None;
        pending.reload = false;
        pending.reset_map = false;
        pending.fire_down = false;
        pending.fire_up = false;
        pending.secondary_down = false;

        input
    }
}
