//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Logging (console on web, stderr natively)
//! - Input events
//! - Storage (LocalStorage on web)

pub mod input;
#[cfg(target_arch = "wasm32")]
pub mod storage;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use input::{Action, InputState};

/// Install the logger for this platform; safe to call more than once
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("Logger already set: {e}").into());
    }
}

/// Install the logger for this platform; safe to call more than once
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("info");
    if let Err(e) = env_logger::Builder::from_env(env).try_init() {
        log::debug!("Logger already set: {}", e);
    }
}
