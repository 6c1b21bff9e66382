//! Client side of a personal portfolio page: a filterable project gallery,
//! a detail modal, a validated contact form and a few scroll effects, with
//! optional wireframe backdrops drawn through wgpu.
//!
//! The controllers only talk to the page through [`dom::Page`], so the same
//! logic runs against the browser ([`web_page`]) and against the headless
//! `memory::MemoryPage` used by the tests (`testing` feature).

pub mod config;
pub mod contact;
pub mod content;
pub mod dom;
pub mod effects;
pub mod error;
pub mod filter;
pub mod gallery;
pub mod markup;
#[cfg(any(test, feature = "testing"))]
pub mod memory;
pub mod modal;
pub mod portfolio;
pub mod resources;
pub mod scene;
pub mod state;
pub mod timing;
pub mod uniforms;

#[cfg(target_arch = "wasm32")]
mod bindings;
#[cfg(target_arch = "wasm32")]
pub mod renderer;
#[cfg(target_arch = "wasm32")]
pub mod web_page;
#[cfg(target_arch = "wasm32")]
pub mod wireframe;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(all(target_arch = "wasm32", feature = "console_error_panic_hook"))]
use std::panic;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    panic::set_hook(Box::new(console_error_panic_hook::hook));

    let level = if cfg!(debug_assertions) {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    if let Err(e) = console_log::init_with_level(level) {
        web_sys::console::warn_1(&format!("logger already set: {}", e).into());
    }

    if let Err(e) = bindings::start() {
        log::error!("initialization failed: {}", e);
    }
}
