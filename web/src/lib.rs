//! Coursedeck - catalog page interactivity for the browser
//!
//! Compiled to WebAssembly, the crate scans the page once, binds the
//! `coursedeck-core` app to the live DOM and the Telegram WebApp bridge, and
//! forwards DOM events to it. The event runtime and configuration parsing
//! build on every target.

pub mod runtime;

#[cfg(target_arch = "wasm32")]
mod boot;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod listeners;
#[cfg(target_arch = "wasm32")]
mod logging;
#[cfg(target_arch = "wasm32")]
mod storage;
#[cfg(target_arch = "wasm32")]
mod telegram;
#[cfg(target_arch = "wasm32")]
mod timers;

use coursedeck_core::{Config, Result};

pub use runtime::Runtime;

/// Id of the `<script type="application/json">` element holding the config
pub const CONFIG_ELEMENT_ID: &str = "coursedeck-config";

/// Parse the embedded page configuration. A missing or blank block yields
/// the defaults.
pub fn parse_config(source: Option<&str>) -> Result<Config> {
    match source.map(str::trim) {
        None | Some("") => Ok(Config::default()),
        Some(json) => Config::from_json(json),
    }
}
