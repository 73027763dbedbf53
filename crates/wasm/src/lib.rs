#![deny(unsafe_code)]
//! Browser bindings for backdrop.
//!
//! [`Backdrop`] drives an engine on a `<canvas>` through
//! `requestAnimationFrame`, resizing with the window and tracking the mouse.
//! [`Slider`], [`ScrollNav`] and [`RevealTracker`] expose the page widget
//! state machines to page scripts.

mod slider;
mod widgets;

pub use slider::Slider;
pub use widgets::{RevealTracker, ScrollNav};

// DOM access only exists on wasm32; host builds keep the pure parts testable.
#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::Backdrop;
