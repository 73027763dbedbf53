//! Scroll-driven page state exported to page scripts.

use backdrop_page::navbar::{scroll_down_target, DEFAULT_SCROLL_THRESHOLD};
use backdrop_page::reveal::DEFAULT_THRESHOLD;
use backdrop_page::{Navbar, Reveal};
use wasm_bindgen::prelude::*;

/// Navbar style toggle. Feed it `window.scrollY` on every scroll event.
#[wasm_bindgen]
pub struct ScrollNav {
    inner: Navbar,
}

#[wasm_bindgen]
impl ScrollNav {
    /// Uses the 50 px threshold when `threshold` is missing.
    #[wasm_bindgen(constructor)]
    pub fn new(threshold: Option<f64>) -> ScrollNav {
        ScrollNav {
            inner: Navbar::new(threshold.unwrap_or(DEFAULT_SCROLL_THRESHOLD)),
        }
    }

    /// `Some(scrolled)` when the style must change, `undefined` otherwise.
    pub fn on_scroll(&mut self, scroll_y: f64) -> Option<bool> {
        self.inner.on_scroll(scroll_y)
    }

    pub fn is_scrolled(&self) -> bool {
        self.inner.is_scrolled()
    }

    /// Where the "scroll down" indicator should scroll to.
    pub fn scroll_down_target(viewport_height: f64) -> f64 {
        scroll_down_target(viewport_height)
    }
}

/// Latching reveal state for `count` observed elements.
#[wasm_bindgen]
pub struct RevealTracker {
    inner: Reveal,
}

#[wasm_bindgen]
impl RevealTracker {
    #[wasm_bindgen(constructor)]
    pub fn new(count: usize, threshold: Option<f64>) -> RevealTracker {
        RevealTracker {
            inner: Reveal::with_threshold(count, threshold.unwrap_or(DEFAULT_THRESHOLD)),
        }
    }

    /// Records an intersection entry; `true` when the element should get
    /// its visible class now.
    pub fn observe(&mut self, index: usize, intersection_ratio: f64) -> bool {
        self.inner.observe(index, intersection_ratio)
    }

    pub fn is_revealed(&self, index: usize) -> bool {
        self.inner.is_revealed(index)
    }

    pub fn revealed_count(&self) -> usize {
        self.inner.revealed_count()
    }
}
