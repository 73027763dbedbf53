#![deny(unsafe_code)]
//! Platform-free state for the page behaviors around the backdrop:
//! an autoplaying carousel with dot navigation, scroll-triggered reveal,
//! and the navbar's scrolled style.
//!
//! Each type only computes what the DOM should show; the WASM bindings
//! apply it.

pub mod carousel;
pub mod navbar;
pub mod reveal;

pub use carousel::{Carousel, CarouselLayout};
pub use navbar::Navbar;
pub use reveal::Reveal;
