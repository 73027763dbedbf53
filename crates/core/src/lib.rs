#![deny(unsafe_code)]
//! Core types and traits for backdrop, a set of decorative page animations.
//!
//! Provides the `Engine` trait, the `Surface` drawing abstraction with a
//! recording implementation, explicit `Viewport`/`Pointer` states, the
//! cancellable `AnimationLoop`, `Rgba` colors, the `Xorshift64` PRNG, `Seed`,
//! and parameter helpers.

pub mod color;
pub mod engine;
pub mod error;
pub mod frame_loop;
pub mod params;
pub mod prng;
pub mod seed;
pub mod surface;
pub mod viewport;

pub use color::Rgba;
pub use engine::Engine;
pub use error::EngineError;
pub use frame_loop::{AnimationLoop, FrameHandle, FrameScheduler, LoopState, ManualScheduler};
pub use prng::Xorshift64;
pub use seed::Seed;
pub use surface::{DrawCommand, GradientStop, LinearGradient, Paint, RecordingSurface, Surface};
pub use viewport::{Pointer, SurfaceSize, Viewport};
