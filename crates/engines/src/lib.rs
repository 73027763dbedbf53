#![deny(unsafe_code)]
//! Engine registry: maps engine names to implementations, plus the CPU
//! rasterizer and offline replay used for snapshots.
//!
//! This crate sits between `backdrop-core` (which defines the `Engine` trait)
//! and the individual engine crates. Both the CLI and the WASM bindings
//! depend on it to avoid duplicating dispatch logic.

pub mod raster;
pub mod replay;

#[cfg(feature = "png")]
pub mod snapshot;

use backdrop_core::error::EngineError;
use backdrop_core::surface::Surface;
use backdrop_core::viewport::{SurfaceSize, Viewport};
use backdrop_core::Engine;
use backdrop_particles::ParticleField;
use backdrop_wave::WaveSurface;
use serde_json::Value;

pub use raster::RasterSurface;
pub use replay::replay;

/// All available engine names.
const ENGINE_NAMES: &[&str] = &["particles", "wave"];

/// Enumeration of all available backdrop engines.
///
/// Wraps each engine implementation and delegates `Engine` trait methods.
/// Use [`EngineKind::from_name`] for string-based construction (CLI, WASM).
pub enum EngineKind {
    /// Drifting, blinking dots.
    Particles(ParticleField),
    /// Pointer-reactive ripple fill.
    Wave(WaveSurface),
}

impl EngineKind {
    /// Constructs an unsized engine by name.
    ///
    /// Returns `EngineError::UnknownEngine` if the name is not recognized.
    pub fn from_name(name: &str, seed: u64, params: &Value) -> Result<Self, EngineError> {
        match name {
            "particles" => Ok(EngineKind::Particles(ParticleField::from_json(seed, params)?)),
            "wave" => Ok(EngineKind::Wave(WaveSurface::from_json(seed, params)?)),
            _ => Err(EngineError::UnknownEngine(name.to_string())),
        }
    }

    /// Returns a slice of all recognized engine names.
    pub fn list_engines() -> &'static [&'static str] {
        ENGINE_NAMES
    }

    /// The registry name of this engine.
    pub fn name(&self) -> &'static str {
        match self {
            EngineKind::Particles(_) => "particles",
            EngineKind::Wave(_) => "wave",
        }
    }
}

impl Engine for EngineKind {
    fn resize(&mut self, size: SurfaceSize) {
        match self {
            EngineKind::Particles(e) => e.resize(size),
            EngineKind::Wave(e) => e.resize(size),
        }
    }

    fn viewport(&self) -> Viewport {
        match self {
            EngineKind::Particles(e) => e.viewport(),
            EngineKind::Wave(e) => e.viewport(),
        }
    }

    fn step(&mut self, now_ms: f64) {
        match self {
            EngineKind::Particles(e) => e.step(now_ms),
            EngineKind::Wave(e) => e.step(now_ms),
        }
    }

    fn render(&self, surface: &mut dyn Surface) {
        match self {
            EngineKind::Particles(e) => e.render(surface),
            EngineKind::Wave(e) => e.render(surface),
        }
    }

    fn pointer_moved(&mut self, x: f64, y: f64) {
        match self {
            EngineKind::Particles(e) => e.pointer_moved(x, y),
            EngineKind::Wave(e) => e.pointer_moved(x, y),
        }
    }

    fn pointer_left(&mut self) {
        match self {
            EngineKind::Particles(e) => e.pointer_left(),
            EngineKind::Wave(e) => e.pointer_left(),
        }
    }

    fn params(&self) -> Value {
        match self {
            EngineKind::Particles(e) => e.params(),
            EngineKind::Wave(e) => e.params(),
        }
    }

    fn param_schema(&self) -> Value {
        match self {
            EngineKind::Particles(e) => e.param_schema(),
            EngineKind::Wave(e) => e.param_schema(),
        }
    }
}
