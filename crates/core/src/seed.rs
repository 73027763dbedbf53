//! Reproducible description of a rendered frame sequence.
//!
//! A [`Seed`] captures everything needed to replay a backdrop offline:
//! engine name, surface size, parameter overrides, PRNG seed, how many frames
//! to run and at what interval, and an optional fixed pointer position.

use crate::error::EngineError;
use crate::viewport::SurfaceSize;
use serde::{Deserialize, Serialize};

/// One display refresh at 60 Hz, in milliseconds.
pub const DEFAULT_FRAME_INTERVAL_MS: f64 = 1000.0 / 60.0;

fn default_frame_interval() -> f64 {
    DEFAULT_FRAME_INTERVAL_MS
}

fn empty_params() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

/// Two identical `Seed` values fed to the same binary produce identical frames.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Seed {
    pub engine: String,
    pub width: u32,
    pub height: u32,
    #[serde(default = "empty_params")]
    pub params: serde_json::Value,
    pub seed: u64,
    #[serde(default)]
    pub frames: usize,
    #[serde(default = "default_frame_interval")]
    pub frame_interval_ms: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pointer: Option<[f64; 2]>,
}

impl Seed {
    /// A seed with empty params, zero frames, 60 Hz and no pointer.
    pub fn new(engine: &str, width: u32, height: u32, seed: u64) -> Self {
        Self {
            engine: engine.to_string(),
            width,
            height,
            params: empty_params(),
            seed,
            frames: 0,
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
            pointer: None,
        }
    }

    /// Checks dimensions and frame interval.
    ///
    /// Zero-sized output is rejected here even though engines accept a
    /// collapsed surface: there is nothing to write.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.width == 0 || self.height == 0 {
            return Err(EngineError::InvalidDimensions);
        }
        if !(self.frame_interval_ms.is_finite() && self.frame_interval_ms > 0.0) {
            return Err(EngineError::invalid_param(
                "frame_interval_ms",
                "must be a positive number of milliseconds",
            ));
        }
        Ok(())
    }

    pub fn surface_size(&self) -> Result<SurfaceSize, EngineError> {
        SurfaceSize::new(self.width as f64, self.height as f64)
    }

    /// Timestamp of frame `index`, counting from zero.
    pub fn frame_time(&self, index: usize) -> f64 {
        index as f64 * self.frame_interval_ms
    }
}
