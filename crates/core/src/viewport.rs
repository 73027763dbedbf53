//! Surface dimensions and pointer state as explicit, non-error states.
//!
//! An engine starts [`Viewport::Unsized`] until the host reports its first
//! size, and the pointer is [`Pointer::Absent`] whenever the input device is
//! outside the surface.

use crate::error::EngineError;
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Width and height of a drawing surface in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceSize {
    width: f64,
    height: f64,
}

impl SurfaceSize {
    /// Returns `EngineError::InvalidDimensions` if either side is negative,
    /// NaN or infinite. Zero is allowed (a collapsed surface).
    pub fn new(width: f64, height: f64) -> Result<Self, EngineError> {
        let valid = |v: f64| v.is_finite() && v >= 0.0;
        if !valid(width) || !valid(height) {
            return Err(EngineError::InvalidDimensions);
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }
}

/// Whether an engine has been told its surface size yet.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Viewport {
    #[default]
    Unsized,
    Sized(SurfaceSize),
}

impl Viewport {
    pub fn size(&self) -> Option<SurfaceSize> {
        match self {
            Viewport::Unsized => None,
            Viewport::Sized(size) => Some(*size),
        }
    }

    pub fn is_sized(&self) -> bool {
        matches!(self, Viewport::Sized(_))
    }
}

/// Last known pointer position, or absent.
///
/// Updates are last-write-wins; engines read the state once per frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Pointer {
    #[default]
    Absent,
    At(DVec2),
}

impl Pointer {
    pub fn at(x: f64, y: f64) -> Self {
        Pointer::At(DVec2::new(x, y))
    }

    pub fn position(&self) -> Option<DVec2> {
        match self {
            Pointer::Absent => None,
            Pointer::At(p) => Some(*p),
        }
    }
}
