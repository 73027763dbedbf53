#![deny(unsafe_code)]
//! Wave Surface engine.
//!
//! A horizontal chain of sample points rides a travelling sine wave. The
//! pointer pushes nearby points down with a linear falloff, and a damped
//! spring between neighbors smooths the result. The chain is drawn as a
//! filled, quadratically smoothed curve under a vertical gradient.
//!
//! Coupling runs left to right and reads each neighbor's *current* height:
//! the left neighbor has already relaxed this frame, the right one has only
//! been displaced. This order dependence is part of the look.

use backdrop_core::error::EngineError;
use backdrop_core::params::{param_color, param_f64, require_in_range};
use backdrop_core::surface::{GradientStop, LinearGradient, Paint, Surface};
use backdrop_core::viewport::{Pointer, SurfaceSize, Viewport};
use backdrop_core::{Engine, Rgba};
use glam::DVec2;
use log::debug;
use serde_json::{json, Value};

/// Sample points per pixel of width.
const DEFAULT_DENSITY: f64 = 0.05;
/// Upper bound on sample points, whatever the width.
pub const MAX_POINTS: usize = 100_000;
/// Radians of wave phase per millisecond.
const DEFAULT_SPEED: f64 = 0.002;
/// Radians of wave phase per pixel.
const DEFAULT_FREQUENCY: f64 = 0.01;
/// Peak sinusoidal displacement in pixels.
const DEFAULT_AMPLITUDE: f64 = 20.0;
/// Pointer influence radius in pixels.
const DEFAULT_MOUSE_RADIUS: f64 = 100.0;
/// Displacement added directly under the pointer, in pixels.
const DEFAULT_MOUSE_STRENGTH: f64 = 30.0;
/// Spring constant pulling a point toward each neighbor.
const DEFAULT_SPRING: f64 = 0.1;
/// Share of the spring force added to velocity each frame.
const DEFAULT_COUPLING: f64 = 0.1;
/// Velocity retained per frame.
const DEFAULT_DAMPING: f64 = 0.9;
/// Gradient alpha at the vertical center.
const DEFAULT_PEAK_OPACITY: f64 = 0.8;

/// Default fill hue, a light sky blue.
const DEFAULT_COLOR: Rgba = Rgba::opaque(100.0 / 255.0, 200.0 / 255.0, 1.0);

/// Tunable constants of the wave surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveParams {
    pub density: f64,
    pub speed: f64,
    pub frequency: f64,
    pub amplitude: f64,
    pub mouse_radius: f64,
    pub mouse_strength: f64,
    pub spring: f64,
    pub coupling: f64,
    pub damping: f64,
    pub color: Rgba,
    pub peak_opacity: f64,
}

impl Default for WaveParams {
    fn default() -> Self {
        Self {
            density: DEFAULT_DENSITY,
            speed: DEFAULT_SPEED,
            frequency: DEFAULT_FREQUENCY,
            amplitude: DEFAULT_AMPLITUDE,
            mouse_radius: DEFAULT_MOUSE_RADIUS,
            mouse_strength: DEFAULT_MOUSE_STRENGTH,
            spring: DEFAULT_SPRING,
            coupling: DEFAULT_COUPLING,
            damping: DEFAULT_DAMPING,
            color: DEFAULT_COLOR,
            peak_opacity: DEFAULT_PEAK_OPACITY,
        }
    }
}

impl WaveParams {
    /// Reads parameters from a JSON object, falling back to defaults, then
    /// validates them.
    pub fn from_json(params: &Value) -> Result<Self, EngineError> {
        let p = Self {
            density: param_f64(params, "density", DEFAULT_DENSITY),
            speed: param_f64(params, "speed", DEFAULT_SPEED),
            frequency: param_f64(params, "frequency", DEFAULT_FREQUENCY),
            amplitude: param_f64(params, "amplitude", DEFAULT_AMPLITUDE),
            mouse_radius: param_f64(params, "mouse_radius", DEFAULT_MOUSE_RADIUS),
            mouse_strength: param_f64(params, "mouse_strength", DEFAULT_MOUSE_STRENGTH),
            spring: param_f64(params, "spring", DEFAULT_SPRING),
            coupling: param_f64(params, "coupling", DEFAULT_COUPLING),
            damping: param_f64(params, "damping", DEFAULT_DAMPING),
            color: param_color(params, "color", DEFAULT_COLOR)?,
            peak_opacity: param_f64(params, "peak_opacity", DEFAULT_PEAK_OPACITY),
        };
        p.validate()?;
        Ok(p)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        require_in_range("density", self.density, 0.0, 10.0)?;
        require_in_range("speed", self.speed, -1.0, 1.0)?;
        require_in_range("frequency", self.frequency, -10.0, 10.0)?;
        require_in_range("amplitude", self.amplitude, -1e4, 1e4)?;
        require_in_range("mouse_radius", self.mouse_radius, 0.0, 1e5)?;
        require_in_range("mouse_strength", self.mouse_strength, -1e4, 1e4)?;
        require_in_range("spring", self.spring, 0.0, 1.0)?;
        require_in_range("coupling", self.coupling, 0.0, 1.0)?;
        require_in_range("damping", self.damping, 0.0, 1.0)?;
        require_in_range("peak_opacity", self.peak_opacity, 0.0, 1.0)?;
        Ok(())
    }
}

/// Indices of the immediately adjacent points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Neighbors {
    pub left: Option<usize>,
    pub right: Option<usize>,
}

impl Neighbors {
    fn for_index(i: usize, count: usize) -> Self {
        Self {
            left: i.checked_sub(1),
            right: (i + 1 < count).then_some(i + 1),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> {
        self.left.into_iter().chain(self.right)
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.left == Some(index) || self.right == Some(index)
    }
}

/// One sample point of the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WavePoint {
    pub x: f64,
    pub baseline_y: f64,
    pub y: f64,
    pub velocity_y: f64,
    pub neighbors: Neighbors,
}

/// Displacement the pointer adds at `distance`: full `strength` at zero,
/// falling linearly to nothing at `radius` and beyond.
pub fn pointer_displacement(distance: f64, radius: f64, strength: f64) -> f64 {
    if distance < radius {
        (1.0 - distance / radius) * strength
    } else {
        0.0
    }
}

/// Number of points for a surface `width` at `density` points per pixel,
/// capped at [`MAX_POINTS`]. Past the cap the points spread to cover the
/// full width.
pub fn point_count(width: f64, density: f64) -> usize {
    ((width * density).ceil().max(0.0) as usize).min(MAX_POINTS)
}

/// The Wave Surface engine.
#[derive(Debug, Clone)]
pub struct WaveSurface {
    points: Vec<WavePoint>,
    viewport: Viewport,
    pointer: Pointer,
    params: WaveParams,
}

impl WaveSurface {
    /// Creates an unsized surface; points appear on the first `resize`.
    pub fn new(params: WaveParams) -> Result<Self, EngineError> {
        params.validate()?;
        Ok(Self {
            points: Vec::new(),
            viewport: Viewport::Unsized,
            pointer: Pointer::Absent,
            params,
        })
    }

    /// Creates a surface already sized to `size`.
    pub fn with_size(size: SurfaceSize, params: WaveParams) -> Result<Self, EngineError> {
        let mut wave = Self::new(params)?;
        wave.resize(size);
        Ok(wave)
    }

    /// Creates an unsized surface from a JSON params object.
    ///
    /// The wave has no random component; `seed` is accepted so every engine
    /// shares one constructor shape.
    pub fn from_json(_seed: u64, json_params: &Value) -> Result<Self, EngineError> {
        Self::new(WaveParams::from_json(json_params)?)
    }

    pub fn points(&self) -> &[WavePoint] {
        &self.points
    }

    pub fn pointer(&self) -> Pointer {
        self.pointer
    }

    pub fn wave_params(&self) -> &WaveParams {
        &self.params
    }

    fn rebuild(&mut self, size: SurfaceSize) {
        let count = point_count(size.width(), self.params.density);
        let spacing = if count > 1 {
            size.width() / (count - 1) as f64
        } else {
            0.0
        };
        let baseline_y = size.height() / 2.0;
        self.points = (0..count)
            .map(|i| WavePoint {
                x: i as f64 * spacing,
                baseline_y,
                y: baseline_y,
                velocity_y: 0.0,
                neighbors: Neighbors::for_index(i, count),
            })
            .collect();
        debug!(
            "rebuilt wave with {count} points for {}x{}",
            size.width(),
            size.height()
        );
    }

    fn gradient(&self, height: f64) -> Paint {
        let c = self.params.color;
        Paint::LinearGradient(LinearGradient::vertical(
            0.0,
            height,
            vec![
                GradientStop {
                    offset: 0.0,
                    color: c.with_alpha(0.0),
                },
                GradientStop {
                    offset: 0.5,
                    color: c.with_alpha(self.params.peak_opacity),
                },
                GradientStop {
                    offset: 1.0,
                    color: c.with_alpha(0.0),
                },
            ],
        ))
    }
}

impl Engine for WaveSurface {
    fn resize(&mut self, size: SurfaceSize) {
        self.viewport = Viewport::Sized(size);
        self.rebuild(size);
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn step(&mut self, now_ms: f64) {
        if !self.viewport.is_sized() {
            return;
        }
        let p = self.params;
        let t = now_ms * p.speed;
        let pointer = self.pointer.position();

        for point in &mut self.points {
            point.y = point.baseline_y + (t + point.x * p.frequency).sin() * p.amplitude;
            if let Some(at) = pointer {
                let distance = at.distance(DVec2::new(point.x, point.y));
                point.y += pointer_displacement(distance, p.mouse_radius, p.mouse_strength);
            }
        }

        for i in 0..self.points.len() {
            let y = self.points[i].y;
            let neighbors = self.points[i].neighbors;
            let force: f64 = neighbors
                .iter()
                .map(|j| (self.points[j].y - y) * p.spring)
                .sum();
            let point = &mut self.points[i];
            point.velocity_y += force * p.coupling;
            point.velocity_y *= p.damping;
            point.y += point.velocity_y;
        }
    }

    fn render(&self, surface: &mut dyn Surface) {
        let Some(size) = self.viewport.size() else {
            return;
        };
        let (w, h) = (size.width(), size.height());
        surface.clear_rect(0.0, 0.0, w, h);
        surface.begin_path();
        surface.move_to(0.0, h);
        if let (Some(first), Some(last)) = (self.points.first(), self.points.last()) {
            surface.line_to(first.x, first.y);
            for pair in self.points.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                surface.quadratic_curve_to(a.x, a.y, (a.x + b.x) / 2.0, (a.y + b.y) / 2.0);
            }
            surface.line_to(last.x, last.y);
        }
        surface.line_to(w, h);
        surface.line_to(0.0, h);
        surface.close_path();
        surface.fill(&self.gradient(h));
    }

    fn pointer_moved(&mut self, x: f64, y: f64) {
        self.pointer = Pointer::at(x, y);
    }

    fn pointer_left(&mut self) {
        self.pointer = Pointer::Absent;
    }

    fn params(&self) -> Value {
        let p = &self.params;
        json!({
            "density": p.density,
            "speed": p.speed,
            "frequency": p.frequency,
            "amplitude": p.amplitude,
            "mouse_radius": p.mouse_radius,
            "mouse_strength": p.mouse_strength,
            "spring": p.spring,
            "coupling": p.coupling,
            "damping": p.damping,
            "color": p.color.to_hex(),
            "peak_opacity": p.peak_opacity,
        })
    }

    fn param_schema(&self) -> Value {
        json!({
            "density": {
                "type": "number",
                "default": DEFAULT_DENSITY,
                "min": 0.0,
                "max": 10.0,
                "description": "Sample points per pixel of surface width"
            },
            "speed": {
                "type": "number",
                "default": DEFAULT_SPEED,
                "min": -1.0,
                "max": 1.0,
                "description": "Wave phase advance in radians per millisecond"
            },
            "frequency": {
                "type": "number",
                "default": DEFAULT_FREQUENCY,
                "min": -10.0,
                "max": 10.0,
                "description": "Wave phase change in radians per pixel"
            },
            "amplitude": {
                "type": "number",
                "default": DEFAULT_AMPLITUDE,
                "min": -10000.0,
                "max": 10000.0,
                "description": "Peak sinusoidal displacement in pixels"
            },
            "mouse_radius": {
                "type": "number",
                "default": DEFAULT_MOUSE_RADIUS,
                "min": 0.0,
                "max": 100000.0,
                "description": "Pointer influence radius in pixels"
            },
            "mouse_strength": {
                "type": "number",
                "default": DEFAULT_MOUSE_STRENGTH,
                "min": -10000.0,
                "max": 10000.0,
                "description": "Displacement directly under the pointer, fading linearly to the radius"
            },
            "spring": {
                "type": "number",
                "default": DEFAULT_SPRING,
                "min": 0.0,
                "max": 1.0,
                "description": "Spring constant toward each neighbor"
            },
            "coupling": {
                "type": "number",
                "default": DEFAULT_COUPLING,
                "min": 0.0,
                "max": 1.0,
                "description": "Share of the spring force added to velocity per frame"
            },
            "damping": {
                "type": "number",
                "default": DEFAULT_DAMPING,
                "min": 0.0,
                "max": 1.0,
                "description": "Velocity retained per frame"
            },
            "color": {
                "type": "string",
                "default": DEFAULT_COLOR.to_hex(),
                "description": "Fill hue as #rrggbb"
            },
            "peak_opacity": {
                "type": "number",
                "default": DEFAULT_PEAK_OPACITY,
                "min": 0.0,
                "max": 1.0,
                "description": "Gradient alpha at the vertical center"
            }
        })
    }
}
