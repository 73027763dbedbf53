//! The 2D immediate-mode drawing surface engines render through.
//!
//! [`Surface`] mirrors the small subset of the HTML canvas 2D context the
//! engines need: clearing, building a path from lines, quadratic curves and
//! arcs, and filling it with a [`Paint`]. [`RecordingSurface`] captures the
//! calls as [`DrawCommand`]s for tests and for the CLI `trace` output.

use crate::color::Rgba;
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Drawing target for engine rendering.
///
/// Object-safe so engines take `&mut dyn Surface`.
pub trait Surface {
    /// Resets the rectangle to the surface's cleared state.
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    /// Discards the current path.
    fn begin_path(&mut self);

    /// Starts a new subpath at `(x, y)`.
    fn move_to(&mut self, x: f64, y: f64);

    /// Adds a straight segment to `(x, y)`. Starts a subpath if none is open.
    fn line_to(&mut self, x: f64, y: f64);

    /// Adds a quadratic Bézier segment with control point `(cpx, cpy)`.
    fn quadratic_curve_to(&mut self, cpx: f64, cpy: f64, x: f64, y: f64);

    /// Adds a clockwise circular arc centered at `(x, y)`, angles in radians.
    fn arc(&mut self, x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64);

    /// Closes the current subpath back to its start.
    fn close_path(&mut self);

    /// Fills the current path (nonzero winding).
    fn fill(&mut self, paint: &Paint);
}

/// One color stop of a gradient. `offset` is in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub offset: f64,
    pub color: Rgba,
}

/// A linear gradient between two points, with stops sorted by offset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearGradient {
    pub from: DVec2,
    pub to: DVec2,
    pub stops: Vec<GradientStop>,
}

impl LinearGradient {
    /// A vertical gradient from `y0` to `y1`.
    pub fn vertical(y0: f64, y1: f64, stops: Vec<GradientStop>) -> Self {
        Self {
            from: DVec2::new(0.0, y0),
            to: DVec2::new(0.0, y1),
            stops,
        }
    }

    /// Color at `p`: projection onto the gradient axis, clamped to the end
    /// stops. A zero-length axis or an empty stop list paints nothing.
    pub fn color_at(&self, p: DVec2) -> Rgba {
        let axis = self.to - self.from;
        let len_sq = axis.length_squared();
        let (Some(first), Some(last)) = (self.stops.first(), self.stops.last()) else {
            return Rgba::TRANSPARENT;
        };
        if len_sq == 0.0 {
            return Rgba::TRANSPARENT;
        }
        let t = ((p - self.from).dot(axis) / len_sq).clamp(0.0, 1.0);
        if t <= first.offset {
            return first.color;
        }
        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.offset {
                let span = b.offset - a.offset;
                if span <= 0.0 {
                    return b.color;
                }
                return a.color.lerp(b.color, (t - a.offset) / span);
            }
        }
        last.color
    }
}

/// How a path is filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Paint {
    Solid { color: Rgba },
    LinearGradient(LinearGradient),
}

impl Paint {
    pub fn solid(color: Rgba) -> Self {
        Paint::Solid { color }
    }

    /// Color this paint produces at `p`.
    pub fn color_at(&self, p: DVec2) -> Rgba {
        match self {
            Paint::Solid { color } => *color,
            Paint::LinearGradient(g) => g.color_at(p),
        }
    }
}

/// A recorded [`Surface`] call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    ClearRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    BeginPath,
    MoveTo {
        x: f64,
        y: f64,
    },
    LineTo {
        x: f64,
        y: f64,
    },
    QuadraticCurveTo {
        cpx: f64,
        cpy: f64,
        x: f64,
        y: f64,
    },
    Arc {
        x: f64,
        y: f64,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    },
    ClosePath,
    Fill {
        paint: Paint,
    },
}

/// A surface that records every call instead of drawing.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Returns the recorded commands and starts a fresh recording.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Number of `Fill` commands recorded.
    pub fn fill_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Fill { .. }))
            .count()
    }
}

impl Surface for RecordingSurface {
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.commands.push(DrawCommand::ClearRect {
            x,
            y,
            width,
            height,
        });
    }

    fn begin_path(&mut self) {
        self.commands.push(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::LineTo { x, y });
    }

    fn quadratic_curve_to(&mut self, cpx: f64, cpy: f64, x: f64, y: f64) {
        self.commands
            .push(DrawCommand::QuadraticCurveTo { cpx, cpy, x, y });
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64) {
        self.commands.push(DrawCommand::Arc {
            x,
            y,
            radius,
            start_angle,
            end_angle,
        });
    }

    fn close_path(&mut self) {
        self.commands.push(DrawCommand::ClosePath);
    }

    fn fill(&mut self, paint: &Paint) {
        self.commands.push(DrawCommand::Fill {
            paint: paint.clone(),
        });
    }
}
