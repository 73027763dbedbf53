//! CPU implementation of [`Surface`] for offline snapshots.
//!
//! Paths are flattened to polygons (quadratic curves and arcs become short
//! line segments), then filled by scanline with the nonzero winding rule,
//! sampling each pixel at its center. Fills blend source-over onto a straight
//! alpha buffer. There is no antialiasing.

use backdrop_core::color::Rgba;
use backdrop_core::error::EngineError;
use backdrop_core::surface::{Paint, Surface};
use glam::DVec2;
use std::f64::consts::TAU;

/// Line segments per quadratic curve.
const QUAD_SEGMENTS: usize = 16;
/// Line segments per full circle; partial arcs get a proportional share.
const ARC_SEGMENTS: usize = 64;

/// An RGBA pixel buffer that engines can draw on.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    width: usize,
    height: usize,
    background: Rgba,
    pixels: Vec<Rgba>,
    path: Vec<Vec<DVec2>>,
}

impl RasterSurface {
    /// Creates a surface filled with `background`, which is also what
    /// `clear_rect` restores.
    ///
    /// Returns `EngineError::InvalidDimensions` if either dimension is zero
    /// or `width * height` overflows.
    pub fn new(width: usize, height: usize, background: Rgba) -> Result<Self, EngineError> {
        if width == 0 || height == 0 {
            return Err(EngineError::InvalidDimensions);
        }
        let len = width
            .checked_mul(height)
            .ok_or(EngineError::InvalidDimensions)?;
        Ok(Self {
            width,
            height,
            background,
            pixels: vec![background; len],
            path: Vec::new(),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// The pixel at `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        (x < self.width && y < self.height).then(|| self.pixels[y * self.width + x])
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Quantizes the buffer to RGBA8, row-major, `width * height * 4` bytes.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|c| c.to_rgba8()).collect()
    }

    fn current_point(&self) -> Option<DVec2> {
        self.path.last().and_then(|sub| sub.last().copied())
    }

    fn push_point(&mut self, p: DVec2) {
        match self.path.last_mut() {
            Some(sub) => sub.push(p),
            None => self.path.push(vec![p]),
        }
    }

    /// Non-horizontal edges of every subpath, each implicitly closed.
    fn edges(&self) -> Vec<(DVec2, DVec2)> {
        let mut edges = Vec::new();
        for sub in self.path.iter().filter(|s| s.len() > 1) {
            for i in 0..sub.len() {
                let a = sub[i];
                let b = sub[(i + 1) % sub.len()];
                if a.y != b.y {
                    edges.push((a, b));
                }
            }
        }
        edges
    }

    fn blend(&mut self, x: usize, y: usize, src: Rgba) {
        let dst = &mut self.pixels[y * self.width + x];
        let out_a = src.a + dst.a * (1.0 - src.a);
        if out_a <= 0.0 {
            *dst = Rgba::TRANSPARENT;
            return;
        }
        let mix = |s: f64, d: f64| (s * src.a + d * dst.a * (1.0 - src.a)) / out_a;
        *dst = Rgba {
            r: mix(src.r, dst.r),
            g: mix(src.g, dst.g),
            b: mix(src.b, dst.b),
            a: out_a,
        };
    }
}

/// Pixel columns whose centers fall in `[x0, x1)`, clipped to `[0, width)`.
fn span_columns(x0: f64, x1: f64, width: usize) -> std::ops::Range<usize> {
    let start = (x0 - 0.5).ceil().max(0.0);
    let end = (x1 - 0.5).ceil().min(width as f64);
    if end <= start {
        return 0..0;
    }
    start as usize..end as usize
}

impl Surface for RasterSurface {
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let cols = span_columns(x, x + width, self.width);
        let rows = span_columns(y, y + height, self.height);
        for row in rows {
            for col in cols.clone() {
                self.pixels[row * self.width + col] = self.background;
            }
        }
    }

    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.path.push(vec![DVec2::new(x, y)]);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.push_point(DVec2::new(x, y));
    }

    fn quadratic_curve_to(&mut self, cpx: f64, cpy: f64, x: f64, y: f64) {
        let c = DVec2::new(cpx, cpy);
        let end = DVec2::new(x, y);
        let start = match self.current_point() {
            Some(p) => p,
            None => {
                self.move_to(cpx, cpy);
                c
            }
        };
        for i in 1..=QUAD_SEGMENTS {
            let t = i as f64 / QUAD_SEGMENTS as f64;
            let u = 1.0 - t;
            self.push_point(start * (u * u) + c * (2.0 * u * t) + end * (t * t));
        }
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64) {
        let center = DVec2::new(x, y);
        let raw = end_angle - start_angle;
        let sweep = if raw >= TAU { TAU } else { raw.rem_euclid(TAU) };
        let segments = ((sweep / TAU) * ARC_SEGMENTS as f64).ceil().max(1.0) as usize;
        let point_at = |angle: f64| center + DVec2::new(angle.cos(), angle.sin()) * radius;
        let start = point_at(start_angle);
        if self.current_point().is_some() {
            self.push_point(start);
        } else {
            self.path.push(vec![start]);
        }
        for i in 1..=segments {
            self.push_point(point_at(start_angle + sweep * i as f64 / segments as f64));
        }
    }

    fn close_path(&mut self) {
        if let Some(first) = self.path.last().and_then(|sub| sub.first().copied()) {
            self.path.push(vec![first]);
        }
    }

    fn fill(&mut self, paint: &Paint) {
        let edges = self.edges();
        if edges.is_empty() {
            return;
        }
        let mut crossings: Vec<(f64, i32)> = Vec::new();
        for row in 0..self.height {
            let sy = row as f64 + 0.5;
            crossings.clear();
            for &(a, b) in &edges {
                let dir = if a.y <= sy && b.y > sy {
                    1
                } else if b.y <= sy && a.y > sy {
                    -1
                } else {
                    continue;
                };
                let x = a.x + (sy - a.y) * (b.x - a.x) / (b.y - a.y);
                crossings.push((x, dir));
            }
            crossings.sort_by(|l, r| l.0.total_cmp(&r.0));

            let mut winding = 0;
            for k in 0..crossings.len().saturating_sub(1) {
                winding += crossings[k].1;
                if winding == 0 {
                    continue;
                }
                for col in span_columns(crossings[k].0, crossings[k + 1].0, self.width) {
                    let color = paint.color_at(DVec2::new(col as f64 + 0.5, sy));
                    if color.a > 0.0 {
                        self.blend(col, row, color);
                    }
                }
            }
        }
    }
}
