//! [`Surface`] over a `CanvasRenderingContext2d`.

use backdrop_core::surface::{Paint, Surface};
use log::warn;
use web_sys::CanvasRenderingContext2d;

pub struct Canvas2dSurface {
    ctx: CanvasRenderingContext2d,
}

impl Canvas2dSurface {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }
}

impl Surface for Canvas2dSurface {
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ctx.clear_rect(x, y, width, height);
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ctx.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ctx.line_to(x, y);
    }

    fn quadratic_curve_to(&mut self, cpx: f64, cpy: f64, x: f64, y: f64) {
        self.ctx.quadratic_curve_to(cpx, cpy, x, y);
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64) {
        // Negative radii throw IndexSizeError; the frame goes on without the arc.
        if let Err(e) = self.ctx.arc(x, y, radius, start_angle, end_angle) {
            warn!("arc rejected: {e:?}");
        }
    }

    fn close_path(&mut self) {
        self.ctx.close_path();
    }

    fn fill(&mut self, paint: &Paint) {
        match paint {
            Paint::Solid { color } => self.ctx.set_fill_style_str(&color.to_css()),
            Paint::LinearGradient(g) => {
                let gradient = self
                    .ctx
                    .create_linear_gradient(g.from.x, g.from.y, g.to.x, g.to.y);
                for stop in &g.stops {
                    let offset = stop.offset.clamp(0.0, 1.0) as f32;
                    if let Err(e) = gradient.add_color_stop(offset, &stop.color.to_css()) {
                        warn!("gradient stop rejected: {e:?}");
                    }
                }
                self.ctx.set_fill_style_canvas_gradient(&gradient);
            }
        }
        self.ctx.fill();
    }
}
