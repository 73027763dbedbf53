//! The core `Engine` trait every decorative simulation implements.
//!
//! The trait is object-safe so engines can be used as `dyn Engine` behind the
//! registry, the frame loop and the browser bindings.

use crate::surface::Surface;
use crate::viewport::{SurfaceSize, Viewport};
use serde_json::Value;

/// A frame-driven simulation that draws itself onto a [`Surface`].
///
/// The lifecycle is `resize` (at least once) followed by any interleaving of
/// `step`, `render` and pointer events. Before the first `resize` the engine
/// is [`Viewport::Unsized`] and `step`/`render` do nothing.
pub trait Engine {
    /// Reports the current surface size.
    fn resize(&mut self, size: SurfaceSize);

    /// The engine's current view of the surface size.
    fn viewport(&self) -> Viewport;

    /// Advances the simulation by one frame. `now_ms` is the frame timestamp
    /// in milliseconds, as delivered by the frame scheduler.
    fn step(&mut self, now_ms: f64);

    /// Draws the current state. Clears the surface first.
    fn render(&self, surface: &mut dyn Surface);

    /// The pointer moved to `(x, y)` in surface coordinates.
    fn pointer_moved(&mut self, _x: f64, _y: f64) {}

    /// The pointer left the surface.
    fn pointer_left(&mut self) {}

    /// Current parameter values as a JSON object.
    fn params(&self) -> Value;

    /// Schema describing all available parameters, their types, ranges, and defaults.
    fn param_schema(&self) -> Value;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;
    use serde_json::json;

    /// Minimal engine used to verify trait object safety and default methods.
    #[derive(Default)]
    struct MockEngine {
        viewport: Viewport,
        steps: usize,
    }

    impl Engine for MockEngine {
        fn resize(&mut self, size: SurfaceSize) {
            self.viewport = Viewport::Sized(size);
        }

        fn viewport(&self) -> Viewport {
            self.viewport
        }

        fn step(&mut self, _now_ms: f64) {
            if self.viewport.is_sized() {
                self.steps += 1;
            }
        }

        fn render(&self, surface: &mut dyn Surface) {
            if let Some(size) = self.viewport.size() {
                surface.clear_rect(0.0, 0.0, size.width(), size.height());
            }
        }

        fn params(&self) -> Value {
            json!({"steps": self.steps})
        }

        fn param_schema(&self) -> Value {
            json!({"steps": {"type": "integer", "default": 0}})
        }
    }

    #[test]
    fn engine_trait_is_object_safe() {
        let mut engine: Box<dyn Engine> = Box::new(MockEngine::default());
        engine.resize(SurfaceSize::new(4.0, 4.0).unwrap());
        engine.step(0.0);
        assert_eq!(engine.params()["steps"], 1);
    }

    #[test]
    fn unsized_engine_skips_step_and_render() {
        let mut engine = MockEngine::default();
        let mut surface = RecordingSurface::new();
        engine.step(16.0);
        engine.render(&mut surface);
        assert_eq!(engine.steps, 0);
        assert!(surface.commands().is_empty());
    }

    #[test]
    fn default_pointer_handlers_are_no_ops() {
        let mut engine = MockEngine::default();
        let engine_ref: &mut dyn Engine = &mut engine;
        engine_ref.pointer_moved(1.0, 2.0);
        engine_ref.pointer_left();
        assert_eq!(engine_ref.params()["steps"], 0);
    }

    #[test]
    fn param_schema_has_expected_structure() {
        let schema = MockEngine::default().param_schema();
        assert_eq!(schema["steps"]["type"], "integer");
    }
}
