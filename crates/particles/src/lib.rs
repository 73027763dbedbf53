#![deny(unsafe_code)]
//! Particle Field engine.
//!
//! A fixed batch of point-like particles drifts across the surface, bouncing
//! off its edges, while each particle's opacity ping-pongs inside a band.
//! Every frame redraws all particles as filled circles of one hue.
//!
//! The batch is generated from the seeded PRNG the first time the engine
//! learns its surface size. Later resizes only move the walls; particles left
//! outside drift back in after their next reflection.

use backdrop_core::error::EngineError;
use backdrop_core::params::{param_color, param_f64, param_usize, require_in_range};
use backdrop_core::prng::Xorshift64;
use backdrop_core::surface::{Paint, Surface};
use backdrop_core::viewport::{SurfaceSize, Viewport};
use backdrop_core::{Engine, Rgba};
use glam::DVec2;
use log::debug;
use serde_json::{json, Value};
use std::f64::consts::TAU;

/// Particles in the batch.
const DEFAULT_COUNT: usize = 100;
/// Largest batch the field accepts.
pub const MAX_COUNT: usize = 10_000;
/// Upper bound for radii, pixels.
const MAX_RADIUS_LIMIT: f64 = 50.0;
/// Upper bound for `max_speed`, pixels per frame.
const MAX_SPEED_LIMIT: f64 = 10.0;
/// Smallest particle radius in pixels.
const DEFAULT_MIN_RADIUS: f64 = 1.0;
/// Largest particle radius in pixels (exclusive).
const DEFAULT_MAX_RADIUS: f64 = 4.0;
/// Each velocity component is drawn from `[-max_speed, max_speed)`, pixels per frame.
const DEFAULT_MAX_SPEED: f64 = 0.25;
/// Lower edge of the opacity band.
const DEFAULT_MIN_OPACITY: f64 = 0.1;
/// Upper edge of the opacity band.
const DEFAULT_MAX_OPACITY: f64 = 0.6;
/// Slowest opacity change per frame.
const DEFAULT_MIN_BLINK: f64 = 0.005;
/// Fastest opacity change per frame (exclusive).
const DEFAULT_MAX_BLINK: f64 = 0.025;

/// Tunable constants of the particle field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleParams {
    pub count: usize,
    pub min_radius: f64,
    pub max_radius: f64,
    pub max_speed: f64,
    pub min_opacity: f64,
    pub max_opacity: f64,
    pub min_blink: f64,
    pub max_blink: f64,
    pub color: Rgba,
}

impl Default for ParticleParams {
    fn default() -> Self {
        Self {
            count: DEFAULT_COUNT,
            min_radius: DEFAULT_MIN_RADIUS,
            max_radius: DEFAULT_MAX_RADIUS,
            max_speed: DEFAULT_MAX_SPEED,
            min_opacity: DEFAULT_MIN_OPACITY,
            max_opacity: DEFAULT_MAX_OPACITY,
            min_blink: DEFAULT_MIN_BLINK,
            max_blink: DEFAULT_MAX_BLINK,
            color: Rgba::GOLD,
        }
    }
}

impl ParticleParams {
    /// Reads parameters from a JSON object, falling back to defaults, then
    /// validates them.
    pub fn from_json(params: &Value) -> Result<Self, EngineError> {
        let p = Self {
            count: param_usize(params, "count", DEFAULT_COUNT),
            min_radius: param_f64(params, "min_radius", DEFAULT_MIN_RADIUS),
            max_radius: param_f64(params, "max_radius", DEFAULT_MAX_RADIUS),
            max_speed: param_f64(params, "max_speed", DEFAULT_MAX_SPEED),
            min_opacity: param_f64(params, "min_opacity", DEFAULT_MIN_OPACITY),
            max_opacity: param_f64(params, "max_opacity", DEFAULT_MAX_OPACITY),
            min_blink: param_f64(params, "min_blink", DEFAULT_MIN_BLINK),
            max_blink: param_f64(params, "max_blink", DEFAULT_MAX_BLINK),
            color: param_color(params, "color", Rgba::GOLD)?,
        };
        p.validate()?;
        Ok(p)
    }

    /// Checks ranges. The opacity band must be wider than the fastest blink
    /// so one reflection always lands back inside the band.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.count > MAX_COUNT {
            return Err(EngineError::invalid_param(
                "count",
                format!("{} exceeds {MAX_COUNT}", self.count),
            ));
        }
        require_in_range("min_radius", self.min_radius, f64::MIN_POSITIVE, MAX_RADIUS_LIMIT)?;
        require_in_range("max_radius", self.max_radius, self.min_radius, MAX_RADIUS_LIMIT)?;
        require_in_range("max_speed", self.max_speed, 0.0, MAX_SPEED_LIMIT)?;
        require_in_range("min_opacity", self.min_opacity, 0.0, 1.0)?;
        require_in_range("max_opacity", self.max_opacity, 0.0, 1.0)?;
        if self.min_opacity >= self.max_opacity {
            return Err(EngineError::invalid_param(
                "min_opacity",
                "must be below max_opacity",
            ));
        }
        require_in_range("min_blink", self.min_blink, 0.0, 1.0)?;
        require_in_range(
            "max_blink",
            self.max_blink,
            self.min_blink,
            self.max_opacity - self.min_opacity,
        )?;
        Ok(())
    }
}

/// One drifting dot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: DVec2,
    pub velocity: DVec2,
    pub radius: f64,
    pub opacity: f64,
    /// Signed opacity change per frame.
    pub opacity_delta: f64,
}

impl Particle {
    fn spawn(rng: &mut Xorshift64, size: SurfaceSize, p: &ParticleParams) -> Self {
        let position = DVec2::new(
            rng.next_range(0.0, size.width()),
            rng.next_range(0.0, size.height()),
        );
        let radius = rng.next_range(p.min_radius, p.max_radius);
        let velocity = DVec2::new(rng.next_centered(p.max_speed), rng.next_centered(p.max_speed));
        let opacity = rng.next_range(p.min_opacity, p.max_opacity);
        let opacity_delta = rng.next_range(p.min_blink, p.max_blink);
        Self {
            position,
            velocity,
            radius,
            opacity,
            opacity_delta,
        }
    }

    /// Moves one frame, reflects off the walls, and advances the blink.
    ///
    /// Reflection flips a velocity component only while it still points out
    /// of the surface, so the position may overshoot a wall by at most one
    /// frame's displacement and is never clamped.
    fn advance(&mut self, size: SurfaceSize, min_opacity: f64, max_opacity: f64) {
        self.position += self.velocity;

        if (self.position.x > size.width() && self.velocity.x > 0.0)
            || (self.position.x < 0.0 && self.velocity.x < 0.0)
        {
            self.velocity.x = -self.velocity.x;
        }
        if (self.position.y > size.height() && self.velocity.y > 0.0)
            || (self.position.y < 0.0 && self.velocity.y < 0.0)
        {
            self.velocity.y = -self.velocity.y;
        }

        self.opacity += self.opacity_delta;
        if self.opacity > max_opacity {
            self.opacity = 2.0 * max_opacity - self.opacity;
            self.opacity_delta = -self.opacity_delta.abs();
        } else if self.opacity < min_opacity {
            self.opacity = 2.0 * min_opacity - self.opacity;
            self.opacity_delta = self.opacity_delta.abs();
        }
    }
}

/// The Particle Field engine.
pub struct ParticleField {
    particles: Vec<Particle>,
    viewport: Viewport,
    params: ParticleParams,
    rng: Xorshift64,
}

impl ParticleField {
    /// Creates an unsized field; the batch appears on the first `resize`.
    pub fn new(seed: u64, params: ParticleParams) -> Result<Self, EngineError> {
        params.validate()?;
        Ok(Self {
            particles: Vec::new(),
            viewport: Viewport::Unsized,
            params,
            rng: Xorshift64::new(seed),
        })
    }

    /// Creates a field and spawns its batch for `size` immediately.
    pub fn with_size(
        size: SurfaceSize,
        seed: u64,
        params: ParticleParams,
    ) -> Result<Self, EngineError> {
        let mut field = Self::new(seed, params)?;
        field.resize(size);
        Ok(field)
    }

    /// Creates an unsized field from a JSON params object.
    pub fn from_json(seed: u64, json_params: &Value) -> Result<Self, EngineError> {
        Self::new(seed, ParticleParams::from_json(json_params)?)
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particle_params(&self) -> &ParticleParams {
        &self.params
    }

    fn spawn_batch(&mut self, size: SurfaceSize) {
        let params = self.params;
        self.particles = (0..params.count)
            .map(|_| Particle::spawn(&mut self.rng, size, &params))
            .collect();
        debug!(
            "spawned {} particles on {}x{}",
            self.particles.len(),
            size.width(),
            size.height()
        );
    }
}

impl Engine for ParticleField {
    fn resize(&mut self, size: SurfaceSize) {
        let first = !self.viewport.is_sized();
        self.viewport = Viewport::Sized(size);
        if first {
            self.spawn_batch(size);
        } else {
            debug!("particle field resized to {}x{}", size.width(), size.height());
        }
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn step(&mut self, _now_ms: f64) {
        let Some(size) = self.viewport.size() else {
            return;
        };
        let (lo, hi) = (self.params.min_opacity, self.params.max_opacity);
        for p in &mut self.particles {
            p.advance(size, lo, hi);
        }
    }

    fn render(&self, surface: &mut dyn Surface) {
        let Some(size) = self.viewport.size() else {
            return;
        };
        surface.clear_rect(0.0, 0.0, size.width(), size.height());
        for p in &self.particles {
            surface.begin_path();
            surface.arc(p.position.x, p.position.y, p.radius, 0.0, TAU);
            surface.fill(&Paint::solid(self.params.color.with_alpha(p.opacity)));
        }
    }

    fn params(&self) -> Value {
        let p = &self.params;
        json!({
            "count": p.count,
            "min_radius": p.min_radius,
            "max_radius": p.max_radius,
            "max_speed": p.max_speed,
            "min_opacity": p.min_opacity,
            "max_opacity": p.max_opacity,
            "min_blink": p.min_blink,
            "max_blink": p.max_blink,
            "color": p.color.to_hex(),
        })
    }

    fn param_schema(&self) -> Value {
        json!({
            "count": {
                "type": "integer",
                "default": DEFAULT_COUNT,
                "min": 0,
                "max": MAX_COUNT,
                "description": "Number of particles spawned on first resize"
            },
            "min_radius": {
                "type": "number",
                "default": DEFAULT_MIN_RADIUS,
                "min": 0.0,
                "max": MAX_RADIUS_LIMIT,
                "description": "Smallest particle radius in pixels"
            },
            "max_radius": {
                "type": "number",
                "default": DEFAULT_MAX_RADIUS,
                "min": 0.0,
                "max": MAX_RADIUS_LIMIT,
                "description": "Largest particle radius in pixels (exclusive)"
            },
            "max_speed": {
                "type": "number",
                "default": DEFAULT_MAX_SPEED,
                "min": 0.0,
                "max": MAX_SPEED_LIMIT,
                "description": "Velocity components are drawn from [-max_speed, max_speed) px/frame"
            },
            "min_opacity": {
                "type": "number",
                "default": DEFAULT_MIN_OPACITY,
                "min": 0.0,
                "max": 1.0,
                "description": "Lower edge of the blink band"
            },
            "max_opacity": {
                "type": "number",
                "default": DEFAULT_MAX_OPACITY,
                "min": 0.0,
                "max": 1.0,
                "description": "Upper edge of the blink band"
            },
            "min_blink": {
                "type": "number",
                "default": DEFAULT_MIN_BLINK,
                "min": 0.0,
                "max": 1.0,
                "description": "Slowest opacity change per frame"
            },
            "max_blink": {
                "type": "number",
                "default": DEFAULT_MAX_BLINK,
                "min": 0.0,
                "max": 1.0,
                "description": "Fastest opacity change per frame, at most the band width"
            },
            "color": {
                "type": "string",
                "default": Rgba::GOLD.to_hex(),
                "description": "Particle hue as #rrggbb"
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backdrop_core::surface::{DrawCommand, RecordingSurface};

    fn size(w: f64, h: f64) -> SurfaceSize {
        SurfaceSize::new(w, h).unwrap()
    }

    fn field(w: f64, h: f64, seed: u64) -> ParticleField {
        ParticleField::with_size(size(w, h), seed, ParticleParams::default()).unwrap()
    }

    // ---- Construction tests ----

    #[test]
    fn new_field_is_unsized_and_empty() {
        let f = ParticleField::new(1, ParticleParams::default()).unwrap();
        assert!(!f.viewport().is_sized());
        assert!(f.particles().is_empty());
    }

    #[test]
    fn first_resize_spawns_default_batch() {
        let f = field(800.0, 600.0, 42);
        assert_eq!(f.particles().len(), 100);
    }

    #[test]
    fn spawned_particles_respect_initial_ranges() {
        let f = field(800.0, 600.0, 7);
        for p in f.particles() {
            assert!((0.0..800.0).contains(&p.position.x));
            assert!((0.0..600.0).contains(&p.position.y));
            assert!((1.0..4.0).contains(&p.radius));
            assert!((-0.25..0.25).contains(&p.velocity.x));
            assert!((-0.25..0.25).contains(&p.velocity.y));
            assert!((0.1..0.6).contains(&p.opacity));
            assert!((0.005..0.025).contains(&p.opacity_delta));
        }
    }

    #[test]
    fn from_json_uses_defaults_for_empty_json() {
        let f = ParticleField::from_json(1, &json!({})).unwrap();
        assert_eq!(*f.particle_params(), ParticleParams::default());
    }

    #[test]
    fn from_json_extracts_custom_values() {
        let f = ParticleField::from_json(
            1,
            &json!({"count": 12, "max_speed": 1.5, "color": "#ff0000"}),
        )
        .unwrap();
        let p = f.particle_params();
        assert_eq!(p.count, 12);
        assert_eq!(p.max_speed, 1.5);
        assert_eq!(p.color, Rgba::opaque(1.0, 0.0, 0.0));
        assert_eq!(f.params()["color"], "#ff0000");
    }

    #[test]
    fn from_json_rejects_inverted_opacity_band() {
        let err = ParticleField::from_json(1, &json!({"min_opacity": 0.7, "max_opacity": 0.2}))
            .err()
            .unwrap();
        assert!(matches!(err, EngineError::InvalidParam { .. }));
    }

    #[test]
    fn from_json_rejects_blink_wider_than_band() {
        let result = ParticleField::from_json(
            1,
            &json!({"min_opacity": 0.4, "max_opacity": 0.5, "max_blink": 0.2}),
        );
        assert!(result.is_err());
    }

    #[test]
    fn from_json_rejects_bad_color() {
        let result = ParticleField::from_json(1, &json!({"color": "gold"}));
        assert!(matches!(result, Err(EngineError::InvalidColor(_))));
    }

    #[test]
    fn from_json_rejects_oversized_batches() {
        let at_limit = ParticleField::from_json(1, &json!({"count": MAX_COUNT}));
        assert!(at_limit.is_ok());
        for count in [json!(MAX_COUNT + 1), json!(u64::MAX)] {
            let err = ParticleField::from_json(1, &json!({"count": count}))
                .err()
                .unwrap();
            assert!(
                matches!(&err, EngineError::InvalidParam { name, .. } if name == "count"),
                "count {count} should be rejected, got {err:?}"
            );
        }
    }

    #[test]
    fn validate_matches_schema_bounds() {
        let f = ParticleField::from_json(1, &json!({})).unwrap();
        let schema = f.param_schema();
        for key in ["min_radius", "max_radius", "max_speed"] {
            let max = schema[key]["max"].as_f64().unwrap();
            let mut over = serde_json::Map::new();
            over.insert(key.to_string(), json!(max * 2.0));
            if key == "min_radius" {
                over.insert("max_radius".into(), json!(max * 2.0));
            }
            assert!(
                ParticleField::from_json(1, &Value::Object(over)).is_err(),
                "{key} above its schema max should be rejected"
            );
        }
    }

    // ---- Determinism tests ----

    #[test]
    fn same_seed_identical_batches() {
        let a = field(640.0, 480.0, 12345);
        let b = field(640.0, 480.0, 12345);
        assert_eq!(a.particles(), b.particles());
    }

    #[test]
    fn different_seed_different_batches() {
        let a = field(640.0, 480.0, 1);
        let b = field(640.0, 480.0, 2);
        assert_ne!(a.particles(), b.particles());
    }

    // ---- Step tests ----

    #[test]
    fn unsized_field_ignores_step_and_render() {
        let mut f = ParticleField::new(1, ParticleParams::default()).unwrap();
        let mut surface = RecordingSurface::new();
        f.step(16.0);
        f.render(&mut surface);
        assert!(surface.commands().is_empty());
    }

    #[test]
    fn step_moves_by_velocity() {
        let mut f = field(100.0, 100.0, 3);
        f.particles = vec![Particle {
            position: DVec2::new(50.0, 50.0),
            velocity: DVec2::new(0.2, -0.1),
            radius: 2.0,
            opacity: 0.3,
            opacity_delta: 0.01,
        }];
        f.step(0.0);
        let p = f.particles()[0];
        assert!((p.position.x - 50.2).abs() < 1e-12);
        assert!((p.position.y - 49.9).abs() < 1e-12);
        assert!((p.opacity - 0.31).abs() < 1e-12);
    }

    #[test]
    fn right_wall_overshoot_flips_velocity() {
        let w = 200.0;
        let mut f = field(w, 100.0, 3);
        f.particles = vec![Particle {
            position: DVec2::new(w - 0.1, 50.0),
            velocity: DVec2::new(0.3, 0.0),
            radius: 2.0,
            opacity: 0.3,
            opacity_delta: 0.01,
        }];
        f.step(0.0);
        let p = f.particles()[0];
        assert!((p.position.x - (w + 0.2)).abs() < 1e-9, "x = {}", p.position.x);
        assert_eq!(p.velocity.x, -0.3);
        f.step(16.0);
        assert!((f.particles()[0].position.x - (w - 0.1)).abs() < 1e-9);
    }

    #[test]
    fn opacity_reflects_at_band_edges() {
        let mut f = field(100.0, 100.0, 3);
        f.particles = vec![Particle {
            position: DVec2::new(50.0, 50.0),
            velocity: DVec2::ZERO,
            radius: 2.0,
            opacity: 0.59,
            opacity_delta: 0.02,
        }];
        f.step(0.0);
        let p = f.particles()[0];
        assert!((p.opacity - 0.59).abs() < 1e-12, "0.61 reflects to 0.59");
        assert_eq!(p.opacity_delta, -0.02);
    }

    #[test]
    fn resize_keeps_particle_positions() {
        let mut f = field(800.0, 600.0, 5);
        let before: Vec<DVec2> = f.particles().iter().map(|p| p.position).collect();
        f.resize(size(200.0, 100.0));
        let after: Vec<DVec2> = f.particles().iter().map(|p| p.position).collect();
        assert_eq!(before, after);
        assert_eq!(f.viewport().size(), Some(size(200.0, 100.0)));
        assert_eq!(f.particles().len(), 100, "resize must not respawn");
    }

    #[test]
    fn particles_outside_after_shrink_drift_back_in() {
        let mut f = field(800.0, 600.0, 5);
        f.resize(size(100.0, 100.0));
        let max_speed = ParticleParams::default().max_speed;
        // At 0.2 px/frame or faster, 800 px takes at most 4000 frames.
        for i in 0..5000 {
            f.step(i as f64);
        }
        for p in f.particles() {
            if p.velocity.x.abs() > 0.2 {
                assert!(p.position.x <= 100.0 + max_speed && p.position.x >= -max_speed);
            }
            if p.velocity.y.abs() > 0.2 {
                assert!(p.position.y <= 100.0 + max_speed && p.position.y >= -max_speed);
            }
        }
    }

    // ---- Render tests ----

    #[test]
    fn render_clears_then_draws_one_circle_per_particle() {
        let f = ParticleField::with_size(
            size(320.0, 240.0),
            9,
            ParticleParams {
                count: 3,
                ..ParticleParams::default()
            },
        )
        .unwrap();
        let mut surface = RecordingSurface::new();
        f.render(&mut surface);
        let cmds = surface.commands();
        assert_eq!(cmds.len(), 1 + 3 * 3);
        assert_eq!(
            cmds[0],
            DrawCommand::ClearRect {
                x: 0.0,
                y: 0.0,
                width: 320.0,
                height: 240.0
            }
        );
        for (i, p) in f.particles().iter().enumerate() {
            let base = 1 + i * 3;
            assert_eq!(cmds[base], DrawCommand::BeginPath);
            assert_eq!(
                cmds[base + 1],
                DrawCommand::Arc {
                    x: p.position.x,
                    y: p.position.y,
                    radius: p.radius,
                    start_angle: 0.0,
                    end_angle: TAU
                }
            );
            assert_eq!(
                cmds[base + 2],
                DrawCommand::Fill {
                    paint: Paint::solid(Rgba::GOLD.with_alpha(p.opacity))
                }
            );
        }
    }

    #[test]
    fn param_schema_covers_every_param() {
        let f = field(10.0, 10.0, 1);
        let schema = f.param_schema();
        let params = f.params();
        for key in params.as_object().unwrap().keys() {
            assert!(schema.get(key).is_some(), "schema missing parameter: {key}");
            assert!(schema[key].get("default").is_some(), "{key} missing 'default'");
            assert!(schema[key].get("description").is_some());
        }
    }

    #[test]
    fn engine_is_object_safe() {
        let boxed: Box<dyn Engine> = Box::new(field(16.0, 16.0, 1));
        assert!(boxed.viewport().is_sized());
    }

    // ---- Property-based tests ----

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn positions_stay_within_one_frame_of_the_walls(
                w in 1.0_f64..400.0,
                h in 1.0_f64..400.0,
                seed: u64,
                steps in 0_usize..600,
            ) {
                let mut f = field(w, h, seed);
                let slack = ParticleParams::default().max_speed;
                for i in 0..steps {
                    f.step(i as f64);
                }
                for p in f.particles() {
                    prop_assert!(p.position.x >= -slack && p.position.x <= w + slack,
                        "x = {} outside [0, {w}] by more than one frame", p.position.x);
                    prop_assert!(p.position.y >= -slack && p.position.y <= h + slack,
                        "y = {} outside [0, {h}] by more than one frame", p.position.y);
                }
            }

            #[test]
            fn opacity_stays_in_band(seed: u64, steps in 0_usize..400) {
                let mut f = field(300.0, 200.0, seed);
                for i in 0..steps {
                    f.step(i as f64);
                    for p in f.particles() {
                        prop_assert!((0.1..=0.6).contains(&p.opacity),
                            "opacity {} left the band", p.opacity);
                    }
                }
            }

            #[test]
            fn deterministic_across_instances(seed: u64, steps in 0_usize..50) {
                let mut a = field(256.0, 256.0, seed);
                let mut b = field(256.0, 256.0, seed);
                for i in 0..steps {
                    a.step(i as f64);
                    b.step(i as f64);
                }
                prop_assert_eq!(a.particles(), b.particles());
            }
        }
    }
}
