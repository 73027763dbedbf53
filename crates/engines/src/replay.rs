//! Offline playback of a [`Seed`]: the same frame loop the browser runs,
//! driven by a [`ManualScheduler`] at fixed timestamps.

use backdrop_core::error::EngineError;
use backdrop_core::frame_loop::{AnimationLoop, ManualScheduler};
use backdrop_core::surface::Surface;
use backdrop_core::{Engine, Seed};
use log::{debug, info};

use crate::EngineKind;

/// Builds the seed's engine, sizes it, places the pointer, and runs
/// `seed.frames` frames onto `surface`. Frame `i` is stamped
/// `i * frame_interval_ms`.
///
/// With zero frames the initial state is rendered once without stepping,
/// so the surface always shows the engine.
pub fn replay(seed: &Seed, surface: &mut dyn Surface) -> Result<EngineKind, EngineError> {
    seed.validate()?;
    let mut engine = EngineKind::from_name(&seed.engine, seed.seed, &seed.params)?;
    engine.resize(seed.surface_size()?);
    if let Some([x, y]) = seed.pointer {
        engine.pointer_moved(x, y);
    }

    if seed.frames == 0 {
        engine.render(surface);
        return Ok(engine);
    }

    let mut scheduler = ManualScheduler::new();
    let mut anim = AnimationLoop::new(engine);
    anim.start(&mut scheduler)?;
    for i in 0..seed.frames {
        if scheduler.fire().is_none() {
            break;
        }
        anim.on_frame(seed.frame_time(i), surface, &mut scheduler)?;
    }
    anim.stop(&mut scheduler)?;
    debug!("replay left {} pending frame(s)", scheduler.pending().len());
    info!(
        "replayed {} ({}x{}, seed {}) for {} frames",
        seed.engine,
        seed.width,
        seed.height,
        seed.seed,
        anim.frames()
    );
    Ok(anim.into_engine())
}

#[cfg(test)]
mod tests {
    use super::*;
    use backdrop_core::surface::{DrawCommand, RecordingSurface};
    use serde_json::json;

    #[test]
    fn replay_runs_requested_frames() {
        let mut seed = Seed::new("particles", 64, 48, 3);
        seed.frames = 5;
        seed.params = json!({"count": 4});
        let mut surface = RecordingSurface::new();
        replay(&seed, &mut surface).unwrap();
        let clears = surface
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::ClearRect { .. }))
            .count();
        assert_eq!(clears, 5);
        assert_eq!(surface.fill_count(), 5 * 4);
    }

    #[test]
    fn zero_frames_renders_initial_state_once() {
        let seed = Seed::new("wave", 100, 50, 1);
        let mut surface = RecordingSurface::new();
        let engine = replay(&seed, &mut surface).unwrap();
        assert_eq!(surface.fill_count(), 1);
        assert!(engine.viewport().is_sized());
    }

    #[test]
    fn replay_is_deterministic() {
        let mut seed = Seed::new("particles", 128, 128, 77);
        seed.frames = 20;
        let mut a = RecordingSurface::new();
        let mut b = RecordingSurface::new();
        replay(&seed, &mut a).unwrap();
        replay(&seed, &mut b).unwrap();
        assert_eq!(a.commands(), b.commands());
    }

    #[test]
    fn pointer_from_seed_reaches_the_engine() {
        let mut with_pointer = Seed::new("wave", 400, 200, 1);
        with_pointer.frames = 3;
        let mut without = with_pointer.clone();
        with_pointer.pointer = Some([200.0, 100.0]);
        without.pointer = None;
        let mut a = RecordingSurface::new();
        let mut b = RecordingSurface::new();
        replay(&with_pointer, &mut a).unwrap();
        replay(&without, &mut b).unwrap();
        assert_ne!(a.commands(), b.commands());
    }

    #[test]
    fn replay_rejects_invalid_seed() {
        let mut surface = RecordingSurface::new();
        let err = replay(&Seed::new("wave", 0, 10, 1), &mut surface).err().unwrap();
        assert!(matches!(err, EngineError::InvalidDimensions));
        let err = replay(&Seed::new("plasma", 10, 10, 1), &mut surface)
            .err()
            .unwrap();
        assert!(matches!(err, EngineError::UnknownEngine(_)));
    }
}
