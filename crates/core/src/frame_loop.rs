//! A cancellable update-then-redraw loop driven by an external frame scheduler.
//!
//! The host supplies a [`FrameScheduler`] (`requestAnimationFrame` in the
//! browser, [`ManualScheduler`] offline). [`AnimationLoop`] requests one frame
//! at a time; each delivered frame runs exactly one `step` + `render` and
//! queues the next. `stop` cancels the pending request, and frames that
//! arrive after `stop` are ignored.

use crate::engine::Engine;
use crate::error::EngineError;
use crate::surface::Surface;
use log::{debug, trace};

/// Opaque id of a queued frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// "Invoke the frame callback before the next repaint."
pub trait FrameScheduler {
    /// Queues one frame callback.
    fn request_frame(&mut self) -> Result<FrameHandle, EngineError>;

    /// Withdraws a queued callback. Unknown or already-fired handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle) -> Result<(), EngineError>;
}

/// Whether the loop is currently scheduling frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoopState {
    #[default]
    Stopped,
    Running {
        pending: FrameHandle,
    },
}

/// Owns an engine and drives it one frame at a time.
pub struct AnimationLoop<E> {
    engine: E,
    state: LoopState,
    frames: u64,
}

impl<E: Engine> AnimationLoop<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            state: LoopState::Stopped,
            frames: 0,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn into_engine(self) -> E {
        self.engine
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, LoopState::Running { .. })
    }

    /// Frames rendered since construction.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Begins scheduling. Returns `Ok(false)` if the loop was already running.
    pub fn start(&mut self, scheduler: &mut dyn FrameScheduler) -> Result<bool, EngineError> {
        if self.is_running() {
            return Ok(false);
        }
        let pending = scheduler.request_frame()?;
        self.state = LoopState::Running { pending };
        debug!("animation loop started, first frame {pending:?}");
        Ok(true)
    }

    /// Cancels the pending frame. Returns `Ok(false)` if the loop was not running.
    pub fn stop(&mut self, scheduler: &mut dyn FrameScheduler) -> Result<bool, EngineError> {
        let LoopState::Running { pending } = self.state else {
            return Ok(false);
        };
        self.state = LoopState::Stopped;
        scheduler.cancel_frame(pending)?;
        debug!("animation loop stopped after {} frames", self.frames);
        Ok(true)
    }

    /// Runs one frame if the loop is running and queues the next.
    ///
    /// Returns `Ok(false)` for a frame delivered after `stop`.
    pub fn on_frame(
        &mut self,
        now_ms: f64,
        surface: &mut dyn Surface,
        scheduler: &mut dyn FrameScheduler,
    ) -> Result<bool, EngineError> {
        if !self.is_running() {
            trace!("ignoring frame at {now_ms}ms, loop is stopped");
            return Ok(false);
        }
        self.engine.step(now_ms);
        self.engine.render(surface);
        self.frames += 1;
        match scheduler.request_frame() {
            Ok(pending) => {
                self.state = LoopState::Running { pending };
                Ok(true)
            }
            Err(e) => {
                self.state = LoopState::Stopped;
                Err(e)
            }
        }
    }
}

/// A scheduler that only records requests; the caller decides when frames fire.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    pending: Vec<FrameHandle>,
    cancelled: Vec<FrameHandle>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests that have been neither fired nor cancelled.
    pub fn pending(&self) -> &[FrameHandle] {
        &self.pending
    }

    pub fn cancelled(&self) -> &[FrameHandle] {
        &self.cancelled
    }

    /// Fires the oldest pending request, removing it from the queue.
    pub fn fire(&mut self) -> Option<FrameHandle> {
        if self.pending.is_empty() {
            None
        } else {
            Some(self.pending.remove(0))
        }
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> Result<FrameHandle, EngineError> {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending.push(handle);
        Ok(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) -> Result<(), EngineError> {
        if let Some(idx) = self.pending.iter().position(|h| *h == handle) {
            self.pending.remove(idx);
            self.cancelled.push(handle);
        }
        Ok(())
    }
}
