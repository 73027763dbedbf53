//! DOM-backed pieces: the canvas surface, the frame scheduler, and the
//! exported [`Backdrop`] handle that ties them to an engine.

mod backdrop;
mod canvas;

pub use backdrop::Backdrop;
