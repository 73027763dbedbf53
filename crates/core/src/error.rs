//! Error types for the backdrop core.

use thiserror::Error;

/// Errors produced while building engines or driving the frame loop.
///
/// Simulation steps themselves never fail; everything here is raised at
/// construction time or at the platform boundary.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A surface dimension was negative, NaN or infinite.
    #[error("invalid dimensions: width and height must be finite and non-negative")]
    InvalidDimensions,

    /// A parameter was present and well-typed but out of its valid range.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParam { name: String, reason: String },

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// No engine is registered under this name.
    #[error("unknown engine: {0}")]
    UnknownEngine(String),

    /// The frame scheduler refused to queue or cancel a frame.
    #[error("frame scheduler error: {0}")]
    Scheduler(String),

    /// File output failed.
    #[error("i/o error: {0}")]
    Io(String),
}

impl EngineError {
    /// Shorthand for [`EngineError::InvalidParam`].
    pub fn invalid_param(name: &str, reason: impl Into<String>) -> Self {
        EngineError::InvalidParam {
            name: name.to_owned(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_dimensions_displays_readable_message() {
        let msg = format!("{}", EngineError::InvalidDimensions);
        assert!(
            msg.contains("width") && msg.contains("height"),
            "expected message mentioning width and height, got: {msg}"
        );
    }

    #[test]
    fn invalid_param_includes_name_and_reason() {
        let err = EngineError::invalid_param("min_opacity", "must be below max_opacity");
        let msg = format!("{err}");
        assert!(msg.contains("min_opacity"), "missing name in: {msg}");
        assert!(msg.contains("below max_opacity"), "missing reason in: {msg}");
    }

    #[test]
    fn unknown_engine_includes_name() {
        let msg = format!("{}", EngineError::UnknownEngine("aurora".into()));
        assert!(msg.contains("aurora"), "missing engine name in: {msg}");
    }

    #[test]
    fn scheduler_and_io_include_message() {
        let sched = format!("{}", EngineError::Scheduler("no window".into()));
        let io = format!("{}", EngineError::Io("disk full".into()));
        assert!(sched.contains("no window"));
        assert!(io.contains("disk full"));
    }

    #[test]
    fn invalid_color_includes_message() {
        let msg = format!("{}", EngineError::InvalidColor("bad hex".into()));
        assert!(msg.contains("bad hex"), "missing message in: {msg}");
    }

    #[test]
    fn engine_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<EngineError>();
    }

    #[test]
    fn engine_error_implements_std_error() {
        fn assert_std_error<T: std::error::Error>() {}
        assert_std_error::<EngineError>();
    }
}
