//! Failures of a `backdrop` invocation and the exit code each one maps to.
//!
//! | code | kind            | raised by                                        |
//! |------|-----------------|--------------------------------------------------|
//! | 2    | (clap)          | unparseable arguments, before `run` starts       |
//! | 10   | `engine`        | unknown engine, out-of-range params, bad size    |
//! | 11   | `io`            | reading `--seed-file`, writing PNG or seed files |
//! | 12   | `input`         | `--params`, `--pointer`, colors, seed file JSON  |
//! | 13   | `serialization` | printing JSON output                             |

use backdrop_core::EngineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    /// The scene was rejected while building or replaying the engine.
    #[error(transparent)]
    Engine(EngineError),
    #[error("{0}")]
    Io(String),
    /// Malformed command-line or scene input that never reached an engine.
    #[error("{0}")]
    Input(String),
    #[error("cannot encode output: {0}")]
    Serialization(String),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Engine(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }

    /// Short label for `--json` error output.
    pub fn kind(&self) -> &'static str {
        match self {
            CliError::Engine(_) => "engine",
            CliError::Io(_) => "io",
            CliError::Input(_) => "input",
            CliError::Serialization(_) => "serialization",
        }
    }
}

/// File failures surface as I/O and unparseable colors as input; the rest
/// stay engine errors.
impl From<EngineError> for CliError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::Io(msg) => CliError::Io(msg),
            EngineError::InvalidColor(msg) => CliError::Input(format!("invalid color: {msg}")),
            other => CliError::Engine(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}
