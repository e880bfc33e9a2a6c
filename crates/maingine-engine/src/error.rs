use std::fmt;

/// Configuration and usage errors reported to the embedder.
///
/// Collaborator failures (window, GPU) are reported as `anyhow::Error` with
/// context instead; they are fatal to start-up.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// A target rate is negative, NaN or infinite.
    InvalidRate { axis: &'static str, value: f64 },
    /// The main mode names nothing in the registry.
    UnknownMode(String),
    /// `run` was called before a surface was attached.
    NotInitialized,
    /// A surface is already attached.
    AlreadyInitialized,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRate { axis, value } => {
                write!(f, "invalid target {axis} rate {value}: must be a finite number >= 0")
            }
            Self::UnknownMode(name) => write!(f, "mode '{name}' is not registered"),
            Self::NotInitialized => write!(f, "engine must be initialized before running"),
            Self::AlreadyInitialized => write!(f, "engine is already initialized"),
        }
    }
}

impl std::error::Error for EngineError {}
