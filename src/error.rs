//! Error types
//!
//! Every failure the loop models happens before the first frame. Once running,
//! update and render are infallible by contract.

use thiserror::Error;

/// Engine module failed to load or construct.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("engine module failed to load: {0}")]
    Load(String),
    #[error("engine construction failed: {0}")]
    Construct(String),
    #[error("graphics device request failed: {0}")]
    Device(String),
}

/// Invalid loop configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("tick length must be a positive finite number of milliseconds, got {0}")]
    InvalidTickLength(f64),
    #[error("catch-up clamp must allow at least one tick per frame")]
    ZeroClamp,
    #[error("unknown log level `{0}`")]
    UnknownLogLevel(String),
    #[error("malformed config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures on the startup path. None of these are retried.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("no window or document available")]
    NoWindow,
    #[error("canvas element `#{0}` not found")]
    SurfaceMissing(String),
    #[error("graphics context unavailable: {0}")]
    GraphicsUnavailable(String),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl StartupError {
    /// Fatal preconditions are surfaced to the user, not just logged.
    pub fn is_fatal_precondition(&self) -> bool {
        matches!(
            self,
            StartupError::NoWindow
                | StartupError::SurfaceMissing(_)
                | StartupError::GraphicsUnavailable(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precondition_classification() {
        assert!(StartupError::GraphicsUnavailable("no webgpu".into()).is_fatal_precondition());
        assert!(StartupError::SurfaceMissing("canvas".into()).is_fatal_precondition());

        let engine: StartupError = EngineError::Load("404".into()).into();
        assert!(!engine.is_fatal_precondition());
        assert_eq!(engine.to_string(), "engine module failed to load: 404");
    }
}
