//! Loop configuration
//!
//! Persisted as JSON in LocalStorage. Missing fields fall back to defaults.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// What to do when a frame owes more ticks than one frame should carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CatchUpPolicy {
    /// Run every owed tick before rendering
    #[default]
    Unbounded,
    /// Run at most `max_ticks` per frame; the rest stay owed for later frames
    Clamp { max_ticks: u64 },
}

impl CatchUpPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            CatchUpPolicy::Unbounded => "unbounded",
            CatchUpPolicy::Clamp { .. } => "clamp",
        }
    }

    /// Number of ticks to run this frame out of `owed`
    pub fn limit(&self, owed: u64) -> u64 {
        match *self {
            CatchUpPolicy::Unbounded => owed,
            CatchUpPolicy::Clamp { max_ticks } => owed.min(max_ticks),
        }
    }
}

/// Frame loop configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopConfig {
    /// Fixed simulation step, in the same unit as frame timestamps (ms)
    pub tick_length_ms: f64,
    /// Catch-up behavior after a long gap between frames
    pub catch_up: CatchUpPolicy,
    /// Frames owing more ticks than this are logged as stalls
    pub stall_warning_ticks: u64,
    /// Id of the canvas element to drive
    pub canvas_id: String,
    /// `log` level name (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            tick_length_ms: DEFAULT_TICK_LENGTH_MS,
            catch_up: CatchUpPolicy::Unbounded,
            stall_warning_ticks: DEFAULT_STALL_WARNING_TICKS,
            canvas_id: DEFAULT_CANVAS_ID.to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl LoopConfig {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "steady_tick_config";

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: LoopConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tick_length_ms.is_finite() && self.tick_length_ms > 0.0) {
            return Err(ConfigError::InvalidTickLength(self.tick_length_ms));
        }
        if self.catch_up == (CatchUpPolicy::Clamp { max_ticks: 0 }) {
            return Err(ConfigError::ZeroClamp);
        }
        self.log_level()?;
        Ok(())
    }

    pub fn log_level(&self) -> Result<log::Level, ConfigError> {
        self.log_level
            .parse::<log::Level>()
            .map_err(|_| ConfigError::UnknownLogLevel(self.log_level.clone()))
    }

    /// Load config from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded loop config from LocalStorage");
                        return config;
                    }
                    Err(e) => log::warn!("Ignoring stored loop config: {}", e),
                }
            }
        }

        log::info!("Using default loop config");
        Self::default()
    }

    /// Save config to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Loop config saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
