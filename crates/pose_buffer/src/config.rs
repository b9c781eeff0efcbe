use serde::{Deserialize, Serialize};

use crate::frame::DEFAULT_MAX_POOLED_FRAMES;

pub const DEFAULT_BUFFER_TIME_SECS: f64 = 0.15;

/// Position interpolation algorithm. Orientation is always slerped and scale
/// always lerped regardless of mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpolationMode {
    #[default]
    Lerp,
    Hermite,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("buffer time must be finite, got {0}")]
    NonFiniteBufferTime(f64),
    #[error("buffer time must not be negative, got {0} ms")]
    NegativeBufferTime(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpolationConfig {
    pub mode: InterpolationMode,
    pub buffer_time_ms: f64,
    pub max_pooled_frames: usize,
}

impl Default for InterpolationConfig {
    fn default() -> Self {
        Self {
            mode: InterpolationMode::Lerp,
            buffer_time_ms: DEFAULT_BUFFER_TIME_SECS * 1000.0,
            max_pooled_frames: DEFAULT_MAX_POOLED_FRAMES,
        }
    }
}

impl InterpolationConfig {
    pub fn from_seconds(mode: InterpolationMode, buffer_time_secs: f64) -> Self {
        Self {
            mode,
            buffer_time_ms: buffer_time_secs * 1000.0,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.buffer_time_ms.is_finite() {
            return Err(ConfigError::NonFiniteBufferTime(self.buffer_time_ms));
        }
        if self.buffer_time_ms < 0.0 {
            return Err(ConfigError::NegativeBufferTime(self.buffer_time_ms));
        }
        Ok(())
    }
}
