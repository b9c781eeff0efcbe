pub mod buffer;
pub mod config;
pub mod frame;
pub mod interp;
pub mod sample;

pub use buffer::{BufferState, BufferStats, InterpolationBuffer, Pose};
pub use config::{
    ConfigError, DEFAULT_BUFFER_TIME_SECS, InterpolationConfig, InterpolationMode,
};
pub use frame::{DEFAULT_MAX_POOLED_FRAMES, FramePool, Keyframe};
pub use sample::PoseSample;
