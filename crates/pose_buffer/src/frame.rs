use glam::{Quat, Vec3};

use crate::sample::PoseSample;

pub const DEFAULT_MAX_POOLED_FRAMES: usize = 64;

/// A timestamped pose sample on the buffer's internal clock.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyframe {
    pub position: Vec3,
    pub velocity: Vec3,
    pub orientation: Quat,
    pub scale: Vec3,
    pub time_ms: f64,
}

impl Default for Keyframe {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            scale: Vec3::ZERO,
            time_ms: 0.0,
        }
    }
}

impl Keyframe {
    /// Overwrites only the fields present in `sample`.
    pub fn merge(&mut self, sample: &PoseSample) {
        if let Some(position) = sample.position {
            self.position = position;
        }
        if let Some(velocity) = sample.velocity {
            self.velocity = velocity;
        }
        if let Some(orientation) = sample.orientation {
            self.orientation = orientation;
        }
        if let Some(scale) = sample.scale {
            self.scale = scale;
        }
    }

    /// Overwrites every field with `sample`, falling back to `prior` where absent.
    pub fn fill_from(&mut self, sample: &PoseSample, prior: &Keyframe, time_ms: f64) {
        self.position = sample.position.unwrap_or(prior.position);
        self.velocity = sample.velocity.unwrap_or(prior.velocity);
        self.orientation = sample.orientation.unwrap_or(prior.orientation);
        self.scale = sample.scale.unwrap_or(prior.scale);
        self.time_ms = time_ms;
    }

    /// Copies the pose fields of `other` without touching `time_ms`.
    pub fn copy_pose_from(&mut self, other: &Keyframe) {
        self.position = other.position;
        self.velocity = other.velocity;
        self.orientation = other.orientation;
        self.scale = other.scale;
    }
}

/// Free list of recycled keyframes.
///
/// Frames are fungible: `acquire` hands out any free record (or a fresh zeroed
/// one) by value and `release` takes ownership back. Frames released while the
/// free list is at `max_free` are dropped instead of retained.
#[derive(Debug)]
pub struct FramePool {
    free: Vec<Keyframe>,
    max_free: usize,
}

impl FramePool {
    pub fn new(max_free: usize) -> Self {
        Self {
            free: Vec::with_capacity(max_free.min(DEFAULT_MAX_POOLED_FRAMES)),
            max_free,
        }
    }

    /// Returned frames keep whatever values they held when released; callers
    /// overwrite every field before use.
    pub fn acquire(&mut self) -> Keyframe {
        self.free.pop().unwrap_or_default()
    }

    pub fn release(&mut self, frame: Keyframe) {
        if self.free.len() < self.max_free {
            self.free.push(frame);
        }
    }

    pub fn len(&self) -> usize {
        self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.free.is_empty()
    }
}
