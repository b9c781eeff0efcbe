use std::collections::VecDeque;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, InterpolationConfig, InterpolationMode};
use crate::frame::{FramePool, Keyframe};
use crate::interp::{hermite, lerp, slerp};
use crate::sample::PoseSample;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BufferState {
    /// Waiting for the first sample; the clock does not run.
    Initializing,
    /// Output holds the first sample until one buffering window has elapsed.
    Buffering,
    /// Output is interpolated each tick at `clock - buffer_time`.
    Playing,
}

/// The smoothed transform emitted by a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Quat,
    pub scale: Vec3,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BufferStats {
    pub state: BufferState,
    pub pending_frames: usize,
    pub pooled_frames: usize,
    pub clock_ms: f64,
    pub read_time_ms: f64,
}

/// Time-indexed keyframe queue that turns sporadic pose samples for a single
/// entity into a continuous per-frame pose.
///
/// Samples are stamped with the buffer's own clock when appended. Each
/// [`advance`](Self::advance) moves the clock forward and interpolates between
/// the origin frame (the last sample the playhead passed) and the head of the
/// pending queue, read `buffer_time_ms` behind the clock.
#[derive(Debug)]
pub struct InterpolationBuffer {
    config: InterpolationConfig,
    state: BufferState,
    clock_ms: f64,
    pending: VecDeque<Keyframe>,
    origin: Keyframe,
    pool: FramePool,
    output: Pose,
}

impl InterpolationBuffer {
    pub fn new(config: InterpolationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_config(config))
    }

    pub fn create(mode: InterpolationMode, buffer_time_secs: f64) -> Result<Self, ConfigError> {
        Self::new(InterpolationConfig::from_seconds(mode, buffer_time_secs))
    }

    pub fn with_defaults() -> Self {
        Self::from_config(InterpolationConfig::default())
    }

    fn from_config(config: InterpolationConfig) -> Self {
        let mut pool = FramePool::new(config.max_pooled_frames);
        let origin = pool.acquire();

        Self {
            config,
            state: BufferState::Initializing,
            clock_ms: 0.0,
            pending: VecDeque::new(),
            origin,
            pool,
            output: Pose::default(),
        }
    }

    /// Records a partial pose update at the current clock time.
    ///
    /// A second sample on the same tick is merged into the tail keyframe
    /// field by field. Otherwise a new keyframe is queued with absent fields
    /// copied from the previous keyframe.
    pub fn append_sample(&mut self, sample: PoseSample) {
        if let Some(tail) = self.pending.back_mut() {
            if tail.time_ms == self.clock_ms {
                tail.merge(&sample);
                return;
            }
        }

        let mut frame = self.pool.acquire();
        let prior = self.pending.back().unwrap_or(&self.origin);
        frame.fill_from(&sample, prior, self.clock_ms);
        self.pending.push_back(frame);
    }

    pub fn set_target(
        &mut self,
        position: Option<Vec3>,
        velocity: Option<Vec3>,
        orientation: Option<Quat>,
        scale: Option<Vec3>,
    ) {
        self.append_sample(PoseSample::new(position, velocity, orientation, scale));
    }

    pub fn set_position(&mut self, position: Vec3, velocity: Option<Vec3>) {
        self.append_sample(PoseSample {
            position: Some(position),
            velocity,
            ..Default::default()
        });
    }

    pub fn set_orientation(&mut self, orientation: Quat) {
        self.append_sample(PoseSample::orientation(orientation));
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.append_sample(PoseSample::scale(scale));
    }

    /// Releases the origin and replaces it with the queue head, or with a
    /// fresh pooled frame when the queue is empty.
    fn promote_origin(&mut self) {
        let next = match self.pending.pop_front() {
            Some(frame) => frame,
            None => self.pool.acquire(),
        };
        let stale = std::mem::replace(&mut self.origin, next);
        self.pool.release(stale);
    }

    pub fn advance(&mut self, delta_ms: f64) {
        let delta_ms = if delta_ms >= 0.0 {
            delta_ms
        } else {
            log::warn!("Ignoring invalid tick delta {} ms", delta_ms);
            0.0
        };

        if self.state == BufferState::Initializing {
            if self.pending.is_empty() {
                return;
            }
            self.promote_origin();
            self.output.position = self.origin.position;
            self.output.orientation = self.origin.orientation;
            self.output.scale = self.origin.scale;
            self.transition(BufferState::Buffering);
        }

        self.clock_ms += delta_ms;

        if self.state == BufferState::Buffering
            && !self.pending.is_empty()
            && self.clock_ms > self.config.buffer_time_ms
        {
            self.transition(BufferState::Playing);
        }

        if self.state == BufferState::Playing {
            let read_time = self.read_time_ms();
            self.expire_frames(read_time);
            self.interpolate(read_time);
        }
    }

    fn expire_frames(&mut self, read_time: f64) {
        while let Some(head) = self.pending.front() {
            if read_time <= head.time_ms {
                break;
            }

            if self.pending.len() > 1 {
                self.promote_origin();
                continue;
            }

            // Keep the last known sample as the target so playback holds its
            // pose instead of draining the queue. Anchored at the current
            // clock, samples appended before the next tick merge into it.
            let anchor_time = self.clock_ms;
            if let Some(head) = self.pending.front_mut() {
                self.origin.copy_pose_from(head);
                self.origin.time_ms = head.time_ms;
                head.time_ms = anchor_time;
                log::trace!(
                    "Re-anchored last sample from {} ms to {} ms",
                    self.origin.time_ms,
                    anchor_time
                );
            }
        }
    }

    fn interpolate(&mut self, read_time: f64) {
        let Some(target) = self.pending.front() else {
            return;
        };
        if target.time_ms <= 0.0 {
            return;
        }

        let origin = &self.origin;
        let span = target.time_ms - origin.time_ms;
        let alpha = if span > 0.0 {
            ((read_time - origin.time_ms) / span) as f32
        } else {
            0.0
        };

        self.output.position = match self.config.mode {
            InterpolationMode::Lerp => lerp(origin.position, target.position, alpha),
            InterpolationMode::Hermite => {
                let span = span.max(0.0) as f32;
                hermite(
                    origin.position,
                    target.position,
                    origin.velocity * span,
                    target.velocity * span,
                    alpha,
                )
            }
        };
        self.output.orientation = slerp(origin.orientation, target.orientation, alpha);
        self.output.scale = lerp(origin.scale, target.scale, alpha);
    }

    fn transition(&mut self, next: BufferState) {
        log::debug!(
            "Interpolation buffer {:?} -> {:?} at {} ms ({} pending)",
            self.state,
            next,
            self.clock_ms,
            self.pending.len()
        );
        self.state = next;
    }

    /// Returns every live keyframe to the pool and starts over in
    /// [`BufferState::Initializing`].
    pub fn reset(&mut self) {
        for frame in self.pending.drain(..) {
            self.pool.release(frame);
        }
        let stale = std::mem::take(&mut self.origin);
        self.pool.release(stale);

        self.state = BufferState::Initializing;
        self.clock_ms = 0.0;
        self.output = Pose::default();
        log::debug!("Interpolation buffer reset");
    }

    pub fn position(&self) -> &Vec3 {
        &self.output.position
    }

    pub fn orientation(&self) -> &Quat {
        &self.output.orientation
    }

    pub fn scale(&self) -> &Vec3 {
        &self.output.scale
    }

    pub fn pose(&self) -> Pose {
        self.output
    }

    pub fn state(&self) -> BufferState {
        self.state
    }

    pub fn mode(&self) -> InterpolationMode {
        self.config.mode
    }

    pub fn buffer_time_ms(&self) -> f64 {
        self.config.buffer_time_ms
    }

    pub fn clock_ms(&self) -> f64 {
        self.clock_ms
    }

    pub fn read_time_ms(&self) -> f64 {
        self.clock_ms - self.config.buffer_time_ms
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_playing(&self) -> bool {
        self.state == BufferState::Playing
    }

    pub fn pending_frames(&self) -> impl Iterator<Item = &Keyframe> {
        self.pending.iter()
    }

    pub fn origin(&self) -> &Keyframe {
        &self.origin
    }

    pub fn stats(&self) -> BufferStats {
        BufferStats {
            state: self.state,
            pending_frames: self.pending.len(),
            pooled_frames: self.pool.len(),
            clock_ms: self.clock_ms,
            read_time_ms: self.read_time_ms(),
        }
    }
}

impl Default for InterpolationBuffer {
    fn default() -> Self {
        Self::with_defaults()
    }
}
