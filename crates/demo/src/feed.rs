use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use glam::{Quat, Vec3};
use pose_buffer::PoseSample;

#[derive(Debug, Clone, Default)]
pub struct NetworkConditions {
    pub loss_percent: f32,
    pub min_latency_ms: u32,
    pub max_latency_ms: u32,
    pub jitter_ms: u32,
}

/// Deterministic noise source so runs with the same seed replay identically.
#[derive(Debug, Clone)]
pub struct Noise {
    seed: u64,
    counter: u64,
}

impl Noise {
    pub fn new(seed: u64) -> Self {
        Self { seed, counter: 0 }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        self.counter.hash(&mut hasher);
        self.counter = self.counter.wrapping_add(1);
        hasher.finish()
    }

    pub fn next_percent(&mut self) -> f32 {
        (self.next_u64() as f64 / u64::MAX as f64 * 100.0) as f32
    }

    pub fn next_unit(&mut self) -> f32 {
        self.next_percent() / 100.0
    }
}

impl NetworkConditions {
    pub fn should_drop(&self, noise: &mut Noise) -> bool {
        if self.loss_percent <= 0.0 {
            return false;
        }
        noise.next_percent() < self.loss_percent
    }

    pub fn delay_ms(&self, noise: &mut Noise) -> f64 {
        if self.max_latency_ms == 0 && self.jitter_ms == 0 {
            return 0.0;
        }
        let base = self.min_latency_ms as f32;
        let range = self.max_latency_ms.saturating_sub(self.min_latency_ms) as f32;
        let jitter = if self.jitter_ms > 0 {
            noise.next_unit() * self.jitter_ms as f32
        } else {
            0.0
        };
        (base + noise.next_unit() * range + jitter) as f64
    }
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    deliver_at_ms: f64,
    sample: PoseSample,
}

/// Authoritative entity orbiting the origin, sampled at a fixed send rate and
/// delivered through [`NetworkConditions`].
#[derive(Debug)]
pub struct SimulatedFeed {
    radius: f32,
    angular_speed: f32,
    send_interval_ms: f64,
    next_send_ms: f64,
    conditions: NetworkConditions,
    noise: Noise,
    in_flight: Vec<InFlight>,
    sent: u64,
    dropped: u64,
}

impl SimulatedFeed {
    pub fn new(send_rate: u32, conditions: NetworkConditions, seed: u64) -> Self {
        Self {
            radius: 5.0,
            angular_speed: std::f32::consts::PI / 1000.0,
            send_interval_ms: 1000.0 / send_rate.max(1) as f64,
            next_send_ms: 0.0,
            conditions,
            noise: Noise::new(seed),
            in_flight: Vec::new(),
            sent: 0,
            dropped: 0,
        }
    }

    /// Ground-truth pose at `time_ms`. Velocity is in units per millisecond.
    pub fn truth(&self, time_ms: f64) -> PoseSample {
        let angle = self.angular_speed * time_ms as f32;
        let position = Vec3::new(angle.cos(), 0.0, angle.sin()) * self.radius;
        let velocity =
            Vec3::new(-angle.sin(), 0.0, angle.cos()) * self.radius * self.angular_speed;
        PoseSample {
            position: Some(position),
            velocity: Some(velocity),
            orientation: Some(Quat::from_rotation_y(-angle)),
            scale: None,
        }
    }

    /// Emits any samples due by `now_ms` and returns those arriving by then,
    /// oldest first.
    pub fn poll(&mut self, now_ms: f64) -> Vec<PoseSample> {
        while self.next_send_ms <= now_ms {
            let sample = self.truth(self.next_send_ms);
            self.sent += 1;
            if self.conditions.should_drop(&mut self.noise) {
                self.dropped += 1;
            } else {
                let deliver_at_ms = self.next_send_ms + self.conditions.delay_ms(&mut self.noise);
                self.in_flight.push(InFlight {
                    deliver_at_ms,
                    sample,
                });
            }
            self.next_send_ms += self.send_interval_ms;
        }

        self.in_flight
            .sort_by(|a, b| a.deliver_at_ms.total_cmp(&b.deliver_at_ms));
        let arrived = self
            .in_flight
            .iter()
            .take_while(|p| p.deliver_at_ms <= now_ms)
            .count();
        self.in_flight
            .drain(..arrived)
            .map(|p| p.sample)
            .collect()
    }

    pub fn sent(&self) -> u64 {
        self.sent
    }

    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}
