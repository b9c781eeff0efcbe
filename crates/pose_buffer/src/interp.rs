//! Interpolation primitives used by the playback loop.
//!
//! None of these clamp `t`: values outside `[0, 1]` extrapolate along the
//! same curve.

use glam::{Quat, Vec3};

pub fn lerp(from: Vec3, to: Vec3, t: f32) -> Vec3 {
    from.lerp(to, t)
}

/// Shortest-arc spherical interpolation between unit quaternions.
pub fn slerp(from: Quat, to: Quat, t: f32) -> Quat {
    from.slerp(to, t)
}

/// Cubic Hermite curve through `p0` and `p1` with tangents `m0` and `m1`.
pub fn hermite(p0: Vec3, p1: Vec3, m0: Vec3, m1: Vec3, t: f32) -> Vec3 {
    let t2 = t * t;
    let t3 = t2 * t;

    let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
    let h01 = -2.0 * t3 + 3.0 * t2;
    let h10 = t3 - 2.0 * t2 + t;
    let h11 = t3 - t2;

    p0 * h00 + p1 * h01 + m0 * h10 + m1 * h11
}
