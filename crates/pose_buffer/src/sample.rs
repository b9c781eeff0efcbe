use glam::{Quat, Vec3};

/// A partial pose update. Absent fields are carried forward from the
/// previous keyframe when a new keyframe is recorded, and left untouched when
/// the update is coalesced into a keyframe recorded on the same tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PoseSample {
    pub position: Option<Vec3>,
    pub velocity: Option<Vec3>,
    pub orientation: Option<Quat>,
    pub scale: Option<Vec3>,
}

impl PoseSample {
    pub fn new(
        position: Option<Vec3>,
        velocity: Option<Vec3>,
        orientation: Option<Quat>,
        scale: Option<Vec3>,
    ) -> Self {
        Self {
            position,
            velocity,
            orientation,
            scale,
        }
    }

    pub fn position(position: Vec3) -> Self {
        Self {
            position: Some(position),
            ..Default::default()
        }
    }

    pub fn orientation(orientation: Quat) -> Self {
        Self {
            orientation: Some(orientation),
            ..Default::default()
        }
    }

    pub fn scale(scale: Vec3) -> Self {
        Self {
            scale: Some(scale),
            ..Default::default()
        }
    }
}
