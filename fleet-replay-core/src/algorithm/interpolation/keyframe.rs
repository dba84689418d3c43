use nalgebra::{UnitQuaternion, Vector3};
use uom::si::f64::Time;

/// a timestamped sample of an animated entity. velocity is in position
/// units per second.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyframe {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    pub orientation: UnitQuaternion<f64>,
    pub scale: Vector3<f64>,
    pub timestamp: Time,
}

impl Keyframe {
    /// at the origin, at rest, unrotated and at unit scale
    pub fn identity(timestamp: Time) -> Self {
        Self {
            position: Vector3::zeros(),
            velocity: Vector3::zeros(),
            orientation: UnitQuaternion::identity(),
            scale: Vector3::new(1.0, 1.0, 1.0),
            timestamp,
        }
    }

    /// a new keyframe at `timestamp` taking the supplied components of
    /// `update` and the rest from `self`.
    pub fn successor(&self, update: &KeyframeUpdate, timestamp: Time) -> Self {
        Self {
            position: update.position.unwrap_or(self.position),
            velocity: update.velocity.unwrap_or(self.velocity),
            orientation: update.orientation.unwrap_or(self.orientation),
            scale: update.scale.unwrap_or(self.scale),
            timestamp,
        }
    }

    /// overwrites only the supplied components of `update`
    pub fn merge(&mut self, update: &KeyframeUpdate) {
        if let Some(p) = update.position {
            self.position = p;
        }
        if let Some(v) = update.velocity {
            self.velocity = v;
        }
        if let Some(q) = update.orientation {
            self.orientation = q;
        }
        if let Some(s) = update.scale {
            self.scale = s;
        }
    }
}

/// components to set on the next keyframe. components left `None` carry
/// over from the preceding keyframe.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyframeUpdate {
    pub position: Option<Vector3<f64>>,
    pub velocity: Option<Vector3<f64>>,
    pub orientation: Option<UnitQuaternion<f64>>,
    pub scale: Option<Vector3<f64>>,
}

impl KeyframeUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(mut self, position: Vector3<f64>) -> Self {
        self.position = Some(position);
        self
    }

    pub fn velocity(mut self, velocity: Vector3<f64>) -> Self {
        self.velocity = Some(velocity);
        self
    }

    pub fn orientation(mut self, orientation: UnitQuaternion<f64>) -> Self {
        self.orientation = Some(orientation);
        self
    }

    pub fn scale(mut self, scale: Vector3<f64>) -> Self {
        self.scale = Some(scale);
        self
    }
}
