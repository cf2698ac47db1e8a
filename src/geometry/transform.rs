use crate::math::{forward, Point3, Rotation, Vector3};

/// World placement of a visual instance: position, orientation and scale.
///
/// Local +Z is the forward axis; segment length is carried in `scale.z`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Point3,
    pub rotation: Rotation,
    pub scale: Vector3,
}

impl Transform {
    /// Creates a unit-scale transform.
    #[must_use]
    pub fn new(position: Point3, rotation: Rotation) -> Self {
        Self {
            position,
            rotation,
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    /// Returns the world-space forward direction.
    #[must_use]
    pub fn forward(&self) -> Vector3 {
        self.rotation * forward()
    }

    /// Returns a copy stretched along the local forward axis.
    #[must_use]
    pub fn with_forward_scale(mut self, length: f64) -> Self {
        self.scale.z = length;
        self
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new(Point3::origin(), Rotation::identity())
    }
}
