pub mod lagrange;

use crate::error::{GeometryError, Result};

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Orientation type used for every placed object.
pub type Rotation = nalgebra::UnitQuaternion<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// World up axis. Vertical offsets (jumps) and horizontal offsets (curve
/// widening) are measured against it.
#[must_use]
pub fn up() -> Vector3 {
    Vector3::y()
}

/// World forward axis, the local axis a segment or agent extends along.
#[must_use]
pub fn forward() -> Vector3 {
    Vector3::z()
}

/// Linear interpolation between `a` and `b`, with `u` clamped to `[0, 1]`.
#[must_use]
pub fn lerp(a: f64, b: f64, u: f64) -> f64 {
    let u = u.clamp(0.0, 1.0);
    a + (b - a) * u
}

/// Inverse of [`lerp`]: where `value` sits between `a` and `b`, clamped to `[0, 1]`.
#[must_use]
pub fn inverse_lerp(a: f64, b: f64, value: f64) -> f64 {
    if (b - a).abs() < TOLERANCE {
        return 0.0;
    }
    ((value - a) / (b - a)).clamp(0.0, 1.0)
}

/// Rotation whose local +Z axis points along `direction`, keeping +Y as
/// close to world up as possible.
///
/// # Errors
///
/// Returns [`GeometryError::ZeroVector`] if `direction` has no length.
pub fn look_rotation(direction: &Vector3) -> Result<Rotation> {
    let len = direction.norm();
    if len < TOLERANCE {
        return Err(GeometryError::ZeroVector.into());
    }
    let dir = direction / len;
    // Looking straight up or down leaves world up undefined as a roll reference.
    let reference = if dir.cross(&up()).norm() < 1e-6 {
        forward()
    } else {
        up()
    };
    Ok(Rotation::face_towards(&dir, &reference))
}

/// Unsigned angle between two vectors in degrees, `0` if either is zero-length.
#[must_use]
pub fn angle_deg(a: &Vector3, b: &Vector3) -> f64 {
    if a.norm() < TOLERANCE || b.norm() < TOLERANCE {
        return 0.0;
    }
    a.angle(b).to_degrees()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn lerp_clamps_parameter() {
        assert_relative_eq!(lerp(2.0, 4.0, 0.5), 3.0);
        assert_relative_eq!(lerp(2.0, 4.0, -1.0), 2.0);
        assert_relative_eq!(lerp(2.0, 4.0, 7.0), 4.0);
    }

    #[test]
    fn inverse_lerp_of_flat_range_is_zero() {
        assert_relative_eq!(inverse_lerp(1.0, 1.0, 5.0), 0.0);
        assert_relative_eq!(inverse_lerp(0.0, 10.0, 2.5), 0.25);
    }

    #[test]
    fn look_rotation_maps_forward_onto_direction() {
        let dir = Vector3::new(1.0, 0.0, 1.0);
        let rot = look_rotation(&dir).unwrap();
        let mapped = rot * forward();
        assert_relative_eq!(mapped, dir.normalize(), epsilon = 1e-9);
    }

    #[test]
    fn look_rotation_handles_vertical_direction() {
        let rot = look_rotation(&Vector3::new(0.0, 2.0, 0.0)).unwrap();
        let mapped = rot * forward();
        assert_relative_eq!(mapped, Vector3::y(), epsilon = 1e-9);
    }

    #[test]
    fn look_rotation_rejects_zero_vector() {
        assert!(look_rotation(&Vector3::zeros()).is_err());
    }

    #[test]
    fn angle_between_perpendicular_axes() {
        assert_relative_eq!(angle_deg(&Vector3::x(), &Vector3::z()), 90.0, epsilon = 1e-9);
        assert_relative_eq!(angle_deg(&Vector3::zeros(), &Vector3::z()), 0.0);
    }
}
