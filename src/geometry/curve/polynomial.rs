use crate::error::{GeometryError, Result};
use crate::math::lagrange::{basis, derivative_basis};
use crate::math::{Point3, Vector3, TOLERANCE};

use super::{Curve, CurveDomain};

/// Interpolating polynomial curve through an ordered list of control points.
///
/// Node `i` of `N` is reached at `t = i / (N - 1)`, so the parameter is uniform
/// over control points rather than proportional to arc length. The curve
/// passes exactly through every node.
///
/// Consecutive identical control points are collapsed on construction, since
/// two nodes at the same position make the basis undefined. If that leaves a
/// single node, the curve degenerates to that point for every `t` and has no
/// tangent.
#[derive(Debug, Clone, PartialEq)]
pub struct PolynomialCurve {
    nodes: Vec<Point3>,
}

impl PolynomialCurve {
    /// Minimum number of control points a curve is built from.
    pub const MIN_CONTROL_POINTS: usize = 2;

    /// Creates a curve through `control_points`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InsufficientControlPoints`] for fewer than two points.
    pub fn new(control_points: &[Point3]) -> Result<Self> {
        if control_points.len() < Self::MIN_CONTROL_POINTS {
            return Err(GeometryError::InsufficientControlPoints {
                required: Self::MIN_CONTROL_POINTS,
                found: control_points.len(),
            }
            .into());
        }
        let mut nodes = control_points.to_vec();
        nodes.dedup();
        Ok(Self { nodes })
    }

    /// Returns the interpolation nodes after deduplication.
    #[must_use]
    pub fn nodes(&self) -> &[Point3] {
        &self.nodes
    }

    /// Returns whether every control point coincided and the curve is a single point.
    #[must_use]
    pub fn is_point(&self) -> bool {
        self.nodes.len() == 1
    }

    /// First node, reached at `t = 0`.
    #[must_use]
    pub fn start(&self) -> Point3 {
        self.nodes[0]
    }

    /// Last node, reached at `t = 1`.
    #[must_use]
    pub fn finish(&self) -> Point3 {
        self.nodes[self.nodes.len() - 1]
    }

    fn check_parameter(&self, t: f64) -> Result<()> {
        let domain = self.domain();
        if t < domain.t_min - TOLERANCE || t > domain.t_max + TOLERANCE || t.is_nan() {
            return Err(GeometryError::ParameterOutOfRange {
                parameter: "t",
                value: t,
                min: domain.t_min,
                max: domain.t_max,
            }
            .into());
        }
        Ok(())
    }
}

impl Curve for PolynomialCurve {
    fn evaluate(&self, t: f64) -> Result<Point3> {
        self.check_parameter(t)?;
        let count = self.nodes.len();
        if count == 1 {
            return Ok(self.nodes[0]);
        }
        let sum = self
            .nodes
            .iter()
            .enumerate()
            .fold(Vector3::zeros(), |acc, (i, p)| {
                acc + p.coords * basis(t, i, count)
            });
        Ok(Point3::from(sum))
    }

    fn tangent(&self, t: f64) -> Result<Vector3> {
        self.check_parameter(t)?;
        let count = self.nodes.len();
        if count == 1 {
            return Err(GeometryError::ZeroVector.into());
        }
        let derivative = self
            .nodes
            .iter()
            .enumerate()
            .fold(Vector3::zeros(), |acc, (i, p)| {
                acc + p.coords * derivative_basis(t, i, count)
            });
        let len = derivative.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(derivative / len)
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::unit()
    }

    fn is_closed(&self) -> bool {
        self.nodes.len() > 1 && self.start() == self.finish()
    }
}
