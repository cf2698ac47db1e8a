use crate::error::Result;
use crate::geometry::Curve;
use crate::math::Point3;

/// Result of a closest point query.
#[derive(Debug, Clone, Copy)]
pub struct ClosestPointResult {
    /// The closest sampled point on the curve.
    pub point: Point3,
    /// The parameter value at the closest point.
    pub parameter: f64,
    /// The distance from the query point to the closest point.
    pub distance: f64,
}

/// Finds the curve parameter nearest to a world position by uniform sampling.
///
/// The curve is evaluated at `resolution + 1` evenly spaced parameters across
/// its domain and the nearest sample wins, so the returned parameter is off
/// by at most one sample step. The first sample wins ties.
#[derive(Debug, Clone, Copy)]
pub struct ClosestParameter {
    point: Point3,
    resolution: usize,
}

impl ClosestParameter {
    /// Sample count used unless overridden.
    pub const DEFAULT_RESOLUTION: usize = 100;

    /// Creates a new `ClosestParameter` query.
    #[must_use]
    pub fn new(point: Point3) -> Self {
        Self {
            point,
            resolution: Self::DEFAULT_RESOLUTION,
        }
    }

    /// Overrides the number of sample intervals (at least one).
    #[must_use]
    pub fn with_resolution(mut self, resolution: usize) -> Self {
        self.resolution = resolution.max(1);
        self
    }

    /// Executes the query, returning the nearest sample.
    ///
    /// # Errors
    ///
    /// Returns an error if the curve cannot be evaluated.
    #[allow(clippy::cast_precision_loss)]
    pub fn execute<C: Curve + ?Sized>(&self, curve: &C) -> Result<ClosestPointResult> {
        let domain = curve.domain();
        let span = domain.t_max - domain.t_min;

        let mut best = ClosestPointResult {
            point: curve.evaluate(domain.t_min)?,
            parameter: domain.t_min,
            distance: f64::INFINITY,
        };
        for i in 0..=self.resolution {
            let t = domain.t_min + span * (i as f64 / self.resolution as f64);
            let pt = curve.evaluate(t)?;
            let d = (self.point - pt).norm();
            if d < best.distance {
                best = ClosestPointResult {
                    point: pt,
                    parameter: t,
                    distance: d,
                };
            }
        }
        Ok(best)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::PolynomialCurve;
    use approx::assert_relative_eq;

    fn curve() -> PolynomialCurve {
        PolynomialCurve::new(&[
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 2.0),
            Point3::new(-1.0, 0.5, 4.0),
            Point3::new(0.0, 0.0, 6.0),
        ])
        .unwrap()
    }

    #[test]
    fn point_on_curve_projects_back_to_its_parameter() {
        let curve = curve();
        let target = curve.evaluate(0.37).unwrap();
        let result = ClosestParameter::new(target).execute(&curve).unwrap();
        assert!((result.parameter - 0.37).abs() <= 1.0 / 100.0);
        assert!(result.distance < 1e-9);
    }

    #[test]
    fn point_off_curve_projects_perpendicular_on_straight_path() {
        let line = PolynomialCurve::new(&[Point3::origin(), Point3::new(10.0, 0.0, 0.0)]).unwrap();
        let result = ClosestParameter::new(Point3::new(5.0, 3.0, 0.0))
            .execute(&line)
            .unwrap();
        assert_relative_eq!(result.parameter, 0.5, epsilon = 1e-12);
        assert_relative_eq!(result.distance, 3.0, epsilon = 1e-9);
    }

    #[test]
    fn point_before_start_clamps_to_start() {
        let line = PolynomialCurve::new(&[Point3::origin(), Point3::new(10.0, 0.0, 0.0)]).unwrap();
        let result = ClosestParameter::new(Point3::new(-5.0, 0.0, 0.0))
            .execute(&line)
            .unwrap();
        assert_relative_eq!(result.parameter, 0.0);
        assert_relative_eq!(result.distance, 5.0, epsilon = 1e-9);
    }

    #[test]
    fn coarse_resolution_bounds_the_error() {
        let line = PolynomialCurve::new(&[Point3::origin(), Point3::new(10.0, 0.0, 0.0)]).unwrap();
        let result = ClosestParameter::new(Point3::new(3.3, 1.0, 0.0))
            .with_resolution(4)
            .execute(&line)
            .unwrap();
        assert_relative_eq!(result.parameter, 0.25);
    }
}
