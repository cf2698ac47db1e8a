use tracing::{debug, warn};

use crate::error::Result;
use crate::geometry::{Curve, PolynomialCurve, Transform};
use crate::math::{angle_deg, forward, look_rotation, up, Point3, Vector3, TOLERANCE};
use crate::pool::{InstanceId, ObjectPool};

use super::{Segment, SegmentParams, FALLBACK_SEGMENT_LENGTH};

/// Rebuilds the chain of oriented path segments from control points.
///
/// Segment instances come from an [`ObjectPool`]; every rebuild returns the
/// whole live roster to the pool before checking instances out again, so
/// repeated rebuilds reuse the same instances instead of creating new ones.
#[derive(Debug)]
pub struct SegmentBuilder {
    params: SegmentParams,
    segment_length: f64,
    pool: ObjectPool<Transform>,
    roster: Vec<Segment>,
}

impl SegmentBuilder {
    /// Creates a builder, resolving the base segment length once.
    ///
    /// A missing length falls back to [`FALLBACK_SEGMENT_LENGTH`] and is
    /// reported here, not on every rebuild.
    #[must_use]
    pub fn new(params: SegmentParams) -> Self {
        let segment_length = params.segment_length().unwrap_or_else(|err| {
            warn!(%err, fallback = FALLBACK_SEGMENT_LENGTH, "using fallback segment length");
            FALLBACK_SEGMENT_LENGTH
        });
        Self {
            params,
            segment_length,
            pool: ObjectPool::new(),
            roster: Vec::new(),
        }
    }

    /// Base segment length in effect.
    #[must_use]
    pub fn segment_length(&self) -> f64 {
        self.segment_length
    }

    /// Rebuilds the roster along the curve through `control_points`.
    ///
    /// The first and last points are the path's start and finish. Returns the
    /// number of live segments.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than two control points are given; the
    /// current roster is left untouched in that case.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn rebuild(&mut self, control_points: &[Point3]) -> Result<usize> {
        let curve = PolynomialCurve::new(control_points)?;
        self.clear();

        let start = curve.start();
        let finish = curve.finish();
        let total = ((finish - start).norm() / self.segment_length).ceil() as usize;

        let mut previous: Option<Vector3> = None;
        for i in 0..total {
            let t = i as f64 / total as f64;
            let next_t = (i + 1) as f64 / total as f64;
            let position = curve.evaluate(t)?;
            let chord = curve.evaluate(next_t)? - position;

            let chord_len = chord.norm();
            let direction = if chord_len < TOLERANCE {
                forward()
            } else {
                chord / chord_len
            };

            let turn_deg = previous.map_or(0.0, |prev| angle_deg(&prev, &direction));
            let length = chord_len * self.params.length_factor(turn_deg);

            let mut placed = position;
            if self.params.is_sharp(turn_deg) {
                if let Some(outward) = previous.and_then(|prev| outward_side(&prev, &direction)) {
                    placed += outward * self.segment_length * self.params.outward_offset_fraction;
                }
            }

            let transform = Transform::new(placed, look_rotation(&direction)?)
                .with_forward_scale(length / self.segment_length);
            let instance = self.pool.acquire();
            if let Some(slot) = self.pool.get_mut(instance) {
                *slot = transform;
            }
            self.roster.push(Segment {
                instance,
                turn_deg,
                length,
            });
            previous = Some(direction);
        }

        debug!(
            segments = total,
            pooled = self.pool.len(),
            "rebuilt path segments"
        );
        Ok(total)
    }

    /// Returns every live segment to the pool.
    pub fn clear(&mut self) {
        self.pool
            .release_all(self.roster.drain(..).map(|segment| segment.instance));
        debug_assert_eq!(self.pool.active_count(), 0, "roster owns every active instance");
    }

    /// Live segments in path order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.roster
    }

    /// Transform of a pooled segment instance.
    #[must_use]
    pub fn transform(&self, instance: InstanceId) -> Option<&Transform> {
        self.pool.get(instance)
    }

    /// Transforms of the live segments in path order.
    pub fn transforms(&self) -> impl Iterator<Item = &Transform> + '_ {
        self.roster
            .iter()
            .filter_map(|segment| self.pool.get(segment.instance))
    }

    /// The pool backing the segment instances.
    #[must_use]
    pub fn pool(&self) -> &ObjectPool<Transform> {
        &self.pool
    }
}

/// Horizontal unit vector pointing to the outside of the turn from `previous`
/// to `direction`, or `None` when the turn has no horizontal component.
fn outward_side(previous: &Vector3, direction: &Vector3) -> Option<Vector3> {
    let side = up().cross(direction);
    let side_len = side.norm();
    if side_len < TOLERANCE {
        return None;
    }
    let side = side / side_len;
    let inward = side.dot(&(direction - previous));
    if inward.abs() < TOLERANCE {
        return None;
    }
    Some(if inward > 0.0 { -side } else { side })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn builder() -> SegmentBuilder {
        SegmentBuilder::new(SegmentParams {
            base_segment_length: Some(1.0),
            ..SegmentParams::default()
        })
    }

    fn corner() -> Vec<Point3> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 2.0),
            Point3::new(2.0, 0.0, 2.0),
        ]
    }

    #[test]
    fn straight_path_is_cut_by_base_length() {
        let mut builder = builder();
        let count = builder
            .rebuild(&[Point3::origin(), Point3::new(0.0, 0.0, 10.0)])
            .unwrap();
        assert_eq!(count, 10);
        assert_eq!(builder.segments().len(), 10);
        for (i, transform) in builder.transforms().enumerate() {
            assert_relative_eq!(transform.position.z, i as f64, epsilon = 1e-9);
            assert_relative_eq!(transform.forward(), Vector3::z(), epsilon = 1e-9);
            assert_relative_eq!(transform.scale.z, 1.10, epsilon = 1e-9);
        }
    }

    #[test]
    fn segment_count_rounds_up() {
        let mut builder = builder();
        let count = builder
            .rebuild(&[Point3::origin(), Point3::new(0.0, 0.0, 3.2)])
            .unwrap();
        assert_eq!(count, 4);
    }

    #[test]
    fn insufficient_points_leave_roster_untouched() {
        let mut builder = builder();
        builder.rebuild(&corner()).unwrap();
        let before = builder.segments().to_vec();
        assert!(builder.rebuild(&[Point3::origin()]).is_err());
        assert_eq!(builder.segments(), before.as_slice());
    }

    #[test]
    fn rebuild_is_idempotent() {
        let mut builder = builder();
        builder.rebuild(&corner()).unwrap();
        let first: Vec<Transform> = builder.transforms().copied().collect();
        builder.rebuild(&corner()).unwrap();
        let second: Vec<Transform> = builder.transforms().copied().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn rebuild_reuses_pooled_instances() {
        let mut builder = builder();
        builder
            .rebuild(&[Point3::origin(), Point3::new(0.0, 0.0, 8.0)])
            .unwrap();
        builder
            .rebuild(&[Point3::origin(), Point3::new(0.0, 0.0, 3.0)])
            .unwrap();
        assert_eq!(builder.pool().len(), 8);
        assert_eq!(builder.pool().active_count(), 3);
        assert_eq!(builder.pool().idle_count(), 5);
    }

    #[test]
    fn sharp_turns_shorten_and_push_segments_outward() {
        let mut builder = builder();
        let points = corner();
        builder.rebuild(&points).unwrap();
        let curve = PolynomialCurve::new(&points).unwrap();

        let segments = builder.segments();
        assert_eq!(segments.len(), 3);
        assert_relative_eq!(segments[0].turn_deg, 0.0);

        let sharp = &segments[1];
        assert!(sharp.turn_deg > 15.0);
        let transform = builder.transform(sharp.instance).unwrap();
        let on_curve = curve.evaluate(1.0 / 3.0).unwrap();
        let chord = (curve.evaluate(2.0 / 3.0).unwrap() - on_curve).norm();
        assert!(sharp.length < chord);
        let offset = transform.position - on_curve;
        assert_relative_eq!(offset.norm(), 0.1, epsilon = 1e-9);
        assert_relative_eq!(offset.y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn missing_segment_length_falls_back() {
        let builder = SegmentBuilder::new(SegmentParams::default());
        assert_relative_eq!(builder.segment_length(), FALLBACK_SEGMENT_LENGTH);
    }

    #[test]
    fn coincident_endpoints_produce_no_segments() {
        let mut builder = builder();
        let p = Point3::new(1.0, 0.0, 1.0);
        assert_eq!(builder.rebuild(&[p, p]).unwrap(), 0);
        assert!(builder.segments().is_empty());
    }

    #[test]
    fn clear_returns_everything_to_the_pool() {
        let mut builder = builder();
        builder.rebuild(&corner()).unwrap();
        builder.clear();
        assert!(builder.segments().is_empty());
        assert_eq!(builder.pool().active_count(), 0);
    }
}
