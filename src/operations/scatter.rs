use rand::Rng;

use crate::error::Result;
use crate::geometry::{Curve, Transform};
use crate::math::{look_rotation, Rotation};

/// Parameters for scattering roadside props along the path.
#[derive(Debug, Clone, Copy)]
pub struct ScatterParams {
    /// Parameter window props may occupy.
    pub t_range: (f64, f64),
    /// Minimum and maximum parameter gap enforced after each placed prop.
    pub gap_range: (f64, f64),
    /// Fixed seed for reproducible layouts; `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for ScatterParams {
    fn default() -> Self {
        Self {
            t_range: (0.2, 0.8),
            gap_range: (0.05, 0.15),
            seed: None,
        }
    }
}

/// A prop placed on the path.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedProp {
    pub kind: String,
    pub parameter: f64,
    pub transform: Transform,
}

/// Places one prop per kind at random parameters along the curve.
///
/// Each prop lands in `[min_t, t_range.1]`; `min_t` then moves past it by a
/// random gap, so props keep their list order along the path. Once `min_t`
/// hits the window's end, remaining props pile up there.
pub struct ScatterProps<'a> {
    kinds: &'a [String],
    params: ScatterParams,
}

impl<'a> ScatterProps<'a> {
    /// Creates a new `ScatterProps` operation.
    #[must_use]
    pub fn new(kinds: &'a [String], params: ScatterParams) -> Self {
        Self { kinds, params }
    }

    /// Executes the placement.
    ///
    /// # Errors
    ///
    /// Returns an error if the curve cannot be evaluated.
    pub fn execute<C, R>(&self, curve: &C, rng: &mut R) -> Result<Vec<PlacedProp>>
    where
        C: Curve + ?Sized,
        R: Rng,
    {
        let (lo, hi) = self.params.t_range;
        let (gap_lo, gap_hi) = self.params.gap_range;
        let mut min_t = lo;
        let mut placed = Vec::with_capacity(self.kinds.len());

        for kind in self.kinds {
            let t = rng.gen_range(min_t..=hi);
            let position = curve.evaluate(t)?;
            let rotation = curve
                .tangent(t)
                .and_then(|tangent| look_rotation(&tangent))
                .unwrap_or_else(|_| Rotation::identity());
            placed.push(PlacedProp {
                kind: kind.clone(),
                parameter: t,
                transform: Transform::new(position, rotation),
            });
            min_t = (t + rng.gen_range(gap_lo..=gap_hi)).clamp(lo, hi);
        }
        Ok(placed)
    }
}
