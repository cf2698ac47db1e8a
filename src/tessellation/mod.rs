mod segment_builder;

pub use segment_builder::SegmentBuilder;

use crate::error::ConfigError;
use crate::math::{inverse_lerp, lerp};
use crate::pool::InstanceId;

/// Segment length used when the visual unit reports no usable length.
pub const FALLBACK_SEGMENT_LENGTH: f64 = 1.0;

/// Parameters controlling how the path is cut into segments.
///
/// Turns up to `turn_threshold_deg` are gentle and stretch segments by a
/// factor running from `gentle_scale.0` (straight) to `gentle_scale.1`.
/// Sharper turns shrink segments from `sharp_scale.0` down to
/// `sharp_scale.1`, reached at `max_turn_deg`.
#[derive(Debug, Clone, Copy)]
pub struct SegmentParams {
    /// Length of one visual unit along its forward axis, if known.
    pub base_segment_length: Option<f64>,
    /// Turn angle (degrees) separating gentle from sharp turns.
    pub turn_threshold_deg: f64,
    /// Turn angle (degrees) at which the sharp range bottoms out.
    pub max_turn_deg: f64,
    /// Length factor range over gentle turns.
    pub gentle_scale: (f64, f64),
    /// Length factor range over sharp turns.
    pub sharp_scale: (f64, f64),
    /// Sideways push on sharp turns, as a fraction of the base length.
    pub outward_offset_fraction: f64,
}

impl Default for SegmentParams {
    fn default() -> Self {
        Self {
            base_segment_length: None,
            turn_threshold_deg: 15.0,
            max_turn_deg: 90.0,
            gentle_scale: (1.10, 1.00),
            sharp_scale: (1.00, 0.60),
            outward_offset_fraction: 0.1,
        }
    }
}

impl SegmentParams {
    /// Returns the base segment length.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingSegmentLength`] if the length is absent,
    /// non-positive or not finite.
    pub fn segment_length(&self) -> Result<f64, ConfigError> {
        match self.base_segment_length {
            Some(len) if len.is_finite() && len > 0.0 => Ok(len),
            _ => Err(ConfigError::MissingSegmentLength),
        }
    }

    /// Maps a turn angle to a multiplier on the segment's chord length.
    #[must_use]
    pub fn length_factor(&self, turn_deg: f64) -> f64 {
        if self.is_sharp(turn_deg) {
            let u = inverse_lerp(self.turn_threshold_deg, self.max_turn_deg, turn_deg);
            lerp(self.sharp_scale.0, self.sharp_scale.1, u)
        } else {
            let u = inverse_lerp(0.0, self.turn_threshold_deg, turn_deg);
            lerp(self.gentle_scale.0, self.gentle_scale.1, u)
        }
    }

    /// Returns whether `turn_deg` counts as a sharp turn.
    #[must_use]
    pub fn is_sharp(&self, turn_deg: f64) -> bool {
        turn_deg > self.turn_threshold_deg
    }
}

/// One live segment of the rebuilt path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Pooled visual instance carrying the segment's transform.
    pub instance: InstanceId,
    /// Turn from the previous segment's direction, in degrees.
    pub turn_deg: f64,
    /// World length the segment spans along its forward axis.
    pub length: f64,
}
