use crate::error::ConfigError;
use crate::motion::MotionParams;
use crate::operations::{ClosestParameter, ScatterParams};
use crate::tessellation::SegmentParams;

/// Everything a [`PathSession`](crate::session::PathSession) is tuned by.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub segments: SegmentParams,
    pub motion: MotionParams,
    pub scatter: ScatterParams,
    /// Sample intervals used when projecting tracked objects onto the path.
    pub closest_resolution: usize,
    /// Marker labels that carry an object to reorient along the path.
    pub tracked_labels: Vec<String>,
    /// Roadside props placed once the path is known, one per entry.
    pub prop_kinds: Vec<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            segments: SegmentParams::default(),
            motion: MotionParams::default(),
            scatter: ScatterParams::default(),
            closest_resolution: ClosestParameter::DEFAULT_RESOLUTION,
            tracked_labels: Vec::new(),
            prop_kinds: Vec::new(),
        }
    }
}

impl SessionConfig {
    /// Checks every parameter the session cannot recover from.
    ///
    /// A missing base segment length is not an error here; the segment
    /// builder falls back to a default for it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidParameter`] naming the first bad value.
    #[allow(clippy::cast_precision_loss)]
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.motion.validate()?;
        if self.closest_resolution == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "closest_resolution",
                value: self.closest_resolution as f64,
            });
        }
        let segments = &self.segments;
        if !(segments.turn_threshold_deg >= 0.0
            && segments.max_turn_deg > segments.turn_threshold_deg)
        {
            return Err(ConfigError::InvalidParameter {
                name: "max_turn_deg",
                value: segments.max_turn_deg,
            });
        }
        let (lo, hi) = self.scatter.t_range;
        if !(0.0..=1.0).contains(&lo) || !(0.0..=1.0).contains(&hi) || lo > hi {
            return Err(ConfigError::InvalidParameter {
                name: "scatter.t_range",
                value: hi,
            });
        }
        let (gap_lo, gap_hi) = self.scatter.gap_range;
        if gap_lo < 0.0 || gap_lo > gap_hi {
            return Err(ConfigError::InvalidParameter {
                name: "scatter.gap_range",
                value: gap_lo,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(SessionConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_resolution_is_rejected() {
        let config = SessionConfig {
            closest_resolution: 0,
            ..SessionConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidParameter {
                name: "closest_resolution",
                ..
            })
        ));
    }

    #[test]
    fn inverted_scatter_window_is_rejected() {
        let mut config = SessionConfig::default();
        config.scatter.t_range = (0.9, 0.1);
        assert!(config.validate().is_err());
    }
}
