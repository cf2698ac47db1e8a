use crate::math::TOLERANCE;

/// Outcome of advancing a jump by one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JumpProgress {
    /// Still in the air, `offset` above the take-off height.
    Airborne { offset: f64 },
    /// Landed; the agent goes back to exactly the take-off height.
    Landed,
}

/// A parabolic jump timed in seconds.
///
/// With normalised progress `u = timer / duration`, the height above take-off
/// is `4 · height · u · (1 - u)`, peaking at `height` when `u = 0.5`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JumpState {
    base_height: f64,
    height: f64,
    duration: f64,
    timer: f64,
}

impl JumpState {
    /// Starts a jump from vertical position `base_height`.
    #[must_use]
    pub fn new(base_height: f64, height: f64, duration: f64) -> Self {
        Self {
            base_height,
            height,
            duration,
            timer: 0.0,
        }
    }

    /// Vertical position at take-off.
    #[must_use]
    pub fn base_height(&self) -> f64 {
        self.base_height
    }

    /// Normalised progress `u`, not clamped.
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.timer / self.duration
    }

    /// Height above take-off at normalised progress `u`.
    #[must_use]
    pub fn offset_at(&self, u: f64) -> f64 {
        4.0 * self.height * u * (1.0 - u)
    }

    /// Accumulates `dt` seconds and reports where the jump is.
    pub fn advance(&mut self, dt: f64) -> JumpProgress {
        self.timer += dt.max(0.0);
        if self.timer >= self.duration - TOLERANCE {
            JumpProgress::Landed
        } else {
            JumpProgress::Airborne {
                offset: self.offset_at(self.progress()),
            }
        }
    }
}
