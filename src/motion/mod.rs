//! Time-driven traversal of the path by a single agent.
//!
//! Forward motion and jumping are independent: the agent can be idle or
//! moving, and either can happen while a jump is in the air.

mod controller;
mod jump;

pub use controller::AgentController;
pub use jump::{JumpProgress, JumpState};

use crate::error::ConfigError;

/// How the traversal speed is adjusted over a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpeedMode {
    /// Each completed run adds `speed_increment`; `SetSpeed` is ignored.
    #[default]
    Progressive,
    /// `SetSpeed` maps its `[0, 1]` input onto `speed_range`; completed runs
    /// leave the speed alone.
    Manual,
}

/// Tuning for the agent controller.
#[derive(Debug, Clone, Copy)]
pub struct MotionParams {
    /// Speed at spawn and after a reset.
    pub initial_speed: f64,
    /// Speed added per completed run in [`SpeedMode::Progressive`].
    pub speed_increment: f64,
    /// Operating range `SetSpeed` maps onto; also the display scale.
    pub speed_range: (f64, f64),
    pub speed_mode: SpeedMode,
    /// Peak height of a jump above its take-off height.
    pub jump_height: f64,
    /// Seconds from take-off to landing.
    pub jump_duration: f64,
    /// Parameter step used to aim the agent along the curve.
    pub lookahead: f64,
}

impl Default for MotionParams {
    fn default() -> Self {
        Self {
            initial_speed: 0.2,
            speed_increment: 0.1,
            speed_range: (0.2, 1.0),
            speed_mode: SpeedMode::Progressive,
            jump_height: 0.04,
            jump_duration: 0.8,
            lookahead: 0.01,
        }
    }
}

impl MotionParams {
    /// Checks that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidParameter`] naming the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("initial_speed", self.initial_speed, self.initial_speed >= 0.0),
            ("speed_increment", self.speed_increment, self.speed_increment >= 0.0),
            (
                "speed_range",
                self.speed_range.1,
                self.speed_range.1 > self.speed_range.0,
            ),
            ("jump_height", self.jump_height, self.jump_height >= 0.0),
            ("jump_duration", self.jump_duration, self.jump_duration > 0.0),
            (
                "lookahead",
                self.lookahead,
                self.lookahead > 0.0 && self.lookahead <= 1.0,
            ),
        ];
        match checks.into_iter().find(|(_, _, ok)| !ok) {
            Some((name, value, _)) => Err(ConfigError::InvalidParameter { name, value }),
            None => Ok(()),
        }
    }
}

/// Discrete input driving the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Begin moving from idle; after a completed run, acts as `Restart`.
    Start,
    /// Return a finished agent to the start, keeping score and speed.
    Restart,
    Jump,
    /// Continuous speed input in `[0, 1]`.
    SetSpeed(f64),
    /// Collision reset: back to the start with initial score and speed.
    Reset,
}

/// Notable transitions reported by the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionEvent {
    AgentSpawned,
    Started,
    ReachedEnd { score: u32, speed: f64 },
    Restarted,
    JumpStarted,
    JumpLanded,
    SpeedChanged { speed: f64 },
    Reset,
}

/// Forward-motion state along the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Moving,
    /// Reached `t = 1`; waits for `Start` or `Restart`.
    Complete,
}

/// Snapshot of the traversal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraversalState {
    pub t: f64,
    pub speed: f64,
    pub phase: Phase,
    pub jumping: bool,
}

/// Score and speed as shown to the player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scoreboard {
    pub score: u32,
    pub speed: f64,
    /// Speed normalised over the operating range and scaled to 0..20 km/h.
    pub display_speed: f64,
}

impl Scoreboard {
    /// Upper end of the displayed speed scale.
    pub const DISPLAY_MAX: f64 = 20.0;

    pub(crate) fn new(score: u32, speed: f64, range: (f64, f64)) -> Self {
        let display_speed = (speed - range.0) / (range.1 - range.0) * Self::DISPLAY_MAX;
        Self {
            score,
            speed,
            display_speed,
        }
    }
}
