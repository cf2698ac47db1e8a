use tracing::{debug, info};

use crate::error::Result;
use crate::geometry::{Curve, PolynomialCurve, Transform};
use crate::math::{lerp, look_rotation, Point3, TOLERANCE};

use super::{
    Command, JumpProgress, JumpState, MotionEvent, MotionParams, Phase, Scoreboard, SpeedMode,
    TraversalState,
};

/// Drives the agent along the path, one tick at a time.
///
/// The controller never stores the curve: every call receives the current
/// control points and rebuilds the curve from them, so a path that changes
/// between ticks is followed immediately. Calls made before the path is
/// usable, or before the agent is spawned, do nothing.
#[derive(Debug, Clone)]
pub struct AgentController {
    params: MotionParams,
    agent: Option<Transform>,
    t: f64,
    speed: f64,
    score: u32,
    phase: Phase,
    jump: Option<JumpState>,
}

impl AgentController {
    /// Creates a controller with no agent.
    #[must_use]
    pub fn new(params: MotionParams) -> Self {
        Self {
            params,
            agent: None,
            t: 0.0,
            speed: params.initial_speed,
            score: 0,
            phase: Phase::Idle,
            jump: None,
        }
    }

    /// Places the agent at the start of the path if it does not exist yet.
    ///
    /// Returns whether an agent was spawned.
    ///
    /// # Errors
    ///
    /// Returns an error if the curve cannot be evaluated.
    pub fn spawn(&mut self, control_points: &[Point3], events: &mut Vec<MotionEvent>) -> Result<bool> {
        if self.agent.is_some() {
            return Ok(false);
        }
        let Ok(curve) = PolynomialCurve::new(control_points) else {
            return Ok(false);
        };
        let mut agent = Transform::default();
        self.t = 0.0;
        self.place(&mut agent, &curve)?;
        self.agent = Some(agent);
        info!(position = ?agent.position, "agent spawned at path start");
        events.push(MotionEvent::AgentSpawned);
        Ok(true)
    }

    /// Applies one discrete command.
    ///
    /// # Errors
    ///
    /// Returns an error if the curve cannot be evaluated.
    pub fn handle(
        &mut self,
        command: Command,
        control_points: &[Point3],
        events: &mut Vec<MotionEvent>,
    ) -> Result<()> {
        match command {
            Command::Start => match self.phase {
                Phase::Idle if self.agent.is_some() && control_points.len() >= 2 => {
                    self.phase = Phase::Moving;
                    debug!(speed = self.speed, "traversal started");
                    events.push(MotionEvent::Started);
                }
                Phase::Complete => self.restart(control_points, events)?,
                _ => debug!(phase = ?self.phase, "start ignored"),
            },
            Command::Restart => {
                if self.phase == Phase::Complete {
                    self.restart(control_points, events)?;
                } else {
                    debug!(phase = ?self.phase, "restart ignored before the end is reached");
                }
            }
            Command::Jump => {
                if self.jump.is_none() {
                    if let Some(agent) = &self.agent {
                        self.jump = Some(JumpState::new(
                            agent.position.y,
                            self.params.jump_height,
                            self.params.jump_duration,
                        ));
                        events.push(MotionEvent::JumpStarted);
                    }
                }
            }
            Command::SetSpeed(value) => match self.params.speed_mode {
                SpeedMode::Manual if !value.is_finite() => {
                    debug!(value, "non-finite speed input ignored");
                }
                SpeedMode::Manual => {
                    let (lo, hi) = self.params.speed_range;
                    self.speed = lerp(lo, hi, value);
                    events.push(MotionEvent::SpeedChanged { speed: self.speed });
                }
                SpeedMode::Progressive => {
                    debug!(value, "speed input ignored in progressive mode");
                }
            },
            Command::Reset => self.reset(control_points, events)?,
        }
        Ok(())
    }

    /// Advances forward motion and any jump by `dt` seconds.
    ///
    /// # Errors
    ///
    /// Returns an error if the curve cannot be evaluated.
    pub fn tick(
        &mut self,
        dt: f64,
        control_points: &[Point3],
        events: &mut Vec<MotionEvent>,
    ) -> Result<()> {
        let Some(mut agent) = self.agent else {
            return Ok(());
        };
        let Ok(curve) = PolynomialCurve::new(control_points) else {
            return Ok(());
        };
        let dt = dt.max(0.0);

        if self.phase == Phase::Moving {
            #[allow(clippy::cast_precision_loss)]
            let count = control_points.len() as f64;
            self.t += self.speed * dt / count;
            if self.t >= 1.0 {
                self.t = 1.0;
                self.place(&mut agent, &curve)?;
                self.complete_run(events);
            } else {
                self.place(&mut agent, &curve)?;
            }
        }

        if let Some(jump) = self.jump.as_mut() {
            match jump.advance(dt) {
                JumpProgress::Airborne { offset } => {
                    agent.position.y = jump.base_height() + offset;
                }
                JumpProgress::Landed => {
                    agent.position.y = jump.base_height();
                    self.jump = None;
                    events.push(MotionEvent::JumpLanded);
                }
            }
        }

        self.agent = Some(agent);
        Ok(())
    }

    /// Current agent placement, if spawned.
    #[must_use]
    pub fn agent(&self) -> Option<&Transform> {
        self.agent.as_ref()
    }

    #[must_use]
    pub fn state(&self) -> TraversalState {
        TraversalState {
            t: self.t,
            speed: self.speed,
            phase: self.phase,
            jumping: self.jump.is_some(),
        }
    }

    #[must_use]
    pub fn scoreboard(&self) -> Scoreboard {
        Scoreboard::new(self.score, self.speed, self.params.speed_range)
    }

    fn complete_run(&mut self, events: &mut Vec<MotionEvent>) {
        self.phase = Phase::Complete;
        self.score += 1;
        if self.params.speed_mode == SpeedMode::Progressive {
            self.speed += self.params.speed_increment;
        }
        info!(score = self.score, speed = self.speed, "agent reached the end of the path");
        events.push(MotionEvent::ReachedEnd {
            score: self.score,
            speed: self.speed,
        });
    }

    fn restart(&mut self, control_points: &[Point3], events: &mut Vec<MotionEvent>) -> Result<()> {
        self.t = 0.0;
        self.phase = Phase::Idle;
        self.jump = None;
        self.return_to_start(control_points)?;
        debug!("agent returned to start");
        events.push(MotionEvent::Restarted);
        Ok(())
    }

    fn reset(&mut self, control_points: &[Point3], events: &mut Vec<MotionEvent>) -> Result<()> {
        if self.agent.is_none() {
            debug!("reset ignored without an agent");
            return Ok(());
        }
        self.t = 0.0;
        self.phase = Phase::Idle;
        self.jump = None;
        self.speed = self.params.initial_speed;
        self.score = 0;
        self.return_to_start(control_points)?;
        info!("traversal reset");
        events.push(MotionEvent::Reset);
        Ok(())
    }

    fn return_to_start(&mut self, control_points: &[Point3]) -> Result<()> {
        let (Some(mut agent), Ok(curve)) = (self.agent, PolynomialCurve::new(control_points))
        else {
            return Ok(());
        };
        self.place(&mut agent, &curve)?;
        self.agent = Some(agent);
        Ok(())
    }

    /// Moves `agent` onto the curve at the current `t`, facing a short step ahead.
    fn place(&self, agent: &mut Transform, curve: &PolynomialCurve) -> Result<()> {
        let position = curve.evaluate(self.t)?;
        let ahead = curve.evaluate(curve.domain().clamp(self.t + self.params.lookahead))?;
        agent.position = position;
        let direction = ahead - position;
        if direction.norm() > TOLERANCE {
            agent.rotation = look_rotation(&direction)?;
        }
        Ok(())
    }
}
