//! Per-frame driver tying tracking input, the path and the agent together.
//!
//! Within one [`PathSession::tick`] the order is fixed: tracking updates are
//! applied, the path is rebuilt if its control points changed, commands and
//! motion run, and finally tracked objects are turned to follow the new path.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::config::SessionConfig;
use crate::error::Result;
use crate::geometry::{PolynomialCurve, Transform};
use crate::math::Point3;
use crate::motion::{AgentController, Command, MotionEvent, Phase, Scoreboard};
use crate::operations::{PlacedProp, ScatterProps, TrackedObjects};
use crate::registry::{ControlPointRegistry, TrackingEvent};
use crate::tessellation::SegmentBuilder;

/// What the start button does when pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartAction {
    Start,
    Restart,
}

/// Which UI buttons are usable this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Buttons {
    /// Both path endpoints are known.
    pub start: bool,
    pub start_action: StartAction,
    /// An agent exists.
    pub jump: bool,
}

/// Output of one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub agent: Option<Transform>,
    /// The segment roster was rebuilt this tick.
    pub rebuilt: bool,
    pub scoreboard: Scoreboard,
    pub buttons: Buttons,
    pub events: Vec<MotionEvent>,
}

/// Owns all path state and advances it once per frame.
#[derive(Debug)]
pub struct PathSession {
    config: SessionConfig,
    registry: ControlPointRegistry,
    builder: SegmentBuilder,
    controller: AgentController,
    tracked: TrackedObjects,
    props: Vec<PlacedProp>,
    props_placed: bool,
    rng: StdRng,
}

impl PathSession {
    /// Creates a session with no control points.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: SessionConfig) -> Result<Self> {
        config.validate()?;
        let rng = config
            .scatter
            .seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        Ok(Self {
            registry: ControlPointRegistry::new(),
            builder: SegmentBuilder::new(config.segments),
            controller: AgentController::new(config.motion),
            tracked: TrackedObjects::new(config.tracked_labels.iter().cloned()),
            props: Vec::new(),
            props_placed: false,
            rng,
            config,
        })
    }

    /// Advances the session by `dt` seconds.
    ///
    /// # Errors
    ///
    /// Returns an error if curve evaluation fails.
    pub fn tick(
        &mut self,
        dt: f64,
        tracking: &[TrackingEvent],
        commands: &[Command],
    ) -> Result<Frame> {
        let was_complete = self.registry.is_complete();
        let mut changed = false;
        for event in tracking {
            changed |= self.registry.apply(event);
            self.tracked.track(event);
        }

        let complete = self.registry.is_complete();
        let path_changed = complete && (changed || !was_complete);
        if !complete && !tracking.is_empty() {
            debug!("start or finish missing, path not generated yet");
        }

        let snapshot = self.registry.snapshot();
        let points: &[Point3] = if complete { &snapshot } else { &[] };
        let mut events = Vec::new();

        if path_changed {
            let segments = self.builder.rebuild(points)?;
            info!(control_points = points.len(), segments, "path changed, segments rebuilt");
            if self.controller.spawn(points, &mut events)? {
                debug!("agent placed on the new path");
            }
            if !self.props_placed {
                self.place_props(points)?;
            }
        }

        for &command in commands {
            self.controller.handle(command, points, &mut events)?;
        }
        if events.contains(&MotionEvent::Restarted) {
            self.props_placed = false;
            self.place_props(points)?;
        }
        self.controller.tick(dt, points, &mut events)?;

        if path_changed {
            let curve = PolynomialCurve::new(points)?;
            let turned = self.tracked.reorient(&curve, self.config.closest_resolution)?;
            debug!(turned, "reoriented tracked objects");
        }

        Ok(Frame {
            agent: self.controller.agent().copied(),
            rebuilt: path_changed,
            scoreboard: self.controller.scoreboard(),
            buttons: self.buttons(),
            events,
        })
    }

    /// Button availability for the current state.
    #[must_use]
    pub fn buttons(&self) -> Buttons {
        let start_action = if self.controller.state().phase == Phase::Complete {
            StartAction::Restart
        } else {
            StartAction::Start
        };
        Buttons {
            start: self.registry.is_complete() && self.controller.agent().is_some(),
            start_action,
            jump: self.controller.agent().is_some(),
        }
    }

    /// Transforms of the live path segments in order.
    pub fn segments(&self) -> impl Iterator<Item = &Transform> + '_ {
        self.builder.transforms()
    }

    #[must_use]
    pub fn builder(&self) -> &SegmentBuilder {
        &self.builder
    }

    #[must_use]
    pub fn registry(&self) -> &ControlPointRegistry {
        &self.registry
    }

    #[must_use]
    pub fn controller(&self) -> &AgentController {
        &self.controller
    }

    #[must_use]
    pub fn tracked_objects(&self) -> &TrackedObjects {
        &self.tracked
    }

    #[must_use]
    pub fn props(&self) -> &[PlacedProp] {
        &self.props
    }

    fn place_props(&mut self, points: &[Point3]) -> Result<()> {
        self.props.clear();
        let Ok(curve) = PolynomialCurve::new(points) else {
            return Ok(());
        };
        self.props = ScatterProps::new(&self.config.prop_kinds, self.config.scatter)
            .execute(&curve, &mut self.rng)?;
        self.props_placed = true;
        debug!(props = self.props.len(), "placed roadside props");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::registry::{FINISH_LABEL, START_LABEL};

    fn config() -> SessionConfig {
        let mut config = SessionConfig {
            tracked_labels: vec!["Tracking-Obstacle-1".into()],
            prop_kinds: vec!["cone".into(), "barrel".into()],
            ..SessionConfig::default()
        };
        config.segments.base_segment_length = Some(0.5);
        config.scatter.seed = Some(3);
        config
    }

    fn endpoints() -> Vec<TrackingEvent> {
        vec![
            TrackingEvent::new(START_LABEL, Point3::origin()),
            TrackingEvent::new(FINISH_LABEL, Point3::new(0.0, 0.0, 4.0)),
        ]
    }

    #[test]
    fn nothing_happens_until_both_endpoints_are_known() {
        let mut session = PathSession::new(config()).unwrap();
        let frame = session
            .tick(
                0.1,
                &[TrackingEvent::new(START_LABEL, Point3::origin())],
                &[Command::Start, Command::Jump],
            )
            .unwrap();
        assert!(!frame.rebuilt);
        assert!(frame.agent.is_none());
        assert!(frame.events.is_empty());
        assert!(!frame.buttons.start);
        assert!(!frame.buttons.jump);
        assert_eq!(session.segments().count(), 0);
    }

    #[test]
    fn completing_the_path_builds_segments_and_spawns_agent() {
        let mut session = PathSession::new(config()).unwrap();
        let frame = session.tick(0.1, &endpoints(), &[]).unwrap();
        assert!(frame.rebuilt);
        assert_eq!(frame.events, vec![MotionEvent::AgentSpawned]);
        assert_eq!(frame.agent.unwrap().position, Point3::origin());
        assert!(frame.buttons.start && frame.buttons.jump);
        assert_eq!(frame.buttons.start_action, StartAction::Start);
        assert_eq!(session.segments().count(), 8);
        assert_eq!(session.props().len(), 2);
    }

    #[test]
    fn unchanged_tracking_does_not_rebuild() {
        let mut session = PathSession::new(config()).unwrap();
        session.tick(0.1, &endpoints(), &[]).unwrap();
        let frame = session.tick(0.1, &endpoints(), &[]).unwrap();
        assert!(!frame.rebuilt);
    }

    #[test]
    fn new_obstacle_rebuilds_and_reorients_tracked_object() {
        let mut session = PathSession::new(config()).unwrap();
        session.tick(0.1, &endpoints(), &[]).unwrap();
        let frame = session
            .tick(
                0.1,
                &[TrackingEvent::new(
                    "Tracking-Obstacle-1",
                    Point3::new(1.0, 0.0, 2.0),
                )],
                &[],
            )
            .unwrap();
        assert!(frame.rebuilt);
        assert_eq!(session.registry().snapshot().len(), 3);
        let object = session.tracked_objects().get("Tracking-Obstacle-1").unwrap();
        assert_eq!(object.position, Point3::new(1.0, 0.0, 2.0));
        // The obstacle sits on the curve's middle node, where the path runs along +Z.
        assert!((object.forward().z - 1.0).abs() < 1e-6);
    }

    #[test]
    fn full_run_then_restart_then_reset() {
        let mut session = PathSession::new(config()).unwrap();
        session.tick(0.0, &endpoints(), &[]).unwrap();
        let frame = session.tick(0.0, &[], &[Command::Start]).unwrap();
        assert_eq!(frame.events, vec![MotionEvent::Started]);

        let mut reached = 0;
        for _ in 0..200 {
            let frame = session.tick(0.1, &[], &[]).unwrap();
            reached += frame
                .events
                .iter()
                .filter(|e| matches!(e, MotionEvent::ReachedEnd { .. }))
                .count();
        }
        assert_eq!(reached, 1);
        assert_eq!(session.buttons().start_action, StartAction::Restart);
        assert_eq!(session.controller().scoreboard().score, 1);

        let props_before = session.props().to_vec();
        let frame = session.tick(0.0, &[], &[Command::Restart]).unwrap();
        assert!(frame.events.contains(&MotionEvent::Restarted));
        assert_eq!(frame.agent.unwrap().position, Point3::origin());
        assert_eq!(frame.scoreboard.score, 1);
        assert_eq!(session.props().len(), props_before.len());

        let frame = session.tick(0.0, &[], &[Command::Reset]).unwrap();
        assert_eq!(frame.scoreboard.score, 0);
        assert!((frame.scoreboard.speed - 0.2).abs() < 1e-12);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = config();
        config.motion.jump_duration = -1.0;
        assert!(PathSession::new(config).is_err());
    }
}
