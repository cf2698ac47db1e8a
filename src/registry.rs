//! Ordered control points fed by marker tracking.

use tracing::debug;

use crate::math::Point3;

/// Label of the marker that anchors the start of the path.
pub const START_LABEL: &str = "Tracking-Start";
/// Label of the marker that anchors the end of the path.
pub const FINISH_LABEL: &str = "Tracking-Finish";
/// Prefix shared by every obstacle marker label.
pub const OBSTACLE_PREFIX: &str = "Tracking-Obstacle";

/// Role a tracked marker plays in the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingLabel {
    Start,
    Finish,
    Obstacle,
}

impl TrackingLabel {
    /// Classifies a marker name; unrecognised names yield `None`.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            START_LABEL => Some(Self::Start),
            FINISH_LABEL => Some(Self::Finish),
            _ if name.starts_with(OBSTACLE_PREFIX) => Some(Self::Obstacle),
            _ => None,
        }
    }
}

/// A marker sighting reported by the tracking collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingEvent {
    pub label: String,
    pub position: Point3,
}

impl TrackingEvent {
    /// Creates a tracking event.
    pub fn new(label: impl Into<String>, position: Point3) -> Self {
        Self {
            label: label.into(),
            position,
        }
    }
}

/// Holds `start`, the obstacles in arrival order and `finish`.
#[derive(Debug, Clone, Default)]
pub struct ControlPointRegistry {
    start: Option<Point3>,
    finish: Option<Point3>,
    obstacles: Vec<Point3>,
}

impl ControlPointRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the start point, returning whether it changed.
    pub fn set_start(&mut self, point: Point3) -> bool {
        let changed = self.start != Some(point);
        self.start = Some(point);
        changed
    }

    /// Sets the finish point, returning whether it changed.
    pub fn set_finish(&mut self, point: Point3) -> bool {
        let changed = self.finish != Some(point);
        self.finish = Some(point);
        changed
    }

    /// Appends an obstacle unless one already sits at exactly `point`.
    ///
    /// Returns whether an insertion occurred.
    pub fn add_obstacle_if_absent(&mut self, point: Point3) -> bool {
        if self.obstacles.contains(&point) {
            return false;
        }
        self.obstacles.push(point);
        true
    }

    /// Routes a tracking event by label, returning whether the registry changed.
    ///
    /// Events with unrecognised labels are ignored.
    pub fn apply(&mut self, event: &TrackingEvent) -> bool {
        match TrackingLabel::parse(&event.label) {
            Some(TrackingLabel::Start) => self.set_start(event.position),
            Some(TrackingLabel::Finish) => self.set_finish(event.position),
            Some(TrackingLabel::Obstacle) => self.add_obstacle_if_absent(event.position),
            None => {
                debug!(label = %event.label, "ignoring unrecognised tracking label");
                false
            }
        }
    }

    /// Fresh ordered list `[start?, obstacles.., finish?]`.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Point3> {
        self.start
            .iter()
            .chain(self.obstacles.iter())
            .chain(self.finish.iter())
            .copied()
            .collect()
    }

    /// Returns whether both start and finish are known.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.start.is_some() && self.finish.is_some()
    }

    #[must_use]
    pub fn start(&self) -> Option<Point3> {
        self.start
    }

    #[must_use]
    pub fn finish(&self) -> Option<Point3> {
        self.finish
    }

    #[must_use]
    pub fn obstacles(&self) -> &[Point3] {
        &self.obstacles
    }
}
