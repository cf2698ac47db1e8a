//! Externally positioned objects that turn to follow the path.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::error::Result;
use crate::geometry::{Curve, Transform};
use crate::math::look_rotation;
use crate::registry::TrackingEvent;

use super::query::ClosestParameter;

/// Objects anchored to tracked markers, keyed by marker label.
///
/// Only labels registered up front get an object. An object is created the
/// first time its marker is seen and follows the marker's position after
/// that; its orientation is owned by [`TrackedObjects::reorient`].
#[derive(Debug, Clone, Default)]
pub struct TrackedObjects {
    labels: BTreeSet<String>,
    objects: BTreeMap<String, Transform>,
}

impl TrackedObjects {
    /// Creates a registry that anchors objects to the given marker labels.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
            objects: BTreeMap::new(),
        }
    }

    /// Moves (or first places) the object for the event's label.
    ///
    /// Returns `false` if no object is registered for the label.
    pub fn track(&mut self, event: &TrackingEvent) -> bool {
        if !self.labels.contains(&event.label) {
            return false;
        }
        let object = self.objects.entry(event.label.clone()).or_insert_with(|| {
            debug!(label = %event.label, "placed tracked object");
            Transform::default()
        });
        object.position = event.position;
        true
    }

    /// Turns every object to face the curve tangent at its nearest parameter.
    ///
    /// Objects where the tangent is degenerate keep their orientation.
    /// Returns how many objects were reoriented.
    ///
    /// # Errors
    ///
    /// Returns an error if the curve cannot be evaluated.
    pub fn reorient<C: Curve + ?Sized>(&mut self, curve: &C, resolution: usize) -> Result<usize> {
        let mut turned = 0;
        for (label, object) in &mut self.objects {
            let closest = ClosestParameter::new(object.position)
                .with_resolution(resolution)
                .execute(curve)?;
            let Ok(tangent) = curve.tangent(closest.parameter) else {
                debug!(%label, t = closest.parameter, "skipping reorientation on degenerate tangent");
                continue;
            };
            object.rotation = look_rotation(&tangent)?;
            turned += 1;
        }
        Ok(turned)
    }

    /// Returns the object anchored to `label`, if placed.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&Transform> {
        self.objects.get(label)
    }

    /// Iterates over placed objects in label order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Transform)> + '_ {
        self.objects.iter().map(|(label, object)| (label.as_str(), object))
    }

    /// Number of placed objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns whether no object has been placed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
