//! [`ObjectOrientedActionSpace`] – primitives defined relative to an object.
//!
//! Each primitive says "approach the object from this side, this far along
//! the edge, at this speed".  The table enumerates side × offset × speed:
//!
//! - sides: FRONT, LEFT, BACK, RIGHT (heading offsets 0, π/2, π, 3π/2)
//! - offsets: `num_offset` evenly spaced samples of `[-edge_offset, edge_offset]`,
//!   or just `0` when `num_offset == 1`
//! - speeds: as given
//!
//! ```text
//! id = side · num_offset · num_speed + offset · num_speed + speed
//! ```
//!
//! A stored primitive carries `edge_offset_ratio = -offset / edge_offset`: a
//! positive offset maps to a negative ratio.
//!
//! Once the planner has picked an id,
//! [`ObjectOrientedActionSpace::get_generic_to_object_oriented_action`] turns
//! it into the world-frame pose the robot must start from:
//!
//! ```text
//! x = px - center_offset · cos(h) + ratio · edge_offset · sin(h)
//! y = py - center_offset · sin(h) + ratio · edge_offset · cos(h)
//! θ = normalize(θ_object + h)
//! ```
//!
//! # Example
//!
//! ```rust
//! use nudge_actionspace::{ActionSpace, ObjectOrientedActionSpace};
//! use nudge_types::Pose;
//!
//! let space = ObjectOrientedActionSpace::new(&[1.0], &[2.0, 3.0], 10.0, 1).unwrap();
//! assert_eq!(space.size(), 4);
//!
//! let start = space
//!     .get_generic_to_object_oriented_action(0, &Pose::origin())
//!     .unwrap()
//!     .start_pose();
//! assert!((start.x + 60.0).abs() < 1e-9);
//! assert!(start.y.abs() < 1e-9);
//! assert!(start.theta.abs() < 1e-9);
//! ```

use nudge_types::{
    ActionCommand, ActionId, CommandChannel, CommandEnvelope, NudgeError, ObjectOrientedActionMsg,
    Pose, normalize_angle,
};
use tracing::{debug, warn};

use crate::action_space::{ActionSpace, FeatureVector, table_index};
use crate::geometry::{Axis, Side, linspace};

const SOURCE: &str = "nudge-actionspace::object_oriented";

/// Standoff from the object's center to the approach point, along the
/// approach axis.
pub const DEFAULT_CENTER_OFFSET: f64 = 60.0;

/// Duration attached to every published object-oriented command (s).
pub const PUBLISHED_DURATION: f64 = 1.0;

/// An object-relative primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenericAction {
    speed: f64,
    edge_offset_ratio: f64,
    aspect_ratio: f64,
    side: Side,
}

impl GenericAction {
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Normalized position along the edge, in `[-1, 1]`.
    pub fn edge_offset_ratio(&self) -> f64 {
        self.edge_offset_ratio
    }

    /// Object extent along the axis of [`GenericAction::side`].
    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Approach angle in the object's own frame.
    pub fn heading_offset(&self) -> f64 {
        self.side.heading()
    }
}

impl FeatureVector for GenericAction {
    type Features = [f64; 3];

    fn features(&self) -> [f64; 3] {
        [self.speed, self.edge_offset_ratio, self.aspect_ratio]
    }
}

/// A primitive resolved against the object's live pose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectOrientedAction {
    speed: f64,
    start_pose: Pose,
}

impl ObjectOrientedAction {
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// World-frame pose from which the robot begins the motion.
    pub fn start_pose(&self) -> Pose {
        self.start_pose
    }

    pub fn to_msg(&self) -> ObjectOrientedActionMsg {
        ObjectOrientedActionMsg {
            speed: self.speed,
            duration: PUBLISHED_DURATION,
            x: self.start_pose.x,
            y: self.start_pose.y,
            theta: self.start_pose.theta,
        }
    }
}

/// Side × offset × speed action table around a box-shaped object.
#[derive(Debug, Clone)]
pub struct ObjectOrientedActionSpace {
    actions: Vec<GenericAction>,
    num_speed: usize,
    num_offset: usize,
    edge_offset: f64,
    center_offset: f64,
}

impl ObjectOrientedActionSpace {
    /// Build the table with the default [`DEFAULT_CENTER_OFFSET`].
    ///
    /// `ratios` holds the object's `[length, width]`: FRONT/BACK use
    /// `ratios[0]`, LEFT/RIGHT use `ratios[1]`.
    ///
    /// # Errors
    ///
    /// See [`ObjectOrientedActionSpace::with_center_offset`].
    pub fn new(
        speeds: &[f64],
        ratios: &[f64],
        edge_offset: f64,
        num_offset: usize,
    ) -> Result<Self, NudgeError> {
        Self::with_center_offset(speeds, ratios, edge_offset, num_offset, DEFAULT_CENTER_OFFSET)
    }

    /// Build the table with an explicit center standoff.
    ///
    /// # Errors
    ///
    /// Returns [`NudgeError::InvalidConfiguration`] when `speeds` is empty,
    /// `ratios` does not hold exactly two values, `num_offset` is zero,
    /// `edge_offset` is not strictly positive, or any value is non-finite.
    pub fn with_center_offset(
        speeds: &[f64],
        ratios: &[f64],
        edge_offset: f64,
        num_offset: usize,
        center_offset: f64,
    ) -> Result<Self, NudgeError> {
        if speeds.is_empty() {
            return Err(invalid("speeds must not be empty".to_string()));
        }
        if let Some(bad) = speeds.iter().chain(ratios).find(|v| !v.is_finite()) {
            return Err(invalid(format!("non-finite speed or ratio {bad}")));
        }
        let [length, width] = ratios else {
            return Err(invalid(format!(
                "expected 2 ratios (length, width), got {}",
                ratios.len()
            )));
        };
        if num_offset == 0 {
            return Err(invalid("num_offset must be at least 1".to_string()));
        }
        if !(edge_offset.is_finite() && edge_offset > 0.0) {
            return Err(invalid(format!(
                "edge_offset must be positive and finite, got {edge_offset}"
            )));
        }
        if !center_offset.is_finite() {
            return Err(invalid(format!(
                "center_offset must be finite, got {center_offset}"
            )));
        }

        let cube_offsets = if num_offset == 1 {
            vec![0.0]
        } else {
            linspace(-edge_offset, edge_offset, num_offset)
        };

        let mut actions = Vec::with_capacity(Side::ALL.len() * num_offset * speeds.len());
        for side in Side::ALL {
            let aspect_ratio = match side.axis() {
                Axis::Length => *length,
                Axis::Width => *width,
            };
            for &cube_offset in &cube_offsets {
                for &speed in speeds {
                    actions.push(GenericAction {
                        speed,
                        edge_offset_ratio: -cube_offset / edge_offset,
                        aspect_ratio,
                        side,
                    });
                }
            }
        }

        debug!(
            num_speed = speeds.len(),
            num_offset,
            edge_offset,
            center_offset,
            size = actions.len(),
            "built object-oriented action space"
        );

        Ok(Self {
            actions,
            num_speed: speeds.len(),
            num_offset,
            edge_offset,
            center_offset,
        })
    }

    pub fn num_speed(&self) -> usize {
        self.num_speed
    }

    pub fn num_offset(&self) -> usize {
        self.num_offset
    }

    /// Maximum lateral offset from the center of an edge.
    pub fn edge_offset(&self) -> f64 {
        self.edge_offset
    }

    pub fn center_offset(&self) -> f64 {
        self.center_offset
    }

    /// Every action in id order.
    pub fn actions(&self) -> &[GenericAction] {
        &self.actions
    }

    /// Encode (side, offset, speed) indices into an id.
    pub fn action_id(&self, side: Side, offset_index: usize, speed_index: usize) -> Option<ActionId> {
        if offset_index >= self.num_offset || speed_index >= self.num_speed {
            return None;
        }
        let id = side.index() * self.num_offset * self.num_speed
            + offset_index * self.num_speed
            + speed_index;
        ActionId::try_from(id).ok()
    }

    /// Decode an id into its (side, offset, speed) indices.
    pub fn indices(&self, action_id: ActionId) -> Option<(Side, usize, usize)> {
        let id = table_index(action_id, self.actions.len())?;
        let speed_index = id % self.num_speed;
        let offset_index = (id / self.num_speed) % self.num_offset;
        let side = Side::ALL[id / (self.num_offset * self.num_speed)];
        Some((side, offset_index, speed_index))
    }

    /// Resolve `action_id` against the object's current pose.
    ///
    /// Returns `None` for an invalid id.  `object_pose` is only read.
    pub fn get_generic_to_object_oriented_action(
        &self,
        action_id: ActionId,
        object_pose: &Pose,
    ) -> Option<ObjectOrientedAction> {
        let action = self.get_action(action_id)?;

        let heading = action.heading_offset();
        let lateral = action.edge_offset_ratio() * self.edge_offset;
        let (sin_h, cos_h) = heading.sin_cos();
        let start_pose = Pose {
            x: object_pose.x - self.center_offset * cos_h + lateral * sin_h,
            y: object_pose.y - self.center_offset * sin_h + lateral * cos_h,
            theta: normalize_angle(object_pose.theta + heading),
        };

        Some(ObjectOrientedAction {
            speed: action.speed(),
            start_pose,
        })
    }
}

impl ActionSpace for ObjectOrientedActionSpace {
    type Action = GenericAction;
    type State = Pose;

    fn size(&self) -> usize {
        self.actions.len()
    }

    fn get_action(&self, action_id: ActionId) -> Option<&GenericAction> {
        table_index(action_id, self.actions.len()).map(|index| &self.actions[index])
    }

    fn publish_action(
        &self,
        action_id: ActionId,
        channel: &dyn CommandChannel,
        object_pose: &Pose,
    ) -> Result<(), NudgeError> {
        let Some(action) = self.get_generic_to_object_oriented_action(action_id, object_pose)
        else {
            warn!(
                action_id,
                size = self.size(),
                "refusing to publish invalid object-oriented action"
            );
            return Err(NudgeError::InvalidActionId {
                id: action_id,
                size: self.size(),
            });
        };
        let command = ActionCommand::ObjectOriented(action.to_msg());
        debug!(action_id, ?command, "publishing object-oriented action");
        channel.send(CommandEnvelope::new(SOURCE, command))
    }
}

fn invalid(details: String) -> NudgeError {
    NudgeError::InvalidConfiguration {
        space: "object_oriented".to_string(),
        details,
    }
}
