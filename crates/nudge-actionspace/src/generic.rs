//! [`GenericActionSpace`] – heading-relative motion primitives.
//!
//! The table is the Cartesian product speed × duration × heading, where the
//! headings are `num_heading` evenly spaced samples of `[0, 2π)`.  With four
//! headings that is 0, π/2, π and 3π/2.
//!
//! Ids are row-major over (speed `j`, duration `k`, heading `l`):
//!
//! ```text
//! id = j · num_duration · num_heading + k · num_heading + l
//! ```
//!
//! # Example
//!
//! ```rust
//! use nudge_actionspace::{ActionSpace, GenericActionSpace};
//!
//! let space = GenericActionSpace::new(&[0.5, 1.0], &[1.0], 4).unwrap();
//! assert_eq!(space.size(), 8);
//!
//! let back = space.get_action(2).unwrap();
//! assert!((back.speed() - 0.5).abs() < 1e-12);
//! assert!((back.heading() - std::f64::consts::PI).abs() < 1e-12);
//!
//! // Opposite headings at equal speed and duration are 2.0 apart.
//! assert!((space.action_similarity(0, 2).unwrap() - 2.0).abs() < 1e-12);
//!
//! // The second speed starts a new block of headings.
//! assert_eq!(space.indices(4), Some((1, 0, 0)));
//! ```

use std::f64::consts::TAU;

use nudge_types::{
    ActionCommand, ActionId, CommandChannel, CommandEnvelope, GenericActionMsg, NudgeError,
};
use tracing::{debug, warn};

use crate::action_space::{ActionSpace, FeatureVector, table_index};

const SOURCE: &str = "nudge-actionspace::generic";

/// A single heading-relative primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Action {
    speed: f64,
    duration: f64,
    heading: f64,
}

impl Action {
    /// Speed of the motion (m/s or mm/s, matching the configured speeds).
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Duration of the motion (s).
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Heading in radians within `[0, 2π)`.
    pub fn heading(&self) -> f64 {
        self.heading
    }

    pub fn to_msg(&self) -> GenericActionMsg {
        GenericActionMsg {
            speed: self.speed,
            duration: self.duration,
            heading: self.heading,
        }
    }
}

impl FeatureVector for Action {
    type Features = [f64; 4];

    /// Heading enters through its unit-circle projection so that headings on
    /// either side of the 0/2π seam compare as close.
    fn features(&self) -> [f64; 4] {
        [
            self.speed,
            self.duration,
            self.heading.cos(),
            self.heading.sin(),
        ]
    }
}

/// Speed × duration × heading action table.
#[derive(Debug, Clone)]
pub struct GenericActionSpace {
    actions: Vec<Action>,
    num_speed: usize,
    num_duration: usize,
    num_heading: usize,
}

impl GenericActionSpace {
    /// Build the full table.
    ///
    /// # Errors
    ///
    /// Returns [`NudgeError::InvalidConfiguration`] when `speeds` or
    /// `durations` is empty or holds a non-finite value, or when
    /// `num_heading` is not a power of two of at least 4.
    pub fn new(speeds: &[f64], durations: &[f64], num_heading: usize) -> Result<Self, NudgeError> {
        check_samples("speeds", speeds)?;
        check_samples("durations", durations)?;
        if num_heading < 4 || !num_heading.is_power_of_two() {
            return Err(invalid(format!(
                "num_heading must be a power of two >= 4, got {num_heading}"
            )));
        }

        let headings: Vec<f64> = (0..num_heading)
            .map(|l| l as f64 * TAU / num_heading as f64)
            .collect();

        let mut actions = Vec::with_capacity(speeds.len() * durations.len() * num_heading);
        for &speed in speeds {
            for &duration in durations {
                for &heading in &headings {
                    actions.push(Action {
                        speed,
                        duration,
                        heading,
                    });
                }
            }
        }

        debug!(
            num_speed = speeds.len(),
            num_duration = durations.len(),
            num_heading,
            size = actions.len(),
            "built generic action space"
        );

        Ok(Self {
            actions,
            num_speed: speeds.len(),
            num_duration: durations.len(),
            num_heading,
        })
    }

    pub fn num_speed(&self) -> usize {
        self.num_speed
    }

    pub fn num_duration(&self) -> usize {
        self.num_duration
    }

    pub fn num_heading(&self) -> usize {
        self.num_heading
    }

    /// Every action in id order.
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Encode (speed, duration, heading) indices into an id.
    ///
    /// Returns `None` if any index is out of range.
    pub fn action_id(
        &self,
        speed_index: usize,
        duration_index: usize,
        heading_index: usize,
    ) -> Option<ActionId> {
        if speed_index >= self.num_speed
            || duration_index >= self.num_duration
            || heading_index >= self.num_heading
        {
            return None;
        }
        let id = speed_index * self.num_duration * self.num_heading
            + duration_index * self.num_heading
            + heading_index;
        ActionId::try_from(id).ok()
    }

    /// Decode an id into its (speed, duration, heading) indices.
    pub fn indices(&self, action_id: ActionId) -> Option<(usize, usize, usize)> {
        let id = table_index(action_id, self.actions.len())?;
        let heading_index = id % self.num_heading;
        let duration_index = (id / self.num_heading) % self.num_duration;
        let speed_index = id / (self.num_duration * self.num_heading);
        Some((speed_index, duration_index, heading_index))
    }
}

impl ActionSpace for GenericActionSpace {
    type Action = Action;
    type State = ();

    fn size(&self) -> usize {
        self.actions.len()
    }

    fn get_action(&self, action_id: ActionId) -> Option<&Action> {
        table_index(action_id, self.actions.len()).map(|index| &self.actions[index])
    }

    fn publish_action(
        &self,
        action_id: ActionId,
        channel: &dyn CommandChannel,
        _state: &(),
    ) -> Result<(), NudgeError> {
        let Some(action) = self.get_action(action_id) else {
            warn!(action_id, size = self.size(), "refusing to publish invalid generic action");
            return Err(NudgeError::InvalidActionId {
                id: action_id,
                size: self.size(),
            });
        };
        let command = ActionCommand::Generic(action.to_msg());
        debug!(action_id, ?command, "publishing generic action");
        channel.send(CommandEnvelope::new(SOURCE, command))
    }
}

fn invalid(details: String) -> NudgeError {
    NudgeError::InvalidConfiguration {
        space: "generic".to_string(),
        details,
    }
}

fn check_samples(name: &str, values: &[f64]) -> Result<(), NudgeError> {
    if values.is_empty() {
        return Err(invalid(format!("{name} must not be empty")));
    }
    if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
        return Err(invalid(format!("{name} contains non-finite value {bad}")));
    }
    Ok(())
}
