//! The [`ActionSpace`] contract shared by every action-space variant.
//!
//! An action space is a finite table of motion primitives indexed by a dense,
//! zero-based [`ActionId`].  The table is built once at construction and is
//! read-only afterwards, so any number of planner threads may query it
//! concurrently.
//!
//! Out-of-range ids never panic: lookups return `None`, similarity returns
//! `None`, and publishing returns [`NudgeError::InvalidActionId`].

use nudge_types::{ActionId, CommandChannel, NudgeError};

use crate::geometry::euclidean_distance;

/// An action that can be compared by Euclidean distance.
pub trait FeatureVector {
    type Features: AsRef<[f64]>;

    /// The coordinates this action occupies in its space's similarity metric.
    fn features(&self) -> Self::Features;
}

/// A finite, enumerable set of motion primitives.
pub trait ActionSpace: Send + Sync {
    /// The primitive stored in the table.
    type Action: FeatureVector;

    /// Extra context needed to turn a primitive into a command, e.g. the
    /// pose of the object being manipulated.
    type State: ?Sized;

    /// Total number of enumerated actions.
    fn size(&self) -> usize;

    /// Return the action stored under `action_id`, or `None` when the id is
    /// outside `[0, size())`.
    fn get_action(&self, action_id: ActionId) -> Option<&Self::Action>;

    /// `true` iff `0 <= action_id < size()`.
    fn is_valid_action_id(&self, action_id: ActionId) -> bool {
        usize::try_from(action_id).is_ok_and(|index| index < self.size())
    }

    /// Euclidean distance between the feature vectors of two actions.
    ///
    /// Returns `None` if either id is invalid.
    fn action_similarity(&self, action_id1: ActionId, action_id2: ActionId) -> Option<f64> {
        if !(self.is_valid_action_id(action_id1) && self.is_valid_action_id(action_id2)) {
            return None;
        }
        let first = self.get_action(action_id1)?.features();
        let second = self.get_action(action_id2)?.features();
        Some(euclidean_distance(first.as_ref(), second.as_ref()))
    }

    /// Hand the command for `action_id` to `channel`.
    ///
    /// # Errors
    ///
    /// Returns [`NudgeError::InvalidActionId`] (and sends nothing) for an
    /// out-of-range id, or the channel's own error if delivery fails.
    fn publish_action(
        &self,
        action_id: ActionId,
        channel: &dyn CommandChannel,
        state: &Self::State,
    ) -> Result<(), NudgeError>;
}

/// Bounds-checked conversion of an [`ActionId`] into a table index.
pub(crate) fn table_index(action_id: ActionId, len: usize) -> Option<usize> {
    usize::try_from(action_id).ok().filter(|index| *index < len)
}
