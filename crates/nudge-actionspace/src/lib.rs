//! `nudge-actionspace` – enumerable motion-primitive libraries.
//!
//! A planner asks a space for its [`size`][ActionSpace::size], iterates or
//! samples ids, inspects candidates with [`get_action`][ActionSpace::get_action],
//! compares them with [`action_similarity`][ActionSpace::action_similarity],
//! and finally hands the winner to a command channel.
//!
//! # Modules
//!
//! - [`action_space`] – the [`ActionSpace`] contract and the [`FeatureVector`]
//!   similarity hook.
//! - [`generic`] – [`GenericActionSpace`]: speed × duration × heading.
//! - [`object_oriented`] – [`ObjectOrientedActionSpace`]: side × offset ×
//!   speed around an object, plus the object-to-world transform.
//! - [`geometry`] – sampling, distance, and object-side helpers.
//! - [`config`] – TOML configuration for both spaces.

pub mod action_space;
pub mod config;
pub mod generic;
pub mod geometry;
pub mod object_oriented;

pub use action_space::{ActionSpace, FeatureVector};
pub use config::{ActionSpaceConfig, SampleSet};
pub use generic::GenericActionSpace;
pub use geometry::{Side, object_side_angles};
pub use object_oriented::{GenericAction, ObjectOrientedAction, ObjectOrientedActionSpace};
