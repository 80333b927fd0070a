//! `nudge-middleware` – command transport.
//!
//! Action spaces never talk to a robot directly.  They hand finished
//! [`CommandEnvelope`][nudge_types::CommandEnvelope]s to a
//! [`CommandChannel`][nudge_types::CommandChannel]; drivers subscribe on the
//! other side.
//!
//! # Modules
//!
//! - [`bus`] – [`CommandBus`]: broadcast command bus with per-variant lanes,
//!   built on Tokio broadcast channels.

pub mod bus;

pub use bus::{CommandBus, CommandReceiver, Lane};
