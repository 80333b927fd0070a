//! Broadcast command bus.
//!
//! Uses [`tokio::sync::broadcast`] channels under the hood so that every
//! driver subscribed to the bus receives every command without any single
//! subscriber blocking the others.
//!
//! # Lanes
//!
//! Besides the global channel, commands are routed to one [`Lane`] per
//! action-space variant so a driver can listen only to what it executes:
//!
//! | Lane | Traffic |
//! |---|---|
//! | [`Lane::Generic`] | heading-relative `{speed, duration, heading}` commands |
//! | [`Lane::ObjectOriented`] | world-frame `{speed, duration, x, y, theta}` commands |
//!
//! # Example
//!
//! ```rust
//! use nudge_middleware::{CommandBus, Lane};
//! use nudge_types::{ActionCommand, CommandChannel, CommandEnvelope, GenericActionMsg};
//!
//! let bus = CommandBus::default();
//! let mut driver = bus.subscribe_to(Lane::Generic);
//!
//! let command = ActionCommand::Generic(GenericActionMsg { speed: 0.5, duration: 1.0, heading: 0.0 });
//! bus.send(CommandEnvelope::new("planner", command)).unwrap();
//!
//! assert_eq!(driver.try_recv().unwrap().command, command);
//! ```

use nudge_types::{ActionCommand, CommandChannel, CommandEnvelope, NudgeError};
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Default channel capacity (number of buffered commands before old ones are
/// dropped for slow subscribers).
const DEFAULT_CAPACITY: usize = 256;

/// Per-variant routing lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lane {
    Generic,
    ObjectOriented,
}

impl Lane {
    /// The lane a command is routed to.
    pub fn of(command: &ActionCommand) -> Self {
        match command {
            ActionCommand::Generic(_) => Lane::Generic,
            ActionCommand::ObjectOriented(_) => Lane::ObjectOriented,
        }
    }
}

/// Shared command bus.  Clone it cheaply – all clones share the same
/// underlying broadcast channels.
#[derive(Clone, Debug)]
pub struct CommandBus {
    sender: broadcast::Sender<CommandEnvelope>,
    generic: broadcast::Sender<CommandEnvelope>,
    object_oriented: broadcast::Sender<CommandEnvelope>,
}

impl CommandBus {
    /// Create a new bus.  `capacity` applies to every channel independently.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        let (generic, _) = broadcast::channel(capacity);
        let (object_oriented, _) = broadcast::channel(capacity);
        Self {
            sender,
            generic,
            object_oriented,
        }
    }

    /// Publish `envelope` on the global channel and on its [`Lane`].
    ///
    /// Returns the total number of receivers handed the envelope, or
    /// [`NudgeError::Channel`] when nobody is listening on either.
    pub fn publish(&self, envelope: CommandEnvelope) -> Result<usize, NudgeError> {
        let lane = Lane::of(&envelope.command);
        let id = envelope.id;
        let on_lane = self.lane_sender(lane).send(envelope.clone()).unwrap_or(0);
        let on_global = self.sender.send(envelope).unwrap_or(0);

        let delivered = on_lane + on_global;
        if delivered == 0 {
            return Err(NudgeError::Channel(format!(
                "No subscribers for lane {lane:?}"
            )));
        }
        debug!(%id, ?lane, delivered, "command published");
        Ok(delivered)
    }

    /// Subscribe to every command regardless of lane.
    pub fn subscribe(&self) -> CommandReceiver {
        CommandReceiver {
            lane: None,
            receiver: self.sender.subscribe(),
        }
    }

    /// Subscribe to a single [`Lane`].
    pub fn subscribe_to(&self, lane: Lane) -> CommandReceiver {
        CommandReceiver {
            lane: Some(lane),
            receiver: self.lane_sender(lane).subscribe(),
        }
    }

    fn lane_sender(&self, lane: Lane) -> &broadcast::Sender<CommandEnvelope> {
        match lane {
            Lane::Generic => &self.generic,
            Lane::ObjectOriented => &self.object_oriented,
        }
    }
}

impl Default for CommandBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl CommandChannel for CommandBus {
    fn send(&self, envelope: CommandEnvelope) -> Result<(), NudgeError> {
        self.publish(envelope).map(|_| ())
    }
}

/// Receiving end of a [`CommandBus`] subscription.
///
/// A subscriber that falls behind skips the dropped commands (logging how
/// many) and resumes with the oldest one still buffered.
pub struct CommandReceiver {
    lane: Option<Lane>,
    receiver: broadcast::Receiver<CommandEnvelope>,
}

impl CommandReceiver {
    /// Wait for the next command.
    ///
    /// Returns `None` when the bus is closed and no further commands will arrive.
    pub async fn recv(&mut self) -> Option<CommandEnvelope> {
        loop {
            match self.receiver.recv().await {
                Ok(envelope) => return Some(envelope),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!(lane = ?self.lane, lagged_by = n, "CommandReceiver lagged");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Take the next buffered command without waiting.
    ///
    /// Returns `None` when nothing is buffered or the bus is closed.
    pub fn try_recv(&mut self) -> Option<CommandEnvelope> {
        loop {
            match self.receiver.try_recv() {
                Ok(envelope) => return Some(envelope),
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    warn!(lane = ?self.lane, lagged_by = n, "CommandReceiver lagged");
                    continue;
                }
                Err(_) => return None,
            }
        }
    }

    /// The lane this receiver is bound to, or `None` for the global channel.
    pub fn lane(&self) -> Option<Lane> {
        self.lane
    }
}
