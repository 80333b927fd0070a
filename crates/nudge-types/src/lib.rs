use std::f64::consts::{PI, TAU};

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Signed action identifier.  Valid ids are dense and zero-based; negative
/// values are representable so they can be rejected at the API boundary.
pub type ActionId = i64;

/// Wrap `angle` (radians) into the canonical range `(-π, π]`.
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI { wrapped + TAU } else { wrapped }
}

/// Planar rigid transform (x, y, θ) in the world frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    /// Orientation in radians, counter-clockwise from +X, within `(-π, π]`.
    pub theta: f64,
}

impl Pose {
    /// Create a pose.  `theta` is normalized into `(-π, π]`.
    pub fn new(x: f64, y: f64, theta: f64) -> Self {
        Self {
            x,
            y,
            theta: normalize_angle(theta),
        }
    }

    /// The world origin facing +X.
    pub fn origin() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

/// Payload for a heading-relative primitive from the generic action space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GenericActionMsg {
    pub speed: f64,
    pub duration: f64,
    /// Heading in radians within `[0, 2π)`.
    pub heading: f64,
}

/// Payload for an object-oriented primitive: the world-frame start pose the
/// robot drives to before executing the motion at `speed`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ObjectOrientedActionMsg {
    pub speed: f64,
    pub duration: f64,
    pub x: f64,
    pub y: f64,
    pub theta: f64,
}

/// A single motion command handed to the robot driver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", content = "payload")]
pub enum ActionCommand {
    Generic(GenericActionMsg),
    ObjectOriented(ObjectOrientedActionMsg),
}

impl ActionCommand {
    /// JSON schema of the command payload, for drivers that validate input.
    pub fn json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(ActionCommand)
    }

    pub fn speed(&self) -> f64 {
        match self {
            ActionCommand::Generic(msg) => msg.speed,
            ActionCommand::ObjectOriented(msg) => msg.speed,
        }
    }
}

/// Envelope carried over a [`CommandChannel`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandEnvelope {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    /// e.g. `"nudge-actionspace::object_oriented"`
    pub source: String,
    pub command: ActionCommand,
}

impl CommandEnvelope {
    /// Stamp `command` with a fresh id and the current time.
    pub fn new(source: impl Into<String>, command: ActionCommand) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            source: source.into(),
            command,
        }
    }
}

/// Outbound command sink.  Transport and control loop are up to the
/// implementor; action spaces only hand over a finished envelope.
pub trait CommandChannel: Send + Sync {
    /// Deliver `envelope` to the driver side.
    ///
    /// # Errors
    ///
    /// Returns [`NudgeError::Channel`] when the envelope cannot be delivered.
    fn send(&self, envelope: CommandEnvelope) -> Result<(), NudgeError>;
}

/// Global error type spanning construction, lookup, channel, and config failures.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NudgeError {
    #[error("Invalid {space} configuration: {details}")]
    InvalidConfiguration { space: String, details: String },

    #[error("Action id {id} out of range for action space of size {size}")]
    InvalidActionId { id: ActionId, size: usize },

    #[error("Command Channel Error: {0}")]
    Channel(String),

    #[error("Config Error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn normalize_angle_keeps_canonical_values() {
        assert!(normalize_angle(0.0).abs() < 1e-12);
        assert!((normalize_angle(FRAC_PI_2) - FRAC_PI_2).abs() < 1e-12);
        assert!((normalize_angle(PI) - PI).abs() < 1e-12);
    }

    #[test]
    fn normalize_angle_wraps_into_half_open_range() {
        assert!((normalize_angle(-PI) - PI).abs() < 1e-12);
        assert!((normalize_angle(3.0 * FRAC_PI_2) + FRAC_PI_2).abs() < 1e-12);
        assert!((normalize_angle(TAU + 0.25) - 0.25).abs() < 1e-12);
        assert!((normalize_angle(-TAU - 0.25) + 0.25).abs() < 1e-12);
    }

    #[test]
    fn pose_new_normalizes_theta() {
        let pose = Pose::new(1.0, 2.0, 5.0 * FRAC_PI_2);
        assert!((pose.x - 1.0).abs() < 1e-12);
        assert!((pose.y - 2.0).abs() < 1e-12);
        assert!((pose.theta - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn action_command_roundtrip() {
        let cmd = ActionCommand::ObjectOriented(ObjectOrientedActionMsg {
            speed: 50.0,
            duration: 1.0,
            x: -60.0,
            y: 0.0,
            theta: 0.0,
        });
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("\"kind\":\"ObjectOriented\""));
        let back: ActionCommand = serde_json::from_str(&json).unwrap();
        assert_eq!(cmd, back);
        assert!((back.speed() - 50.0).abs() < 1e-12);
    }

    #[test]
    fn envelope_roundtrip() {
        let envelope = CommandEnvelope::new(
            "nudge-actionspace::generic",
            ActionCommand::Generic(GenericActionMsg {
                speed: 0.5,
                duration: 1.0,
                heading: PI,
            }),
        );
        let json = serde_json::to_string(&envelope).unwrap();
        let back: CommandEnvelope = serde_json::from_str(&json).unwrap();
        assert_eq!(envelope.id, back.id);
        assert_eq!(envelope.source, back.source);
        assert_eq!(envelope.command, back.command);
    }

    #[test]
    fn command_schema_lists_payload_fields() {
        let schema = serde_json::to_value(ActionCommand::json_schema()).unwrap();
        let text = schema.to_string();
        assert!(text.contains("ObjectOrientedActionMsg"));
        assert!(text.contains("theta"));
        assert!(text.contains("heading"));
    }

    #[test]
    fn nudge_error_display() {
        let err = NudgeError::InvalidActionId { id: -1, size: 8 };
        assert!(err.to_string().contains("-1"));
        assert!(err.to_string().contains("size 8"));

        let err2 = NudgeError::InvalidConfiguration {
            space: "generic".to_string(),
            details: "num_heading must be a power of two".to_string(),
        };
        assert!(err2.to_string().contains("generic"));
    }
}
