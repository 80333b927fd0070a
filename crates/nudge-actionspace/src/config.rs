//! Action-space configuration – reads/writes `~/.nudge/nudge.toml`.
//!
//! ```toml
//! [generic]
//! speeds = { min = 50.0, max = 200.0, samples = 4 }
//! durations = [1.0, 2.0]
//! num_heading = 8
//!
//! [object_oriented]
//! speeds = [50.0, 100.0, 150.0, 200.0]
//! ratios = [44.0, 44.0]
//! edge_offset = 40.0
//! num_offset = 5
//! center_offset = 60.0
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use nudge_types::NudgeError;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::generic::GenericActionSpace;
use crate::geometry::linspace;
use crate::object_oriented::{DEFAULT_CENTER_OFFSET, ObjectOrientedActionSpace};

/// A list of samples, either spelled out or generated from a range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SampleSet {
    Values(Vec<f64>),
    /// `samples` evenly spaced values of `[min, max]`.
    Range { min: f64, max: f64, samples: usize },
}

impl SampleSet {
    /// Expand into concrete values.
    pub fn values(&self) -> Vec<f64> {
        match self {
            SampleSet::Values(values) => values.clone(),
            SampleSet::Range { min, max, samples } => linspace(*min, *max, *samples),
        }
    }
}

/// `[generic]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericSpaceConfig {
    pub speeds: SampleSet,
    pub durations: SampleSet,
    #[serde(default = "default_num_heading")]
    pub num_heading: usize,
}

/// `[object_oriented]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectOrientedSpaceConfig {
    pub speeds: SampleSet,
    /// Object `[length, width]`.
    pub ratios: Vec<f64>,
    pub edge_offset: f64,
    #[serde(default = "default_num_offset")]
    pub num_offset: usize,
    #[serde(default = "default_center_offset")]
    pub center_offset: f64,
}

/// Persisted action-space configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionSpaceConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generic: Option<GenericSpaceConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_oriented: Option<ObjectOrientedSpaceConfig>,
}

fn default_num_heading() -> usize {
    8
}
fn default_num_offset() -> usize {
    1
}
fn default_center_offset() -> f64 {
    DEFAULT_CENTER_OFFSET
}

impl Default for ActionSpaceConfig {
    fn default() -> Self {
        Self {
            generic: Some(GenericSpaceConfig {
                speeds: SampleSet::Range {
                    min: 50.0,
                    max: 200.0,
                    samples: 4,
                },
                durations: SampleSet::Values(vec![1.0, 2.0]),
                num_heading: default_num_heading(),
            }),
            object_oriented: Some(ObjectOrientedSpaceConfig {
                speeds: SampleSet::Values(vec![50.0, 100.0, 150.0, 200.0]),
                ratios: vec![44.0, 44.0],
                edge_offset: 40.0,
                num_offset: 5,
                center_offset: default_center_offset(),
            }),
        }
    }
}

impl ActionSpaceConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(raw: &str) -> Result<Self, NudgeError> {
        toml::from_str(raw).map_err(|e| NudgeError::Config(format!("Failed to parse config: {e}")))
    }

    /// Build the generic space described by `[generic]`.
    pub fn build_generic(&self) -> Result<GenericActionSpace, NudgeError> {
        let section = self
            .generic
            .as_ref()
            .ok_or_else(|| NudgeError::Config("missing [generic] section".to_string()))?;
        GenericActionSpace::new(
            &section.speeds.values(),
            &section.durations.values(),
            section.num_heading,
        )
    }

    /// Build the object-oriented space described by `[object_oriented]`.
    pub fn build_object_oriented(&self) -> Result<ObjectOrientedActionSpace, NudgeError> {
        let section = self
            .object_oriented
            .as_ref()
            .ok_or_else(|| NudgeError::Config("missing [object_oriented] section".to_string()))?;
        ObjectOrientedActionSpace::with_center_offset(
            &section.speeds.values(),
            &section.ratios,
            section.edge_offset,
            section.num_offset,
            section.center_offset,
        )
    }
}

/// Return the path to `~/.nudge/nudge.toml`.
pub fn config_path() -> PathBuf {
    config_path_for_home(
        &std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string()),
    )
}

pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".nudge").join("nudge.toml")
}

/// Load the config from disk.  Returns `None` if the file does not exist.
pub fn load() -> Result<Option<ActionSpaceConfig>, NudgeError> {
    load_from(&config_path())
}

/// Load the config from a specific path.
pub fn load_from(path: &Path) -> Result<Option<ActionSpaceConfig>, NudgeError> {
    if !path.exists() {
        debug!(path = %path.display(), "no action-space config on disk");
        return Ok(None);
    }
    let raw = fs::read_to_string(path).map_err(|e| {
        NudgeError::Config(format!("Failed to read config at {}: {e}", path.display()))
    })?;
    let mut cfg = ActionSpaceConfig::from_toml_str(&raw)?;
    apply_env_overrides(&mut cfg);
    info!(path = %path.display(), "loaded action-space config");
    Ok(Some(cfg))
}

/// Apply `NUDGE_*` environment variable overrides to `cfg`.
///
/// | Variable | Config field |
/// |---|---|
/// | `NUDGE_NUM_HEADING` | `generic.num_heading` |
/// | `NUDGE_NUM_OFFSET` | `object_oriented.num_offset` |
/// | `NUDGE_EDGE_OFFSET` | `object_oriented.edge_offset` |
/// | `NUDGE_CENTER_OFFSET` | `object_oriented.center_offset` |
///
/// Values that fail to parse are ignored.
pub fn apply_env_overrides(cfg: &mut ActionSpaceConfig) {
    if let Some(generic) = cfg.generic.as_mut()
        && let Some(n) = env_parse::<usize>("NUDGE_NUM_HEADING")
    {
        generic.num_heading = n;
    }
    if let Some(oo) = cfg.object_oriented.as_mut() {
        if let Some(n) = env_parse::<usize>("NUDGE_NUM_OFFSET") {
            oo.num_offset = n;
        }
        if let Some(v) = env_parse::<f64>("NUDGE_EDGE_OFFSET") {
            oo.edge_offset = v;
        }
        if let Some(v) = env_parse::<f64>("NUDGE_CENTER_OFFSET") {
            oo.center_offset = v;
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok()?.parse().ok()
}

/// Save the config to a specific path, creating parent directories.
pub fn save_to(cfg: &ActionSpaceConfig, path: &Path) -> Result<(), NudgeError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| NudgeError::Config(format!("Failed to create config directory: {e}")))?;
    }
    let raw = toml::to_string_pretty(cfg)
        .map_err(|e| NudgeError::Config(format!("Failed to serialize config: {e}")))?;
    fs::write(path, raw).map_err(|e| {
        NudgeError::Config(format!("Failed to write config at {}: {e}", path.display()))
    })
}
