//! TOML state tables — declare a controller's states instead of wiring
//! `add_state` calls by hand

use crate::controller::{AnimInfo, AnimationStateController, ControllerSettings, InterruptPolicy};
use crate::instance::AnimationInstance;
use gait_core::{GaitError, Result};
use serde::de::value::{Error as ValueError, StrDeserializer};
use serde::de::{DeserializeOwned, IntoDeserializer};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::path::Path;

/// On-disk layout; state names stay strings until resolved against `S`.
#[derive(Debug, Deserialize)]
struct StateTableFile {
    default_state: String,
    #[serde(default)]
    interrupt: InterruptPolicy,
    #[serde(default)]
    max_dt: Option<f32>,
    states: BTreeMap<String, AnimInfo>,
}

/// A parsed state table for the state type `S`.
///
/// ```toml
/// default_state = "Idle"
/// interrupt = "finish_one_shots"
/// max_dt = 0.25
///
/// [states.Idle]
/// clip = "idle"
/// loops = true
///
/// [states.Roar]
/// clip = "roar"
/// loops = false
/// speed = 1.5
/// ```
///
/// State keys are resolved through `S`'s serde implementation, so a unit
/// enum variant is named exactly as it deserializes.
#[derive(Debug, Clone)]
pub struct StateTable<S> {
    pub default_state: S,
    pub settings: ControllerSettings,
    pub states: Vec<(S, AnimInfo)>,
}

impl<S> StateTable<S>
where
    S: DeserializeOwned + Copy + Eq + Hash + Debug,
{
    /// Load a state table from a `.states.toml` file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content).map_err(|e| match e {
            GaitError::TomlParseError(msg) => {
                GaitError::TomlParseError(format!("{}: {}", path.display(), msg))
            }
            GaitError::ConfigError(msg) => {
                GaitError::ConfigError(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Parse a state table from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        let file: StateTableFile = toml::from_str(content)?;

        let mut states = Vec::with_capacity(file.states.len());
        for (name, info) in file.states {
            states.push((parse_state::<S>(&name)?, info));
        }

        let default_state = parse_state::<S>(&file.default_state)?;
        if !states.iter().any(|(s, _)| *s == default_state) {
            return Err(GaitError::ConfigError(format!(
                "Default state '{}' has no [states.{}] entry",
                file.default_state, file.default_state
            )));
        }

        Ok(Self {
            default_state,
            settings: ControllerSettings {
                interrupt: file.interrupt,
                max_dt: file.max_dt,
            },
            states,
        })
    }

    /// Build a controller over `instance` with every state registered.
    pub fn build(self, instance: AnimationInstance) -> Result<AnimationStateController<S>> {
        let mut controller =
            AnimationStateController::with_settings(instance, self.default_state, self.settings);
        for (state, info) in self.states {
            controller.register(state, info)?;
        }
        Ok(controller)
    }
}

fn parse_state<S: DeserializeOwned>(name: &str) -> Result<S> {
    let de: StrDeserializer<'_, ValueError> = name.into_deserializer();
    S::deserialize(de).map_err(|e| GaitError::ConfigError(format!("Unknown state '{}': {}", name, e)))
}
