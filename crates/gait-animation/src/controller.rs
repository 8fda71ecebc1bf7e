//! State-driven playback — maps application states onto clips with
//! loop/one-shot semantics and automatic fallback to a default state

use crate::instance::{validate_dt, AnimationInstance};
use gait_core::{GaitError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

fn default_speed() -> f32 {
    1.0
}

/// How a state plays its clip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimInfo {
    /// Clip name in the instance's library
    pub clip: String,
    pub loops: bool,
    /// Playback speed multiplier
    #[serde(default = "default_speed")]
    pub speed: f32,
}

/// Whether `change_state` may cut a playing one-shot short
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterruptPolicy {
    /// Any change to a different state takes effect immediately
    #[default]
    Always,
    /// Requests are ignored until the playing one-shot finishes;
    /// `force_state` still cuts through
    FinishOneShots,
}

/// Tunables for a controller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ControllerSettings {
    #[serde(default)]
    pub interrupt: InterruptPolicy,
    /// Largest `dt` (seconds) applied per update; longer frames are clamped
    #[serde(default)]
    pub max_dt: Option<f32>,
}

/// Drives an [`AnimationInstance`] from a closed set of application states.
///
/// Every transition is a hard cut that restarts the new clip from tick 0.
/// When a looping clip ends it wraps and the state is kept; when a one-shot
/// clip ends the controller falls back to the default (start) state.
#[derive(Debug, Clone)]
pub struct AnimationStateController<S> {
    instance: AnimationInstance,
    current: S,
    default: S,
    states: HashMap<S, AnimInfo>,
    settings: ControllerSettings,
}

impl<S> AnimationStateController<S>
where
    S: Copy + Eq + Hash + Debug,
{
    /// `start_state` is both the initial and the default state. It must be
    /// registered with `add_state` before the first update.
    pub fn new(instance: AnimationInstance, start_state: S) -> Self {
        Self::with_settings(instance, start_state, ControllerSettings::default())
    }

    pub fn with_settings(
        instance: AnimationInstance,
        start_state: S,
        settings: ControllerSettings,
    ) -> Self {
        Self {
            instance,
            current: start_state,
            default: start_state,
            states: HashMap::new(),
            settings,
        }
    }

    /// Register a state at normal speed.
    pub fn add_state(&mut self, state: S, clip: impl Into<String>, loops: bool) -> Result<()> {
        self.add_state_with_speed(state, clip, loops, 1.0)
    }

    /// Register a state. The clip must exist in the instance's library.
    pub fn add_state_with_speed(
        &mut self,
        state: S,
        clip: impl Into<String>,
        loops: bool,
        speed: f32,
    ) -> Result<()> {
        self.register(
            state,
            AnimInfo {
                clip: clip.into(),
                loops,
                speed,
            },
        )
    }

    /// Register a state from a prepared [`AnimInfo`].
    pub fn register(&mut self, state: S, info: AnimInfo) -> Result<()> {
        if !info.speed.is_finite() || info.speed < 0.0 {
            return Err(GaitError::InvalidInput(format!(
                "Speed for state {:?} must be finite and non-negative, got {}",
                state, info.speed
            )));
        }
        if !self.instance.library().has_clip(&info.clip) {
            return Err(GaitError::ClipNotFound(info.clip));
        }

        log::debug!(
            "Registered state {:?} -> '{}' (loops: {}, speed: {})",
            state,
            info.clip,
            info.loops,
            info.speed
        );
        self.states.insert(state, info);
        Ok(())
    }

    /// Request a transition. Returns whether the state changed.
    ///
    /// Requesting the current state is a no-op and does not restart its clip.
    /// Under [`InterruptPolicy::FinishOneShots`] requests made while a
    /// one-shot is playing are ignored.
    pub fn change_state(&mut self, new_state: S) -> Result<bool> {
        self.require_registered(new_state)?;
        if new_state == self.current {
            return Ok(false);
        }
        if self.settings.interrupt == InterruptPolicy::FinishOneShots && self.is_busy() {
            log::debug!(
                "Ignored {:?} -> {:?}: one-shot still playing",
                self.current,
                new_state
            );
            return Ok(false);
        }
        self.transition(new_state, false)
    }

    /// Transition regardless of the interrupt policy.
    pub fn force_state(&mut self, new_state: S) -> Result<bool> {
        self.require_registered(new_state)?;
        if new_state == self.current {
            return Ok(false);
        }
        self.transition(new_state, false)
    }

    /// Advance playback of the current state by `dt` seconds.
    pub fn update(&mut self, dt: f32) -> Result<()> {
        validate_dt(dt)?;
        let dt = match self.settings.max_dt {
            Some(max_dt) if dt > max_dt => {
                log::warn!("Clamped animation dt from {} to {}", dt, max_dt);
                max_dt
            }
            _ => dt,
        };

        let info = self
            .states
            .get(&self.current)
            .ok_or_else(|| GaitError::StateNotRegistered(format!("{:?}", self.current)))?;
        let loops = info.loops;
        self.instance.update(&info.clip, dt * info.speed)?;

        if self.instance.animation_finished() {
            if loops {
                self.instance.wrap_animation_time();
            } else if self.current != self.default {
                let default = self.default;
                self.transition(default, true)?;
            }
        }
        Ok(())
    }

    /// Current state
    pub fn state(&self) -> S {
        self.current
    }

    pub fn default_state(&self) -> S {
        self.default
    }

    /// True while the current state is a one-shot that has not finished.
    pub fn is_busy(&self) -> bool {
        match self.states.get(&self.current) {
            Some(info) if !info.loops => {
                self.instance.clip_name() != Some(info.clip.as_str())
                    || !self.instance.animation_finished()
            }
            _ => false,
        }
    }

    pub fn is_registered(&self, state: S) -> bool {
        self.states.contains_key(&state)
    }

    pub fn anim_info(&self, state: S) -> Option<&AnimInfo> {
        self.states.get(&state)
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    pub fn instance(&self) -> &AnimationInstance {
        &self.instance
    }

    pub fn instance_mut(&mut self) -> &mut AnimationInstance {
        &mut self.instance
    }

    fn require_registered(&self, state: S) -> Result<()> {
        if self.states.contains_key(&state) {
            Ok(())
        } else {
            Err(GaitError::StateNotRegistered(format!("{:?}", state)))
        }
    }

    fn transition(&mut self, new_state: S, automatic: bool) -> Result<bool> {
        self.require_registered(new_state)?;
        log::debug!(
            "State {:?} -> {:?}{}",
            self.current,
            new_state,
            if automatic { " (one-shot finished)" } else { "" }
        );
        self.current = new_state;
        self.instance.reset_animation_time();
        Ok(true)
    }
}
