//! Skeletal animation core for gait
//!
//! Turns clip time into a flat palette of skinning matrices:
//! - [`Skeleton`] / [`AnimationClip`] / [`AnimationLibrary`]: immutable,
//!   validated data produced once by an external loader
//! - [`AnimationInstance`]: per-entity playback cursor that samples keyframes
//!   and composes the bone hierarchy
//! - [`AnimationStateController`]: maps application states onto clips with
//!   loop/one-shot semantics and fallback to a default state
//!
//! Each frame, game logic calls `controller.update(dt)` and the renderer
//! reads `controller.instance().matrices()`.

pub mod clip;
pub mod config;
pub mod controller;
pub mod instance;
pub mod library;
pub mod sampler;
pub mod skeleton;

pub use clip::{AnimationClip, KeyFrame};
pub use config::StateTable;
pub use controller::{AnimInfo, AnimationStateController, ControllerSettings, InterruptPolicy};
pub use instance::AnimationInstance;
pub use library::AnimationLibrary;
pub use skeleton::{Bone, JointPose, Skeleton, MAX_BONES};

pub use gait_core::{GaitError, Result};
