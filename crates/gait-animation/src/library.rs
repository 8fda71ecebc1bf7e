//! Read-only clip registry bound to one skeleton

use crate::clip::AnimationClip;
use crate::skeleton::Skeleton;
use gait_core::{GaitError, Result};
use std::collections::HashMap;

/// A skeleton plus every clip sampled against it, keyed by clip name.
///
/// Built once per loaded model and shared (usually behind an `Arc`) by all
/// instances animating that model. Clips are validated here so playback never
/// has to bounds-check keyframe data.
#[derive(Debug, Clone)]
pub struct AnimationLibrary {
    skeleton: Skeleton,
    clips: HashMap<String, AnimationClip>,
}

impl AnimationLibrary {
    /// Validate every clip against `skeleton` and build the library.
    ///
    /// Fails on the first malformed clip or on duplicate clip names.
    pub fn new(skeleton: Skeleton, clips: impl IntoIterator<Item = AnimationClip>) -> Result<Self> {
        let mut by_name = HashMap::new();
        for clip in clips {
            clip.validate(skeleton.bone_count())?;
            if by_name.contains_key(&clip.name) {
                return Err(GaitError::DataIntegrity(format!(
                    "Duplicate clip name: {}",
                    clip.name
                )));
            }
            by_name.insert(clip.name.clone(), clip);
        }

        log::info!(
            "Animation library built ({} bones, {} clips)",
            skeleton.bone_count(),
            by_name.len()
        );

        Ok(Self {
            skeleton,
            clips: by_name,
        })
    }

    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    /// Look up a clip by name, failing with `ClipNotFound` if absent.
    pub fn clip(&self, name: &str) -> Result<&AnimationClip> {
        self.clips
            .get(name)
            .ok_or_else(|| GaitError::ClipNotFound(name.to_string()))
    }

    pub(crate) fn get_clip(&self, name: &str) -> Option<&AnimationClip> {
        self.clips.get(name)
    }

    pub fn has_clip(&self, name: &str) -> bool {
        self.clips.contains_key(name)
    }

    pub fn clip_count(&self) -> usize {
        self.clips.len()
    }

    /// Clip names in sorted order
    pub fn clip_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.clips.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
