//! Per-entity playback cursor: advances clip time, samples keyframes, and
//! publishes the skinning matrix palette

use crate::clip::AnimationClip;
use crate::library::AnimationLibrary;
use crate::sampler::{sample_frames, FrameCursor};
use crate::skeleton::JointPose;
use gait_core::{GaitError, Result};
use glam::Mat4;
use std::sync::Arc;

/// Reject elapsed times that would poison the matrix pipeline.
pub(crate) fn validate_dt(dt: f32) -> Result<()> {
    if !dt.is_finite() || dt < 0.0 {
        return Err(GaitError::InvalidInput(format!(
            "dt must be finite and non-negative, got {}",
            dt
        )));
    }
    Ok(())
}

/// Mutable playback state for one animated entity.
///
/// Switching clips is a hard cut: the new clip starts from tick 0. After every
/// update the time lies within `[0, clip.duration()]`; time that ran past the
/// end is remembered so a looping caller can carry it into the next cycle with
/// [`wrap_animation_time`](Self::wrap_animation_time).
#[derive(Debug, Clone)]
pub struct AnimationInstance {
    library: Arc<AnimationLibrary>,
    clip_name: Option<String>,
    /// Current time in ticks
    time: f32,
    /// Ticks past the final frame that the last update discarded
    overshoot: f32,
    local_poses: Vec<JointPose>,
    world: Vec<Mat4>,
    /// GPU-ready skinning matrices, one per bone
    matrices: Vec<Mat4>,
}

impl AnimationInstance {
    pub fn new(library: Arc<AnimationLibrary>) -> Self {
        let bone_count = library.skeleton().bone_count();
        Self {
            library,
            clip_name: None,
            time: 0.0,
            overshoot: 0.0,
            local_poses: vec![JointPose::default(); bone_count],
            world: vec![Mat4::IDENTITY; bone_count],
            matrices: vec![Mat4::IDENTITY; bone_count],
        }
    }

    /// Advance `clip_name` by `dt` seconds and recompute the pose.
    ///
    /// A clip different from the previous call restarts at tick 0.
    pub fn update(&mut self, clip_name: &str, dt: f32) -> Result<()> {
        validate_dt(dt)?;
        let library = Arc::clone(&self.library);
        let clip = library.clip(clip_name)?;

        let switching = self.clip_name.as_deref() != Some(clip_name);
        let start = if switching { 0.0 } else { self.time };
        let time = start + dt * clip.ticks_per_second;
        if !time.is_finite() {
            return Err(GaitError::InvalidInput(format!(
                "dt {} overflows clip '{}' at {} ticks per second",
                dt, clip.name, clip.ticks_per_second
            )));
        }

        if switching {
            self.clip_name = Some(clip_name.to_string());
        }

        let duration = clip.duration();
        if time > duration {
            self.overshoot = time - duration;
            self.time = duration;
        } else {
            self.overshoot = 0.0;
            self.time = time;
        }

        self.pose(clip);
        Ok(())
    }

    /// True once time has reached the final frame of the active clip.
    pub fn animation_finished(&self) -> bool {
        match self.active_clip() {
            Some(clip) => self.time >= clip.duration(),
            None => false,
        }
    }

    /// Restart the active clip from tick 0. The pose is refreshed on the next update.
    pub fn reset_animation_time(&mut self) {
        self.time = 0.0;
        self.overshoot = 0.0;
    }

    /// Start the next cycle of a finished looping clip, keeping any time that
    /// ran past the end, and re-sample the pose at the wrapped time. Does
    /// nothing while the clip is still playing.
    pub fn wrap_animation_time(&mut self) {
        let library = Arc::clone(&self.library);
        let Some(clip) = self.clip_name.as_deref().and_then(|n| library.get_clip(n)) else {
            return;
        };

        let duration = clip.duration();
        if self.time < duration {
            return;
        }
        self.time = if duration > 0.0 {
            self.overshoot % duration
        } else {
            0.0
        };
        self.overshoot = 0.0;
        log::trace!("Clip '{}' wrapped to tick {}", clip.name, self.time);

        self.pose(clip);
    }

    /// Name of the clip played by the most recent update
    pub fn clip_name(&self) -> Option<&str> {
        self.clip_name.as_deref()
    }

    /// Current time in ticks
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Duration in ticks of the active clip, if any
    pub fn duration(&self) -> Option<f32> {
        self.active_clip().map(AnimationClip::duration)
    }

    pub fn library(&self) -> &Arc<AnimationLibrary> {
        &self.library
    }

    /// Local-space bone poses from the most recent sample
    pub fn local_poses(&self) -> &[JointPose] {
        &self.local_poses
    }

    /// Skinning matrices, indexed like the skeleton's bones
    pub fn matrices(&self) -> &[Mat4] {
        &self.matrices
    }

    /// Copy the palette into a caller-owned buffer (typically `MAX_BONES`
    /// long). Entries past the bone count are left untouched. Returns the
    /// number of matrices written.
    pub fn copy_matrices_into(&self, dst: &mut [Mat4]) -> usize {
        let n = self.matrices.len().min(dst.len());
        dst[..n].copy_from_slice(&self.matrices[..n]);
        n
    }

    fn active_clip(&self) -> Option<&AnimationClip> {
        self.clip_name
            .as_deref()
            .and_then(|name| self.library.get_clip(name))
    }

    fn pose(&mut self, clip: &AnimationClip) {
        let cursor = FrameCursor::at(self.time, clip.last_frame_index());
        sample_frames(
            &clip.frames[cursor.index],
            &clip.frames[cursor.next],
            cursor.frac,
            &mut self.local_poses,
        );
        self.library.skeleton().compute_bone_matrices(
            &self.local_poses,
            &mut self.world,
            &mut self.matrices,
        );
    }
}
