//! Skeletal animation clip — uniformly spaced keyframes holding one pose per bone

use gait_core::{GaitError, Result};
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// One sampled pose: index `i` of each array belongs to bone `i` of the skeleton.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyFrame {
    pub positions: Vec<Vec3>,
    /// Unit quaternions
    pub rotations: Vec<Quat>,
    pub scales: Vec<Vec3>,
}

impl KeyFrame {
    fn is_finite(&self) -> bool {
        self.positions.iter().all(|p| p.is_finite())
            && self.rotations.iter().all(|q| q.is_finite())
            && self.scales.iter().all(|s| s.is_finite())
    }
}

/// A named motion sampled against one skeleton.
///
/// Frame `n` sits at tick `n`; `ticks_per_second` converts seconds into ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationClip {
    pub name: String,
    pub ticks_per_second: f32,
    pub frames: Vec<KeyFrame>,
}

impl AnimationClip {
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn last_frame_index(&self) -> usize {
        self.frames.len().saturating_sub(1)
    }

    /// Tick of the final frame
    pub fn duration(&self) -> f32 {
        self.last_frame_index() as f32
    }

    /// Length in seconds at normal speed
    pub fn duration_seconds(&self) -> f32 {
        self.duration() / self.ticks_per_second
    }

    /// Check the clip against the bone count of the skeleton it will drive.
    pub fn validate(&self, bone_count: usize) -> Result<()> {
        if self.frames.is_empty() {
            return Err(GaitError::DataIntegrity(format!(
                "Clip '{}' has no frames",
                self.name
            )));
        }

        if !self.ticks_per_second.is_finite() || self.ticks_per_second <= 0.0 {
            return Err(GaitError::DataIntegrity(format!(
                "Clip '{}' has invalid ticks per second: {}",
                self.name, self.ticks_per_second
            )));
        }

        for (i, frame) in self.frames.iter().enumerate() {
            let lengths = [
                frame.positions.len(),
                frame.rotations.len(),
                frame.scales.len(),
            ];
            if lengths.iter().any(|&len| len != bone_count) {
                return Err(GaitError::DataIntegrity(format!(
                    "Clip '{}' frame {} has {} positions, {} rotations, {} scales; skeleton has {} bones",
                    self.name, i, lengths[0], lengths[1], lengths[2], bone_count
                )));
            }
            if !frame.is_finite() {
                return Err(GaitError::DataIntegrity(format!(
                    "Clip '{}' frame {} contains non-finite values",
                    self.name, i
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(bones: usize) -> KeyFrame {
        KeyFrame {
            positions: vec![Vec3::ZERO; bones],
            rotations: vec![Quat::IDENTITY; bones],
            scales: vec![Vec3::ONE; bones],
        }
    }

    fn clip(frames: Vec<KeyFrame>) -> AnimationClip {
        AnimationClip {
            name: "walk".into(),
            ticks_per_second: 30.0,
            frames,
        }
    }

    #[test]
    fn duration_is_last_frame_tick() {
        let c = clip(vec![frame(2); 31]);
        assert_eq!(c.frame_count(), 31);
        assert_eq!(c.last_frame_index(), 30);
        assert_eq!(c.duration(), 30.0);
        assert!((c.duration_seconds() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn single_frame_clip_has_zero_duration() {
        let c = clip(vec![frame(1)]);
        assert_eq!(c.duration(), 0.0);
        assert!(c.validate(1).is_ok());
    }

    #[test]
    fn reject_empty_clip() {
        let c = clip(vec![]);
        assert!(matches!(c.validate(2), Err(GaitError::DataIntegrity(_))));
    }

    #[test]
    fn reject_bone_count_mismatch() {
        let mut bad = frame(2);
        bad.rotations.pop();
        let c = clip(vec![frame(2), bad]);
        assert!(c.validate(2).is_err());
        assert!(clip(vec![frame(3)]).validate(2).is_err());
    }

    #[test]
    fn reject_bad_ticks_per_second() {
        let mut c = clip(vec![frame(1)]);
        c.ticks_per_second = 0.0;
        assert!(c.validate(1).is_err());
        c.ticks_per_second = f32::INFINITY;
        assert!(c.validate(1).is_err());
    }

    #[test]
    fn reject_non_finite_keyframe_data() {
        let mut bad = frame(1);
        bad.positions[0].y = f32::NAN;
        assert!(clip(vec![bad]).validate(1).is_err());
    }
}
