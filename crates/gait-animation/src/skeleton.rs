//! Bone hierarchy with bind-pose data and skinning matrix computation

use gait_core::{GaitError, Result};
use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Upper bound on bones per skeleton (size of the skinning matrix palette)
pub const MAX_BONES: usize = 256;

/// A single bone in the hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bone {
    pub name: String,
    /// Index of the parent bone, `None` for roots
    pub parent: Option<usize>,
    /// Inverse bind transform: mesh space to bone space
    pub offset: Mat4,
}

impl Bone {
    /// Build a bone from a loader-style signed parent index, where any
    /// negative value marks a root.
    pub fn new(name: impl Into<String>, parent_index: i32, offset: Mat4) -> Self {
        Self {
            name: name.into(),
            parent: usize::try_from(parent_index).ok(),
            offset,
        }
    }
}

/// A single bone's local-space pose (translation, rotation, scale)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointPose {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for JointPose {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl JointPose {
    /// Local transform as `Translation * Rotation * Scale`
    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// Immutable bone hierarchy shared by every instance animating the same model.
///
/// Bones are stored flat with parents always preceding their children, so the
/// skinning pipeline resolves the whole hierarchy in one forward pass:
/// 1. `world[i] = world[parent[i]] * local[i]` (roots use `local[i]`)
/// 2. `skinning[i] = global_inverse * world[i] * offset[i]`
#[derive(Debug, Clone)]
pub struct Skeleton {
    bones: Vec<Bone>,
    global_inverse: Mat4,
}

impl Skeleton {
    /// Validate and build a skeleton.
    ///
    /// Rejects empty skeletons, more than [`MAX_BONES`] bones, parent indices
    /// that do not precede the bone itself, and non-finite matrices.
    pub fn new(bones: Vec<Bone>, global_inverse: Mat4) -> Result<Self> {
        if bones.is_empty() {
            return Err(GaitError::DataIntegrity(
                "Skeleton has no bones".to_string(),
            ));
        }
        if bones.len() > MAX_BONES {
            return Err(GaitError::DataIntegrity(format!(
                "Skeleton has {} bones, maximum is {}",
                bones.len(),
                MAX_BONES
            )));
        }
        if !global_inverse.is_finite() {
            return Err(GaitError::DataIntegrity(
                "Skeleton global inverse transform is not finite".to_string(),
            ));
        }

        for (i, bone) in bones.iter().enumerate() {
            if let Some(parent) = bone.parent {
                if parent >= i {
                    return Err(GaitError::DataIntegrity(format!(
                        "Bone {} '{}' references parent {} which does not precede it",
                        i, bone.name, parent
                    )));
                }
            }
            if !bone.offset.is_finite() {
                return Err(GaitError::DataIntegrity(format!(
                    "Bone {} '{}' has a non-finite offset matrix",
                    i, bone.name
                )));
            }
        }

        Ok(Self {
            bones,
            global_inverse,
        })
    }

    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    pub fn bone(&self, index: usize) -> Option<&Bone> {
        self.bones.get(index)
    }

    /// Index of the first bone with the given name
    pub fn find_bone(&self, name: &str) -> Option<usize> {
        self.bones.iter().position(|b| b.name == name)
    }

    pub fn global_inverse(&self) -> Mat4 {
        self.global_inverse
    }

    /// Compose local poses into world transforms and final skinning matrices.
    ///
    /// All three slices must hold exactly `bone_count()` entries.
    pub(crate) fn compute_bone_matrices(
        &self,
        local_poses: &[JointPose],
        world: &mut [Mat4],
        skinning: &mut [Mat4],
    ) {
        debug_assert_eq!(local_poses.len(), self.bones.len());
        debug_assert_eq!(world.len(), self.bones.len());
        debug_assert_eq!(skinning.len(), self.bones.len());

        for (i, bone) in self.bones.iter().enumerate() {
            let local = local_poses[i].to_mat4();

            world[i] = match bone.parent {
                Some(parent_idx) => world[parent_idx] * local,
                None => local,
            };

            skinning[i] = self.global_inverse * world[i] * bone.offset;
        }
    }
}
