//! Keyframe sampling: frame lookup from tick time, lerp for translation and
//! scale, shortest-arc slerp for rotation

use crate::clip::KeyFrame;
use crate::skeleton::JointPose;
use glam::Quat;

/// Pair of frames surrounding a tick time plus the blend factor between them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameCursor {
    pub index: usize,
    pub next: usize,
    pub frac: f32,
}

impl FrameCursor {
    /// Locate `time` (in ticks) within a clip whose final frame is `last_index`.
    ///
    /// Never reads past the final frame: at or beyond it both indices clamp
    /// to `last_index` and `frac` is zero.
    pub fn at(time: f32, last_index: usize) -> Self {
        let time = time.max(0.0);
        let index = time.floor() as usize;

        if index >= last_index {
            return Self {
                index: last_index,
                next: last_index,
                frac: 0.0,
            };
        }

        Self {
            index,
            next: index + 1,
            frac: time - index as f32,
        }
    }
}

/// Interpolate every bone between two keyframes into `out`.
pub fn sample_frames(a: &KeyFrame, b: &KeyFrame, frac: f32, out: &mut [JointPose]) {
    for (i, pose) in out.iter_mut().enumerate() {
        pose.translation = a.positions[i].lerp(b.positions[i], frac);
        pose.rotation = quat_slerp(a.rotations[i], b.rotations[i], frac);
        pose.scale = a.scales[i].lerp(b.scales[i], frac);
    }
}

/// Quaternion spherical linear interpolation with shortest-path correction.
///
/// The result is normalized.
pub fn quat_slerp(a: Quat, b: Quat, t: f32) -> Quat {
    let mut b = b;
    let mut dot = a.dot(b);

    // Shortest path: if dot < 0, negate b
    if dot < 0.0 {
        b = -b;
        dot = -dot;
    }

    // Nearly parallel, lerp to avoid dividing by sin(theta) ~ 0
    let (scale_a, scale_b) = if dot > 0.9995 {
        (1.0 - t, t)
    } else {
        let theta = dot.acos();
        let sin_theta = theta.sin();
        (
            ((1.0 - t) * theta).sin() / sin_theta,
            (t * theta).sin() / sin_theta,
        )
    };

    let r = a * scale_a + b * scale_b;
    let len = r.length();
    if len < 1e-10 {
        return Quat::IDENTITY;
    }
    r / len
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn quat_close(a: Quat, b: Quat) -> bool {
        // q and -q encode the same rotation
        a.abs_diff_eq(b, 1e-4) || a.abs_diff_eq(-b, 1e-4)
    }

    #[test]
    fn cursor_interpolates_inside_clip() {
        let c = FrameCursor::at(2.25, 10);
        assert_eq!(c.index, 2);
        assert_eq!(c.next, 3);
        assert!((c.frac - 0.25).abs() < 1e-6);
    }

    #[test]
    fn cursor_clamps_at_and_past_final_frame() {
        let end = FrameCursor {
            index: 4,
            next: 4,
            frac: 0.0,
        };
        assert_eq!(FrameCursor::at(4.0, 4), end);
        assert_eq!(FrameCursor::at(17.3, 4), end);
    }

    #[test]
    fn cursor_single_frame_clip() {
        let c = FrameCursor::at(0.5, 0);
        assert_eq!((c.index, c.next, c.frac), (0, 0, 0.0));
    }

    #[test]
    fn cursor_exact_keyframe_has_zero_frac() {
        let c = FrameCursor::at(3.0, 8);
        assert_eq!((c.index, c.next), (3, 4));
        assert_eq!(c.frac, 0.0);
    }

    #[test]
    fn slerp_identity_at_endpoints() {
        let a = Quat::IDENTITY;
        let b = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);

        assert!(quat_close(quat_slerp(a, b, 0.0), a));
        assert!(quat_close(quat_slerp(a, b, 1.0), b));
    }

    #[test]
    fn slerp_midpoint_is_normalized() {
        let a = Quat::IDENTITY;
        let b = Quat::from_xyzw(0.0, 1.0, 0.0, 0.0); // 180-degree Y rotation

        let mid = quat_slerp(a, b, 0.5);
        assert!(
            (mid.length() - 1.0).abs() < 1e-5,
            "slerp midpoint should be normalized, got length {}",
            mid.length()
        );
    }

    #[test]
    fn slerp_half_angle() {
        let a = Quat::IDENTITY;
        let b = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        let mid = quat_slerp(a, b, 0.5);
        assert!(quat_close(mid, Quat::from_rotation_y(std::f32::consts::FRAC_PI_4)));
    }

    #[test]
    fn slerp_shortest_path() {
        // Same 90-degree rotation encoded with the opposite sign: the short way
        // between identity and it passes through 45 degrees, not 135
        let a = Quat::IDENTITY;
        let b = -Quat::from_rotation_z(std::f32::consts::FRAC_PI_2);

        let mid = quat_slerp(a, b, 0.5);
        let angle = mid.angle_between(Quat::IDENTITY);
        assert!(
            (angle - std::f32::consts::FRAC_PI_4).abs() < 1e-4,
            "expected 45 degrees, got {} rad",
            angle
        );
    }

    #[test]
    fn sample_frames_blends_all_channels() {
        let a = KeyFrame {
            positions: vec![Vec3::ZERO],
            rotations: vec![Quat::IDENTITY],
            scales: vec![Vec3::ONE],
        };
        let b = KeyFrame {
            positions: vec![Vec3::new(4.0, 6.0, 8.0)],
            rotations: vec![Quat::from_rotation_x(1.0)],
            scales: vec![Vec3::splat(3.0)],
        };
        let mut out = [JointPose::default()];
        sample_frames(&a, &b, 0.5, &mut out);

        assert!(out[0].translation.abs_diff_eq(Vec3::new(2.0, 3.0, 4.0), 1e-5));
        assert!(out[0].scale.abs_diff_eq(Vec3::splat(2.0), 1e-5));
        assert!(quat_close(out[0].rotation, Quat::from_rotation_x(0.5)));
    }

    #[test]
    fn sample_frames_at_zero_reproduces_keyframe() {
        let a = KeyFrame {
            positions: vec![Vec3::new(1.0, 2.0, 3.0)],
            rotations: vec![Quat::from_rotation_y(0.7)],
            scales: vec![Vec3::new(1.0, 2.0, 0.5)],
        };
        let b = KeyFrame {
            positions: vec![Vec3::new(9.0, 9.0, 9.0)],
            rotations: vec![Quat::from_rotation_y(-1.2)],
            scales: vec![Vec3::ONE],
        };
        let mut out = [JointPose::default()];
        sample_frames(&a, &b, 0.0, &mut out);

        assert_eq!(out[0].translation, a.positions[0]);
        assert_eq!(out[0].scale, a.scales[0]);
        assert!(quat_close(out[0].rotation, a.rotations[0]));
    }
}
