//! Poses, transforms and the small amount of rotation math shared by the
//! camera, the scene graph and the overlays.
//!
//! Euler angles follow the convention of the scene files this crate reads:
//! camera targets use the `YXZ` order (yaw, then pitch, then roll) while
//! overlay and card rotations use `XYZ`.

use glam::{EulerRot, Mat4, Quat, Vec3};

/// Position, orientation and vertical field of view of the camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub orientation: Quat,
    /// Vertical field of view in degrees.
    pub fov_deg: f32,
}

impl CameraPose {
    pub fn new(position: Vec3, orientation: Quat, fov_deg: f32) -> Self {
        Self {
            position,
            orientation: orientation.normalize(),
            fov_deg,
        }
    }

    /// Interpolate toward `end` with an already-eased parameter `t`.
    ///
    /// Position and fov are linear, orientation is spherical. The returned
    /// orientation is always normalized.
    pub fn interpolate(&self, end: &CameraPose, t: f32) -> CameraPose {
        CameraPose {
            position: self.position.lerp(end.position, t),
            orientation: self.orientation.slerp(end.orientation, t).normalize(),
            fov_deg: self.fov_deg + (end.fov_deg - self.fov_deg) * t,
        }
    }
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            fov_deg: 75.0,
        }
    }
}

/// Translation, rotation and scale of a scene node or overlay.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    pub fn from_parts(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    pub fn with_uniform_scale(mut self, s: f32) -> Self {
        self.scale = Vec3::splat(s);
        self
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// Decompose an affine matrix into translation, rotation and scale.
    pub fn from_matrix(m: &Mat4) -> Self {
        let (scale, rotation, translation) = m.to_scale_rotation_translation();
        Self {
            translation,
            rotation: rotation.normalize(),
            scale,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Cubic ease-out: fast start, decelerating to rest at 1.
#[inline]
pub fn ease_out_cubic(progress: f32) -> f32 {
    let p = progress.clamp(0.0, 1.0);
    1.0 - (1.0 - p).powi(3)
}

/// Quaternion for an Euler rotation in `YXZ` order, angles in radians.
#[inline]
pub fn quat_from_euler_yxz(x: f32, y: f32, z: f32) -> Quat {
    Quat::from_euler(EulerRot::YXZ, y, x, z)
}

/// Quaternion for an Euler rotation in `YXZ` order, angles in degrees.
#[inline]
pub fn quat_from_euler_yxz_deg(x: f32, y: f32, z: f32) -> Quat {
    quat_from_euler_yxz(x.to_radians(), y.to_radians(), z.to_radians())
}

/// Quaternion for an Euler rotation in `XYZ` order, angles in radians.
#[inline]
pub fn quat_from_euler_xyz(euler: Vec3) -> Quat {
    Quat::from_euler(EulerRot::XYZ, euler.x, euler.y, euler.z)
}

/// Inverse of [`quat_from_euler_xyz`], returned as `(x, y, z)` radians.
#[inline]
pub fn euler_xyz_from_quat(q: Quat) -> Vec3 {
    let (x, y, z) = q.to_euler(EulerRot::XYZ);
    Vec3::new(x, y, z)
}

#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ease_endpoints_and_clamp() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert_eq!(ease_out_cubic(1.3), 1.0);
        assert!(ease_out_cubic(0.5) > 0.5);
    }

    #[test]
    fn yxz_applies_yaw_before_pitch() {
        let q = quat_from_euler_yxz_deg(30.0, 90.0, 0.0);
        let expected = Quat::from_rotation_y(90f32.to_radians()) * Quat::from_rotation_x(30f32.to_radians());
        assert!(q.dot(expected).abs() > 0.9999);
    }

    #[test]
    fn xyz_round_trip_inside_principal_range() {
        let e = Vec3::new(0.3, -0.4, 1.1);
        let back = euler_xyz_from_quat(quat_from_euler_xyz(e));
        assert!((back - e).length() < 1e-4);
    }

    #[test]
    fn transform_matrix_decomposes_back() {
        let t = Transform::from_parts(
            Vec3::new(1.0, -2.0, 0.5),
            Quat::from_rotation_z(0.7),
            Vec3::splat(0.25),
        );
        let d = Transform::from_matrix(&t.matrix());
        assert!((d.translation - t.translation).length() < 1e-5);
        assert!(d.rotation.dot(t.rotation).abs() > 0.9999);
        assert!((d.scale - t.scale).length() < 1e-5);
    }
}
