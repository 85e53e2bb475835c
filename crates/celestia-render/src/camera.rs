//! Perspective camera producing reverse-Z view and projection matrices.

use glam::{Mat4, Quat, Vec3};

/// A perspective camera.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    /// Rotation as a unit quaternion. Identity looks down -Z.
    pub rotation: Quat,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Width / height.
    pub aspect_ratio: f32,
    /// Near clip plane distance (always positive).
    pub near: f32,
    /// Far clip plane distance (always positive, > near).
    pub far: f32,
}

impl Camera {
    /// Perspective camera with a vertical field of view in degrees.
    pub fn perspective(fov_y_degrees: f32, aspect_ratio: f32, near: f32, far: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            fov_y: fov_y_degrees.to_radians(),
            aspect_ratio,
            near,
            far,
        }
    }

    /// Compute the view matrix (inverse of camera transform).
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position).inverse()
    }

    /// Reverse-Z projection: near maps to depth 1, far to depth 0.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect_ratio, self.far, self.near)
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// The forward direction vector (-Z in camera space).
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// The up direction vector (+Y in camera space).
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// The right direction vector (+X in camera space).
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Re-aim the camera at `target`, keeping world +Y as up.
    ///
    /// Leaves the rotation untouched when `target` coincides with the camera
    /// position or lies straight above/below it.
    pub fn look_at(&mut self, target: Vec3) {
        let direction = target - self.position;
        if direction.length_squared() <= f32::EPSILON
            || direction.normalize().cross(Vec3::Y).length_squared() <= f32::EPSILON
        {
            return;
        }
        let view = Mat4::look_at_rh(self.position, target, Vec3::Y);
        self.rotation = Quat::from_mat4(&view.inverse()).normalize();
    }

    /// Set the aspect ratio from a width and height.
    ///
    /// Non-positive or non-finite dimensions leave the current ratio in place.
    /// Returns whether the ratio was applied.
    pub fn set_aspect_ratio(&mut self, width: f32, height: f32) -> bool {
        let ratio = width / height;
        if width > 0.0 && height > 0.0 && ratio.is_finite() {
            self.aspect_ratio = ratio;
            true
        } else {
            false
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::perspective(45.0, 16.0 / 9.0, 0.1, 10000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_camera_looks_down_neg_z() {
        let forward = Camera::default().forward();
        assert!((forward - Vec3::NEG_Z).length() < 1e-6);
    }

    #[test]
    fn test_set_aspect_ratio() {
        let mut camera = Camera::default();
        assert!(camera.set_aspect_ratio(1024.0, 768.0));
        assert!((camera.aspect_ratio - 1024.0 / 768.0).abs() < 1e-6);
    }

    #[test]
    fn test_set_aspect_ratio_rejects_zero_height() {
        let mut camera = Camera::default();
        let before = camera.aspect_ratio;
        assert!(!camera.set_aspect_ratio(800.0, 0.0));
        assert_eq!(camera.aspect_ratio, before);
    }

    #[test]
    fn test_look_at_points_forward_at_target() {
        let mut camera = Camera::default();
        camera.position = Vec3::new(0.5, 1.8, 17.5);
        camera.look_at(Vec3::ZERO);
        let expected = (-camera.position).normalize();
        assert!((camera.forward() - expected).length() < 1e-5);
        // No roll: right stays horizontal.
        assert!(camera.right().y.abs() < 1e-5);
    }

    #[test]
    fn test_look_at_degenerate_keeps_rotation() {
        let mut camera = Camera::default();
        camera.position = Vec3::new(0.0, 10.0, 0.0);
        camera.look_at(Vec3::ZERO);
        assert_eq!(camera.rotation, Quat::IDENTITY);
        camera.look_at(camera.position);
        assert_eq!(camera.rotation, Quat::IDENTITY);
    }

    #[test]
    fn test_view_matrix_inverse_is_camera_transform() {
        let camera = Camera {
            position: Vec3::new(10.0, 20.0, 30.0),
            rotation: Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
            ..Camera::default()
        };
        let reconstructed = camera.view_matrix().inverse().col(3).truncate();
        assert!((reconstructed - camera.position).length() < 1e-4);
    }

    #[test]
    fn test_reverse_z_depth_range() {
        let camera = Camera::perspective(55.0, 1.0, 0.1, 2000.0);
        let proj = camera.projection_matrix();
        let near = proj * glam::Vec4::new(0.0, 0.0, -0.1, 1.0);
        let far = proj * glam::Vec4::new(0.0, 0.0, -2000.0, 1.0);
        assert!((near.z / near.w - 1.0).abs() < 1e-4);
        assert!((far.z / far.w).abs() < 1e-4);
    }

    #[test]
    fn test_up_right_forward_orthogonal() {
        let mut camera = Camera::default();
        camera.position = Vec3::new(-0.7, 1.8, 17.5);
        camera.look_at(Vec3::ZERO);
        let (f, u, r) = (camera.forward(), camera.up(), camera.right());
        assert!(f.dot(u).abs() < 1e-5);
        assert!(f.dot(r).abs() < 1e-5);
        assert!(u.dot(r).abs() < 1e-5);
    }
}
