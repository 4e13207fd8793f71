use crate::transform::{Matrix4, perspective_fov, rotation_x, rotation_y, translation};

/// Perspective camera orbiting the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    pub fov_y_degrees: f32,
    /// Rotation of the model about the y axis, radians.
    pub yaw: f32,
    /// Rotation of the model about the x axis, radians.
    pub pitch: f32,
    pub distance: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self { fov_y_degrees: 30.0, yaw: 0.0, pitch: 0.0, distance: 3.0, near: 0.1, far: 100.0 }
    }
}

impl OrbitCamera {
    pub fn view(&self) -> Matrix4 {
        translation(0.0, 0.0, -self.distance) * rotation_x(self.pitch) * rotation_y(self.yaw)
    }

    pub fn projection(&self, aspect: f32) -> Matrix4 {
        perspective_fov(self.fov_y_degrees, aspect, self.near, self.far)
    }

    pub fn model_view_projection(&self, aspect: f32) -> Matrix4 {
        self.projection(aspect) * self.view()
    }

    #[cfg(feature = "viewer")]
    pub fn camera_update(&mut self, r1: &raylib::prelude::RaylibHandle) {
        use raylib::prelude::*;

        let mouse_sensitivity = 0.005;
        let mouse_delta = r1.get_mouse_delta();
        // Update yaw & pitch if clicking
        if r1.is_mouse_button_down(MouseButton::MOUSE_BUTTON_LEFT) {
            self.yaw += mouse_delta.x * mouse_sensitivity;
            self.pitch += mouse_delta.y * mouse_sensitivity;
            // Clamp pitch so camera can't flip upside-down
            self.pitch = self.pitch.clamp(-85.0f32.to_radians(), 85.0f32.to_radians());
        }
        if r1.is_key_down(KeyboardKey::KEY_W) { self.distance *= 0.98 }
        if r1.is_key_down(KeyboardKey::KEY_S) { self.distance *= 1.02 }
        self.distance = self.distance.max(self.near * 2.0);
        self.fov_y_degrees -= r1.get_mouse_wheel_move();
        // Clamp fov so camera can't flip inside-out
        self.fov_y_degrees = self.fov_y_degrees.clamp(1.0, 170.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point4d::Point4D;

    #[test]
    fn origin_projects_to_center_at_camera_distance() {
        let cam = OrbitCamera { yaw: 0.7, pitch: -0.2, ..OrbitCamera::default() };
        let clip = cam.model_view_projection(4.0 / 3.0) * Point4D::point(0.0, 0.0, 0.0);
        assert!((clip.w - cam.distance).abs() < 1e-5);
        assert!(clip.x.abs() < 1e-5 && clip.y.abs() < 1e-5);
    }
}
