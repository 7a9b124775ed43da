/*
 * Camera Module
 *
 * This module defines the orbit Camera used by the viewer. Dragging turns
 * the camera around the origin and the mouse wheel moves it closer or
 * further away. It produces the projection and view matrices handed to
 * every draw call of a frame.
 */

use glam::{Mat4, Vec2, Vec3};

pub struct Camera {
    // Degrees around the vertical axis
    pub yaw: f32,
    // Degrees above the horizontal plane
    pub pitch: f32,
    pub distance: f32,
    pub fov_y: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub is_dragging: bool,
    pub last_cursor_pos: Vec2,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera {
    pub fn new() -> Self {
        Self {
            yaw: 30.0,
            pitch: 20.0,
            distance: 40.0,
            fov_y: 45.0,
            min_distance: 5.0,
            max_distance: 200.0,
            is_dragging: false,
            last_cursor_pos: Vec2::ZERO,
        }
    }

    pub fn eye(&self) -> Vec3 {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.distance * Vec3::new(pitch.cos() * yaw.sin(), pitch.sin(), pitch.cos() * yaw.cos())
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), Vec3::ZERO, Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y.to_radians(), aspect.max(1e-3), 0.1, 1000.0)
    }

    // Handle mouse wheel events; positive scrolls move closer
    pub fn zoom(&mut self, scroll: f32) {
        let zoom_factor = 1.0 - scroll * 0.1;
        self.distance = (self.distance * zoom_factor).clamp(self.min_distance, self.max_distance);
    }

    pub fn start_drag(&mut self, position: Vec2) {
        self.last_cursor_pos = position;
        self.is_dragging = true;
    }

    // Orbit by the cursor movement since the last event
    pub fn drag(&mut self, position: Vec2) {
        if self.is_dragging {
            let delta = position - self.last_cursor_pos;
            if delta.length_squared() > 0.0 {
                self.yaw -= delta.x * 0.3;
                self.pitch = (self.pitch - delta.y * 0.3).clamp(-89.0, 89.0);
                self.last_cursor_pos = position;
            }
        }
    }

    pub fn end_drag(&mut self) {
        self.is_dragging = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn eye_sits_at_orbit_distance() {
        let camera = Camera::new();
        assert_relative_eq!(camera.eye().length(), camera.distance, epsilon = 1e-4);
    }

    #[test]
    fn origin_lands_in_front_of_the_camera() {
        let camera = Camera::new();
        let clip = camera.projection_matrix(1.5) * camera.view_matrix() * glam::Vec4::W;
        assert!(clip.w > 0.0);
        assert_relative_eq!(clip.x / clip.w, 0.0, epsilon = 1e-5);
        assert_relative_eq!(clip.y / clip.w, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn zoom_and_pitch_are_clamped() {
        let mut camera = Camera::new();
        for _ in 0..100 {
            camera.zoom(5.0);
        }
        assert_eq!(camera.distance, camera.min_distance);

        camera.start_drag(Vec2::ZERO);
        camera.drag(Vec2::new(0.0, -10_000.0));
        camera.end_drag();
        assert_eq!(camera.pitch, 89.0);
        camera.drag(Vec2::new(50.0, 50.0));
        assert_eq!(camera.pitch, 89.0);
    }
}
