/*
 * Camera Module
 *
 * This module defines the Camera struct that looks at the aquarium from a
 * fixed angle and provides the coordinate transformation from world space
 * (3D, y up) to screen space (nannou's 2D window coordinates).
 */

use nannou::prelude::*;

pub struct Camera {
    pub target: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    pub focal_length: f32,
    pub near: f32,
}

impl Camera {
    pub fn looking_at(target: Vec3) -> Self {
        Self {
            target,
            yaw: 0.55,
            pitch: 0.3,
            distance: 95.0,
            focal_length: 900.0,
            near: 1.0,
        }
    }

    // Rotate a world point into camera space; z grows away from the viewer
    fn to_view(&self, point: Vec3) -> Vec3 {
        let p = point - self.target;
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();

        let x = p.x * cos_yaw - p.z * sin_yaw;
        let z = p.x * sin_yaw + p.z * cos_yaw;
        let y = p.y * cos_pitch - z * sin_pitch;
        let z = p.y * sin_pitch + z * cos_pitch;

        vec3(x, y, z + self.distance)
    }

    /// Distance along the view axis, used to draw far things first.
    pub fn depth(&self, point: Vec3) -> f32 {
        self.to_view(point).z
    }

    /// Pixels per world unit at `point`.
    pub fn scale_at(&self, point: Vec3) -> f32 {
        self.focal_length / self.depth(point).max(self.near)
    }

    // Convert a point from world space to screen space; None when behind the camera
    pub fn world_to_screen(&self, point: Vec3, window_rect: Rect) -> Option<Vec2> {
        let view = self.to_view(point);
        if view.z < self.near {
            return None;
        }
        let scale = self.focal_length / view.z;
        Some(vec2(view.x * scale, view.y * scale) + window_rect.xy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> Rect {
        Rect::from_w_h(1280.0, 800.0)
    }

    #[test]
    fn target_lands_in_the_window_center() {
        let camera = Camera::looking_at(vec3(0.0, 20.0, 0.0));
        let screen = camera.world_to_screen(vec3(0.0, 20.0, 0.0), window()).unwrap();
        assert!(screen.length() < 1.0e-3);
    }

    #[test]
    fn up_is_up_on_screen() {
        let camera = Camera::looking_at(Vec3::ZERO);
        let low = camera.world_to_screen(vec3(0.0, -5.0, 0.0), window()).unwrap();
        let high = camera.world_to_screen(vec3(0.0, 5.0, 0.0), window()).unwrap();
        assert!(high.y > low.y);
    }

    fn straight_on() -> Camera {
        Camera {
            yaw: 0.0,
            pitch: 0.0,
            ..Camera::looking_at(Vec3::ZERO)
        }
    }

    #[test]
    fn points_behind_the_camera_are_dropped() {
        let camera = straight_on();
        assert!(camera.world_to_screen(vec3(0.0, 0.0, -200.0), window()).is_none());
        assert!(camera.world_to_screen(vec3(0.0, 0.0, 200.0), window()).is_some());
    }

    #[test]
    fn farther_points_look_smaller() {
        let camera = straight_on();
        let near = vec3(0.0, 0.0, -50.0);
        assert!(camera.depth(near) < camera.depth(Vec3::ZERO));
        assert!(camera.scale_at(near) > camera.scale_at(Vec3::ZERO));
    }
}
