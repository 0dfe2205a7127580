use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3};

/// A camera placement: where it sits and which point it aims at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub look_at: Vec3,
}

impl CameraPose {
    pub fn new(position: Vec3, look_at: Vec3) -> Self {
        Self { position, look_at }
    }
}

/// Half-line used for pointer picking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length.
    pub direction: Vec3,
}

/// GPU-side uniform data for the camera.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_projection: [[f32; 4]; 4],
    /// World-space eye position, w = 1.
    pub position: [f32; 4],
}

/// Right-handed perspective camera (Y up) aimed at a look-at point.
/// Clip space uses the GL depth convention (-1..1) to match WebGL.
#[derive(Debug, Clone)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    pub look_at: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees.
    pub fov_y_deg: f32,
    /// Width / height of the viewport.
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl PerspectiveCamera {
    pub fn new(fov_y_deg: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 10.0),
            look_at: Vec3::ZERO,
            up: Vec3::Y,
            fov_y_deg,
            aspect,
            near,
            far,
        }
    }

    pub fn pose(&self) -> CameraPose {
        CameraPose::new(self.position, self.look_at)
    }

    pub fn set_pose(&mut self, pose: CameraPose) {
        self.position = pose.position;
        self.look_at = pose.look_at;
    }

    /// Update the aspect ratio from a viewport size (e.g. on window resize).
    /// Degenerate sizes are ignored.
    pub fn resize(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.aspect = width / height;
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.look_at, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y_deg.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn uniform(&self) -> CameraUniform {
        CameraUniform {
            view_projection: self.view_projection().to_cols_array_2d(),
            position: self.position.extend(1.0).to_array(),
        }
    }

    /// Project a world point to normalized device coordinates.
    pub fn project(&self, point: Vec3) -> Vec3 {
        self.view_projection().project_point3(point)
    }

    /// Ray from the eye through a point given in normalized device
    /// coordinates (x right, y up, both in -1..1).
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let inverse = self.view_projection().inverse();
        let through = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 0.5));
        Ray {
            origin: self.position,
            direction: (through - self.position).normalize_or_zero(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> PerspectiveCamera {
        let mut cam = PerspectiveCamera::new(60.0, 16.0 / 9.0, 0.1, 1000.0);
        cam.set_pose(CameraPose::new(Vec3::new(0.0, 40.0, 120.0), Vec3::ZERO));
        cam
    }

    #[test]
    fn look_at_point_projects_to_center() {
        let cam = camera();
        let ndc = cam.project(Vec3::ZERO);
        assert!(ndc.x.abs() < 1e-4);
        assert!(ndc.y.abs() < 1e-4);
        assert!(ndc.z > -1.0 && ndc.z < 1.0);
    }

    #[test]
    fn center_ray_points_at_target() {
        let cam = camera();
        let ray = cam.ray_from_ndc(Vec2::ZERO);
        let expected = (Vec3::ZERO - cam.position).normalize();
        assert!((ray.direction - expected).length() < 1e-4);
        assert_eq!(ray.origin, cam.position);
    }

    #[test]
    fn ray_and_projection_agree() {
        let cam = camera();
        let point = Vec3::new(30.0, 0.0, -10.0);
        let ndc = cam.project(point);
        let ray = cam.ray_from_ndc(ndc.truncate());
        let expected = (point - cam.position).normalize();
        assert!((ray.direction - expected).length() < 1e-3);
    }

    #[test]
    fn resize_updates_aspect() {
        let mut cam = camera();
        cam.resize(1920.0, 1080.0);
        assert!((cam.aspect - 1920.0 / 1080.0).abs() < 1e-6);
        cam.resize(800.0, 0.0);
        assert!((cam.aspect - 1920.0 / 1080.0).abs() < 1e-6);
    }

    #[test]
    fn uniform_carries_eye_position() {
        let cam = camera();
        let u = cam.uniform();
        assert_eq!(u.position, [0.0, 40.0, 120.0, 1.0]);
    }
}
