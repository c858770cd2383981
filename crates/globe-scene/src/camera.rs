//! Perspective camera producing reverse-Z view/projection matrices.

use glam::{Mat4, Quat, Vec3};

/// Vertical field of view used by the globe camera (45 degrees).
pub const FOV_Y: f32 = std::f32::consts::FRAC_PI_4;
/// Near clip plane distance.
pub const NEAR: f32 = 0.1;
/// Far clip plane distance.
pub const FAR: f32 = 1000.0;
/// Initial distance from the globe centre along +Z.
pub const START_DISTANCE: f32 = 5.0;

/// A perspective camera in world space.
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    /// Rotation as a unit quaternion. Identity looks down -Z.
    pub rotation: Quat,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Width / height.
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl PerspectiveCamera {
    /// The globe camera: 45 degree fov, 0.1..1000, five units out on +Z
    /// looking at the origin.
    pub fn new(aspect: f32) -> Self {
        let mut camera = Self {
            position: Vec3::new(0.0, 0.0, START_DISTANCE),
            rotation: Quat::IDENTITY,
            fov_y: FOV_Y,
            aspect,
            near: NEAR,
            far: FAR,
        };
        camera.look_at(Vec3::ZERO);
        camera
    }

    /// Orient the camera toward `target`, keeping +Y as up.
    pub fn look_at(&mut self, target: Vec3) {
        let forward = target - self.position;
        if forward.length_squared() <= f32::EPSILON {
            return;
        }
        // look_to_rh builds the world-to-view rotation; the camera rotation
        // is its inverse.
        let view = Mat4::look_to_rh(Vec3::ZERO, forward.normalize(), Vec3::Y);
        self.rotation = Quat::from_mat4(&view).inverse().normalize();
    }

    /// Update the aspect ratio from a viewport size.
    pub fn set_aspect_ratio(&mut self, width: f32, height: f32) {
        self.aspect = width / height;
    }

    pub fn view_matrix(&self) -> Mat4 {
        (Mat4::from_translation(self.position) * Mat4::from_quat(self.rotation)).inverse()
    }

    /// Reverse-Z projection: near maps to depth 1, far to depth 0.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.far, self.near)
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
}
