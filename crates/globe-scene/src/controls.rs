//! Damped orbit controls: the camera circles a target on a sphere whose
//! radius is clamped, driven by pointer drags and wheel notches.
//!
//! Input only accumulates pending deltas; [`OrbitControls::update`] applies a
//! damped fraction of them once per frame and decays the remainder, so motion
//! keeps easing out after the pointer stops.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::camera::PerspectiveCamera;

/// Fraction of the pending rotation applied (and removed) per update.
pub const DAMPING_FACTOR: f32 = 0.05;
/// Multiplier on drag rotation.
pub const ROTATE_SPEED: f32 = 0.5;
/// Exponent base for wheel zoom steps.
pub const ZOOM_SPEED: f32 = 1.0;
/// Closest allowed camera distance from the target.
pub const MIN_DISTANCE: f32 = 3.0;
/// Farthest allowed camera distance from the target.
pub const MAX_DISTANCE: f32 = 10.0;

/// Keeps the polar angle off the poles so `look_at` never degenerates.
const POLAR_EPSILON: f32 = 1e-6;

/// Pending deltas below this are treated as settled.
const SETTLED: f32 = 1e-7;

/// Squared displacement below which an update counts as no movement.
const MOVED_SQ: f32 = 1e-10;

/// Orbit controller around a fixed target.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitControls {
    pub target: Vec3,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Pending azimuth change in radians.
    delta_theta: f32,
    /// Pending polar change in radians.
    delta_phi: f32,
    /// Pending distance multiplier.
    scale: f32,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            enable_damping: true,
            damping_factor: DAMPING_FACTOR,
            rotate_speed: ROTATE_SPEED,
            zoom_speed: ZOOM_SPEED,
            min_distance: MIN_DISTANCE,
            max_distance: MAX_DISTANCE,
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
        }
    }
}

impl OrbitControls {
    /// Queue a rotation around the vertical axis.
    pub fn rotate_left(&mut self, angle: f32) {
        self.delta_theta -= angle;
    }

    /// Queue a change of elevation.
    pub fn rotate_up(&mut self, angle: f32) {
        self.delta_phi -= angle;
    }

    /// A pointer drag of `(dx, dy)` logical pixels on a viewport
    /// `viewport_height` pixels tall. A full-height drag turns by
    /// `2π · rotate_speed`.
    pub fn handle_drag(&mut self, dx: f32, dy: f32, viewport_height: f32) {
        let height = viewport_height.max(1.0);
        self.rotate_left(TAU * dx / height * self.rotate_speed);
        self.rotate_up(TAU * dy / height * self.rotate_speed);
    }

    /// Wheel input in notches; positive scrolls away from the user and moves
    /// the camera closer.
    pub fn handle_wheel(&mut self, notches: f32) {
        if notches == 0.0 {
            return;
        }
        // 0.95^(zoom_speed * notches) per event, so fractional notches from
        // touchpads zoom proportionally.
        self.scale *= self.zoom_scale().powf(notches);
    }

    fn zoom_scale(&self) -> f32 {
        0.95_f32.powf(self.zoom_speed)
    }

    /// True while damped motion is still being applied.
    pub fn is_moving(&self) -> bool {
        self.delta_theta.abs() > SETTLED
            || self.delta_phi.abs() > SETTLED
            || (self.scale - 1.0).abs() > SETTLED
    }

    /// Apply pending motion to `camera` and leave it looking at the target.
    /// Returns `true` if the camera moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let before = camera.position;
        let offset = camera.position - self.target;
        let (radius, mut theta, mut phi) = to_spherical(offset);

        if self.enable_damping {
            theta += self.delta_theta * self.damping_factor;
            phi += self.delta_phi * self.damping_factor;
        } else {
            theta += self.delta_theta;
            phi += self.delta_phi;
        }

        phi = phi.clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
        let radius = (radius * self.scale).clamp(self.min_distance, self.max_distance);

        camera.position = self.target + from_spherical(radius, theta, phi);
        camera.look_at(self.target);

        if self.enable_damping {
            self.delta_theta *= 1.0 - self.damping_factor;
            self.delta_phi *= 1.0 - self.damping_factor;
        } else {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
        }
        self.scale = 1.0;

        (camera.position - before).length_squared() > MOVED_SQ
    }

    /// Current camera distance from the target.
    pub fn distance(&self, camera: &PerspectiveCamera) -> f32 {
        (camera.position - self.target).length()
    }
}

/// Y-up spherical coordinates: `(radius, azimuth from +Z toward +X, polar from +Y)`.
fn to_spherical(v: Vec3) -> (f32, f32, f32) {
    let radius = v.length();
    if radius == 0.0 {
        return (0.0, 0.0, 0.0);
    }
    let theta = v.x.atan2(v.z);
    let phi = (v.y / radius).clamp(-1.0, 1.0).acos();
    (radius, theta, phi)
}

fn from_spherical(radius: f32, theta: f32, phi: f32) -> Vec3 {
    let sin_phi = phi.sin();
    Vec3::new(
        radius * sin_phi * theta.sin(),
        radius * phi.cos(),
        radius * sin_phi * theta.cos(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (OrbitControls, PerspectiveCamera) {
        (OrbitControls::default(), PerspectiveCamera::new(1.0))
    }

    #[test]
    fn test_defaults() {
        let controls = OrbitControls::default();
        assert!(controls.enable_damping);
        assert_eq!(controls.damping_factor, 0.05);
        assert_eq!(controls.rotate_speed, 0.5);
        assert_eq!((controls.min_distance, controls.max_distance), (3.0, 10.0));
        assert!(!controls.is_moving());
    }

    #[test]
    fn test_spherical_roundtrip() {
        let v = Vec3::new(1.5, -2.0, 3.0);
        let (r, theta, phi) = to_spherical(v);
        assert!((from_spherical(r, theta, phi) - v).length() < 1e-5);
    }

    #[test]
    fn test_idle_update_keeps_camera() {
        let (mut controls, mut camera) = setup();
        let before = camera.clone();
        assert!(!controls.update(&mut camera));
        assert!((camera.position - before.position).length() < 1e-5);
    }

    #[test]
    fn test_drag_rotates_with_damping_decay() {
        let (mut controls, mut camera) = setup();
        controls.handle_drag(100.0, 0.0, 800.0);
        let pending = controls.delta_theta;
        assert!(pending < 0.0);

        assert!(controls.update(&mut camera));
        assert!((controls.delta_theta - pending * 0.95).abs() < 1e-6);
        // Distance is unchanged by rotation.
        assert!((controls.distance(&camera) - 5.0).abs() < 1e-4);
        assert!(camera.position.x.abs() > 1e-4);

        // Motion keeps easing out after input stops, then settles.
        let mut frames = 0;
        while controls.is_moving() {
            controls.update(&mut camera);
            frames += 1;
            assert!(frames < 2000, "damping never settled");
        }
        assert!(frames > 10);
    }

    #[test]
    fn test_half_height_drag_is_quarter_turn() {
        let (mut controls, mut camera) = setup();
        controls.enable_damping = false;
        controls.handle_drag(400.0, 0.0, 800.0);
        controls.update(&mut camera);
        // Half the viewport height at rotate speed 0.5 is a quarter turn.
        let (_, theta, _) = to_spherical(camera.position);
        assert!((theta.abs() - std::f32::consts::FRAC_PI_2).abs() < 1e-4);
    }

    #[test]
    fn test_polar_angle_clamped() {
        let (mut controls, mut camera) = setup();
        controls.enable_damping = false;
        controls.rotate_up(10.0);
        controls.update(&mut camera);
        // Parked just off the north pole, still at the same distance.
        assert!(camera.position.y > 4.99);
        assert!((controls.distance(&camera) - 5.0).abs() < 1e-4);
        assert!(camera.forward().is_finite());
        assert!(camera.forward().y < -0.99);
    }

    #[test]
    fn test_wheel_respects_distance_bounds() {
        let (mut controls, mut camera) = setup();
        for _ in 0..200 {
            controls.handle_wheel(1.0);
            controls.update(&mut camera);
        }
        assert!((controls.distance(&camera) - MIN_DISTANCE).abs() < 1e-4);

        for _ in 0..200 {
            controls.handle_wheel(-1.0);
            controls.update(&mut camera);
        }
        assert!((controls.distance(&camera) - MAX_DISTANCE).abs() < 1e-4);
    }

    #[test]
    fn test_single_notch_zoom_step() {
        let (mut controls, mut camera) = setup();
        controls.handle_wheel(1.0);
        controls.update(&mut camera);
        assert!((controls.distance(&camera) - 5.0 * 0.95).abs() < 1e-4);
        assert!(!controls.is_moving());
    }
}
