//! Scene lights: a dim ambient fill and one white directional key light.

use glam::Vec3;

/// Convert a packed `0xRRGGBB` colour to linear-ish `[0, 1]` components.
pub fn rgb_hex(hex: u32) -> Vec3 {
    Vec3::new(
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    )
}

/// Uniform light reaching every surface regardless of orientation.
#[derive(Clone, Debug, PartialEq)]
pub struct AmbientLight {
    pub color: Vec3,
    pub intensity: f32,
}

/// An infinitely distant light shining from `position` toward the origin.
#[derive(Clone, Debug, PartialEq)]
pub struct DirectionalLight {
    /// Where the light sits; only its direction from the origin matters.
    pub position: Vec3,
    pub color: Vec3,
    pub intensity: f32,
}

impl DirectionalLight {
    /// Normalized direction the light travels (from `position` toward the origin).
    pub fn direction(&self) -> Vec3 {
        (-self.position).normalize_or(Vec3::NEG_Y)
    }
}

/// The two lights of the globe scene.
#[derive(Clone, Debug, PartialEq)]
pub struct Lights {
    pub ambient: AmbientLight,
    pub sun: DirectionalLight,
}

impl Default for Lights {
    fn default() -> Self {
        Self {
            ambient: AmbientLight {
                color: rgb_hex(0x333333),
                intensity: 1.0,
            },
            sun: DirectionalLight {
                position: Vec3::new(5.0, 3.0, 5.0),
                color: rgb_hex(0xffffff),
                intensity: 1.0,
            },
        }
    }
}
