//! GPU uniform layouts shared by the phong and star shaders.
//!
//! Every struct is `#[repr(C)]` and padded to 16-byte boundaries so it
//! matches the WGSL uniform layout rules without manual offsets.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use globe_scene::{Lights, Material, PerspectiveCamera};

/// Decode one sRGB-encoded channel to linear.
fn srgb_channel_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Hex colours are authored in sRGB; shading happens in linear space.
pub fn srgb_to_linear(color: Vec3) -> Vec3 {
    Vec3::new(
        srgb_channel_to_linear(color.x),
        srgb_channel_to_linear(color.y),
        srgb_channel_to_linear(color.z),
    )
}

/// Camera matrices and eye position. `@group(0) @binding(0)`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    /// xyz = eye position, w unused.
    pub camera_pos: [f32; 4],
}

impl CameraUniform {
    pub fn from_camera(camera: &PerspectiveCamera) -> Self {
        Self {
            view_proj: camera.view_projection_matrix().to_cols_array_2d(),
            view: camera.view_matrix().to_cols_array_2d(),
            camera_pos: camera.position.extend(1.0).to_array(),
        }
    }
}

/// Ambient fill plus the directional sun. `@group(0) @binding(1)`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct LightUniform {
    /// Linear ambient colour premultiplied by intensity.
    pub ambient: [f32; 4],
    /// Unit vector pointing toward the sun.
    pub sun_direction: [f32; 4],
    /// Linear sun colour premultiplied by intensity.
    pub sun_color: [f32; 4],
}

impl LightUniform {
    pub fn from_lights(lights: &Lights) -> Self {
        let ambient = srgb_to_linear(lights.ambient.color) * lights.ambient.intensity;
        let sun = srgb_to_linear(lights.sun.color) * lights.sun.intensity;
        Self {
            ambient: ambient.extend(0.0).to_array(),
            sun_direction: (-lights.sun.direction()).extend(0.0).to_array(),
            sun_color: sun.extend(0.0).to_array(),
        }
    }
}

/// Per-part transform and surface constants. `@group(1) @binding(0)`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct MaterialUniform {
    pub model: [[f32; 4]; 4],
    /// rgb = linear diffuse colour, a = opacity.
    pub color_opacity: [f32; 4],
    /// rgb = linear specular colour, a = shininess.
    pub specular_shininess: [f32; 4],
    /// x = bump scale, y = 1.0 when unlit.
    pub params: [f32; 4],
}

impl MaterialUniform {
    pub fn new(model: Mat4, material: &Material) -> Self {
        let color = srgb_to_linear(material.color);
        let specular = srgb_to_linear(material.specular);
        Self {
            model: model.to_cols_array_2d(),
            color_opacity: color.extend(material.opacity).to_array(),
            specular_shininess: specular.extend(material.shininess).to_array(),
            params: [
                material.bump_scale,
                if material.unlit { 1.0 } else { 0.0 },
                0.0,
                0.0,
            ],
        }
    }
}

/// Starfield rotation and base billboard size. `@group(1) @binding(0)`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct StarUniform {
    pub model: [[f32; 4]; 4],
    /// x = world size of a star with size scalar 1.
    pub point_size: [f32; 4],
}

impl StarUniform {
    pub fn new(model: Mat4, point_size: f32) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            point_size: [point_size, 0.0, 0.0, 0.0],
        }
    }
}
