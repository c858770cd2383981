//! Phong-style surface materials with optional texture slots.

use std::sync::Arc;

use glam::Vec3;
use globe_assets::TextureImage;

use crate::lighting::rgb_hex;

/// Which faces of a mesh are drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Front,
    Back,
}

/// Texture slot on a material.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MapSlot {
    /// Colour map.
    Map,
    BumpMap,
    SpecularMap,
}

/// Surface description consumed by the renderer.
///
/// Every mutation goes through a method that bumps `revision`, so renderers
/// can cache GPU resources per material and rebuild only when it changes.
#[derive(Clone, Debug)]
pub struct Material {
    pub color: Vec3,
    pub specular: Vec3,
    pub shininess: f32,
    pub bump_scale: f32,
    pub opacity: f32,
    pub transparent: bool,
    pub side: Side,
    /// Unlit materials ignore lights and use `color` as-is.
    pub unlit: bool,
    map: Option<Arc<TextureImage>>,
    bump_map: Option<Arc<TextureImage>>,
    specular_map: Option<Arc<TextureImage>>,
    revision: u64,
}

impl Material {
    /// Opaque white phong material with no maps.
    pub fn phong() -> Self {
        Self {
            color: Vec3::ONE,
            specular: rgb_hex(0x111111),
            shininess: 30.0,
            bump_scale: 1.0,
            opacity: 1.0,
            transparent: false,
            side: Side::Front,
            unlit: false,
            map: None,
            bump_map: None,
            specular_map: None,
            revision: 0,
        }
    }

    /// The planet surface: bump scale 0.05, specular 0x333333, shininess 5.
    pub fn planet() -> Self {
        Self {
            specular: rgb_hex(0x333333),
            shininess: 5.0,
            bump_scale: 0.05,
            ..Self::phong()
        }
    }

    /// Replacement planet surface carrying only the procedural colour map.
    pub fn planet_fallback(map: Arc<TextureImage>) -> Self {
        Self {
            specular: rgb_hex(0x333333),
            shininess: 5.0,
            map: Some(map),
            ..Self::phong()
        }
    }

    /// Translucent cloud shell, 40% opaque.
    pub fn clouds() -> Self {
        Self {
            opacity: 0.4,
            transparent: true,
            ..Self::phong()
        }
    }

    /// Back-faced blue glow, 10% opaque, never textured.
    pub fn atmosphere() -> Self {
        Self {
            color: rgb_hex(0x4facfe),
            opacity: 0.1,
            transparent: true,
            side: Side::Back,
            unlit: true,
            ..Self::phong()
        }
    }

    pub fn slot(&self, slot: MapSlot) -> Option<&Arc<TextureImage>> {
        match slot {
            MapSlot::Map => self.map.as_ref(),
            MapSlot::BumpMap => self.bump_map.as_ref(),
            MapSlot::SpecularMap => self.specular_map.as_ref(),
        }
    }

    pub fn map(&self) -> Option<&Arc<TextureImage>> {
        self.map.as_ref()
    }

    pub fn bump_map(&self) -> Option<&Arc<TextureImage>> {
        self.bump_map.as_ref()
    }

    pub fn specular_map(&self) -> Option<&Arc<TextureImage>> {
        self.specular_map.as_ref()
    }

    /// Store a texture in `slot`, replacing whatever was there.
    pub fn set_slot(&mut self, slot: MapSlot, texture: Arc<TextureImage>) {
        match slot {
            MapSlot::Map => self.map = Some(texture),
            MapSlot::BumpMap => self.bump_map = Some(texture),
            MapSlot::SpecularMap => self.specular_map = Some(texture),
        }
        self.revision += 1;
    }

    /// Monotonic change counter.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Carry the revision forward from the material this one replaces.
    pub(crate) fn succeed(&mut self, previous: &Material) {
        self.revision = previous.revision + 1;
    }
}
