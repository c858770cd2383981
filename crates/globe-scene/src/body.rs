//! The globe: a planet sphere wrapped in a cloud shell and an atmosphere
//! shell, all sharing one centre.

use std::sync::Arc;

use crate::material::Material;
use crate::mesh::{SPHERE_SEGMENTS, SphereMesh};

pub const PLANET_RADIUS: f32 = 1.0;
pub const CLOUD_RADIUS: f32 = 1.01;
pub const ATMOSPHERE_RADIUS: f32 = 1.02;

/// One mesh with its material.
///
/// Radius is fixed at construction; animation only changes rotation, which
/// lives in the frame clock.
#[derive(Clone, Debug)]
pub struct BodyPart {
    mesh: Arc<SphereMesh>,
    material: Material,
}

impl BodyPart {
    fn sphere(radius: f32, material: Material) -> Self {
        Self {
            mesh: Arc::new(SphereMesh::uv_sphere(radius, SPHERE_SEGMENTS, SPHERE_SEGMENTS)),
            material,
        }
    }

    pub fn mesh(&self) -> &Arc<SphereMesh> {
        &self.mesh
    }

    pub fn radius(&self) -> f32 {
        self.mesh.radius
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn material_mut(&mut self) -> &mut Material {
        &mut self.material
    }

    /// Swap in a new material on the same mesh.
    pub fn replace_material(&mut self, mut material: Material) {
        material.succeed(&self.material);
        self.material = material;
    }
}

/// Planet, clouds, and atmosphere.
#[derive(Clone, Debug)]
pub struct CelestialBody {
    pub planet: BodyPart,
    pub clouds: BodyPart,
    pub atmosphere: BodyPart,
}

impl CelestialBody {
    pub fn new() -> Self {
        Self {
            planet: BodyPart::sphere(PLANET_RADIUS, Material::planet()),
            clouds: BodyPart::sphere(CLOUD_RADIUS, Material::clouds()),
            atmosphere: BodyPart::sphere(ATMOSPHERE_RADIUS, Material::atmosphere()),
        }
    }

    /// Atmosphere strictly encloses clouds, which strictly enclose the planet.
    pub fn shells_nested(&self) -> bool {
        self.atmosphere.radius() > self.clouds.radius()
            && self.clouds.radius() > self.planet.radius()
    }
}

impl Default for CelestialBody {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Side;

    #[test]
    fn test_radii() {
        let body = CelestialBody::new();
        assert_eq!(body.planet.radius(), 1.0);
        assert_eq!(body.clouds.radius(), 1.01);
        assert_eq!(body.atmosphere.radius(), 1.02);
        assert!(body.shells_nested());
    }

    #[test]
    fn test_shell_materials() {
        let body = CelestialBody::new();
        assert!(body.clouds.material().transparent);
        assert_eq!(body.atmosphere.material().side, Side::Back);
        assert!(!body.planet.material().transparent);
    }

    #[test]
    fn test_replace_material_keeps_mesh() {
        let mut body = CelestialBody::new();
        let mesh = Arc::clone(body.planet.mesh());
        let old_revision = body.planet.material().revision();

        body.planet.replace_material(Material::phong());
        assert!(Arc::ptr_eq(&mesh, body.planet.mesh()));
        assert!(body.planet.material().revision() > old_revision);
    }
}
