//! UV-sphere mesh generation for the planet and its shells.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

/// Segment count around the equator and from pole to pole.
pub const SPHERE_SEGMENTS: u32 = 64;

/// A latitude/longitude sphere with equirectangular UVs.
///
/// Vertices form a `(width_segments + 1) x (height_segments + 1)` grid; the
/// seam column is duplicated so UVs wrap cleanly, and the degenerate pole
/// triangles are skipped.
#[derive(Clone, Debug)]
pub struct SphereMesh {
    pub radius: f32,
    pub positions: Vec<Vec3>,
    /// Outward unit normals.
    pub normals: Vec<Vec3>,
    /// `u` runs west to east, `v` from the north pole (0) to the south pole (1).
    pub uvs: Vec<[f32; 2]>,
    /// Counter-clockwise triangles when viewed from outside.
    pub indices: Vec<u32>,
}

impl SphereMesh {
    /// Build a sphere of `radius` with the given segment counts (each at
    /// least 3 around, 2 from pole to pole).
    pub fn uv_sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let ws = width_segments.max(3);
        let hs = height_segments.max(2);

        let vertex_count = ((ws + 1) * (hs + 1)) as usize;
        let mut positions = Vec::with_capacity(vertex_count);
        let mut normals = Vec::with_capacity(vertex_count);
        let mut uvs = Vec::with_capacity(vertex_count);

        for iy in 0..=hs {
            let v = iy as f32 / hs as f32;
            for ix in 0..=ws {
                let u = ix as f32 / ws as f32;
                let normal = Vec3::new(
                    -(u * TAU).cos() * (v * PI).sin(),
                    (v * PI).cos(),
                    (u * TAU).sin() * (v * PI).sin(),
                );
                positions.push(normal * radius);
                normals.push(normal);
                uvs.push([u, v]);
            }
        }

        let row = ws + 1;
        let mut indices = Vec::with_capacity((ws * (hs - 1) * 6) as usize);
        for iy in 0..hs {
            for ix in 0..ws {
                let a = iy * row + ix + 1;
                let b = iy * row + ix;
                let c = (iy + 1) * row + ix;
                let d = (iy + 1) * row + ix + 1;

                if iy != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != hs - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        Self {
            radius,
            positions,
            normals,
            uvs,
            indices,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_and_triangle_counts() {
        let mesh = SphereMesh::uv_sphere(1.0, 64, 64);
        assert_eq!(mesh.vertex_count(), 65 * 65);
        // Two triangles per quad, minus one per quad in the polar rows.
        assert_eq!(mesh.triangle_count(), 64 * 64 * 2 - 2 * 64);
    }

    #[test]
    fn test_vertices_on_radius() {
        let mesh = SphereMesh::uv_sphere(1.02, 16, 12);
        for p in &mesh.positions {
            assert!((p.length() - 1.02).abs() < 1e-5);
        }
        for n in &mesh.normals {
            assert!((n.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_indices_in_range_and_uvs_normalized() {
        let mesh = SphereMesh::uv_sphere(1.0, 32, 16);
        let n = mesh.vertex_count() as u32;
        assert!(mesh.indices.iter().all(|&i| i < n));
        assert!(
            mesh.uvs
                .iter()
                .all(|uv| (0.0..=1.0).contains(&uv[0]) && (0.0..=1.0).contains(&uv[1]))
        );
    }

    #[test]
    fn test_v_zero_is_north_pole() {
        let mesh = SphereMesh::uv_sphere(1.0, 8, 8);
        assert!((mesh.positions[0].y - 1.0).abs() < 1e-6);
        let last = mesh.positions.len() - 1;
        assert!((mesh.positions[last].y + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_triangles_face_outward() {
        let mesh = SphereMesh::uv_sphere(1.0, 24, 12);
        for tri in mesh.indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| mesh.positions[i as usize]);
            let normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(normal.dot(centroid) > 0.0, "inward-facing triangle");
        }
    }

    #[test]
    fn test_segment_minimums() {
        let mesh = SphereMesh::uv_sphere(1.0, 0, 0);
        assert_eq!(mesh.vertex_count(), 4 * 3);
        assert!(mesh.triangle_count() > 0);
    }
}
