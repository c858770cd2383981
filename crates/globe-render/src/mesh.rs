//! Sphere geometry on the GPU.

use bytemuck::{Pod, Zeroable};
use globe_scene::SphereMesh;
use wgpu::util::DeviceExt;

/// Interleaved sphere vertex: position, normal, uv.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable, PartialEq)]
pub struct SphereVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    /// Equirectangular UV.
    pub uv: [f32; 2],
}

impl SphereVertex {
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SphereVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: 12,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: 24,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// Interleave a [`SphereMesh`] into vertex records.
pub fn interleave(mesh: &SphereMesh) -> Vec<SphereVertex> {
    mesh.positions
        .iter()
        .zip(&mesh.normals)
        .zip(&mesh.uvs)
        .map(|((position, normal), uv)| SphereVertex {
            position: position.to_array(),
            normal: normal.to_array(),
            uv: *uv,
        })
        .collect()
}

/// Vertex and index buffers for one sphere.
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl GpuMesh {
    pub fn upload(device: &wgpu::Device, label: &str, mesh: &SphereMesh) -> Self {
        let vertices = interleave(mesh);
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-vertices")),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-indices")),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
        }
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_layout_offsets() {
        assert_eq!(std::mem::size_of::<SphereVertex>(), 32);
        let layout = SphereVertex::layout();
        assert_eq!(layout.array_stride, 32);
        let offsets: Vec<_> = layout.attributes.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 12, 24]);
        assert_eq!(layout.attributes[2].format, wgpu::VertexFormat::Float32x2);
    }

    #[test]
    fn test_interleave_keeps_vertex_order() {
        let mesh = SphereMesh::uv_sphere(1.01, 8, 6);
        let vertices = interleave(&mesh);
        assert_eq!(vertices.len(), mesh.vertex_count());
        for (i, v) in vertices.iter().enumerate() {
            assert_eq!(v.position, mesh.positions[i].to_array());
            assert_eq!(v.normal, mesh.normals[i].to_array());
            assert_eq!(v.uv, mesh.uvs[i]);
        }
    }
}
