//! Starfield pipeline: instanced camera-facing billboards.

use bytemuck::{Pod, Zeroable};
use globe_scene::Starfield;
use wgpu::util::DeviceExt;

use crate::phong::uniform_entry;
use crate::targets::DepthBuffer;
use crate::uniforms::StarUniform;

/// WGSL source for the star shader.
pub const STAR_SHADER_SOURCE: &str = include_str!("shaders/stars.wgsl");

/// Per-instance star record.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable, PartialEq)]
pub struct StarInstance {
    pub position: [f32; 3],
    pub size: f32,
}

impl StarInstance {
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<StarInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: 12,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32,
                },
            ],
        }
    }
}

pub fn star_instances(starfield: &Starfield) -> Vec<StarInstance> {
    starfield
        .stars()
        .iter()
        .map(|star| StarInstance {
            position: star.position.to_array(),
            size: star.size,
        })
        .collect()
}

pub struct StarPipeline {
    pub pipeline: wgpu::RenderPipeline,
    /// Star uniform bind group layout (group 1).
    pub star_bind_group_layout: wgpu::BindGroupLayout,
}

impl StarPipeline {
    pub fn new(
        device: &wgpu::Device,
        scene_bind_group_layout: &wgpu::BindGroupLayout,
        surface_format: wgpu::TextureFormat,
        sample_count: u32,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("star-shader"),
            source: wgpu::ShaderSource::Wgsl(STAR_SHADER_SOURCE.into()),
        });

        let star_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("star-bgl"),
                entries: &[uniform_entry(
                    0,
                    wgpu::ShaderStages::VERTEX,
                    std::mem::size_of::<StarUniform>(),
                )],
            });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("star-pipeline-layout"),
            bind_group_layouts: &[scene_bind_group_layout, &star_bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("star-pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[StarInstance::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                cull_mode: None, // billboards
                ..Default::default()
            },
            depth_stencil: Some(DepthBuffer::stencil_state(true)),
            multisample: wgpu::MultisampleState {
                count: sample_count,
                ..Default::default()
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        Self {
            pipeline,
            star_bind_group_layout,
        }
    }
}

/// GPU-side starfield: static instance buffer plus a rotation uniform.
pub struct GpuStarfield {
    instance_buffer: wgpu::Buffer,
    instance_count: u32,
    pub uniform_buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl GpuStarfield {
    pub fn upload(device: &wgpu::Device, pipeline: &StarPipeline, starfield: &Starfield) -> Self {
        let instances = star_instances(starfield);
        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("star-instances"),
            contents: bytemuck::cast_slice(&instances),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("star-uniform"),
            size: std::mem::size_of::<StarUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("star-bg"),
            layout: &pipeline.star_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        Self {
            instance_buffer,
            instance_count: instances.len() as u32,
            uniform_buffer,
            bind_group,
        }
    }

    /// Bind group 0 must already be set.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>, pipeline: &StarPipeline) {
        if self.instance_count == 0 {
            return;
        }
        pass.set_pipeline(&pipeline.pipeline);
        pass.set_bind_group(1, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, self.instance_buffer.slice(..));
        pass.draw(0..4, 0..self.instance_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_layout() {
        assert_eq!(std::mem::size_of::<StarInstance>(), 16);
        let layout = StarInstance::layout();
        assert_eq!(layout.step_mode, wgpu::VertexStepMode::Instance);
        assert_eq!(layout.attributes[1].offset, 12);
        assert_eq!(layout.attributes[1].format, wgpu::VertexFormat::Float32);
    }

    #[test]
    fn test_instances_mirror_starfield() {
        let starfield = Starfield::generate(64, 50.0, 9);
        let instances = star_instances(&starfield);
        assert_eq!(instances.len(), 64);
        for (instance, star) in instances.iter().zip(starfield.stars()) {
            assert_eq!(instance.position, star.position.to_array());
            assert_eq!(instance.size, star.size);
        }
    }
}
