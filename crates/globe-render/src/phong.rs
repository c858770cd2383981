//! Phong pipelines for the planet, the cloud shell and the atmosphere.
//!
//! All three share one shader and one pair of bind group layouts:
//! `@group(0)` holds camera and lights, `@group(1)` holds the per-part
//! material uniform, its three texture slots and a sampler. They differ only
//! in culling, blending and depth writes, captured by [`PhongVariant`].

use std::num::NonZeroU64;

use globe_scene::{Material, Side};

use crate::mesh::SphereVertex;
use crate::targets::DepthBuffer;
use crate::uniforms::{CameraUniform, LightUniform, MaterialUniform};

/// WGSL source for the phong shader.
pub const PHONG_SHADER_SOURCE: &str = include_str!("shaders/phong.wgsl");

/// Fixed-function state a material needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhongVariant {
    /// Front faces, no blending, writes depth.
    Opaque,
    /// Front faces, alpha blended over what is behind, depth read-only.
    Translucent,
    /// Back faces only, added on top of the scene, depth read-only.
    Glow,
}

impl PhongVariant {
    pub fn for_material(material: &Material) -> Self {
        match (material.side, material.transparent) {
            (Side::Back, _) => PhongVariant::Glow,
            (Side::Front, true) => PhongVariant::Translucent,
            (Side::Front, false) => PhongVariant::Opaque,
        }
    }

    fn cull_mode(self) -> wgpu::Face {
        match self {
            PhongVariant::Glow => wgpu::Face::Front,
            _ => wgpu::Face::Back,
        }
    }

    fn blend(self) -> Option<wgpu::BlendState> {
        match self {
            PhongVariant::Opaque => None,
            PhongVariant::Translucent => Some(wgpu::BlendState::ALPHA_BLENDING),
            PhongVariant::Glow => Some(wgpu::BlendState {
                color: wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::SrcAlpha,
                    dst_factor: wgpu::BlendFactor::One,
                    operation: wgpu::BlendOperation::Add,
                },
                alpha: wgpu::BlendComponent::OVER,
            }),
        }
    }

    fn depth_write(self) -> bool {
        self == PhongVariant::Opaque
    }

    fn label(self) -> &'static str {
        match self {
            PhongVariant::Opaque => "phong-opaque-pipeline",
            PhongVariant::Translucent => "phong-translucent-pipeline",
            PhongVariant::Glow => "phong-glow-pipeline",
        }
    }
}

/// Creates the `@group(0)` layout: camera at binding 0, lights at binding 1.
pub fn create_scene_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("globe-scene-bgl"),
        entries: &[
            uniform_entry(
                0,
                wgpu::ShaderStages::VERTEX_FRAGMENT,
                std::mem::size_of::<CameraUniform>(),
            ),
            uniform_entry(
                1,
                wgpu::ShaderStages::FRAGMENT,
                std::mem::size_of::<LightUniform>(),
            ),
        ],
    })
}

pub(crate) fn uniform_entry(
    binding: u32,
    visibility: wgpu::ShaderStages,
    size: usize,
) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: NonZeroU64::new(size as u64),
        },
        count: None,
    }
}

fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

/// The phong shader compiled into one pipeline per [`PhongVariant`].
pub struct PhongPipeline {
    opaque: wgpu::RenderPipeline,
    translucent: wgpu::RenderPipeline,
    glow: wgpu::RenderPipeline,
    /// Material bind group layout (group 1): uniform, map, bump, specular, sampler.
    pub material_bind_group_layout: wgpu::BindGroupLayout,
}

impl PhongPipeline {
    pub fn new(
        device: &wgpu::Device,
        scene_bind_group_layout: &wgpu::BindGroupLayout,
        surface_format: wgpu::TextureFormat,
        sample_count: u32,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("phong-shader"),
            source: wgpu::ShaderSource::Wgsl(PHONG_SHADER_SOURCE.into()),
        });

        let material_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("phong-material-bgl"),
                entries: &[
                    uniform_entry(
                        0,
                        wgpu::ShaderStages::VERTEX_FRAGMENT,
                        std::mem::size_of::<MaterialUniform>(),
                    ),
                    texture_entry(1),
                    texture_entry(2),
                    texture_entry(3),
                    wgpu::BindGroupLayoutEntry {
                        binding: 4,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("phong-pipeline-layout"),
            bind_group_layouts: &[scene_bind_group_layout, &material_bind_group_layout],
            immediate_size: 0,
        });

        let build = |variant: PhongVariant| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(variant.label()),
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[SphereVertex::layout()],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: Some(variant.cull_mode()),
                    ..Default::default()
                },
                depth_stencil: Some(DepthBuffer::stencil_state(variant.depth_write())),
                multisample: wgpu::MultisampleState {
                    count: sample_count,
                    ..Default::default()
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: surface_format,
                        blend: variant.blend(),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                multiview_mask: None,
                cache: None,
            })
        };

        Self {
            opaque: build(PhongVariant::Opaque),
            translucent: build(PhongVariant::Translucent),
            glow: build(PhongVariant::Glow),
            material_bind_group_layout,
        }
    }

    pub fn pipeline(&self, variant: PhongVariant) -> &wgpu::RenderPipeline {
        match variant {
            PhongVariant::Opaque => &self.opaque,
            PhongVariant::Translucent => &self.translucent,
            PhongVariant::Glow => &self.glow,
        }
    }
}
