//! Frame submission for the globe scene.
//!
//! [`GlobeRenderer`] owns every GPU resource the scene needs and implements
//! the scene's [`FrameRenderer`] seam. Materials are mirrored lazily: each
//! body part keeps the material revision it last uploaded and rebuilds its
//! bind group only when that revision moves. Slot textures are re-uploaded
//! only when the underlying image changes identity.

use std::sync::Arc;

use glam::Mat4;
use globe_assets::TextureImage;
use globe_scene::starfield::POINT_SIZE;
use globe_scene::{BodyPart, FrameRenderer, MapSlot, SceneContext};

use crate::gpu::{RenderContext, SurfaceError};
use crate::mesh::GpuMesh;
use crate::phong::{PhongPipeline, PhongVariant, create_scene_bind_group_layout};
use crate::stars::{GpuStarfield, StarPipeline};
use crate::targets::{DepthBuffer, MsaaTarget};
use crate::texture::{ColorSpace, GpuTexture};
use crate::uniforms::{CameraUniform, LightUniform, MaterialUniform, StarUniform};

const SLOTS: [MapSlot; 3] = [MapSlot::Map, MapSlot::BumpMap, MapSlot::SpecularMap];

/// Background behind the starfield.
pub const CLEAR_COLOR: wgpu::Color = wgpu::Color::BLACK;

fn slot_color_space(slot: MapSlot) -> ColorSpace {
    match slot {
        MapSlot::Map => ColorSpace::Srgb,
        MapSlot::BumpMap | MapSlot::SpecularMap => ColorSpace::Linear,
    }
}

/// A slot texture together with the image it was uploaded from.
struct SlotTexture {
    source: Arc<TextureImage>,
    gpu: GpuTexture,
}

/// Shared resources a part needs to rebuild its bind group.
struct MaterialBinder<'a> {
    device: &'a wgpu::Device,
    queue: &'a wgpu::Queue,
    layout: &'a wgpu::BindGroupLayout,
    sampler: &'a wgpu::Sampler,
    white: &'a GpuTexture,
}

/// GPU mirror of one [`BodyPart`].
struct PartResources {
    label: &'static str,
    mesh: GpuMesh,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    slots: [Option<SlotTexture>; 3],
    revision: u64,
    variant: PhongVariant,
}

impl PartResources {
    fn new(label: &'static str, part: &BodyPart, binder: &MaterialBinder<'_>) -> Self {
        let mesh = GpuMesh::upload(binder.device, label, part.mesh());
        let uniform_buffer = binder.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: std::mem::size_of::<MaterialUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let slots = [None, None, None];
        let bind_group = create_material_bind_group(binder, label, &uniform_buffer, &slots);

        let mut resources = Self {
            label,
            mesh,
            uniform_buffer,
            bind_group,
            slots,
            revision: u64::MAX,
            variant: PhongVariant::for_material(part.material()),
        };
        resources.sync(part, binder);
        resources
    }

    /// Bring the GPU copy up to the part's current material revision.
    fn sync(&mut self, part: &BodyPart, binder: &MaterialBinder<'_>) {
        let material = part.material();
        if material.revision() == self.revision {
            return;
        }

        for (index, slot) in SLOTS.into_iter().enumerate() {
            let wanted = material.slot(slot);
            let current = self.slots[index].as_ref().map(|t| &t.source);
            let unchanged = match (wanted, current) {
                (Some(a), Some(b)) => Arc::ptr_eq(a, b),
                (None, None) => true,
                _ => false,
            };
            if unchanged {
                continue;
            }
            let label = self.label;
            let uploaded = wanted.and_then(|image| {
                match GpuTexture::upload(binder.device, binder.queue, image, slot_color_space(slot))
                {
                    Ok(gpu) => Some(SlotTexture {
                        source: Arc::clone(image),
                        gpu,
                    }),
                    Err(e) => {
                        // The slot falls back to the neutral white texture.
                        log::error!("{label}: cannot upload {slot:?}: {e}");
                        None
                    }
                }
            });
            self.slots[index] = uploaded;
        }

        self.bind_group =
            create_material_bind_group(binder, self.label, &self.uniform_buffer, &self.slots);
        self.variant = PhongVariant::for_material(material);
        self.revision = material.revision();
        log::debug!(
            "{}: material revision {} bound ({:?})",
            self.label,
            self.revision,
            self.variant
        );
    }

    fn write_uniform(&self, queue: &wgpu::Queue, model: Mat4, part: &BodyPart) {
        let uniform = MaterialUniform::new(model, part.material());
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniform));
    }

    fn draw(&self, pass: &mut wgpu::RenderPass<'_>, phong: &PhongPipeline) {
        pass.set_pipeline(phong.pipeline(self.variant));
        pass.set_bind_group(1, &self.bind_group, &[]);
        self.mesh.draw(pass);
    }
}

fn create_material_bind_group(
    binder: &MaterialBinder<'_>,
    label: &str,
    uniform_buffer: &wgpu::Buffer,
    slots: &[Option<SlotTexture>; 3],
) -> wgpu::BindGroup {
    let view = |index: usize| {
        slots[index]
            .as_ref()
            .map_or(&binder.white.view, |t| &t.gpu.view)
    };
    binder.device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout: binder.layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(view(0)),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::TextureView(view(1)),
            },
            wgpu::BindGroupEntry {
                binding: 3,
                resource: wgpu::BindingResource::TextureView(view(2)),
            },
            wgpu::BindGroupEntry {
                binding: 4,
                resource: wgpu::BindingResource::Sampler(binder.sampler),
            },
        ],
    })
}

/// Draws the starfield, planet, atmosphere and clouds into the window surface.
pub struct GlobeRenderer {
    context: RenderContext,
    depth: DepthBuffer,
    msaa: Option<MsaaTarget>,
    phong: PhongPipeline,
    star_pipeline: StarPipeline,
    camera_buffer: wgpu::Buffer,
    light_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,
    sampler: wgpu::Sampler,
    white: GpuTexture,
    stars: GpuStarfield,
    planet: PartResources,
    clouds: PartResources,
    atmosphere: PartResources,
}

impl GlobeRenderer {
    /// Build every pipeline and upload the scene's static geometry.
    pub fn new(context: RenderContext, scene: &SceneContext) -> Self {
        let device = &context.device;
        let (width, height) = context.size();
        let format = context.surface_format;
        let samples = context.sample_count;

        let scene_layout = create_scene_bind_group_layout(device);
        let phong = PhongPipeline::new(device, &scene_layout, format, samples);
        let star_pipeline = StarPipeline::new(device, &scene_layout, format, samples);

        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("globe-camera-uniform"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let light_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("globe-light-uniform"),
            size: std::mem::size_of::<LightUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let scene_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globe-scene-bg"),
            layout: &scene_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: light_buffer.as_entire_binding(),
                },
            ],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("globe-sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Linear,
            ..Default::default()
        });
        let white = GpuTexture::white(device, &context.queue);

        let stars = GpuStarfield::upload(device, &star_pipeline, &scene.starfield);

        let binder = MaterialBinder {
            device,
            queue: &context.queue,
            layout: &phong.material_bind_group_layout,
            sampler: &sampler,
            white: &white,
        };
        let planet = PartResources::new("planet", &scene.body.planet, &binder);
        let clouds = PartResources::new("clouds", &scene.body.clouds, &binder);
        let atmosphere = PartResources::new("atmosphere", &scene.body.atmosphere, &binder);

        let depth = DepthBuffer::new(device, width, height, samples);
        let msaa = MsaaTarget::new(device, format, width, height, samples);

        log::info!(
            "Globe renderer ready: {} stars, {} planet triangles",
            scene.starfield.len(),
            scene.body.planet.mesh().triangle_count()
        );

        Self {
            context,
            depth,
            msaa,
            phong,
            star_pipeline,
            camera_buffer,
            light_buffer,
            scene_bind_group,
            sampler,
            white,
            stars,
            planet,
            clouds,
            atmosphere,
        }
    }

    /// Follow the viewport's drawing-buffer size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.context.resize(width, height);
        let (width, height) = self.context.size();
        self.depth.resize(&self.context.device, width, height);
        if let Some(msaa) = &mut self.msaa {
            msaa.resize(&self.context.device, width, height);
        }
    }

    pub fn size(&self) -> (u32, u32) {
        self.context.size()
    }

    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    fn sync_materials(&mut self, scene: &SceneContext) {
        let binder = MaterialBinder {
            device: &self.context.device,
            queue: &self.context.queue,
            layout: &self.phong.material_bind_group_layout,
            sampler: &self.sampler,
            white: &self.white,
        };
        self.planet.sync(&scene.body.planet, &binder);
        self.clouds.sync(&scene.body.clouds, &binder);
        self.atmosphere.sync(&scene.body.atmosphere, &binder);
    }

    fn write_uniforms(&self, scene: &SceneContext) {
        let queue = &self.context.queue;
        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::bytes_of(&CameraUniform::from_camera(&scene.camera)),
        );
        queue.write_buffer(
            &self.light_buffer,
            0,
            bytemuck::bytes_of(&LightUniform::from_lights(&scene.lights)),
        );
        queue.write_buffer(
            &self.stars.uniform_buffer,
            0,
            bytemuck::bytes_of(&StarUniform::new(
                Mat4::from_quat(scene.star_rotation()),
                POINT_SIZE,
            )),
        );

        let body = &scene.body;
        self.planet.write_uniform(
            queue,
            Mat4::from_quat(scene.planet_rotation()),
            &body.planet,
        );
        self.clouds
            .write_uniform(queue, Mat4::from_quat(scene.cloud_rotation()), &body.clouds);
        self.atmosphere
            .write_uniform(queue, Mat4::IDENTITY, &body.atmosphere);
    }
}

impl FrameRenderer for GlobeRenderer {
    type Error = SurfaceError;

    fn render(&mut self, scene: &SceneContext) -> Result<(), SurfaceError> {
        self.sync_materials(scene);
        self.write_uniforms(scene);

        let frame = self.context.get_current_texture()?;
        let surface_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let (color_view, resolve_target) = match &self.msaa {
            Some(msaa) => (&msaa.view, Some(&surface_view)),
            None => (&surface_view, None),
        };

        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("globe-frame-encoder"),
                });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("globe-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: color_view,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(DepthBuffer::CLEAR_VALUE),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            pass.set_bind_group(0, &self.scene_bind_group, &[]);
            self.stars.draw(&mut pass, &self.star_pipeline);
            // Opaque first, then shells back to front.
            self.planet.draw(&mut pass, &self.phong);
            self.atmosphere.draw(&mut pass, &self.phong);
            self.clouds.draw(&mut pass, &self.phong);
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}
