//! Uploading decoded rasters to GPU textures. Mip levels arrive prebuilt
//! from the loader; uploads only copy.

use globe_assets::TextureImage;

/// Errors that can occur during texture creation.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextureError {
    #[error("texture dimensions must be non-zero, got {width}x{height}")]
    ZeroDimensions { width: u32, height: u32 },

    /// The device cannot hold a texture this large.
    #[error("{width}x{height} exceeds the device limit of {limit}")]
    TooLarge { width: u32, height: u32, limit: u32 },
}

/// How texel values are interpreted when sampled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorSpace {
    /// Colour data (diffuse, clouds): decoded from sRGB on sample.
    Srgb,
    /// Non-colour data (bump heights, specular strength).
    Linear,
}

impl ColorSpace {
    fn format(self) -> wgpu::TextureFormat {
        match self {
            ColorSpace::Srgb => wgpu::TextureFormat::Rgba8UnormSrgb,
            ColorSpace::Linear => wgpu::TextureFormat::Rgba8Unorm,
        }
    }
}

/// A sampled 2D texture on the GPU.
pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub dimensions: (u32, u32),
    pub mip_level_count: u32,
}

impl GpuTexture {
    /// Upload `image` with whatever mip levels it carries.
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &TextureImage,
        color_space: ColorSpace,
    ) -> Result<Self, TextureError> {
        let (width, height) = (image.width(), image.height());
        if width == 0 || height == 0 {
            return Err(TextureError::ZeroDimensions { width, height });
        }
        let limit = device.limits().max_texture_dimension_2d;
        if width > limit || height > limit {
            return Err(TextureError::TooLarge {
                width,
                height,
                limit,
            });
        }

        let level_count = image.level_count();
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(&image.label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: level_count,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: color_space.format(),
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for (mip, level) in image.levels().enumerate() {
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: mip as u32,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                level.as_raw(),
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * level.width()),
                    rows_per_image: None,
                },
                wgpu::Extent3d {
                    width: level.width(),
                    height: level.height(),
                    depth_or_array_layers: 1,
                },
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        log::info!(
            "Uploaded texture '{}' ({width}x{height}, {level_count} mips)",
            image.label
        );

        Ok(Self {
            texture,
            view,
            dimensions: (width, height),
            mip_level_count: level_count,
        })
    }

    /// 1x1 opaque white: neutral for colour maps, flat for bump maps, full
    /// strength for specular maps.
    pub fn white(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        use wgpu::util::DeviceExt;

        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some("globe-white"),
                size: wgpu::Extent3d {
                    width: 1,
                    height: 1,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8Unorm,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            &[255, 255, 255, 255],
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            texture,
            view,
            dimensions: (1, 1),
            mip_level_count: 1,
        }
    }
}
