//! GPU device initialization and surface management.
//!
//! [`RenderContext`] owns the adapter, device, queue and window surface.
//! Startup failures surface as [`RenderContextError`]; per-frame surface
//! acquisition failures as [`SurfaceError`].

use std::sync::Arc;

use winit::window::Window;

/// Startup failures. All of them are fatal for the viewer.
#[derive(Debug, thiserror::Error)]
pub enum RenderContextError {
    #[error("no compatible GPU adapter found")]
    NoAdapter,

    #[error("failed to request GPU device: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),

    #[error("failed to create surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),

    /// The adapter reports no usable surface format.
    #[error("surface is not supported by the selected adapter")]
    SurfaceUnsupported,
}

/// Why a frame could not be acquired. The frame is skipped; the loop goes on.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SurfaceError {
    /// Surface lost or outdated and a single reconfigure did not help.
    #[error("surface lost")]
    Lost,

    #[error("out of memory")]
    OutOfMemory,

    #[error("timed out acquiring the next frame")]
    Timeout,
}

/// Owns the GPU device and the window surface it presents to.
pub struct RenderContext {
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub surface: wgpu::Surface<'static>,
    pub surface_config: wgpu::SurfaceConfiguration,
    pub surface_format: wgpu::TextureFormat,
    /// MSAA sample count actually in use (requested count if supported, else 1).
    pub sample_count: u32,
}

impl RenderContext {
    /// Initialize the GPU for `window`, sized to `(width, height)` physical pixels.
    pub async fn new(
        window: Arc<Window>,
        width: u32,
        height: u32,
        vsync: bool,
        msaa_samples: u32,
    ) -> Result<Self, RenderContextError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| RenderContextError::NoAdapter)?;

        let info = adapter.get_info();
        log::info!(
            "Selected GPU: {} ({:?}, {:?})",
            info.name,
            info.backend,
            info.device_type
        );

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("globe-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
                experimental_features: wgpu::ExperimentalFeatures::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let caps = surface.get_capabilities(&adapter);
        let surface_format =
            select_surface_format(&caps.formats).ok_or(RenderContextError::SurfaceUnsupported)?;
        let present_mode = select_present_mode(&caps.present_modes, vsync);
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let format_features = adapter.get_texture_format_features(surface_format);
        let sample_count = if msaa_samples > 1
            && format_features
                .flags
                .sample_count_supported(msaa_samples)
        {
            msaa_samples
        } else {
            if msaa_samples > 1 {
                log::warn!("{msaa_samples}x MSAA unsupported for {surface_format:?}, disabling");
            }
            1
        };

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: width.max(1),
            height: height.max(1),
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        log::info!(
            "Surface configured: {}x{} {surface_format:?} {present_mode:?}, {sample_count}x MSAA",
            surface_config.width,
            surface_config.height
        );

        Ok(Self {
            adapter,
            device,
            queue,
            surface,
            surface_config,
            surface_format,
            sample_count,
        })
    }

    /// Reconfigure the surface. Zero dimensions are clamped to 1.
    pub fn resize(&mut self, width: u32, height: u32) {
        let (width, height) = (width.max(1), height.max(1));
        if self.surface_config.width == width && self.surface_config.height == height {
            return;
        }
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(&self.device, &self.surface_config);
    }

    pub fn size(&self) -> (u32, u32) {
        (self.surface_config.width, self.surface_config.height)
    }

    /// Acquire the next frame, reconfiguring once if the surface was lost
    /// or went out of date.
    pub fn get_current_texture(&self) -> Result<wgpu::SurfaceTexture, SurfaceError> {
        match self.surface.get_current_texture() {
            Ok(texture) => Ok(texture),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.surface_config);
                self.surface
                    .get_current_texture()
                    .map_err(|_| SurfaceError::Lost)
            }
            Err(wgpu::SurfaceError::OutOfMemory) => Err(SurfaceError::OutOfMemory),
            Err(wgpu::SurfaceError::Timeout) => Err(SurfaceError::Timeout),
            Err(wgpu::SurfaceError::Other) => {
                log::error!("Unknown surface error occurred");
                Err(SurfaceError::Lost)
            }
        }
    }
}

/// Initialize the GPU synchronously using `pollster`.
pub fn init_render_context_blocking(
    window: Arc<Window>,
    width: u32,
    height: u32,
    vsync: bool,
    msaa_samples: u32,
) -> Result<RenderContext, RenderContextError> {
    pollster::block_on(RenderContext::new(
        window,
        width,
        height,
        vsync,
        msaa_samples,
    ))
}

/// The globe textures are authored in sRGB, so an sRGB swapchain is wanted.
/// Falls back to whatever the surface lists first.
fn select_surface_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    const PREFERRED: [wgpu::TextureFormat; 2] = [
        wgpu::TextureFormat::Bgra8UnormSrgb,
        wgpu::TextureFormat::Rgba8UnormSrgb,
    ];
    PREFERRED
        .into_iter()
        .find(|f| formats.contains(f))
        .or_else(|| formats.iter().copied().find(|f| f.is_srgb()))
        .or_else(|| formats.first().copied())
}

/// Fifo when vsync is on (always supported); otherwise the lowest-latency
/// mode the surface offers.
fn select_present_mode(modes: &[wgpu::PresentMode], vsync: bool) -> wgpu::PresentMode {
    if vsync {
        return wgpu::PresentMode::Fifo;
    }
    [wgpu::PresentMode::Mailbox, wgpu::PresentMode::Immediate]
        .into_iter()
        .find(|m| modes.contains(m))
        .unwrap_or(wgpu::PresentMode::Fifo)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_format_preference_order() {
        use wgpu::TextureFormat as F;
        let cases: [(&[F], Option<F>); 4] = [
            (&[F::Rgba8Unorm, F::Rgba8UnormSrgb, F::Bgra8UnormSrgb], Some(F::Bgra8UnormSrgb)),
            (&[F::Bgra8Unorm, F::Rgba8UnormSrgb], Some(F::Rgba8UnormSrgb)),
            (&[F::Bgra8Unorm, F::Rgba8Unorm], Some(F::Bgra8Unorm)),
            (&[], None),
        ];
        for (formats, expected) in cases {
            assert_eq!(select_surface_format(formats), expected, "{formats:?}");
        }
    }

    #[test]
    fn test_vsync_uses_fifo() {
        let modes = [wgpu::PresentMode::Mailbox, wgpu::PresentMode::Fifo];
        assert_eq!(select_present_mode(&modes, true), wgpu::PresentMode::Fifo);
    }

    #[test]
    fn test_no_vsync_prefers_mailbox_then_immediate() {
        let modes = [
            wgpu::PresentMode::Immediate,
            wgpu::PresentMode::Mailbox,
            wgpu::PresentMode::Fifo,
        ];
        assert_eq!(select_present_mode(&modes, false), wgpu::PresentMode::Mailbox);

        let modes = [wgpu::PresentMode::Immediate, wgpu::PresentMode::Fifo];
        assert_eq!(
            select_present_mode(&modes, false),
            wgpu::PresentMode::Immediate
        );

        let modes = [wgpu::PresentMode::Fifo];
        assert_eq!(select_present_mode(&modes, false), wgpu::PresentMode::Fifo);
    }
}
