//! wgpu renderer for the globe scene.
//!
//! [`GlobeRenderer`] implements the scene's `FrameRenderer` seam: it mirrors
//! materials and texture slots onto the GPU and draws the starfield, planet,
//! atmosphere and clouds into the window surface each frame.

pub mod gpu;
pub mod mesh;
pub mod phong;
pub mod renderer;
pub mod stars;
pub mod targets;
pub mod texture;
pub mod uniforms;

#[cfg(test)]
mod test_support;

pub use gpu::{RenderContext, RenderContextError, SurfaceError, init_render_context_blocking};
pub use mesh::{GpuMesh, SphereVertex};
pub use phong::{PHONG_SHADER_SOURCE, PhongPipeline, PhongVariant};
pub use renderer::{CLEAR_COLOR, GlobeRenderer};
pub use stars::{GpuStarfield, STAR_SHADER_SOURCE, StarInstance, StarPipeline};
pub use targets::{DepthBuffer, MsaaTarget};
pub use texture::{ColorSpace, GpuTexture, TextureError};
pub use uniforms::{CameraUniform, LightUniform, MaterialUniform, StarUniform, srgb_to_linear};
