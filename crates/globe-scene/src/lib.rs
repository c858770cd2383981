//! Globe scene controller.
//!
//! Owns the camera, orbit controls, lights, starfield, and the planet with
//! its cloud and atmosphere shells. Texture results are folded in between
//! frames; a failed colour map is replaced by a procedural raster. Nothing
//! here touches the GPU: rendering goes through the [`FrameRenderer`] seam.

pub mod body;
pub mod camera;
pub mod clock;
pub mod context;
pub mod controls;
pub mod fallback;
pub mod lighting;
pub mod material;
pub mod mesh;
pub mod starfield;
pub mod texture_state;
pub mod viewport;

pub use body::{BodyPart, CelestialBody};
pub use camera::PerspectiveCamera;
pub use clock::FrameClock;
pub use context::{FrameRenderer, SceneContext, TextureFetcher};
pub use controls::OrbitControls;
pub use lighting::{AmbientLight, DirectionalLight, Lights};
pub use material::{MapSlot, Material, Side};
pub use mesh::SphereMesh;
pub use starfield::{Star, Starfield};
pub use texture_state::{TextureState, TextureStates};
pub use viewport::Viewport;
