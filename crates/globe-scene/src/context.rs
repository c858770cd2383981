//! The scene controller: owns every piece of globe state and exposes the
//! bootstrap, texture-apply, frame, and resize operations.

use std::fmt;
use std::sync::Arc;

use glam::Quat;
use globe_assets::{LoadOutcome, LoadResult, TextureChannel, TextureLoader};
use globe_config::Config;

use crate::body::CelestialBody;
use crate::camera::PerspectiveCamera;
use crate::clock::{self, FrameClock};
use crate::controls::OrbitControls;
use crate::fallback;
use crate::lighting::Lights;
use crate::material::{MapSlot, Material};
use crate::starfield::{STAR_COUNT, STAR_RADIUS, Starfield};
use crate::texture_state::{TextureState, TextureStates};
use crate::viewport::Viewport;

/// Issues texture requests and hands back completed results.
pub trait TextureFetcher {
    /// Start fetching `location` for `channel`. Returns `false` if the
    /// request could not be queued.
    fn request(&mut self, channel: TextureChannel, location: &str) -> bool;

    /// Completed results since the last poll. Must not block.
    fn poll(&mut self) -> Vec<LoadResult>;
}

impl TextureFetcher for TextureLoader {
    fn request(&mut self, channel: TextureChannel, location: &str) -> bool {
        TextureLoader::request(self, channel, location)
    }

    fn poll(&mut self) -> Vec<LoadResult> {
        self.drain_results()
    }
}

/// Draws one frame of a [`SceneContext`].
pub trait FrameRenderer {
    type Error: fmt::Display;

    fn render(&mut self, scene: &SceneContext) -> Result<(), Self::Error>;
}

/// All globe state, created once at startup.
pub struct SceneContext {
    pub camera: PerspectiveCamera,
    pub controls: OrbitControls,
    pub lights: Lights,
    pub starfield: Starfield,
    pub body: CelestialBody,
    pub clock: FrameClock,
    viewport: Viewport,
    textures: TextureStates,
    fetcher: Box<dyn TextureFetcher>,
    skipped_frames: u64,
}

impl SceneContext {
    /// Build the scene and issue the four texture requests.
    ///
    /// Returns immediately; textures arrive through later [`frame`] calls.
    /// A request the fetcher refuses is treated as an immediate failure.
    ///
    /// [`frame`]: Self::frame
    pub fn bootstrap(
        config: &Config,
        viewport: Viewport,
        fetcher: Box<dyn TextureFetcher>,
    ) -> Self {
        let seed = Starfield::resolve_seed(config.starfield.seed);

        let mut scene = Self {
            camera: PerspectiveCamera::new(viewport.aspect()),
            controls: OrbitControls::default(),
            lights: Lights::default(),
            starfield: Starfield::generate(STAR_COUNT, STAR_RADIUS, seed),
            body: CelestialBody::new(),
            clock: FrameClock::default(),
            viewport,
            textures: TextureStates::default(),
            fetcher,
            skipped_frames: 0,
        };

        for channel in TextureChannel::ALL {
            let location = channel.location(&config.textures).to_string();
            scene.textures.set(channel, TextureState::Requested);
            if !scene.fetcher.request(channel, &location) {
                scene.apply_load_result(LoadResult::failed(
                    channel,
                    location,
                    "texture loader unavailable",
                ));
            }
        }

        tracing::info!(
            width = viewport.width(),
            height = viewport.height(),
            pixel_ratio = viewport.pixel_ratio(),
            star_seed = seed,
            "scene bootstrapped"
        );
        scene
    }

    /// Fold one completed texture request into the scene.
    ///
    /// Loaded textures go into the bound slot of the current material. A
    /// failed colour map is replaced by the procedural map on a fresh planet
    /// material; any other failure leaves its slot empty.
    pub fn apply_load_result(&mut self, result: LoadResult) {
        let channel = result.channel;
        match result.outcome {
            LoadOutcome::Loaded(image) => {
                let texture = Arc::new(image);
                match channel {
                    TextureChannel::Diffuse => {
                        self.body.planet.material_mut().set_slot(MapSlot::Map, texture)
                    }
                    TextureChannel::Bump => self
                        .body
                        .planet
                        .material_mut()
                        .set_slot(MapSlot::BumpMap, texture),
                    TextureChannel::Specular => self
                        .body
                        .planet
                        .material_mut()
                        .set_slot(MapSlot::SpecularMap, texture),
                    TextureChannel::Cloud => {
                        self.body.clouds.material_mut().set_slot(MapSlot::Map, texture)
                    }
                }
                self.textures.set(channel, TextureState::Applied);
                tracing::info!("{channel} texture loaded");
            }
            LoadOutcome::Failed(reason) if channel == TextureChannel::Diffuse => {
                tracing::error!(
                    location = %result.location,
                    "diffuse texture failed, using procedural fallback: {reason}"
                );
                let map = Arc::new(fallback::procedural_earth());
                self.body
                    .planet
                    .replace_material(Material::planet_fallback(map));
                self.textures.set(channel, TextureState::FallbackApplied);
            }
            LoadOutcome::Failed(reason) => {
                tracing::warn!(
                    location = %result.location,
                    "{channel} texture failed: {reason}"
                );
                self.textures.set(channel, TextureState::Failed);
            }
        }
    }

    /// Advance the scene by one frame and submit it to `renderer`.
    ///
    /// Pending texture results are applied first. A render error is logged
    /// and the frame counts as skipped; returns whether it was drawn.
    pub fn frame<R: FrameRenderer>(&mut self, renderer: &mut R) -> bool {
        for result in self.fetcher.poll() {
            self.apply_load_result(result);
        }

        self.clock.advance_planet();
        self.clock.advance_stars();
        self.clock.advance_clouds();
        self.clock.frame += 1;

        self.controls.update(&mut self.camera);

        match renderer.render(self) {
            Ok(()) => true,
            Err(e) => {
                self.skipped_frames += 1;
                tracing::warn!(frame = self.clock.frame, "frame skipped: {e}");
                false
            }
        }
    }

    /// Match the camera and viewport to a new logical size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport.set_size(width, height);
        self.camera.set_aspect_ratio(
            self.viewport.width() as f32,
            self.viewport.height() as f32,
        );
        tracing::debug!(width, height, "scene resized");
    }

    pub fn set_pixel_ratio(&mut self, ratio: f64) {
        self.viewport.set_pixel_ratio(ratio);
    }

    /// Pointer drag in logical pixels.
    pub fn drag(&mut self, dx: f32, dy: f32) {
        self.controls
            .handle_drag(dx, dy, self.viewport.height() as f32);
    }

    /// Wheel input in notches, positive toward the globe.
    pub fn zoom(&mut self, notches: f32) {
        self.controls.handle_wheel(notches);
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn texture_state(&self, channel: TextureChannel) -> TextureState {
        self.textures.get(channel)
    }

    pub fn textures(&self) -> &TextureStates {
        &self.textures
    }

    /// Frames whose render failed.
    pub fn skipped_frames(&self) -> u64 {
        self.skipped_frames
    }

    pub fn planet_rotation(&self) -> Quat {
        clock::rotation(self.clock.planet_angle)
    }

    pub fn cloud_rotation(&self) -> Quat {
        clock::rotation(self.clock.cloud_angle)
    }

    pub fn star_rotation(&self) -> Quat {
        clock::rotation(self.clock.star_angle)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use globe_assets::TextureImage;

    /// Records requests; results are pushed by the test through the scene.
    #[derive(Default)]
    struct RecordingFetcher {
        requested: Vec<(TextureChannel, String)>,
        queued: VecDeque<LoadResult>,
        refuse: bool,
    }

    impl TextureFetcher for RecordingFetcher {
        fn request(&mut self, channel: TextureChannel, location: &str) -> bool {
            self.requested.push((channel, location.to_string()));
            !self.refuse
        }

        fn poll(&mut self) -> Vec<LoadResult> {
            self.queued.drain(..).collect()
        }
    }

    struct NullRenderer;

    impl FrameRenderer for NullRenderer {
        type Error = String;

        fn render(&mut self, _scene: &SceneContext) -> Result<(), String> {
            Ok(())
        }
    }

    fn seeded_config() -> Config {
        let mut config = Config::default();
        config.starfield.seed = Some(1);
        config
    }

    fn scene() -> SceneContext {
        SceneContext::bootstrap(
            &seeded_config(),
            Viewport::new(800, 600, 1.0),
            Box::new(RecordingFetcher::default()),
        )
    }

    fn texture(label: &str) -> TextureImage {
        TextureImage::new(
            label,
            image::RgbaImage::from_pixel(4, 2, image::Rgba([1, 2, 3, 255])),
        )
    }

    #[test]
    fn test_bootstrap_builds_one_of_everything() {
        let scene = scene();
        assert_eq!(scene.starfield.len(), STAR_COUNT);
        assert_eq!(scene.camera.aspect, 800.0 / 600.0);
        assert!((scene.controls.distance(&scene.camera) - 5.0).abs() < 1e-5);
        assert!(scene.body.shells_nested());
        for channel in TextureChannel::ALL {
            assert_eq!(scene.texture_state(channel), TextureState::Requested);
        }
        assert_eq!(scene.clock, FrameClock::default());
    }

    #[test]
    fn test_refused_requests_fail_immediately() {
        let fetcher = RecordingFetcher {
            refuse: true,
            ..RecordingFetcher::default()
        };
        let scene = SceneContext::bootstrap(
            &seeded_config(),
            Viewport::new(10, 10, 1.0),
            Box::new(fetcher),
        );
        assert_eq!(
            scene.texture_state(TextureChannel::Diffuse),
            TextureState::FallbackApplied
        );
        assert_eq!(scene.texture_state(TextureChannel::Cloud), TextureState::Failed);
        assert!(scene.body.planet.material().map().is_some());
    }

    #[test]
    fn test_loaded_textures_land_in_bound_slots() {
        let mut scene = scene();
        scene.apply_load_result(LoadResult::loaded(TextureChannel::Diffuse, texture("d")));
        scene.apply_load_result(LoadResult::loaded(TextureChannel::Bump, texture("b")));
        scene.apply_load_result(LoadResult::loaded(TextureChannel::Specular, texture("s")));
        scene.apply_load_result(LoadResult::loaded(TextureChannel::Cloud, texture("c")));

        let planet = scene.body.planet.material();
        assert_eq!(planet.map().unwrap().label, "d");
        assert_eq!(planet.bump_map().unwrap().label, "b");
        assert_eq!(planet.specular_map().unwrap().label, "s");
        assert_eq!(scene.body.clouds.material().map().unwrap().label, "c");
        assert!(scene.body.atmosphere.material().map().is_none());
        assert!(scene.textures().all_settled());
    }

    #[test]
    fn test_diffuse_failure_substitutes_fallback_material() {
        let mut scene = scene();
        scene.apply_load_result(LoadResult::loaded(TextureChannel::Bump, texture("b")));
        let before = scene.body.planet.material().revision();

        scene.apply_load_result(LoadResult::failed(TextureChannel::Diffuse, "x", "404"));

        let planet = scene.body.planet.material();
        let map = planet.map().expect("fallback map");
        assert_eq!((map.width(), map.height()), (1024, 512));
        assert!(planet.bump_map().is_none(), "fallback material has no bump map");
        assert!(planet.revision() > before);
        assert_eq!(
            scene.texture_state(TextureChannel::Diffuse),
            TextureState::FallbackApplied
        );
    }

    #[test]
    fn test_late_bump_applies_to_fallback_material() {
        let mut scene = scene();
        scene.apply_load_result(LoadResult::failed(TextureChannel::Diffuse, "x", "timeout"));
        scene.apply_load_result(LoadResult::loaded(TextureChannel::Bump, texture("b")));
        let planet = scene.body.planet.material();
        assert_eq!(planet.map().unwrap().label, "procedural");
        assert_eq!(planet.bump_map().unwrap().label, "b");
    }

    #[test]
    fn test_secondary_failures_leave_diffuse_untouched() {
        let mut scene = scene();
        scene.apply_load_result(LoadResult::loaded(TextureChannel::Diffuse, texture("d")));
        let revision = scene.body.planet.material().revision();
        let mesh = Arc::clone(scene.body.planet.mesh());

        scene.apply_load_result(LoadResult::failed(TextureChannel::Bump, "b", "dns"));
        scene.apply_load_result(LoadResult::failed(TextureChannel::Specular, "s", "dns"));
        scene.apply_load_result(LoadResult::failed(TextureChannel::Cloud, "c", "dns"));

        let planet = scene.body.planet.material();
        assert_eq!(planet.map().unwrap().label, "d");
        assert_eq!(planet.revision(), revision);
        assert!(Arc::ptr_eq(&mesh, scene.body.planet.mesh()));
        assert_eq!(scene.texture_state(TextureChannel::Bump), TextureState::Failed);
        assert!(scene.body.clouds.material().map().is_none());
    }

    #[test]
    fn test_frame_advances_rotations_in_steps() {
        let mut scene = scene();
        assert!(scene.frame(&mut NullRenderer));
        assert!(scene.frame(&mut NullRenderer));
        assert_eq!(scene.clock.frame, 2);
        assert!((scene.clock.planet_angle - 0.002).abs() < 1e-12);
        assert!((scene.clock.cloud_angle - 0.001).abs() < 1e-12);
        assert!((scene.clock.star_angle - 0.0002).abs() < 1e-12);
    }

    #[test]
    fn test_render_error_skips_frame_but_keeps_ticking() {
        struct Failing;
        impl FrameRenderer for Failing {
            type Error = &'static str;
            fn render(&mut self, _: &SceneContext) -> Result<(), &'static str> {
                Err("surface lost")
            }
        }

        let mut scene = scene();
        assert!(!scene.frame(&mut Failing));
        assert!(!scene.frame(&mut Failing));
        assert_eq!(scene.skipped_frames(), 2);
        assert_eq!(scene.clock.frame, 2);
        assert!(scene.frame(&mut NullRenderer));
    }

    #[test]
    fn test_resize_sets_exact_aspect() {
        let mut scene = scene();
        scene.resize(1920, 1080);
        assert_eq!(scene.camera.aspect, 1920.0_f32 / 1080.0_f32);
        assert_eq!(scene.viewport().drawing_buffer_size(), (1920, 1080));

        scene.set_pixel_ratio(2.0);
        assert_eq!(scene.viewport().drawing_buffer_size(), (3840, 2160));
        assert_eq!(scene.camera.aspect, 1920.0_f32 / 1080.0_f32);
    }

    #[test]
    fn test_drag_uses_viewport_height() {
        let mut scene = scene();
        scene.drag(150.0, 0.0);
        for _ in 0..200 {
            scene.frame(&mut NullRenderer);
        }
        assert!(scene.camera.position.x.abs() > 0.1);
        assert!((scene.controls.distance(&scene.camera) - 5.0).abs() < 1e-3);
    }
}
