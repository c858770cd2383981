//! Background starfield: points scattered uniformly over a large sphere
//! around the globe, generated once and slowly rotated.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use glam::Vec3;

/// Number of stars in the scene.
pub const STAR_COUNT: usize = 5000;
/// Radius of the sphere the stars lie on.
pub const STAR_RADIUS: f32 = 50.0;
/// World-space size of a star whose size scalar is 1.
pub const POINT_SIZE: f32 = 0.1;

/// One star.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Star {
    /// Position on the star sphere, in starfield-local space.
    pub position: Vec3,
    /// Size scalar in `[0, 2)`; rendered size is `POINT_SIZE * size`.
    pub size: f32,
}

/// The generated star catalogue. Its rotation is tracked by
/// [`FrameClock`](crate::clock::FrameClock).
#[derive(Clone, Debug)]
pub struct Starfield {
    stars: Vec<Star>,
    radius: f32,
    seed: u64,
}

impl Starfield {
    /// Generate `count` stars on a sphere of `radius`. Deterministic per seed.
    ///
    /// The polar angle is `acos(2u - 1)` so that `cos(polar)` is uniform and
    /// stars do not bunch at the poles.
    pub fn generate(count: usize, radius: f32, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut stars = Vec::with_capacity(count);

        for _ in 0..count {
            let phi = (2.0 * rng.random::<f32>() - 1.0).acos();
            let theta = std::f32::consts::TAU * rng.random::<f32>();
            let size = 2.0 * rng.random::<f32>();

            let position = radius
                * Vec3::new(phi.sin() * theta.cos(), phi.sin() * theta.sin(), phi.cos());

            stars.push(Star { position, size });
        }

        tracing::debug!(count, radius, seed, "starfield generated");
        Self {
            stars,
            radius,
            seed,
        }
    }

    /// Pick a seed: the configured one, or fresh entropy.
    pub fn resolve_seed(configured: Option<u64>) -> u64 {
        configured.unwrap_or_else(rand::random)
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}
