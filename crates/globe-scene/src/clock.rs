//! Per-frame animation state.

use glam::Quat;

/// Planet spin per frame, radians about +Y.
pub const PLANET_STEP: f64 = 0.001;
/// Cloud drift per frame.
pub const CLOUD_STEP: f64 = 0.0005;
/// Starfield drift per frame.
pub const STAR_STEP: f64 = 0.0001;

/// Frame counter and accumulated rotation angles.
///
/// Angles accumulate in `f64` without wrapping so they stay strictly
/// increasing for any practical session length; [`rotation`] reduces them
/// for rendering.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameClock {
    pub frame: u64,
    pub planet_angle: f64,
    pub cloud_angle: f64,
    pub star_angle: f64,
}

impl FrameClock {
    pub fn advance_planet(&mut self) {
        self.planet_angle += PLANET_STEP;
    }

    pub fn advance_stars(&mut self) {
        self.star_angle += STAR_STEP;
    }

    pub fn advance_clouds(&mut self) {
        self.cloud_angle += CLOUD_STEP;
    }
}

/// Rotation about +Y by an accumulated angle.
pub fn rotation(angle: f64) -> Quat {
    Quat::from_rotation_y(angle.rem_euclid(std::f64::consts::TAU) as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps() {
        let mut clock = FrameClock::default();
        clock.advance_planet();
        clock.advance_clouds();
        clock.advance_stars();
        assert_eq!(clock.planet_angle, 0.001);
        assert_eq!(clock.cloud_angle, 0.0005);
        assert_eq!(clock.star_angle, 0.0001);
    }

    #[test]
    fn test_rotation_wraps() {
        let a = rotation(0.5);
        let b = rotation(0.5 + std::f64::consts::TAU * 3.0);
        assert!(a.angle_between(b) < 1e-4);
    }
}
