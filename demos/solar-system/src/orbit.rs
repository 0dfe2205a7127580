/// Per-frame orbit and spin bookkeeping. Pure math, no engine dependencies.
///
/// Angles are accumulated per animation frame rather than per second, so
/// a planet's apparent speed follows the display refresh rate.

use glam::Vec3;
use crate::bodies::PlanetSpec;

pub const MIN_SPEED: f32 = 0.1;
pub const MAX_SPEED: f32 = 5.0;
pub const SPEED_STEP: f32 = 0.1;
pub const DEFAULT_SPEED: f32 = 1.0;

/// Camera distance per axis from a focused planet: `FOCUS_BASE + FOCUS_PER_RADIUS * radius`.
pub const FOCUS_BASE: f32 = 15.0;
pub const FOCUS_PER_RADIUS: f32 = 2.0;

/// A planet's animated state.
#[derive(Debug, Clone, PartialEq)]
pub struct Planet {
    pub spec: PlanetSpec,
    /// Radians around the sun. Unbounded.
    pub orbit_angle: f32,
    /// Radians around the planet's own Y axis. Unbounded.
    pub rotation_angle: f32,
    speed_multiplier: f32,
}

impl Planet {
    pub fn new(spec: PlanetSpec) -> Self {
        Self {
            spec,
            orbit_angle: 0.0,
            rotation_angle: 0.0,
            speed_multiplier: DEFAULT_SPEED,
        }
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn speed_multiplier(&self) -> f32 {
        self.speed_multiplier
    }

    /// Set the speed multiplier, clamped to `[MIN_SPEED, MAX_SPEED]`.
    /// Non-finite values are rejected and leave the multiplier unchanged.
    /// Returns the value actually stored.
    pub fn set_speed_multiplier(&mut self, multiplier: f32) -> Option<f32> {
        if !multiplier.is_finite() {
            return None;
        }
        self.speed_multiplier = multiplier.clamp(MIN_SPEED, MAX_SPEED);
        Some(self.speed_multiplier)
    }

    /// Advance one animation frame.
    pub fn advance(&mut self) {
        self.orbit_angle += self.spec.orbit_speed * self.speed_multiplier;
        self.rotation_angle += self.spec.rotation_speed * self.speed_multiplier;
    }

    /// Planet centre for the current orbit angle, matching a pivot rotated
    /// by `orbit_angle` about +Y with the planet at `(distance, 0, 0)`.
    pub fn position(&self) -> Vec3 {
        let (s, c) = self.orbit_angle.sin_cos();
        Vec3::new(self.spec.distance * c, 0.0, -self.spec.distance * s)
    }
}

/// Per-axis camera offset used when flying to a planet of `radius`.
pub fn focus_offset(radius: f32) -> f32 {
    FOCUS_BASE + FOCUS_PER_RADIUS * radius
}

/// Camera position and look-at for viewing a planet of `radius` centred at
/// `world`.
pub fn focus_target(world: Vec3, radius: f32) -> (Vec3, Vec3) {
    (world + Vec3::splat(focus_offset(radius)), world)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bodies::default_planets;

    fn earth() -> Planet {
        Planet::new(default_planets()[2].clone())
    }

    #[test]
    fn n_frames_accumulate_linearly() {
        for &m in &[0.1f32, 1.0, 2.5, 5.0] {
            let mut p = earth();
            p.set_speed_multiplier(m);
            let n = 120;
            for _ in 0..n {
                p.advance();
            }
            let expected_orbit = n as f32 * 0.01 * m;
            let expected_spin = n as f32 * 0.02 * m;
            assert!((p.orbit_angle - expected_orbit).abs() < 1e-3, "m = {m}");
            assert!((p.rotation_angle - expected_spin).abs() < 1e-3, "m = {m}");
        }
    }

    #[test]
    fn multiplier_is_clamped() {
        let mut p = earth();
        assert_eq!(p.speed_multiplier(), 1.0);
        assert_eq!(p.set_speed_multiplier(9.0), Some(5.0));
        assert_eq!(p.set_speed_multiplier(0.0), Some(0.1));
        assert_eq!(p.set_speed_multiplier(2.3), Some(2.3));
    }

    #[test]
    fn non_finite_multiplier_is_ignored() {
        let mut p = earth();
        p.set_speed_multiplier(3.0);
        assert_eq!(p.set_speed_multiplier(f32::NAN), None);
        assert_eq!(p.set_speed_multiplier(f32::INFINITY), None);
        assert_eq!(p.speed_multiplier(), 3.0);
    }

    #[test]
    fn angles_are_unbounded() {
        let mut p = Planet::new(default_planets()[0].clone());
        p.set_speed_multiplier(5.0);
        for _ in 0..100 {
            p.advance();
        }
        assert!(p.orbit_angle > std::f32::consts::TAU);
    }

    #[test]
    fn position_follows_orbit_angle() {
        let mut p = earth();
        assert!((p.position() - Vec3::new(30.0, 0.0, 0.0)).length() < 1e-5);
        p.orbit_angle = std::f32::consts::FRAC_PI_2;
        assert!((p.position() - Vec3::new(0.0, 0.0, -30.0)).length() < 1e-4);
    }

    #[test]
    fn focus_offset_scales_with_radius() {
        let p = earth();
        assert_eq!(focus_offset(p.spec.radius), 19.0);
        assert_eq!(focus_offset(4.0), 23.0);
        let (pos, look) = focus_target(Vec3::new(30.0, 0.0, 0.0), p.spec.radius);
        assert_eq!(pos, Vec3::new(49.0, 19.0, 19.0));
        assert_eq!(look, Vec3::new(30.0, 0.0, 0.0));
    }
}
