/// Point and ambient lighting for the 3D scene.
///
/// Lights are persistent: they stay until explicitly removed. Each frame the
/// renderer reads the active lights from `LightState` through `FrameData`.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use crate::components::mesh::Color;

/// An omnidirectional light.
///
/// Wire format (8 floats / 32 bytes):
/// `[x, y, z, intensity, r, g, b, range]`
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PointLight {
    pub position: [f32; 3],
    pub intensity: f32,
    pub color: [f32; 3],
    /// Distance at which the contribution reaches zero. 0 = infinite.
    pub range: f32,
}

impl PointLight {
    pub const FLOATS: usize = 8;

    pub fn new(position: Vec3, color: Color, intensity: f32, range: f32) -> Self {
        Self {
            position: position.to_array(),
            intensity,
            color: color.to_array(),
            range,
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position.to_array();
        self
    }

    /// Attenuation factor at `distance`, linear falloff to zero at `range`.
    pub fn attenuation(&self, distance: f32) -> f32 {
        if self.range <= 0.0 {
            return 1.0;
        }
        (1.0 - distance / self.range).clamp(0.0, 1.0)
    }
}

/// Active point lights plus the ambient term.
///
/// Ambient defaults to black, so an empty `LightState` leaves
/// `Shading::Standard` meshes unlit.
#[derive(Debug, Clone)]
pub struct LightState {
    lights: Vec<PointLight>,
    ambient: Color,
    ambient_intensity: f32,
}

impl LightState {
    pub fn new() -> Self {
        Self {
            lights: Vec::new(),
            ambient: Color::WHITE,
            ambient_intensity: 0.0,
        }
    }

    /// Add a point light to the scene.
    pub fn add(&mut self, light: PointLight) {
        self.lights.push(light);
    }

    pub fn clear(&mut self) {
        self.lights.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &PointLight> {
        self.lights.iter()
    }

    pub fn lights(&self) -> &[PointLight] {
        &self.lights
    }

    pub fn count(&self) -> usize {
        self.lights.len()
    }

    pub fn set_ambient(&mut self, color: Color, intensity: f32) {
        self.ambient = color;
        self.ambient_intensity = intensity.max(0.0);
    }

    /// Ambient color premultiplied by its intensity.
    pub fn ambient(&self) -> [f32; 3] {
        let c = self.ambient;
        let k = self.ambient_intensity;
        [c.r * k, c.g * k, c.b * k]
    }
}

impl Default for LightState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_light_new() {
        let light = PointLight::new(Vec3::new(1.0, 2.0, 3.0), Color::new(1.0, 0.5, 0.0), 2.0, 500.0);
        assert_eq!(light.position, [1.0, 2.0, 3.0]);
        assert_eq!(light.color, [1.0, 0.5, 0.0]);
        assert_eq!(light.intensity, 2.0);
        assert_eq!(light.range, 500.0);
    }

    #[test]
    fn attenuation_falls_off_linearly() {
        let light = PointLight::new(Vec3::ZERO, Color::WHITE, 2.0, 500.0);
        assert_eq!(light.attenuation(0.0), 1.0);
        assert!((light.attenuation(250.0) - 0.5).abs() < 1e-6);
        assert_eq!(light.attenuation(800.0), 0.0);

        let unbounded = PointLight::new(Vec3::ZERO, Color::WHITE, 1.0, 0.0);
        assert_eq!(unbounded.attenuation(1e6), 1.0);
    }

    #[test]
    fn light_state_add_and_clear() {
        let mut state = LightState::new();
        assert_eq!(state.count(), 0);
        state.add(PointLight::new(Vec3::ZERO, Color::WHITE, 1.0, 50.0));
        state.add(PointLight::new(Vec3::X, Color::WHITE, 2.0, 100.0));
        assert_eq!(state.count(), 2);
        state.clear();
        assert_eq!(state.count(), 0);
    }

    #[test]
    fn ambient_is_premultiplied() {
        let mut state = LightState::new();
        assert_eq!(state.ambient(), [0.0, 0.0, 0.0]);
        state.set_ambient(Color::from_hex(0x404040), 1.0);
        let a = state.ambient();
        assert!((a[0] - 64.0 / 255.0).abs() < 1e-6);
        state.set_ambient(Color::WHITE, 0.3);
        assert_eq!(state.ambient(), [0.3, 0.3, 0.3]);
    }

    #[test]
    fn point_light_is_8_floats() {
        assert_eq!(std::mem::size_of::<PointLight>(), PointLight::FLOATS * 4);
    }
}
