use serde::{Deserialize, Serialize};

/// Linear RGB color, components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Self = Self { r: 1.0, g: 1.0, b: 1.0 };
    pub const BLACK: Self = Self { r: 0.0, g: 0.0, b: 0.0 };

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build a color from a `0xRRGGBB` literal.
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
        Self {
            r: channel(16),
            g: channel(8),
            b: channel(0),
        }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Geometry primitive. Both shapes are centred on the entity origin;
/// rings lie flat in the local XY plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Sphere { radius: f32 },
    Ring { inner: f32, outer: f32, segments: u32 },
}

/// How the surface reacts to scene lights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shading {
    /// Flat color, ignores lights.
    Basic,
    /// Ambient + diffuse point lighting.
    #[default]
    Standard,
}

/// Renderable mesh attached to an entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshComponent {
    pub shape: Shape,
    pub color: Color,
    pub shading: Shading,
    /// 1.0 = opaque.
    pub opacity: f32,
    /// Render back faces too (needed for flat rings seen from below).
    pub double_sided: bool,
}

impl MeshComponent {
    pub fn sphere(radius: f32, color: Color) -> Self {
        Self {
            shape: Shape::Sphere { radius },
            color,
            shading: Shading::Standard,
            opacity: 1.0,
            double_sided: false,
        }
    }

    pub fn ring(inner: f32, outer: f32, segments: u32, color: Color) -> Self {
        Self {
            shape: Shape::Ring { inner, outer, segments },
            color,
            shading: Shading::Basic,
            opacity: 1.0,
            double_sided: true,
        }
    }

    pub fn with_shading(mut self, shading: Shading) -> Self {
        self.shading = shading;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn with_double_sided(mut self, double_sided: bool) -> Self {
        self.double_sided = double_sided;
        self
    }

    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0
    }

    /// Bounding radius in local units, used for picking.
    pub fn bounding_radius(&self) -> f32 {
        match self.shape {
            Shape::Sphere { radius } => radius,
            Shape::Ring { outer, .. } => outer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_hex_splits_channels() {
        let c = Color::from_hex(0xff3300);
        assert!((c.r - 1.0).abs() < 1e-6);
        assert!((c.g - 0.2).abs() < 1e-6);
        assert_eq!(c.b, 0.0);
    }

    #[test]
    fn ring_defaults_to_unlit_double_sided() {
        let ring = MeshComponent::ring(29.95, 30.05, 64, Color::from_hex(0x888888));
        assert_eq!(ring.shading, Shading::Basic);
        assert!(ring.double_sided);
        assert!(!ring.is_transparent());
        assert_eq!(ring.bounding_radius(), 30.05);
    }

    #[test]
    fn opacity_is_clamped() {
        let mesh = MeshComponent::sphere(1.0, Color::WHITE).with_opacity(1.7);
        assert_eq!(mesh.opacity, 1.0);
        let mesh = mesh.with_opacity(0.7);
        assert!(mesh.is_transparent());
    }
}
