use bytemuck::{Pod, Zeroable};

/// Shape codes carried in `MeshInstance::params[0]`.
pub const SHAPE_SPHERE: f32 = 0.0;
pub const SHAPE_RING: f32 = 1.0;

/// Shading codes carried in `MeshInstance::params[1]`.
pub const SHADING_BASIC: f32 = 0.0;
pub const SHADING_STANDARD: f32 = 1.0;

/// Per-instance render data: 28 floats = 112 bytes stride.
///
/// Spheres are drawn from a shared unit sphere, so their radius is baked
/// into `model`. Rings are drawn from a unit annulus strip whose inner and
/// outer radii come from `params`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct MeshInstance {
    /// Column-major model matrix.
    pub model: [[f32; 4]; 4],
    /// RGB + opacity.
    pub color: [f32; 4],
    /// `[shape, shading, inner_radius, outer_radius]`.
    pub params: [f32; 4],
    /// `[segments, double_sided, 0, 0]`.
    pub extra: [f32; 4],
}

impl MeshInstance {
    pub const FLOATS: usize = 28;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    pub fn shape(&self) -> f32 {
        self.params[0]
    }

    pub fn opacity(&self) -> f32 {
        self.color[3]
    }

    pub fn segments(&self) -> u32 {
        self.extra[0] as u32
    }

    pub fn double_sided(&self) -> bool {
        self.extra[1] != 0.0
    }
}

impl Default for MeshInstance {
    fn default() -> Self {
        Self {
            model: glam::Mat4::IDENTITY.to_cols_array_2d(),
            color: [1.0, 1.0, 1.0, 1.0],
            params: [SHAPE_SPHERE, SHADING_STANDARD, 0.0, 0.0],
            extra: [0.0; 4],
        }
    }
}

/// Instances for one frame, opaque first.
pub struct RenderBuffer {
    /// Opaque instances occupy `[0..opaque_split)`, transparent ones follow.
    pub instances: Vec<MeshInstance>,
    pub opaque_split: u32,
}

impl RenderBuffer {
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            instances: Vec::with_capacity(capacity),
            opaque_split: 0,
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
        self.opaque_split = 0;
    }

    pub fn push(&mut self, instance: MeshInstance) {
        self.instances.push(instance);
    }

    pub fn set_opaque_split(&mut self, split: u32) {
        self.opaque_split = split;
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    pub fn opaque(&self) -> &[MeshInstance] {
        &self.instances[..self.opaque_split as usize]
    }

    pub fn transparent(&self) -> &[MeshInstance] {
        &self.instances[self.opaque_split as usize..]
    }

    /// Flat float view for vertex buffer uploads.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.instances)
    }
}

impl Default for RenderBuffer {
    fn default() -> Self {
        Self::new()
    }
}
