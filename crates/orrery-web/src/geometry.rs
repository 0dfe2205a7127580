//! Mesh generation and draw batching for the WebGL2 backend.

use std::f32::consts::{PI, TAU};
use orrery_engine::renderer::instance::{MeshInstance, SHAPE_RING};

/// Floats per vertex: `[px, py, pz, nx, ny, nz]`.
pub const VERTEX_FLOATS: usize = 6;

/// Unit sphere as indexed triangles. `width_segments` around the equator,
/// `height_segments` pole to pole.
pub fn unit_sphere(width_segments: u32, height_segments: u32) -> (Vec<f32>, Vec<u16>) {
    let ws = width_segments.max(3);
    let hs = height_segments.max(2);
    let mut vertices = Vec::with_capacity(((ws + 1) * (hs + 1)) as usize * VERTEX_FLOATS);

    for iy in 0..=hs {
        let v = iy as f32 / hs as f32;
        let theta = v * PI;
        for ix in 0..=ws {
            let u = ix as f32 / ws as f32;
            let phi = u * TAU;
            let x = -phi.cos() * theta.sin();
            let y = theta.cos();
            let z = phi.sin() * theta.sin();
            // On a unit sphere the normal is the position.
            vertices.extend_from_slice(&[x, y, z, x, y, z]);
        }
    }

    let row = ws + 1;
    let mut indices = Vec::with_capacity((ws * hs * 6) as usize);
    for iy in 0..hs {
        for ix in 0..ws {
            let a = (iy * row + ix + 1) as u16;
            let b = (iy * row + ix) as u16;
            let c = ((iy + 1) * row + ix) as u16;
            let d = ((iy + 1) * row + ix + 1) as u16;
            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != hs - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }
    (vertices, indices)
}

/// Annulus template as a triangle strip in the XY plane. Each vertex stores
/// `(cos θ, sin θ, k)` where k = 0 on the inner edge and 1 on the outer
/// edge; the vertex shader scales by the per-instance radii.
pub fn ring_strip(segments: u32) -> Vec<f32> {
    let segments = segments.max(3);
    let mut vertices = Vec::with_capacity((segments as usize + 1) * 2 * VERTEX_FLOATS);
    for i in 0..=segments {
        let theta = TAU * i as f32 / segments as f32;
        let (s, c) = theta.sin_cos();
        vertices.extend_from_slice(&[c, s, 0.0, 0.0, 0.0, 1.0]);
        vertices.extend_from_slice(&[c, s, 1.0, 0.0, 0.0, 1.0]);
    }
    vertices
}

/// Which template geometry an instance is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryKey {
    Sphere,
    Ring { segments: u32 },
}

/// A contiguous range of instances sharing geometry and face culling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawRun {
    pub geometry: GeometryKey,
    pub double_sided: bool,
    pub start: usize,
    pub len: usize,
}

fn geometry_key(instance: &MeshInstance) -> GeometryKey {
    if instance.shape() == SHAPE_RING {
        GeometryKey::Ring { segments: instance.segments().max(3) }
    } else {
        GeometryKey::Sphere
    }
}

/// Split `instances` into runs of identical draw state, preserving order.
/// `base` is added to every run's start index.
pub fn draw_runs(instances: &[MeshInstance], base: usize) -> Vec<DrawRun> {
    let mut runs: Vec<DrawRun> = Vec::new();
    for (i, inst) in instances.iter().enumerate() {
        let geometry = geometry_key(inst);
        let double_sided = inst.double_sided();
        match runs.last_mut() {
            Some(run) if run.geometry == geometry && run.double_sided == double_sided => run.len += 1,
            _ => runs.push(DrawRun {
                geometry,
                double_sided,
                start: base + i,
                len: 1,
            }),
        }
    }
    runs
}
