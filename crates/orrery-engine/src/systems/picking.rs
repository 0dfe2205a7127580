//! Pointer picking: pixel -> NDC -> world ray -> nearest labelled sphere.

use glam::{Vec2, Vec3};
use crate::api::types::EntityId;
use crate::core::scene::Scene;
use crate::renderer::camera::Ray;

/// Convert a pointer position relative to the viewport's top-left corner to
/// normalized device coordinates. Returns `None` for an empty viewport.
pub fn pointer_to_ndc(x: f32, y: f32, width: f32, height: f32) -> Option<Vec2> {
    if width <= 0.0 || height <= 0.0 {
        return None;
    }
    Some(Vec2::new((x / width) * 2.0 - 1.0, -(y / height) * 2.0 + 1.0))
}

/// Distance along `ray` to its first intersection with a sphere, if any.
/// A ray starting inside the sphere hits its far side.
pub fn ray_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray.origin - center;
    let b = oc.dot(ray.direction);
    let c = oc.length_squared() - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sqrt_disc = disc.sqrt();
    let near = -b - sqrt_disc;
    if near >= 0.0 {
        return Some(near);
    }
    let far = -b + sqrt_disc;
    (far >= 0.0).then_some(far)
}

/// A pickable entity hit by the pointer ray.
#[derive(Debug, Clone, PartialEq)]
pub struct PickHit<'a> {
    pub id: EntityId,
    pub label: &'a str,
    pub distance: f32,
}

/// Nearest labelled, active mesh under `ray`. Entities are tested as bounding
/// spheres in world space.
pub fn pick<'a>(scene: &'a Scene, ray: &Ray) -> Option<PickHit<'a>> {
    scene
        .iter()
        .filter(|e| e.active)
        .filter_map(|e| {
            let label = e.label.as_deref()?;
            let mesh = e.mesh.as_ref()?;
            let radius = mesh.bounding_radius() * e.world_scale();
            let distance = ray_sphere(ray, e.world_position(), radius)?;
            Some(PickHit { id: e.id, label, distance })
        })
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}
