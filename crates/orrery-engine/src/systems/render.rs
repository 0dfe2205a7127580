use glam::Mat4;
use crate::components::entity::Entity;
use crate::components::mesh::{MeshComponent, Shading, Shape};
use crate::renderer::instance::{
    MeshInstance, RenderBuffer, SHADING_BASIC, SHADING_STANDARD, SHAPE_RING, SHAPE_SPHERE,
};

fn mesh_instance(world: Mat4, mesh: &MeshComponent) -> MeshInstance {
    let shading = match mesh.shading {
        Shading::Basic => SHADING_BASIC,
        Shading::Standard => SHADING_STANDARD,
    };
    let c = mesh.color;
    let color = [c.r, c.g, c.b, mesh.opacity];
    let double_sided = if mesh.double_sided { 1.0 } else { 0.0 };

    match mesh.shape {
        Shape::Sphere { radius } => MeshInstance {
            model: (world * Mat4::from_scale(glam::Vec3::splat(radius))).to_cols_array_2d(),
            color,
            params: [SHAPE_SPHERE, shading, 0.0, radius],
            extra: [0.0, double_sided, 0.0, 0.0],
        },
        Shape::Ring { inner, outer, segments } => MeshInstance {
            model: world.to_cols_array_2d(),
            color,
            params: [SHAPE_RING, shading, inner, outer],
            extra: [segments as f32, double_sided, 0.0, 0.0],
        },
    }
}

/// Build the render buffer from a set of entities.
/// Opaque meshes first, then transparent ones; `opaque_split` marks the
/// boundary. Entities without a mesh (pivots) are skipped.
pub fn build_render_buffer<'a>(entities: impl Iterator<Item = &'a Entity>, buffer: &mut RenderBuffer) {
    buffer.clear();

    let mut transparent: Vec<MeshInstance> = Vec::new();

    for entity in entities {
        if !entity.active {
            continue;
        }
        let Some(mesh) = &entity.mesh else {
            continue;
        };
        let instance = mesh_instance(entity.world, mesh);
        if mesh.is_transparent() {
            transparent.push(instance);
        } else {
            buffer.push(instance);
        }
    }

    buffer.set_opaque_split(buffer.instance_count());
    for inst in transparent {
        buffer.push(inst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::EntityId;
    use crate::components::mesh::Color;
    use glam::Vec3;

    #[test]
    fn transparent_meshes_go_last() {
        let entities = vec![
            Entity::new(EntityId(1))
                .with_mesh(MeshComponent::ring(6.0, 8.0, 64, Color::WHITE).with_opacity(0.7)),
            Entity::new(EntityId(2)).with_mesh(MeshComponent::sphere(2.0, Color::WHITE)),
            Entity::new(EntityId(3)),
            Entity::new(EntityId(4)).with_mesh(MeshComponent::sphere(1.0, Color::WHITE)),
        ];

        let mut buffer = RenderBuffer::new();
        build_render_buffer(entities.iter(), &mut buffer);

        assert_eq!(buffer.instance_count(), 3);
        assert_eq!(buffer.opaque_split, 2);
        assert_eq!(buffer.transparent()[0].shape(), SHAPE_RING);
        assert!((buffer.transparent()[0].opacity() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn sphere_radius_is_baked_into_model() {
        let mut entity = Entity::new(EntityId(1)).with_mesh(MeshComponent::sphere(3.0, Color::WHITE));
        entity.world = Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0));

        let mut buffer = RenderBuffer::new();
        build_render_buffer(std::iter::once(&entity), &mut buffer);

        let model = Mat4::from_cols_array_2d(&buffer.instances[0].model);
        let p = model.transform_point3(Vec3::X);
        assert!((p - Vec3::new(13.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn ring_keeps_radii_and_segments() {
        let entity = Entity::new(EntityId(1)).with_mesh(MeshComponent::ring(29.95, 30.05, 64, Color::WHITE));
        let mut buffer = RenderBuffer::new();
        build_render_buffer(std::iter::once(&entity), &mut buffer);

        let inst = buffer.instances[0];
        assert_eq!(inst.params[2], 29.95);
        assert_eq!(inst.params[3], 30.05);
        assert_eq!(inst.segments(), 64);
        assert!(inst.double_sided());
    }

    #[test]
    fn inactive_entities_are_skipped() {
        let mut entity = Entity::new(EntityId(1)).with_mesh(MeshComponent::sphere(1.0, Color::WHITE));
        entity.active = false;

        let entities = vec![entity];
        let mut buffer = RenderBuffer::new();
        build_render_buffer(entities.iter(), &mut buffer);
        assert_eq!(buffer.instance_count(), 0);
    }
}
