use glam::{Mat4, Vec3};
use crate::api::types::EntityId;
use crate::components::mesh::MeshComponent;

/// Fat Entity: a single struct with optional components.
/// Local transforms live in the `TransformGraph`; the entity only keeps
/// the propagated world matrix.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Unique identifier.
    pub id: EntityId,
    /// String tag for finding entities by name.
    pub tag: String,
    /// Text shown when the pointer hovers the mesh. Unlabelled entities are not pickable.
    pub label: Option<String>,
    /// Whether this entity is active (inactive entities are skipped).
    pub active: bool,
    /// World transform, written by `TransformGraph::propagate`.
    pub world: Mat4,
    /// Mesh component (entities without one are invisible pivots).
    pub mesh: Option<MeshComponent>,
}

impl Entity {
    /// Create a new entity with the given ID at the origin.
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            tag: String::new(),
            label: None,
            active: true,
            world: Mat4::IDENTITY,
            mesh: None,
        }
    }

    // -- Builder pattern --

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_mesh(mut self, mesh: MeshComponent) -> Self {
        self.mesh = Some(mesh);
        self
    }

    /// World-space position (translation of the world matrix).
    pub fn world_position(&self) -> Vec3 {
        self.world.w_axis.truncate()
    }

    /// Largest axis scale of the world matrix.
    pub fn world_scale(&self) -> f32 {
        let (scale, _, _) = self.world.to_scale_rotation_translation();
        scale.max_element()
    }
}
