use glam::Vec3;
use serde::{Deserialize, Serialize};
use crate::api::types::{EntityId, Tooltip};
use crate::components::entity::Entity;
use crate::components::mesh::Color;
use crate::core::scene::Scene;
use crate::core::time::FrameClock;
use crate::extensions::easing::Easing;
use crate::extensions::transform::{LocalTransform, TransformGraph};
use crate::input::queue::InputQueue;
use crate::renderer::camera::{CameraPose, PerspectiveCamera};
use crate::renderer::transition::CameraRig;
use crate::systems::lighting::LightState;
use crate::systems::starfield::StarField;

/// Configuration for the engine, provided by the game.
///
/// Deserializable from JSON; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Initial viewport size in CSS pixels, replaced by the first resize.
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Vertical field of view in degrees.
    pub fov_y_deg: f32,
    pub near: f32,
    pub far: f32,
    /// Default camera placement, also the reset-view target.
    pub camera_position: [f32; 3],
    pub camera_look_at: [f32; 3],
    pub transition_ms: f64,
    pub transition_easing: Easing,
    pub clear_color: Color,
    /// Tooltip placement relative to the cursor, in pixels.
    pub tooltip_offset: [f32; 2],
    pub star_count: usize,
    /// Side of the cube the stars are spread through.
    pub star_extent: f32,
    pub star_seed: u64,
    pub ambient_intensity: f32,
    /// Render buffer capacity hint.
    pub max_instances: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            viewport_width: 800.0,
            viewport_height: 600.0,
            fov_y_deg: 60.0,
            near: 0.1,
            far: 1000.0,
            camera_position: [0.0, 40.0, 120.0],
            camera_look_at: [0.0, 0.0, 0.0],
            transition_ms: 1000.0,
            transition_easing: Easing::Linear,
            clear_color: Color::BLACK,
            tooltip_offset: [12.0, 8.0],
            star_count: 2000,
            star_extent: 2000.0,
            star_seed: 0x5eed,
            ambient_intensity: 0.3,
            max_instances: 64,
        }
    }
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn default_pose(&self) -> CameraPose {
        CameraPose::new(
            Vec3::from_array(self.camera_position),
            Vec3::from_array(self.camera_look_at),
        )
    }
}

/// The core contract every app must fulfill.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Setup initial state, spawn entities, configure the scene.
    fn init(&mut self, ctx: &mut EngineContext);

    /// One animation step. `input` holds the custom events queued since the
    /// previous frame. Not called while paused.
    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue);
}

/// Mutable access to engine state, passed to Game::init and Game::update.
pub struct EngineContext {
    pub scene: Scene,
    pub transforms: TransformGraph,
    pub camera: CameraRig,
    pub lights: LightState,
    pub stars: StarField,
    pub tooltip: Option<Tooltip>,
    pub clock: FrameClock,
    next_id: u32,
}

impl EngineContext {
    pub fn new(config: &GameConfig) -> Self {
        let camera = PerspectiveCamera::new(
            config.fov_y_deg,
            config.viewport_width / config.viewport_height.max(1.0),
            config.near,
            config.far,
        );
        let mut lights = LightState::new();
        lights.set_ambient(Color::WHITE, config.ambient_intensity);
        Self {
            scene: Scene::new(),
            transforms: TransformGraph::new(),
            camera: CameraRig::new(
                camera,
                config.default_pose(),
                config.transition_ms,
                config.transition_easing,
            ),
            lights,
            stars: StarField::generate(config.star_count, config.star_extent, config.star_seed),
            tooltip: None,
            clock: FrameClock::new(),
            next_id: 1,
        }
    }

    /// Generate the next unique entity ID.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add an entity to the scene and the transform hierarchy.
    pub fn spawn(&mut self, entity: Entity, local: LocalTransform, parent: Option<EntityId>) -> EntityId {
        let id = entity.id;
        self.scene.spawn(entity);
        self.transforms.register_with(id, local);
        if parent.is_some() {
            self.transforms.set_parent(id, parent);
        }
        id
    }

    /// Mutable local transform of an entity.
    pub fn local_mut(&mut self, id: EntityId) -> Option<&mut LocalTransform> {
        self.transforms.get_local_mut(id)
    }

    /// Current running time in ms (frozen while paused).
    pub fn now_ms(&self) -> f64 {
        self.clock.now_ms()
    }

    /// World position of an entity, as of the last propagation.
    pub fn world_position(&self, id: EntityId) -> Option<Vec3> {
        self.scene.get(id).map(|e| e.world_position())
    }

    /// Recompute world matrices from the transform hierarchy.
    pub fn propagate(&mut self) {
        self.transforms.propagate(&mut self.scene);
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new(&GameConfig::default())
    }
}
