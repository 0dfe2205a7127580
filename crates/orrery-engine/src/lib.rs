pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod input;
pub mod extensions;

// Re-export key types at crate root for convenience
pub use api::game::{Game, GameConfig, EngineContext};
pub use api::types::{EntityId, Tooltip};
pub use components::entity::Entity;
pub use components::mesh::{Color, MeshComponent, Shading, Shape};
pub use core::scene::Scene;
pub use core::schedule::FrameScheduler;
pub use core::time::FrameClock;
pub use renderer::camera::{CameraPose, CameraUniform, PerspectiveCamera, Ray};
pub use renderer::instance::{MeshInstance, RenderBuffer};
pub use renderer::transition::{CameraRig, CameraState, CameraTransition};
pub use renderer::{Renderer, FrameData, DrawStats};
pub use input::queue::{InputEvent, InputQueue};
pub use systems::lighting::{PointLight, LightState};
pub use systems::picking::{pick, pointer_to_ndc, ray_sphere, PickHit};
pub use systems::render::build_render_buffer;
pub use systems::rng::Rng;
pub use systems::starfield::{StarField, StarPoint};

// Extensions: decoupled optional systems
pub use extensions::{
    Easing, lerp, lerp_vec3, ease_vec3,
    TransformGraph, LocalTransform,
};
