// extensions/mod.rs
//
// Optional extension modules for the engine.
// These are decoupled from core Entity/Scene; games opt in by using them.

pub mod easing;
pub mod transform;

pub use easing::{Easing, lerp, lerp_vec3, ease_vec3};
pub use transform::{TransformGraph, LocalTransform};
