//! Renderer trait for GPU backends.
//!
//! The engine never touches a graphics API. Backends (the WebGL2 renderer in
//! `orrery-web`, or a headless recorder in tests) consume `FrameData`.

use super::camera::CameraUniform;
use super::instance::MeshInstance;
use crate::systems::lighting::LightState;
use crate::systems::starfield::StarPoint;

/// Counters reported by a draw call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawStats {
    pub draw_calls: u32,
    pub instances: u32,
}

pub trait Renderer {
    /// Backend identifier (e.g. "webgl2").
    fn backend(&self) -> &'static str;

    /// Draw a complete frame.
    fn draw(&mut self, frame: &FrameData) -> DrawStats;

    /// Handle a viewport resize, in device pixels.
    fn resize(&mut self, width: u32, height: u32);
}

/// Everything a backend needs to draw one frame.
pub struct FrameData<'a> {
    pub camera: CameraUniform,
    /// Opaque instances first, see `opaque_split`.
    pub instances: &'a [MeshInstance],
    pub opaque_split: u32,
    pub stars: &'a [StarPoint],
    pub star_size: f32,
    pub star_color: [f32; 3],
    pub lighting: &'a LightState,
    pub clear_color: [f32; 3],
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records what it was asked to draw.
    #[derive(Default)]
    struct Recorder {
        frames: u32,
        last_instances: usize,
        size: (u32, u32),
    }

    impl Renderer for Recorder {
        fn backend(&self) -> &'static str {
            "recorder"
        }

        fn draw(&mut self, frame: &FrameData) -> DrawStats {
            self.frames += 1;
            self.last_instances = frame.instances.len();
            DrawStats {
                draw_calls: frame.instances.len() as u32 + 1,
                instances: frame.instances.len() as u32,
            }
        }

        fn resize(&mut self, width: u32, height: u32) {
            self.size = (width, height);
        }
    }

    #[test]
    fn renderer_is_object_safe() {
        let mut r: Box<dyn Renderer> = Box::new(Recorder::default());
        assert_eq!(r.backend(), "recorder");
        r.resize(800, 600);
        let lights = LightState::new();
        let instances = [MeshInstance::default()];
        let stats = r.draw(&FrameData {
            camera: bytemuck::Zeroable::zeroed(),
            instances: &instances,
            opaque_split: 1,
            stars: &[],
            star_size: 1.0,
            star_color: [1.0; 3],
            lighting: &lights,
            clear_color: [0.0; 3],
        });
        assert_eq!(stats.instances, 1);
    }
}
