use log::debug;
use orrery_engine::{
    Game, GameConfig, EngineContext, FrameData, FrameScheduler,
    InputEvent, InputQueue, RenderBuffer, Tooltip,
};
use orrery_engine::systems::picking::{pick, pointer_to_ndc};
use orrery_engine::systems::render::build_render_buffer;

/// Generic game runner that wires up the engine loop.
///
/// Browser-free so it can be driven from native tests. The web shell owns
/// one runner and forwards DOM events and animation-frame timestamps to it.
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    input: InputQueue,
    render_buffer: RenderBuffer,
    scheduler: FrameScheduler,
    config: GameConfig,
    viewport: (f32, f32),
    initialized: bool,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        Self {
            ctx: EngineContext::new(&config),
            input: InputQueue::new(),
            render_buffer: RenderBuffer::with_capacity(config.max_instances),
            scheduler: FrameScheduler::new(),
            viewport: (config.viewport_width, config.viewport_height),
            config,
            game,
            initialized: false,
        }
    }

    /// Initialize the game. Call once after construction.
    pub fn init(&mut self) {
        self.game.init(&mut self.ctx);
        self.ctx.propagate();
        build_render_buffer(self.ctx.scene.iter(), &mut self.render_buffer);
        self.initialized = true;
    }

    /// Route an input event. Pointer, resize and pause/resume take effect
    /// immediately; custom events wait for the next frame's update.
    /// Returns the new pause state when the event changed it.
    pub fn push_input(&mut self, event: InputEvent) -> Option<bool> {
        match event {
            InputEvent::PointerMove { x, y } => self.pointer_move(x, y),
            InputEvent::PointerLeave => self.ctx.tooltip = None,
            InputEvent::Resize { width, height } => self.resize(width, height),
            InputEvent::Pause => return self.pause().then_some(true),
            InputEvent::Resume => return self.resume().then_some(false),
            InputEvent::Custom { .. } => self.input.push(event),
        }
        None
    }

    /// Ask for a new frame. True when the caller should actually request
    /// one from the host: not paused and none already pending.
    pub fn request_frame(&mut self) -> bool {
        self.initialized && self.scheduler.request()
    }

    /// Run one animation frame at host timestamp `host_ms`.
    /// Returns false (and changes nothing) when the frame was requested
    /// before a pause.
    pub fn tick(&mut self, host_ms: f64) -> bool {
        if !self.scheduler.begin_frame() || !self.initialized {
            return false;
        }

        self.ctx.clock.advance(host_ms);
        self.game.update(&mut self.ctx, &self.input);
        self.input.clear();

        let now = self.ctx.clock.now_ms();
        self.ctx.camera.step(now);
        self.ctx.propagate();

        build_render_buffer(self.ctx.scene.iter(), &mut self.render_buffer);
        true
    }

    /// Stop the loop. Returns whether the state changed.
    pub fn pause(&mut self) -> bool {
        let changed = self.scheduler.pause();
        if changed {
            debug!("runner: paused at frame {}", self.ctx.clock.frame());
        }
        changed
    }

    /// Allow the loop to run again. Time spent paused is not counted.
    pub fn resume(&mut self) -> bool {
        let changed = self.scheduler.resume();
        if changed {
            self.ctx.clock.suspend();
            debug!("runner: resumed");
        }
        changed
    }

    pub fn is_paused(&self) -> bool {
        self.scheduler.is_paused()
    }

    fn pointer_move(&mut self, x: f32, y: f32) {
        let (width, height) = self.viewport;
        let Some(ndc) = pointer_to_ndc(x, y, width, height) else {
            self.ctx.tooltip = None;
            return;
        };
        let ray = self.ctx.camera.camera.ray_from_ndc(ndc);
        let [dx, dy] = self.config.tooltip_offset;
        self.ctx.tooltip = pick(&self.ctx.scene, &ray).map(|hit| Tooltip {
            text: hit.label.to_string(),
            x: x + dx,
            y: y + dy,
        });
    }

    fn resize(&mut self, width: f32, height: f32) {
        if width <= 0.0 || height <= 0.0 {
            debug!("runner: ignoring degenerate resize {width}x{height}");
            return;
        }
        self.viewport = (width, height);
        self.ctx.camera.camera.resize(width, height);
        debug!("runner: viewport {width}x{height}");
    }

    pub fn viewport(&self) -> (f32, f32) {
        self.viewport
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.ctx.tooltip.as_ref()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn ctx(&self) -> &EngineContext {
        &self.ctx
    }

    /// Everything the renderer needs for the current frame.
    pub fn frame_data(&self) -> FrameData<'_> {
        let c = self.config.clear_color;
        FrameData {
            camera: self.ctx.camera.camera.uniform(),
            instances: &self.render_buffer.instances,
            opaque_split: self.render_buffer.opaque_split,
            stars: self.ctx.stars.points(),
            star_size: self.ctx.stars.size,
            star_color: self.ctx.stars.color,
            lighting: &self.ctx.lights,
            clear_color: [c.r, c.g, c.b],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use orrery_engine::{CameraPose, Color, Entity, EntityId, LocalTransform, MeshComponent};

    /// Spins a labelled sphere around the origin, one step per update.
    /// Custom kind 1 flies the camera to (a, b, c).
    #[derive(Default)]
    struct Spinner {
        pivot: Option<EntityId>,
        updates: u32,
        customs: Vec<u32>,
    }

    impl Game for Spinner {
        fn config(&self) -> GameConfig {
            GameConfig {
                star_count: 8,
                ..GameConfig::default()
            }
        }

        fn init(&mut self, ctx: &mut EngineContext) {
            let pivot_id = ctx.next_id();
            let pivot = ctx.spawn(Entity::new(pivot_id), LocalTransform::new(), None);
            let ball_id = ctx.next_id();
            ctx.spawn(
                Entity::new(ball_id)
                    .with_label("Ball")
                    .with_mesh(MeshComponent::sphere(10.0, Color::WHITE)),
                LocalTransform::new(),
                Some(pivot),
            );
            self.pivot = Some(pivot);
        }

        fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
            self.updates += 1;
            for (kind, a, b, c) in input.custom() {
                self.customs.push(kind);
                if kind == 1 {
                    let now = ctx.now_ms();
                    ctx.camera.fly_to(CameraPose::new(Vec3::new(a, b, c), Vec3::ZERO), now);
                }
            }
            if let Some(local) = self.pivot.and_then(|p| ctx.local_mut(p)) {
                local.rotation.y += 0.01;
            }
        }
    }

    fn runner() -> GameRunner<Spinner> {
        let mut r = GameRunner::new(Spinner::default());
        r.init();
        r
    }

    /// Request and run one frame the way the web shell does.
    fn frame(r: &mut GameRunner<Spinner>, host_ms: f64) -> bool {
        r.request_frame();
        r.tick(host_ms)
    }

    #[test]
    fn tick_without_request_does_nothing() {
        let mut r = runner();
        assert!(!r.tick(16.0));
        assert_eq!(r.game().updates, 0);
    }

    #[test]
    fn one_update_per_frame() {
        let mut r = runner();
        for i in 0..5 {
            assert!(frame(&mut r, i as f64 * 16.0));
        }
        assert_eq!(r.game().updates, 5);
    }

    #[test]
    fn request_is_idempotent_until_frame_runs() {
        let mut r = runner();
        assert!(r.request_frame());
        assert!(!r.request_frame());
        assert!(r.tick(0.0));
        assert!(!r.tick(16.0));
        assert_eq!(r.game().updates, 1);
    }

    #[test]
    fn pending_frame_after_pause_is_skipped() {
        let mut r = runner();
        frame(&mut r, 0.0);
        assert!(r.request_frame());
        assert!(r.pause());
        assert!(!r.tick(16.0));
        assert_eq!(r.game().updates, 1);
        assert!(!r.request_frame());
    }

    #[test]
    fn double_resume_starts_one_loop() {
        let mut r = runner();
        r.push_input(InputEvent::Pause);
        r.push_input(InputEvent::Resume);
        assert!(r.request_frame());
        r.push_input(InputEvent::Resume);
        assert!(!r.request_frame());
        assert!(r.tick(0.0));
        assert_eq!(r.game().updates, 1);
    }

    #[test]
    fn pause_changes_are_reported_once() {
        let mut r = runner();
        assert_eq!(r.push_input(InputEvent::Pause), Some(true));
        assert_eq!(r.push_input(InputEvent::Pause), None);
        assert_eq!(r.push_input(InputEvent::PointerLeave), None);
        assert_eq!(r.push_input(InputEvent::Resume), Some(false));
        assert_eq!(r.push_input(InputEvent::Resume), None);
        assert!(!r.is_paused());
    }

    #[test]
    fn paused_time_is_not_counted() {
        let mut r = runner();
        frame(&mut r, 0.0);
        frame(&mut r, 100.0);
        assert_eq!(r.ctx().now_ms(), 100.0);

        r.pause();
        r.resume();
        frame(&mut r, 60_000.0);
        assert_eq!(r.ctx().now_ms(), 100.0);
        frame(&mut r, 60_016.0);
        assert_eq!(r.ctx().now_ms(), 116.0);
    }

    #[test]
    fn custom_events_reach_update_once() {
        let mut r = runner();
        r.push_input(InputEvent::Custom { kind: 9, a: 0.0, b: 0.0, c: 0.0 });
        frame(&mut r, 0.0);
        frame(&mut r, 16.0);
        assert_eq!(r.game().customs, vec![9]);
    }

    #[test]
    fn camera_transition_runs_on_frame_clock() {
        let mut r = runner();
        frame(&mut r, 0.0);
        r.push_input(InputEvent::Custom { kind: 1, a: 0.0, b: 40.0, c: 20.0 });
        frame(&mut r, 0.0);
        assert!(r.ctx().camera.is_animating());

        frame(&mut r, 500.0);
        let z = r.ctx().camera.camera.position.z;
        assert!((z - 70.0).abs() < 1e-3, "z = {z}");

        // Pausing freezes the transition where it is.
        r.pause();
        r.resume();
        frame(&mut r, 10_000.0);
        assert!((r.ctx().camera.camera.position.z - 70.0).abs() < 1e-3);

        frame(&mut r, 10_500.0);
        assert!(!r.ctx().camera.is_animating());
        assert!((r.ctx().camera.camera.position.z - 20.0).abs() < 1e-3);
    }

    #[test]
    fn hover_shows_and_hides_tooltip() {
        let mut r = runner();
        r.push_input(InputEvent::Resize { width: 800.0, height: 600.0 });

        r.push_input(InputEvent::PointerMove { x: 400.0, y: 300.0 });
        let tip = r.tooltip().cloned().unwrap();
        assert_eq!(tip.text, "Ball");
        assert_eq!((tip.x, tip.y), (412.0, 308.0));

        r.push_input(InputEvent::PointerMove { x: 5.0, y: 5.0 });
        assert!(r.tooltip().is_none());

        r.push_input(InputEvent::PointerMove { x: 400.0, y: 300.0 });
        r.push_input(InputEvent::PointerLeave);
        assert!(r.tooltip().is_none());
    }

    #[test]
    fn picking_works_while_paused() {
        let mut r = runner();
        r.pause();
        r.push_input(InputEvent::PointerMove { x: 400.0, y: 300.0 });
        assert_eq!(r.tooltip().map(|t| t.text.as_str()), Some("Ball"));
    }

    #[test]
    fn resize_updates_camera_aspect() {
        let mut r = runner();
        r.push_input(InputEvent::Resize { width: 1600.0, height: 800.0 });
        assert_eq!(r.viewport(), (1600.0, 800.0));
        assert!((r.ctx().camera.camera.aspect - 2.0).abs() < 1e-6);
        r.push_input(InputEvent::Resize { width: 0.0, height: 800.0 });
        assert_eq!(r.viewport(), (1600.0, 800.0));
    }

    #[test]
    fn frame_data_carries_scene() {
        let mut r = runner();
        frame(&mut r, 0.0);
        let data = r.frame_data();
        assert_eq!(data.instances.len(), 1);
        assert_eq!(data.stars.len(), 8);
        assert_eq!(data.camera.position, [0.0, 40.0, 120.0, 1.0]);
    }
}
