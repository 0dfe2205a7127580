/// Solar system: a sun, orbiting planets, orbit rings and a starfield.
///
/// Scene graph per planet: orbit pivot (root, spins about Y) -> planet body
/// at `(distance, 0, 0)` (spins about its own Y) -> optional ring.
/// Orbit rings and the sun are roots.

use std::f32::consts::FRAC_PI_2;
use glam::Vec3;
use log::{debug, info, warn};
use orrery_engine::*;

use crate::bodies::{self, PlanetSpec};
use crate::controls::Command;
use crate::orbit::{self, Planet};

/// A planet plus the scene entities that draw it.
pub struct PlanetBody {
    pub planet: Planet,
    pub pivot: EntityId,
    pub body: EntityId,
}

pub struct SolarSystem {
    catalogue: Vec<PlanetSpec>,
    planets: Vec<PlanetBody>,
}

impl SolarSystem {
    /// The built-in eight-planet catalogue.
    pub fn new() -> Self {
        Self::with_catalogue(bodies::default_planets())
    }

    pub fn with_catalogue(catalogue: Vec<PlanetSpec>) -> Self {
        Self {
            catalogue,
            planets: Vec::new(),
        }
    }

    /// Catalogue from JSON, falling back to the built-in planets when it
    /// does not parse or validate.
    pub fn from_catalogue_json(json: &str) -> Self {
        match bodies::from_json(json) {
            Ok(catalogue) => {
                info!("solar-system: using custom catalogue ({} planets)", catalogue.len());
                Self::with_catalogue(catalogue)
            }
            Err(err) => {
                warn!("solar-system: {err}; using the built-in catalogue");
                Self::new()
            }
        }
    }

    pub fn planet_names(&self) -> Vec<String> {
        self.catalogue.iter().map(|p| p.name.clone()).collect()
    }

    fn spawn_planet(ctx: &mut EngineContext, spec: PlanetSpec) -> PlanetBody {
        let pivot_id = ctx.next_id();
        let pivot = ctx.spawn(
            Entity::new(pivot_id).with_tag(format!("{}-orbit", spec.name)),
            LocalTransform::new(),
            None,
        );

        let body_id = ctx.next_id();
        let body = ctx.spawn(
            Entity::new(body_id)
                .with_tag(spec.name.as_str())
                .with_label(spec.name.as_str())
                .with_mesh(MeshComponent::sphere(spec.radius, Color::from_hex(spec.color))),
            LocalTransform::new().with_offset(Vec3::new(spec.distance, 0.0, 0.0)),
            Some(pivot),
        );

        if let Some(ring) = spec.ring {
            let ring_id = ctx.next_id();
            ctx.spawn(
                Entity::new(ring_id)
                    .with_tag(format!("{}-ring", spec.name))
                    .with_mesh(
                        MeshComponent::ring(
                            ring.inner_radius(spec.radius),
                            ring.outer_radius(spec.radius),
                            bodies::RingSpec::SEGMENTS,
                            Color::from_hex(ring.color),
                        )
                        .with_opacity(ring.opacity),
                    ),
                LocalTransform::new().with_rotation(Vec3::new(FRAC_PI_2, 0.0, 0.0)),
                Some(body),
            );
        }

        let orbit_id = ctx.next_id();
        ctx.spawn(
            Entity::new(orbit_id)
                .with_tag(format!("{}-path", spec.name))
                .with_mesh(MeshComponent::ring(
                    spec.distance - bodies::ORBIT_RING_HALF_WIDTH,
                    spec.distance + bodies::ORBIT_RING_HALF_WIDTH,
                    bodies::ORBIT_RING_SEGMENTS,
                    Color::from_hex(bodies::ORBIT_RING_COLOR),
                )),
            LocalTransform::new().with_rotation(Vec3::new(FRAC_PI_2, 0.0, 0.0)),
            None,
        );

        PlanetBody {
            planet: Planet::new(spec),
            pivot,
            body,
        }
    }

    fn apply(&mut self, ctx: &mut EngineContext, command: Command) {
        match command {
            Command::SetSpeed { planet, multiplier } => {
                let Some(entry) = self.planets.get_mut(planet) else {
                    warn!("solar-system: no planet #{planet}");
                    return;
                };
                let previous = entry.planet.speed_multiplier();
                match entry.planet.set_speed_multiplier(multiplier) {
                    Some(applied) if applied != multiplier => {
                        warn!("solar-system: {} speed {multiplier} clamped to {applied}", entry.planet.name());
                    }
                    Some(applied) => debug!("solar-system: {} speed {previous} -> {applied}", entry.planet.name()),
                    None => warn!("solar-system: ignoring speed {multiplier} for {}", entry.planet.name()),
                }
            }
            Command::Focus { planet } => {
                let Some(entry) = self.planets.get(planet) else {
                    warn!("solar-system: no planet #{planet}");
                    return;
                };
                let world = ctx
                    .world_position(entry.body)
                    .unwrap_or_else(|| entry.planet.position());
                let (position, look_at) = orbit::focus_target(world, entry.planet.spec.radius);
                let now = ctx.now_ms();
                ctx.camera.fly_to(CameraPose::new(position, look_at), now);
            }
            Command::ResetView => {
                let now = ctx.now_ms();
                ctx.camera.reset(now);
            }
        }
    }
}

impl Default for SolarSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for SolarSystem {
    fn init(&mut self, ctx: &mut EngineContext) {
        let sun_id = ctx.next_id();
        ctx.spawn(
            Entity::new(sun_id).with_tag("sun").with_mesh(
                MeshComponent::sphere(bodies::SUN_RADIUS, Color::from_hex(bodies::SUN_COLOR))
                    .with_shading(Shading::Basic),
            ),
            LocalTransform::new(),
            None,
        );

        ctx.lights.add(PointLight::new(
            Vec3::ZERO,
            Color::WHITE,
            bodies::SUN_LIGHT_INTENSITY,
            bodies::SUN_LIGHT_RANGE,
        ));

        self.planets = self
            .catalogue
            .iter()
            .cloned()
            .map(|spec| Self::spawn_planet(ctx, spec))
            .collect();

        info!(
            "solar-system: {} planets, {} entities, {} stars",
            self.planets.len(),
            ctx.scene.len(),
            ctx.stars.len()
        );
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        for (kind, a, b, c) in input.custom() {
            match Command::decode(kind, a, b, c) {
                Some(command) => self.apply(ctx, command),
                None => warn!("solar-system: ignoring custom event {kind} ({a}, {b}, {c})"),
            }
        }

        for entry in &mut self.planets {
            entry.planet.advance();
            if let Some(local) = ctx.local_mut(entry.pivot) {
                local.rotation.y = entry.planet.orbit_angle;
            }
            if let Some(local) = ctx.local_mut(entry.body) {
                local.rotation.y = entry.planet.rotation_angle;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::{CUSTOM_FOCUS, CUSTOM_RESET_VIEW, CUSTOM_SET_SPEED};

    fn setup() -> (SolarSystem, EngineContext) {
        let mut game = SolarSystem::new();
        let mut ctx = EngineContext::new(&GameConfig {
            star_count: 4,
            ..GameConfig::default()
        });
        game.init(&mut ctx);
        ctx.propagate();
        (game, ctx)
    }

    fn queue(events: &[(u32, f32, f32, f32)]) -> InputQueue {
        let mut q = InputQueue::new();
        for &(kind, a, b, c) in events {
            q.push(InputEvent::Custom { kind, a, b, c });
        }
        q
    }

    fn step(game: &mut SolarSystem, ctx: &mut EngineContext, input: &InputQueue) {
        game.update(ctx, input);
        ctx.propagate();
    }

    #[test]
    fn init_builds_the_scene() {
        let (game, ctx) = setup();
        // sun + 8 × (pivot, body, orbit path) + Saturn's ring
        assert_eq!(ctx.scene.len(), 1 + 8 * 3 + 1);
        assert_eq!(ctx.lights.count(), 1);
        let names = game.planet_names();
        assert_eq!(names.first().map(String::as_str), Some("Mercury"));
        let sun = ctx.scene.find_by_tag("sun").unwrap();
        assert_eq!(sun.mesh.unwrap().shading, Shading::Basic);
        assert!(sun.label.is_none());

        let earth = ctx.scene.find_by_tag("Earth").unwrap();
        assert_eq!(earth.label.as_deref(), Some("Earth"));
        assert!((earth.world_position() - Vec3::new(30.0, 0.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn orbit_rings_lie_in_the_orbital_plane() {
        let (_, ctx) = setup();
        let path = ctx.scene.find_by_tag("Earth-path").unwrap();
        // Local +Y of the ring maps onto world +Z or -Z: the ring is flat in XZ.
        let y_axis = path.world.transform_vector3(Vec3::Y);
        assert!(y_axis.y.abs() < 1e-5);
        let Some(MeshComponent { shape: Shape::Ring { inner, outer, segments }, .. }) = path.mesh else {
            panic!("expected a ring mesh");
        };
        assert!((inner - 29.95).abs() < 1e-5);
        assert!((outer - 30.05).abs() < 1e-5);
        assert_eq!(segments, 64);
    }

    #[test]
    fn saturn_ring_follows_saturn() {
        let (mut game, mut ctx) = setup();
        for _ in 0..50 {
            step(&mut game, &mut ctx, &InputQueue::new());
        }
        let saturn = ctx.scene.find_by_tag("Saturn").unwrap().world_position();
        let ring = ctx.scene.find_by_tag("Saturn-ring").unwrap();
        assert!((ring.world_position() - saturn).length() < 1e-4);
        assert!(ring.mesh.unwrap().is_transparent());
    }

    #[test]
    fn planets_advance_each_update() {
        let (mut game, mut ctx) = setup();
        for _ in 0..10 {
            step(&mut game, &mut ctx, &InputQueue::new());
        }
        let earth = &game.planets[2].planet;
        assert!((earth.orbit_angle - 0.1).abs() < 1e-5);
        assert!((earth.rotation_angle - 0.2).abs() < 1e-5);

        let expected = earth.position();
        let actual = ctx.scene.find_by_tag("Earth").unwrap().world_position();
        assert!((actual - expected).length() < 1e-3);
    }

    #[test]
    fn set_speed_command_scales_motion() {
        let (mut game, mut ctx) = setup();
        step(&mut game, &mut ctx, &queue(&[(CUSTOM_SET_SPEED, 2.0, 3.0, 0.0)]));
        for _ in 0..9 {
            step(&mut game, &mut ctx, &InputQueue::new());
        }
        let earth = &game.planets[2].planet;
        assert_eq!(earth.speed_multiplier(), 3.0);
        assert!((earth.orbit_angle - 10.0 * 0.01 * 3.0).abs() < 1e-4);
    }

    #[test]
    fn out_of_range_commands_are_harmless() {
        let (mut game, mut ctx) = setup();
        step(
            &mut game,
            &mut ctx,
            &queue(&[
                (CUSTOM_SET_SPEED, 42.0, 2.0, 0.0),
                (CUSTOM_SET_SPEED, 0.0, f32::NAN, 0.0),
                (CUSTOM_SET_SPEED, 1.0, 50.0, 0.0),
                (CUSTOM_FOCUS, 8.0, 0.0, 0.0),
                (77, 0.0, 0.0, 0.0),
            ]),
        );
        let multipliers: Vec<f32> = game.planets.iter().map(|b| b.planet.speed_multiplier()).collect();
        assert_eq!(multipliers[0], 1.0);
        assert_eq!(multipliers[1], 5.0);
        assert!(!ctx.camera.is_animating());
    }

    #[test]
    fn focus_targets_the_planet() {
        let (mut game, mut ctx) = setup();
        step(&mut game, &mut ctx, &queue(&[(CUSTOM_FOCUS, 2.0, 0.0, 0.0)]));
        let CameraState::Animating(transition) = ctx.camera.state().clone() else {
            panic!("expected a transition");
        };
        // Earth was still at its initial position when the command ran.
        assert!((transition.to.look_at - Vec3::new(30.0, 0.0, 0.0)).length() < 1e-4);
        assert!((transition.to.position - Vec3::new(49.0, 19.0, 19.0)).length() < 1e-4);
        assert_eq!(transition.from.position, Vec3::new(0.0, 40.0, 120.0));
    }

    #[test]
    fn reset_view_returns_home() {
        let (mut game, mut ctx) = setup();
        step(&mut game, &mut ctx, &queue(&[(CUSTOM_FOCUS, 0.0, 0.0, 0.0)]));
        ctx.camera.step(2000.0);
        assert!(!ctx.camera.is_animating());

        step(&mut game, &mut ctx, &queue(&[(CUSTOM_RESET_VIEW, 0.0, 0.0, 0.0)]));
        let CameraState::Animating(transition) = ctx.camera.state().clone() else {
            panic!("expected a transition");
        };
        assert_eq!(transition.to, ctx.camera.home());
    }

    #[test]
    fn bad_catalogue_falls_back_to_defaults() {
        let game = SolarSystem::from_catalogue_json("[not json");
        assert_eq!(game.planet_names().len(), 8);

        let custom = SolarSystem::from_catalogue_json(
            r##"[{"name": "Solo", "radius": 2, "distance": 25, "color": "#ffffff",
                 "orbit_speed": 0.01, "rotation_speed": 0.01}]"##,
        );
        assert_eq!(custom.planet_names(), vec!["Solo".to_string()]);
    }
}
