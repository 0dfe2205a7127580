/// Planet catalogue: the built-in eight planets plus an optional JSON
/// override read from the host page.
///
/// Sizes and distances are scene units, speeds are radians per frame.
/// Nothing here is to scale.

use serde::{Deserialize, Deserializer};
use thiserror::Error;

// ── Sun ──────────────────────────────────────────────────────────────

pub const SUN_RADIUS: f32 = 10.0;
pub const SUN_COLOR: u32 = 0xffff00;

// ── Orbit rings ──────────────────────────────────────────────────────

/// Half the ring width; the ring spans `distance ± ORBIT_RING_HALF_WIDTH`.
pub const ORBIT_RING_HALF_WIDTH: f32 = 0.05;
pub const ORBIT_RING_SEGMENTS: u32 = 64;
pub const ORBIT_RING_COLOR: u32 = 0x888888;

// ── Lighting ─────────────────────────────────────────────────────────

pub const SUN_LIGHT_INTENSITY: f32 = 2.0;
pub const SUN_LIGHT_RANGE: f32 = 500.0;

pub type CatalogueResult<T> = Result<T, CatalogueError>;

#[derive(Error, Debug)]
pub enum CatalogueError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("catalogue has no planets")]
    Empty,

    #[error("planet #{0} has no name")]
    MissingName(usize),

    #[error("duplicate planet name: {0}")]
    DuplicateName(String),

    #[error("planet {name}: {reason}")]
    InvalidPlanet { name: String, reason: String },

    #[error("bad color {0:?}: expected 0xRRGGBB, #RRGGBB or an integer")]
    BadColor(String),
}

/// Flat ring around a planet (Saturn's, in the default catalogue).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct RingSpec {
    /// Inner radius minus the planet radius.
    pub inner_gap: f32,
    /// Outer radius minus the planet radius.
    pub outer_gap: f32,
    #[serde(deserialize_with = "hex_color")]
    pub color: u32,
    #[serde(default = "default_ring_opacity")]
    pub opacity: f32,
}

fn default_ring_opacity() -> f32 {
    1.0
}

impl RingSpec {
    pub const SEGMENTS: u32 = 64;

    pub fn inner_radius(&self, planet_radius: f32) -> f32 {
        planet_radius + self.inner_gap
    }

    pub fn outer_radius(&self, planet_radius: f32) -> f32 {
        planet_radius + self.outer_gap
    }
}

/// Static description of one planet.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlanetSpec {
    pub name: String,
    pub radius: f32,
    /// Orbit radius around the sun.
    pub distance: f32,
    #[serde(deserialize_with = "hex_color")]
    pub color: u32,
    /// Orbital angular speed, radians per frame at multiplier 1.
    pub orbit_speed: f32,
    /// Self-rotation angular speed, radians per frame at multiplier 1.
    pub rotation_speed: f32,
    #[serde(default)]
    pub ring: Option<RingSpec>,
}

impl PlanetSpec {
    fn new(name: &str, radius: f32, distance: f32, color: u32, orbit_speed: f32, rotation_speed: f32) -> Self {
        Self {
            name: name.to_string(),
            radius,
            distance,
            color,
            orbit_speed,
            rotation_speed,
            ring: None,
        }
    }

    fn with_ring(mut self, ring: RingSpec) -> Self {
        self.ring = Some(ring);
        self
    }
}

pub const SATURN_RING: RingSpec = RingSpec {
    inner_gap: 1.0,
    outer_gap: 3.0,
    color: 0xcccc99,
    opacity: 0.7,
};

/// The eight planets, innermost first.
pub fn default_planets() -> Vec<PlanetSpec> {
    vec![
        PlanetSpec::new("Mercury", 1.0, 16.0, 0xaaaaaa, 0.04, 0.02),
        PlanetSpec::new("Venus", 1.8, 22.0, 0xffcc99, 0.015, 0.018),
        PlanetSpec::new("Earth", 2.0, 30.0, 0x3399ff, 0.01, 0.02),
        PlanetSpec::new("Mars", 1.5, 38.0, 0xff3300, 0.008, 0.018),
        PlanetSpec::new("Jupiter", 4.0, 50.0, 0xffcc66, 0.004, 0.03),
        PlanetSpec::new("Saturn", 3.5, 65.0, 0xffee99, 0.003, 0.028).with_ring(SATURN_RING),
        PlanetSpec::new("Uranus", 2.5, 80.0, 0x66ffff, 0.002, 0.025),
        PlanetSpec::new("Neptune", 2.4, 95.0, 0x3366ff, 0.001, 0.024),
    ]
}

/// Parse `0xRRGGBB`, `#RRGGBB` or a plain integer.
pub fn parse_color(text: &str) -> CatalogueResult<u32> {
    let trimmed = text.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .or_else(|| trimmed.strip_prefix('#'));
    let parsed = match digits {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => trimmed.parse::<u32>().ok(),
    };
    parsed
        .filter(|c| *c <= 0xff_ffff)
        .ok_or_else(|| CatalogueError::BadColor(text.to_string()))
}

fn hex_color<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u32),
        Text(String),
    }
    match Raw::deserialize(deserializer)? {
        Raw::Number(n) if n <= 0xff_ffff => Ok(n),
        Raw::Number(n) => Err(serde::de::Error::custom(CatalogueError::BadColor(n.to_string()))),
        Raw::Text(s) => parse_color(&s).map_err(serde::de::Error::custom),
    }
}

fn invalid(spec: &PlanetSpec, reason: &str) -> CatalogueError {
    CatalogueError::InvalidPlanet {
        name: spec.name.clone(),
        reason: reason.to_string(),
    }
}

/// Check a catalogue for values the scene cannot draw.
pub fn validate(planets: &[PlanetSpec]) -> CatalogueResult<()> {
    if planets.is_empty() {
        return Err(CatalogueError::Empty);
    }
    for (i, spec) in planets.iter().enumerate() {
        if spec.name.trim().is_empty() {
            return Err(CatalogueError::MissingName(i));
        }
        if planets[..i].iter().any(|p| p.name == spec.name) {
            return Err(CatalogueError::DuplicateName(spec.name.clone()));
        }
        if !(spec.radius.is_finite() && spec.radius > 0.0) {
            return Err(invalid(spec, "radius must be positive"));
        }
        if !(spec.distance.is_finite() && spec.distance > SUN_RADIUS) {
            return Err(invalid(spec, "distance must lie outside the sun"));
        }
        if !(spec.orbit_speed.is_finite() && spec.rotation_speed.is_finite()) {
            return Err(invalid(spec, "speeds must be finite"));
        }
        if let Some(ring) = spec.ring {
            let ok = ring.inner_gap.is_finite()
                && ring.outer_gap.is_finite()
                && ring.inner_gap >= 0.0
                && ring.outer_gap > ring.inner_gap
                && (0.0..=1.0).contains(&ring.opacity);
            if !ok {
                return Err(invalid(spec, "ring needs 0 <= inner_gap < outer_gap and opacity in [0, 1]"));
            }
        }
    }
    Ok(())
}

/// Parse and validate a JSON array of planets.
pub fn from_json(json: &str) -> CatalogueResult<Vec<PlanetSpec>> {
    let planets: Vec<PlanetSpec> = serde_json::from_str(json)?;
    validate(&planets)?;
    Ok(planets)
}
