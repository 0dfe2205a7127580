use bytemuck::{Pod, Zeroable};
use super::rng::Rng;

/// One backdrop star. Wire format: 3 floats.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct StarPoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl StarPoint {
    pub const FLOATS: usize = 3;
}

/// Static point cloud drawn behind everything else.
#[derive(Debug, Clone, Default)]
pub struct StarField {
    points: Vec<StarPoint>,
    /// Point size in pixels.
    pub size: f32,
    pub color: [f32; 3],
}

impl StarField {
    /// `count` stars uniformly spread through an axis-aligned cube of side
    /// `extent` centred on the origin.
    pub fn generate(count: usize, extent: f32, seed: u64) -> Self {
        let mut rng = Rng::new(seed);
        let points = (0..count)
            .map(|_| StarPoint {
                x: rng.next_centered(extent),
                y: rng.next_centered(extent),
                z: rng.next_centered(extent),
            })
            .collect();
        Self {
            points,
            size: 1.0,
            color: [1.0, 1.0, 1.0],
        }
    }

    pub fn points(&self) -> &[StarPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_requested_count_inside_cube() {
        let stars = StarField::generate(2000, 2000.0, 99);
        assert_eq!(stars.len(), 2000);
        for p in stars.points() {
            for v in [p.x, p.y, p.z] {
                assert!((-1000.0..1000.0).contains(&v), "{v}");
            }
        }
    }

    #[test]
    fn same_seed_same_sky() {
        let a = StarField::generate(16, 2000.0, 5);
        let b = StarField::generate(16, 2000.0, 5);
        assert_eq!(a.points(), b.points());
    }

    #[test]
    fn star_point_is_three_floats() {
        assert_eq!(std::mem::size_of::<StarPoint>(), StarPoint::FLOATS * 4);
    }
}
