use glam::Vec3;
use rand::Rng;

/// Sign of the center offset along (x, y, z) for each of the 8 octants, in child order.
pub const OCTANT_SIGNS: [[f32; 3]; 8] = [
    [-1.0, -1.0, 1.0],
    [-1.0, 1.0, 1.0],
    [-1.0, -1.0, -1.0],
    [-1.0, 1.0, -1.0],
    [1.0, -1.0, 1.0],
    [1.0, 1.0, 1.0],
    [1.0, -1.0, -1.0],
    [1.0, 1.0, -1.0],
];

/// Axis-aligned cuboid described by its center and its full size along each axis.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Region {
    pub center: Vec3,
    pub extent: Vec3,
}

impl Region {
    pub fn new(center: Vec3, extent: Vec3) -> Self {
        Self { center, extent }
    }

    pub fn cube(center: Vec3, size: f32) -> Self {
        Self {
            center,
            extent: Vec3::splat(size),
        }
    }

    pub fn from_min_max(min: Vec3, max: Vec3) -> Self {
        Self {
            center: (min + max) * 0.5,
            extent: max - min,
        }
    }

    pub fn half_extent(&self) -> Vec3 {
        self.extent * 0.5
    }

    pub fn min(&self) -> Vec3 {
        self.center - self.half_extent()
    }

    pub fn max(&self) -> Vec3 {
        self.center + self.half_extent()
    }

    pub fn is_valid(&self) -> bool {
        self.center.is_finite() && self.extent.is_finite() && self.extent.min_element() > 0.0
    }

    // Open interval on every axis: points on a face belong to no region
    pub fn contains(&self, point: Vec3) -> bool {
        let half = self.half_extent();
        point.x > self.center.x - half.x
            && point.x < self.center.x + half.x
            && point.y > self.center.y - half.y
            && point.y < self.center.y + half.y
            && point.z > self.center.z - half.z
            && point.z < self.center.z + half.z
    }

    pub fn overlaps(a: &Region, b: &Region) -> bool {
        let distance = (a.center - b.center).abs();
        let reach = a.half_extent() + b.half_extent();
        distance.x < reach.x && distance.y < reach.y && distance.z < reach.z
    }

    /// The child region for octant `index`: half the extent, center offset by a quarter extent.
    ///
    /// # Panics
    ///
    /// Panics if `index >= 8`.
    pub fn octant(&self, index: usize) -> Region {
        assert!(index < 8, "octant index {} out of range 0..8", index);
        let [sx, sy, sz] = OCTANT_SIGNS[index];
        let extent = self.half_extent();
        let quarter = extent * 0.5;
        Region {
            center: self.center + Vec3::new(sx * quarter.x, sy * quarter.y, sz * quarter.z),
            extent,
        }
    }

    pub fn distance_squared_to_point(&self, point: Vec3) -> f32 {
        let outside = ((point - self.center).abs() - self.half_extent()).max(Vec3::ZERO);
        outside.length_squared()
    }

    pub fn random_point_inside<R: Rng>(&self, rng: &mut R) -> Vec3 {
        let min = self.min();
        let max = self.max();
        Vec3::new(
            Self::safe_randf32(rng, min.x, max.x),
            Self::safe_randf32(rng, min.y, max.y),
            Self::safe_randf32(rng, min.z, max.z),
        )
    }

    fn safe_randf32<R: Rng>(rng: &mut R, min: f32, max: f32) -> f32 {
        if min >= max {
            return min;
        }
        // Half-open range, then nudge off the lower face so the point is strictly inside.
        let value = rng.gen_range(min..max);
        if value > min {
            value
        } else {
            (min + max) * 0.5
        }
    }
}

impl Default for Region {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            extent: Vec3::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn octants_tile_parent() {
        let parent = Region::cube(Vec3::new(1.0, 2.0, 3.0), 8.0);
        let mut volume = 0.0;
        for i in 0..8 {
            let child = parent.octant(i);
            assert_eq!(child.extent, Vec3::splat(4.0));
            assert!(parent.contains(child.center));
            volume += child.extent.x * child.extent.y * child.extent.z;
            for j in (i + 1)..8 {
                assert!(!Region::overlaps(&child, &parent.octant(j)));
            }
        }
        assert_eq!(volume, 512.0);
    }
}
