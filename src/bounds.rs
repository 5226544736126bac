/*
 * Bounds Module
 *
 * The aquarium is an axis aligned box described by its size and the world
 * space point it is centered on. The box can be moved as a whole (for
 * example when the tank sits on top of a table), so every containment
 * query goes through `min()`/`max()` rather than assuming the origin.
 */

use nannou::geom::{vec3, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AquariumBounds {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    pub origin: [f32; 3],
}

// Height of the table top the tank rests on
pub const TABLE_TOP_Y: f32 = 5.0;

impl Default for AquariumBounds {
    fn default() -> Self {
        let height = 30.0;
        Self {
            width: 60.0,
            height,
            depth: 40.0,
            // Floor of the tank sits on the table top
            origin: [0.0, TABLE_TOP_Y + height / 2.0, 0.0],
        }
    }
}

impl AquariumBounds {
    pub fn new(width: f32, height: f32, depth: f32, origin: Vec3) -> Self {
        Self {
            width,
            height,
            depth,
            origin: [origin.x, origin.y, origin.z],
        }
    }

    /// World space center of the tank.
    #[inline(always)]
    pub fn center(&self) -> Vec3 {
        vec3(self.origin[0], self.origin[1], self.origin[2])
    }

    #[inline(always)]
    pub fn half_extents(&self) -> Vec3 {
        vec3(self.width, self.height, self.depth) * 0.5
    }

    /// Lowest corner in world space.
    pub fn min(&self) -> Vec3 {
        self.center() - self.half_extents()
    }

    /// Highest corner in world space.
    pub fn max(&self) -> Vec3 {
        self.center() + self.half_extents()
    }

    /// True when `point` lies inside the box shrunk by `margin` on every side.
    pub fn contains(&self, point: Vec3, margin: f32) -> bool {
        let low = self.min() + Vec3::splat(margin);
        let high = self.max() - Vec3::splat(margin);
        point.x >= low.x
            && point.x <= high.x
            && point.y >= low.y
            && point.y <= high.y
            && point.z >= low.z
            && point.z <= high.z
    }

    /// Uniform random point in the central `fraction` of the box.
    pub fn random_point_scaled<R: Rng + ?Sized>(&self, rng: &mut R, fraction: f32) -> Vec3 {
        let size = vec3(self.width, self.height, self.depth) * fraction;
        self.random_point_in(rng, size)
    }

    /// Uniform random point in the box shrunk by `shrink` units per axis.
    pub fn random_point_shrunk<R: Rng + ?Sized>(&self, rng: &mut R, shrink: f32) -> Vec3 {
        let size = vec3(
            (self.width - shrink).max(0.0),
            (self.height - shrink).max(0.0),
            (self.depth - shrink).max(0.0),
        );
        self.random_point_in(rng, size)
    }

    fn random_point_in<R: Rng + ?Sized>(&self, rng: &mut R, size: Vec3) -> Vec3 {
        let offset = vec3(
            (rng.gen::<f32>() - 0.5) * size.x,
            (rng.gen::<f32>() - 0.5) * size.y,
            (rng.gen::<f32>() - 0.5) * size.z,
        );
        self.center() + offset
    }

    /// Move the whole box so that it is centered on `origin`.
    pub fn reanchor(&mut self, origin: Vec3) {
        self.origin = [origin.x, origin.y, origin.z];
    }
}

impl fmt::Display for AquariumBounds {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let low = self.min();
        let high = self.max();
        write!(
            f,
            "[l: ({}, {}, {}), h: ({}, {}, {})]",
            low.x, low.y, low.z, high.x, high.y, high.z
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn default_tank_rests_on_table() {
        let bounds = AquariumBounds::default();
        assert_eq!(bounds.min().y, TABLE_TOP_Y);
        assert_eq!(bounds.max(), vec3(30.0, 35.0, 20.0));
        assert_eq!(bounds.min(), vec3(-30.0, 5.0, -20.0));
    }

    #[test]
    fn random_points_stay_inside() {
        let bounds = AquariumBounds::default();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let p = bounds.random_point_scaled(&mut rng, 0.8);
            assert!(bounds.contains(p, 2.9));
            let q = bounds.random_point_shrunk(&mut rng, 15.0);
            assert!(bounds.contains(q, 7.5 - 1.0e-3));
        }
    }

    #[test]
    fn reanchor_moves_both_corners() {
        let mut bounds = AquariumBounds::new(10.0, 10.0, 10.0, Vec3::ZERO);
        bounds.reanchor(vec3(100.0, 0.0, 0.0));
        assert_eq!(bounds.min(), vec3(95.0, -5.0, -5.0));
        assert_eq!(bounds.max(), vec3(105.0, 5.0, 5.0));
        assert_eq!(format!("{}", bounds), "[l: (95, -5, -5), h: (105, 5, 5)]");
    }
}
