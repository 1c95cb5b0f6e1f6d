//! Terrain Queries
//!
//! The combat core only ever asks terrain one question (is there a wall of
//! at least this height between two points?) and issues one mutation (raise
//! a wall). Everything else about arena geometry lives behind this trait so
//! the headless harness can run on a featureless plane while skill tests
//! use real walls.

use glam::Vec3;

/// Arena geometry as seen by the combat core.
pub trait Terrain {
    /// True when a wall of at least `min_height` crosses the straight line
    /// between `a` and `b` (checked in the horizontal plane).
    fn wall_between(&self, a: Vec3, b: Vec3, min_height: f32) -> bool;

    /// Raise a wall segment centered at `center`, extending `length` world
    /// units along the X axis.
    fn raise_wall(&mut self, center: Vec3, length: f32, height: f32);
}

/// A flat arena with no obstructions. Ground-targeted wall skills are
/// swallowed silently.
#[derive(Clone, Copy, Debug, Default)]
pub struct OpenField;

impl Terrain for OpenField {
    fn wall_between(&self, _a: Vec3, _b: Vec3, _min_height: f32) -> bool {
        false
    }

    fn raise_wall(&mut self, _center: Vec3, _length: f32, _height: f32) {}
}

/// A single wall segment in the horizontal plane.
#[derive(Clone, Copy, Debug)]
pub struct WallSegment {
    pub a: Vec3,
    pub b: Vec3,
    pub height: f32,
}

/// An arena whose walls are line segments.
#[derive(Clone, Debug, Default)]
pub struct WallGrid {
    walls: Vec<WallSegment>,
}

impl WallGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_walls(walls: Vec<WallSegment>) -> Self {
        Self { walls }
    }

    pub fn wall_count(&self) -> usize {
        self.walls.len()
    }
}

impl Terrain for WallGrid {
    fn wall_between(&self, a: Vec3, b: Vec3, min_height: f32) -> bool {
        self.walls
            .iter()
            .filter(|w| w.height >= min_height)
            .any(|w| segments_cross_xz(a, b, w.a, w.b))
    }

    fn raise_wall(&mut self, center: Vec3, length: f32, height: f32) {
        let half = Vec3::new(length * 0.5, 0.0, 0.0);
        self.walls.push(WallSegment {
            a: center - half,
            b: center + half,
            height,
        });
    }
}

/// Signed area of the triangle (p, q, r) projected onto the XZ plane.
fn orient_xz(p: Vec3, q: Vec3, r: Vec3) -> f32 {
    (q.x - p.x) * (r.z - p.z) - (q.z - p.z) * (r.x - p.x)
}

/// Proper segment intersection in the XZ plane. Touching endpoints count as
/// crossing; collinear overlap does not (a sightline grazing along a wall
/// face is treated as clear).
fn segments_cross_xz(p1: Vec3, p2: Vec3, q1: Vec3, q2: Vec3) -> bool {
    let d1 = orient_xz(q1, q2, p1);
    let d2 = orient_xz(q1, q2, p2);
    let d3 = orient_xz(p1, p2, q1);
    let d4 = orient_xz(p1, p2, q2);

    d1 * d2 <= 0.0 && d3 * d4 <= 0.0 && (d1 != 0.0 || d2 != 0.0 || d3 != 0.0 || d4 != 0.0)
}
