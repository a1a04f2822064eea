use std::f32::consts::TAU;

use crate::config::SAMPLE_COUNT;

/// A position on the canvas
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_squared(self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn distance(self, other: Point) -> f32 {
        self.distance_squared(other).sqrt()
    }

    /// Point at `radius` from `self` in direction `angle` (radians)
    pub fn offset_polar(self, angle: f32, radius: f32) -> Point {
        let (sin, cos) = angle.sin_cos();
        Point::new(self.x + cos * radius, self.y + sin * radius)
    }
}

/// One expanding, fading ring.
///
/// `center` and `max_radius` are fixed at creation. `radius` only grows, so
/// `opacity` only falls; once it reaches zero the ripple is expired and the
/// store drops it.
#[derive(Clone, Debug, PartialEq)]
pub struct Ripple {
    center: Point,
    pub(crate) radius: f32,
    max_radius: f32,
    pub(crate) opacity: f32,
    pub(crate) boundary_points: Vec<Point>,
}

impl Ripple {
    /// Fresh ripple: zero radius, full opacity, no boundary until the first tick
    pub fn new(center: Point, max_radius: f32) -> Self {
        Self {
            center,
            radius: 0.0,
            max_radius,
            opacity: 1.0,
            boundary_points: Vec::with_capacity(SAMPLE_COUNT),
        }
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn max_radius(&self) -> f32 {
        self.max_radius
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn boundary_points(&self) -> &[Point] {
        &self.boundary_points
    }

    pub fn is_expired(&self) -> bool {
        self.opacity <= 0.0
    }
}

/// `max(0, 1 - (radius / max_radius)^2)`, or 0 for a non-positive `max_radius`
pub fn opacity_at(radius: f32, max_radius: f32) -> f32 {
    if max_radius <= 0.0 || !max_radius.is_finite() {
        return 0.0;
    }
    let t = radius / max_radius;
    if !t.is_finite() {
        return 0.0;
    }
    (1.0 - t * t).clamp(0.0, 1.0)
}

/// Overwrite `out` with `SAMPLE_COUNT` evenly angle-spaced points on a circle
pub fn sample_circle(center: Point, radius: f32, out: &mut Vec<Point>) {
    out.clear();
    out.extend((0..SAMPLE_COUNT).map(|i| {
        let angle = (i as f32 / SAMPLE_COUNT as f32) * TAU;
        center.offset_polar(angle, radius)
    }));
}
