//! Plane vector helpers used by the panel and simulation code.
//!
//! Everything here is stateless and works on `nalgebra` vectors in the
//! chord-normalized plane (or its scaled/rotated image).

use nalgebra as na;
use std::f64::consts::PI;
use thiserror::Error;

/// 2-D vector in the airfoil plane.
pub type Vec2 = na::Vector2<f64>;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeometryError {
    #[error("cannot normalize a zero-length vector")]
    DivideByZero,
}

pub fn deg_to_rad(degrees: f64) -> f64 {
    PI / 180.0 * degrees
}

pub fn rad_to_deg(radians: f64) -> f64 {
    180.0 / PI * radians
}

/// Scale `v` to unit length.
pub fn normalize(v: Vec2) -> Result<Vec2, GeometryError> {
    let magnitude = v.x.hypot(v.y);
    if magnitude == 0.0 || !magnitude.is_finite() {
        return Err(GeometryError::DivideByZero);
    }
    Ok(Vec2::new(v.x / magnitude, v.y / magnitude))
}

/// Swap the components of `v`, optionally normalizing first and negating
/// the result.
///
/// Applied to [`edge_normal`] this yields the true lateral direction of a
/// panel, which is what the debug overlay draws.
pub fn perpendicular(v: Vec2, flip: bool, normalized: bool) -> Result<Vec2, GeometryError> {
    let swapped = Vec2::new(v.y, v.x);
    let swapped = if normalized { normalize(swapped)? } else { swapped };
    Ok(if flip { -swapped } else { swapped })
}

/// Unit "normal" of the segment `start -> end`.
///
/// This is `normalize(-dx, ±dy)`, a mirror of the edge rather than the
/// textbook perpendicular. Overlays pass the result through
/// [`perpendicular`] to get the outward arrow, so keep the two in step.
pub fn edge_normal(start: Vec2, end: Vec2, flip_normal: bool) -> Result<Vec2, GeometryError> {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let sign = if flip_normal { -1.0 } else { 1.0 };
    normalize(Vec2::new(-dx, dy * sign))
}

pub fn midpoint(a: Vec2, b: Vec2) -> Vec2 {
    Vec2::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

pub fn distance(a: Vec2, b: Vec2) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dx * dx + dy * dy).sqrt()
}

/// Rotate `point` about `origin` by `angle_degrees` (counter-clockwise in a
/// y-up frame).
pub fn rotate(point: Vec2, origin: Vec2, angle_degrees: f64) -> Vec2 {
    let theta = deg_to_rad(angle_degrees);
    let (sin, cos) = theta.sin_cos();
    let local = point - origin;

    Vec2::new(
        local.x * cos - local.y * sin + origin.x,
        local.x * sin + local.y * cos + origin.y,
    )
}

/// Direction of `b` as seen from `a`, in radians.
pub fn angle_between(a: Vec2, b: Vec2) -> f64 {
    f64::atan2(b.y - a.y, b.x - a.x)
}
