use crate::geometry::{self, GeometryError, Vec2};

/// Straight segment between two consecutive outline points, in the
/// rotated/scaled frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Panel {
    pub index: usize,
    pub start: Vec2,
    pub end: Vec2,
    pub midpoint: Vec2,
    pub length: f64,
    /// Either endpoint lies below the chord in the unrotated outline.
    pub on_bottom: bool,
}

impl Panel {
    pub fn new(index: usize, start: Vec2, end: Vec2, on_bottom: bool) -> Self {
        Panel {
            index,
            start,
            end,
            midpoint: geometry::midpoint(start, end),
            length: geometry::distance(start, end),
            on_bottom,
        }
    }

    pub fn edge(&self) -> Vec2 {
        self.end - self.start
    }

    /// See [`geometry::edge_normal`] for the sign convention.
    pub fn normal(&self, flip_normal: bool) -> Result<Vec2, GeometryError> {
        geometry::edge_normal(self.start, self.end, flip_normal)
    }

    /// Inclination of the panel, radians.
    pub fn angle(&self) -> f64 {
        geometry::angle_between(self.start, self.end)
    }
}

/// Rotation about a pivot followed by a uniform scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelTransform {
    pub origin: Vec2,
    pub angle_deg: f64,
    pub scale: f64,
}

impl Default for PanelTransform {
    fn default() -> Self {
        Self {
            origin: Vec2::zeros(),
            angle_deg: 0.0,
            scale: 1.0,
        }
    }
}

impl PanelTransform {
    pub fn apply(&self, point: Vec2) -> Vec2 {
        geometry::rotate(point, self.origin, self.angle_deg) * self.scale
    }
}

pub fn is_bottom_surface(a: Vec2, b: Vec2) -> bool {
    a.y < 0.0 || b.y < 0.0
}

/// Build the `N - 1` panels joining consecutive points.
///
/// Classification uses the untransformed points so it does not change with
/// angle of attack.
pub fn build_panels(points: &[Vec2], transform: &PanelTransform) -> Vec<Panel> {
    let transformed: Vec<Vec2> = points.iter().map(|p| transform.apply(*p)).collect();

    points
        .windows(2)
        .zip(transformed.windows(2))
        .enumerate()
        .map(|(index, (raw, pts))| {
            Panel::new(index, pts[0], pts[1], is_bottom_surface(raw[0], raw[1]))
        })
        .collect()
}
