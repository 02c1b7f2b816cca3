use glam::{Mat2, Vec2};

/// A rotation angle with its 2x2 matrix kept in sync.
/// The matrix is rebuilt on every change so transforms never pay for a
/// cos/sin per query.
#[derive(Debug, Clone, Copy)]
pub struct Rotation {
    angle: f32,
    matrix: Mat2,
}

impl Rotation {
    pub fn new(angle: f32) -> Self {
        Self {
            angle,
            matrix: Mat2::from_angle(angle),
        }
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Set the absolute angle in radians.
    pub fn set(&mut self, angle: f32) {
        self.angle = angle;
        self.matrix = Mat2::from_angle(angle);
    }

    /// Rotate by a delta in radians.
    pub fn rotate(&mut self, delta: f32) {
        if delta != 0.0 {
            self.set(self.angle + delta);
        }
    }

    /// Transform a point by this rotation.
    pub fn apply(&self, point: Vec2) -> Vec2 {
        self.matrix * point
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// Unit direction vector for an angle in radians.
pub fn angle_to_direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

pub fn point_distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Axis-aligned rectangle given by its corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_size(size: Vec2) -> Self {
        Self {
            min: Vec2::ZERO,
            max: size,
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Grow the rect outward by `margin` on every side.
    pub fn expanded(&self, margin: Vec2) -> Self {
        Self {
            min: self.min - margin,
            max: self.max + margin,
        }
    }
}
