//! Axis-aligned geometry shared by every physical entity.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle expressed in world units.
///
/// `x`/`y` name the upper-left corner; `width`/`height` extend towards
/// increasing coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Horizontal coordinate of the upper-left corner.
    pub x: f32,
    /// Vertical coordinate of the upper-left corner.
    pub y: f32,
    /// Horizontal extent of the rectangle.
    pub width: f32,
    /// Vertical extent of the rectangle.
    pub height: f32,
}

impl Rect {
    /// Creates a rectangle from its upper-left corner and size.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Upper-left corner of the rectangle.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Geometric center of the rectangle.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Right edge coordinate.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge coordinate.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Returns a copy of the rectangle moved to a new upper-left position.
    #[must_use]
    pub const fn with_position(self, position: Vec2) -> Self {
        Self::new(position.x, position.y, self.width, self.height)
    }

    /// Returns a copy of the rectangle moved along the horizontal axis only.
    #[must_use]
    pub const fn with_x(self, x: f32) -> Self {
        Self::new(x, self.y, self.width, self.height)
    }

    /// Returns a copy of the rectangle moved along the vertical axis only.
    #[must_use]
    pub const fn with_y(self, y: f32) -> Self {
        Self::new(self.x, y, self.width, self.height)
    }

    /// Reports whether the projections of both rectangles overlap on both axes.
    ///
    /// Comparisons are strict: rectangles that merely share an edge do not
    /// overlap. The predicate is symmetric for every pair of inputs.
    #[must_use]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }
}

/// Dimensions of the playable world.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Total width of the world.
    pub width: f32,
    /// Total height of the world.
    pub height: f32,
}

impl Bounds {
    /// Creates new world bounds.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Reports whether the rectangle lies entirely inside the world.
    #[must_use]
    pub fn contains(&self, rect: &Rect) -> bool {
        rect.x >= 0.0 && rect.y >= 0.0 && rect.right() <= self.width && rect.bottom() <= self.height
    }
}
