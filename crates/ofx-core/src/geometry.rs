#![forbid(unsafe_code)]

//! Geometric primitives.

/// A rectangle for container bounds, HUD layout and hit testing.
///
/// Uses surface coordinates in pixels (0-indexed, origin at top-left).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: u16,
    /// Top edge (inclusive).
    pub y: u16,
    /// Width in pixels.
    pub width: u16,
    /// Height in pixels.
    pub height: u16,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from origin with given size.
    #[inline]
    pub const fn from_size(width: u16, height: u16) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    /// Area in pixels.
    #[inline]
    pub const fn area(&self) -> u32 {
        self.width as u32 * self.height as u32
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check if an integer point is inside the rectangle.
    #[inline]
    pub const fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Check if a sub-pixel point is inside the rectangle.
    #[inline]
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.x as f32
            && x < self.right() as f32
            && y >= self.y as f32
            && y < self.bottom() as f32
    }

    /// Width divided by height, or `None` for an empty rectangle.
    #[inline]
    pub fn aspect_ratio(&self) -> Option<f32> {
        if self.is_empty() {
            None
        } else {
            Some(self.width as f32 / self.height as f32)
        }
    }

    /// Map a point to normalized `[-1, 1]` coordinates across this rectangle.
    ///
    /// `(-1, -1)` is the top-left corner and `(1, 1)` the bottom-right; points
    /// outside the rectangle map outside the range. Returns `None` when the
    /// rectangle is empty.
    #[inline]
    pub fn normalize(&self, x: f32, y: f32) -> Option<(f32, f32)> {
        if self.is_empty() {
            return None;
        }
        let nx = ((x - self.x as f32) / self.width as f32) * 2.0 - 1.0;
        let ny = ((y - self.y as f32) / self.height as f32) * 2.0 - 1.0;
        Some((nx, ny))
    }
}
