use core::fmt;

use crate::{Point, Size};

// ---------------------------------------------------------------- // Rect

/// An axis-aligned rectangle on the integer pixel grid.
///
/// `x`/`y` is the top-left corner; `width`/`height` extend right and down.
///
/// # Examples
///
/// ```
/// use sf_geometry::{Point, Rect};
///
/// let r = Rect::new(10, 10, 30, 20);
/// assert!(r.contains(Point::new(25, 15)));
/// assert!(!r.contains(Point::new(40, 15)));
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub const fn from_point_size(position: Point, size: Size) -> Self {
        Self::new(position.x, position.y, size.width, size.height)
    }

    #[inline]
    pub const fn position(self) -> Point {
        Point::new(self.x, self.y)
    }

    #[inline]
    pub const fn size(self) -> Size {
        Size::new(self.width, self.height)
    }

    #[inline]
    pub const fn right(self) -> i32 {
        self.x + self.width
    }

    #[inline]
    pub const fn bottom(self) -> i32 {
        self.y + self.height
    }

    /// Whether `point` lies inside the rectangle. The right and bottom
    /// edges are exclusive.
    #[inline]
    pub const fn contains(self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Whether `self` and `other` share any area.
    #[inline]
    pub const fn intersects(self, other: Self) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}, {}, {}]",
            self.x, self.y, self.width, self.height
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_are_exclusive() {
        let r = Rect::new(0, 0, 10, 10);
        assert!(r.contains(Point::new(0, 0)));
        assert!(r.contains(Point::new(9, 9)));
        assert!(!r.contains(Point::new(10, 9)));
    }

    #[test]
    fn intersection() {
        let a = Rect::new(0, 0, 10, 10);
        assert!(a.intersects(Rect::new(5, 5, 10, 10)));
        assert!(!a.intersects(Rect::new(10, 0, 5, 5)));
    }

    #[test]
    fn point_size_round_trip() {
        let r = Rect::from_point_size(Point::new(1, 2), Size::new(3, 4));
        assert_eq!(r.position(), Point::new(1, 2));
        assert_eq!(r.size(), Size::new(3, 4));
    }
}
