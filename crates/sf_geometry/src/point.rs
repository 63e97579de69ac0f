use core::fmt;
use core::ops::{Add, Sub};

// ---------------------------------------------------------------- // Point

/// A position on the integer pixel grid.
///
/// # Examples
///
/// ```
/// use sf_geometry::Point;
///
/// let p = Point::new(10, 90);
/// assert_eq!(p + Point::new(5, -5), Point::new(15, 85));
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Widen to a real-valued point.
    #[inline]
    pub fn to_real(self) -> RealPoint {
        RealPoint::new(f64::from(self.x), f64::from(self.y))
    }
}

impl Add for Point {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Point {
    #[inline]
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

// ---------------------------------------------------------------- // RealPoint

/// A position with sub-pixel precision.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct RealPoint {
    pub x: f64,
    pub y: f64,
}

impl RealPoint {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Truncate to the integer grid.
    #[inline]
    pub fn to_point(self) -> Point {
        Point::new(self.x as i32, self.y as i32)
    }

    #[inline]
    pub fn distance_to(self, other: Self) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl fmt::Display for RealPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<Point> for RealPoint {
    #[inline]
    fn from(value: Point) -> Self {
        value.to_real()
    }
}

// ---------------------------------------------------------------- // Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_arithmetic() {
        let p = Point::new(3, 4) + Point::new(1, -2);
        assert_eq!(p, Point::new(4, 2));
        assert_eq!(p - Point::new(4, 2), Point::ORIGIN);
    }

    #[test]
    fn real_point_round_trips_through_integer_grid() {
        let p = RealPoint::new(12.0, 7.0);
        assert_eq!(RealPoint::from(p.to_point()), p);
    }

    #[test]
    fn distance() {
        let d = RealPoint::new(0.0, 0.0).distance_to(RealPoint::new(3.0, 4.0));
        assert_eq!(d, 5.0);
    }
}
