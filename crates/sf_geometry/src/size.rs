use core::fmt;

// ---------------------------------------------------------------- // Size

/// A width/height pair in integer pixels.
///
/// # Examples
///
/// ```
/// use sf_geometry::Size;
///
/// let s = Size::new(100, 50);
/// assert_eq!(s.area(), 5000);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    #[inline]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub const fn area(self) -> i64 {
        self.width as i64 * self.height as i64
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl From<(i32, i32)> for Size {
    #[inline]
    fn from((width, height): (i32, i32)) -> Self {
        Self::new(width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sizes() {
        assert!(Size::default().is_empty());
        assert!(Size::new(-1, 10).is_empty());
        assert!(!Size::new(1, 1).is_empty());
    }
}
