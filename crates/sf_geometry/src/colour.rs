use core::fmt;

// ---------------------------------------------------------------- // Colour

/// An RGBA colour with 8-bit channels.
///
/// # Examples
///
/// ```
/// use sf_geometry::Colour;
///
/// assert_eq!(Colour::named("red"), Some(Colour::RED));
/// assert_eq!(Colour::RED.alpha, 255);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Colour {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl Colour {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    pub const YELLOW: Self = Self::rgb(255, 255, 0);
    pub const CYAN: Self = Self::rgb(0, 255, 255);
    pub const MAGENTA: Self = Self::rgb(255, 0, 255);
    pub const GREY: Self = Self::rgb(128, 128, 128);

    #[inline]
    pub const fn new(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// A fully opaque colour.
    #[inline]
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self::new(red, green, blue, 255)
    }

    /// Look up a colour by its common name, case-insensitively.
    pub fn named(name: &str) -> Option<Self> {
        let colour = match name.to_ascii_lowercase().as_str() {
            "black" => Self::BLACK,
            "white" => Self::WHITE,
            "red" => Self::RED,
            "green" => Self::GREEN,
            "blue" => Self::BLUE,
            "yellow" => Self::YELLOW,
            "cyan" => Self::CYAN,
            "magenta" => Self::MAGENTA,
            "grey" | "gray" => Self::GREY,
            _ => return None,
        };
        Some(colour)
    }
}

impl Default for Colour {
    #[inline]
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.alpha == 255 {
            write!(f, "#{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
        } else {
            write!(
                f,
                "#{:02X}{:02X}{:02X}{:02X}",
                self.red, self.green, self.blue, self.alpha
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_lookup_ignores_case() {
        assert_eq!(Colour::named("Red"), Some(Colour::RED));
        assert_eq!(Colour::named("GRAY"), Some(Colour::GREY));
        assert_eq!(Colour::named("chartreuse"), None);
    }

    #[test]
    fn display_formats() {
        assert_eq!(Colour::RED.to_string(), "#FF0000");
        assert_eq!(Colour::new(1, 2, 3, 4).to_string(), "#01020304");
    }
}
