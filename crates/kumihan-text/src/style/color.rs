//! Color values and parsing
//!
//! [§ 8.3.7 \<color\>](https://www.w3.org/TR/ttml2/#style-value-color)

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An sRGB color with straight alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// "the red color channel" (0-255)
    pub r: u8,
    /// "the green color channel" (0-255)
    pub g: u8,
    /// "the blue color channel" (0-255)
    pub b: u8,
    /// "the alpha channel" (0-255, 255 = fully opaque)
    pub a: u8,
}

impl Color {
    /// Black (#000000)
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// White (#ffffff)
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Yellow (#ffff00), the subtitle default.
    pub const YELLOW: Self = Self::rgb(255, 255, 0);

    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self { r: 0, g: 0, b: 0, a: 0 };

    /// An opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// [§ 8.3.7](https://www.w3.org/TR/ttml2/#style-value-color)
    ///
    /// "#" followed by 3, 4, 6 or 8 hexadecimal digits. Short forms are
    /// expanded by replicating digits.
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let short = |i: usize| u8::from_str_radix(&hex[i..=i].repeat(2), 16).ok();
        let long = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            3 => Some(Self::rgb(short(0)?, short(1)?, short(2)?)),
            4 => Some(Self {
                r: short(0)?,
                g: short(1)?,
                b: short(2)?,
                a: short(3)?,
            }),
            6 => Some(Self::rgb(long(0)?, long(2)?, long(4)?)),
            8 => Some(Self {
                r: long(0)?,
                g: long(2)?,
                b: long(4)?,
                a: long(6)?,
            }),
            _ => None,
        }
    }

    /// [§ 8.3.16 \<named-color\>](https://www.w3.org/TR/ttml2/#style-value-named-color)
    #[must_use]
    pub fn from_named(name: &str) -> Option<Self> {
        let color = match name.to_ascii_lowercase().as_str() {
            "transparent" => Self::TRANSPARENT,
            "black" => Self::BLACK,
            "silver" => Self::rgb(192, 192, 192),
            "gray" | "grey" => Self::rgb(128, 128, 128),
            "white" => Self::WHITE,
            "maroon" => Self::rgb(128, 0, 0),
            "red" => Self::rgb(255, 0, 0),
            "purple" => Self::rgb(128, 0, 128),
            "fuchsia" | "magenta" => Self::rgb(255, 0, 255),
            "green" => Self::rgb(0, 128, 0),
            "lime" => Self::rgb(0, 255, 0),
            "olive" => Self::rgb(128, 128, 0),
            "yellow" => Self::YELLOW,
            "navy" => Self::rgb(0, 0, 128),
            "blue" => Self::rgb(0, 0, 255),
            "teal" => Self::rgb(0, 128, 128),
            "aqua" | "cyan" => Self::rgb(0, 255, 255),
            _ => return None,
        };
        Some(color)
    }

    /// `rgb(r, g, b)` or `rgba(r, g, b, a)` with every component an
    /// integer in 0-255. Out of range components are clamped.
    #[must_use]
    pub fn from_function(value: &str) -> Option<Self> {
        let value = value.trim();
        let open = value.find('(')?;
        let args = value.strip_suffix(')')?.get(open + 1..)?;
        let name = value[..open].trim().to_ascii_lowercase();
        let components: Vec<u8> = args
            .split(',')
            .map(|c| c.trim().parse::<i64>().ok().and_then(|v| u8::try_from(v.clamp(0, 255)).ok()))
            .collect::<Option<_>>()?;
        match (name.as_str(), components.as_slice()) {
            ("rgb", &[r, g, b]) => Some(Self::rgb(r, g, b)),
            ("rgba", &[r, g, b, a]) => Some(Self { r, g, b, a }),
            _ => None,
        }
    }

    /// True when fully transparent.
    #[must_use]
    pub const fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// Convert to hex string notation (#RRGGBB or #RRGGBBAA if alpha != 255)
    #[must_use]
    pub fn to_hex_string(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::YELLOW
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex_string())
    }
}

/// Error returned when a string is not a color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseColorError(pub String);

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid color '{}'", self.0)
    }
}

impl std::error::Error for ParseColorError {}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let color = if s.starts_with('#') {
            Self::from_hex(s)
        } else if s.contains('(') {
            Self::from_function(s)
        } else {
            Self::from_named(s)
        };
        color.ok_or_else(|| ParseColorError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_forms() {
        assert_eq!(Color::from_hex("#f00"), Some(Color::rgb(255, 0, 0)));
        assert_eq!(Color::from_hex("#f008").map(|c| c.a), Some(0x88));
        assert_eq!(Color::from_hex("#102030"), Some(Color::rgb(16, 32, 48)));
        assert_eq!(Color::from_hex("#10203040").map(|c| c.a), Some(0x40));
        assert_eq!(Color::from_hex("#12345"), None);
        assert_eq!(Color::from_hex("#ggg"), None);
    }

    #[test]
    fn test_functions() {
        assert_eq!(Color::from_function("rgb(1, 2, 3)"), Some(Color::rgb(1, 2, 3)));
        assert_eq!(
            Color::from_function("rgba(1,2,3,300)"),
            Some(Color { r: 1, g: 2, b: 3, a: 255 })
        );
        assert_eq!(Color::from_function("rgb(1,2)"), None);
        assert_eq!(Color::from_function("hsl(1,2,3)"), None);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("Red".parse::<Color>(), Ok(Color::rgb(255, 0, 0)));
        assert_eq!(" transparent ".parse::<Color>(), Ok(Color::TRANSPARENT));
        assert!("chartreuse".parse::<Color>().is_err());
        assert_eq!(Color::YELLOW.to_string(), "#ffff00");
        assert_eq!(Color::TRANSPARENT.to_string(), "#00000000");
    }
}
