//! RGBA color type, CSS-style parsing, and predefined color constants.

use serde::Serialize;
use std::str::FromStr;

/// Represents an RGBA color with floating-point components.
///
/// All components are in the range 0.0 (minimum) to 1.0 (maximum).
///
/// # Examples
///
/// ```
/// use chart_annotations::draw::Color;
/// let red: Color = "#ff0000".parse().unwrap();
/// let shade: Color = "rgba(0, 0, 0, 0.75)".parse().unwrap();
/// assert_eq!(red, Color::new(1.0, 0.0, 0.0, 1.0));
/// assert_eq!(shade.a, 0.75);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Color {
    /// Red component (0.0 = no red, 1.0 = full red)
    pub r: f64,
    /// Green component (0.0 = no green, 1.0 = full green)
    pub g: f64,
    /// Blue component (0.0 = no blue, 1.0 = full blue)
    pub b: f64,
    /// Alpha/transparency (0.0 = fully transparent, 1.0 = fully opaque)
    pub a: f64,
}

impl Color {
    /// Creates a new color from RGBA components.
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Perceived brightness using the usual luma weights.
    pub fn brightness(&self) -> f64 {
        self.r * 0.299 + self.g * 0.587 + self.b * 0.114
    }

    /// Picks black or white text for legibility on top of this color.
    pub fn contrast(&self) -> Color {
        if self.brightness() > 0.5 { BLACK } else { WHITE }
    }

    /// Parses a color string, logging and falling back to `fallback` on failure.
    pub fn parse_or(value: &str, fallback: Color) -> Color {
        value.parse().unwrap_or_else(|err: ColorParseError| {
            log::warn!("{}, using fallback", err);
            fallback
        })
    }
}

/// Error returned when a color string cannot be understood.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Unrecognized color '{0}'")]
pub struct ColorParseError(pub String);

impl FromStr for Color {
    type Err = ColorParseError;

    /// Accepts `#rgb`, `#rrggbb`, `rgb(r, g, b)`, `rgba(r, g, b, a)`,
    /// `none`/`transparent`, and the named palette colors.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().to_lowercase();
        let err = || ColorParseError(s.to_string());

        if let Some(hex) = value.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(err);
        }

        if let Some(body) = value
            .strip_prefix("rgba(")
            .or_else(|| value.strip_prefix("rgb("))
        {
            let body = body.strip_suffix(')').ok_or_else(err)?;
            let parts: Vec<&str> = body.split(',').map(str::trim).collect();
            if parts.len() != 3 && parts.len() != 4 {
                return Err(err());
            }
            let channel = |part: &str| part.parse::<f64>().map(|v| v.clamp(0.0, 255.0) / 255.0);
            let r = channel(parts[0]).map_err(|_| err())?;
            let g = channel(parts[1]).map_err(|_| err())?;
            let b = channel(parts[2]).map_err(|_| err())?;
            let a = match parts.get(3) {
                Some(alpha) => alpha.parse::<f64>().map_err(|_| err())?.clamp(0.0, 1.0),
                None => 1.0,
            };
            return Ok(Color { r, g, b, a });
        }

        name_to_color(&value).ok_or_else(err)
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    let digits: Vec<u8> = match hex.len() {
        3 => hex
            .chars()
            .map(|c| c.to_digit(16).map(|d| (d * 17) as u8))
            .collect::<Option<Vec<_>>>()?,
        6 => (0..3)
            .map(|i| u8::from_str_radix(hex.get(i * 2..i * 2 + 2)?, 16).ok())
            .collect::<Option<Vec<_>>>()?,
        _ => return None,
    };
    Some(Color {
        r: digits[0] as f64 / 255.0,
        g: digits[1] as f64 / 255.0,
        b: digits[2] as f64 / 255.0,
        a: 1.0,
    })
}

/// Maps color name strings to Color values.
///
/// # Supported Names (case-insensitive)
/// - "red", "green", "blue", "yellow", "orange", "pink", "white", "black"
/// - "none" and "transparent" map to [`TRANSPARENT`]
pub fn name_to_color(name: &str) -> Option<Color> {
    match name.to_lowercase().as_str() {
        "red" => Some(RED),
        "green" => Some(GREEN),
        "blue" => Some(BLUE),
        "yellow" => Some(YELLOW),
        "orange" => Some(ORANGE),
        "pink" => Some(PINK),
        "white" => Some(WHITE),
        "black" => Some(BLACK),
        "none" | "transparent" => Some(TRANSPARENT),
        _ => None,
    }
}

// ============================================================================
// Predefined Color Constants
// ============================================================================

/// Predefined red color (R=1.0, G=0.0, B=0.0)
pub const RED: Color = Color {
    r: 1.0,
    g: 0.0,
    b: 0.0,
    a: 1.0,
};

/// Predefined green color (R=0.0, G=1.0, B=0.0)
pub const GREEN: Color = Color {
    r: 0.0,
    g: 1.0,
    b: 0.0,
    a: 1.0,
};

/// Predefined blue color (R=0.0, G=0.0, B=1.0)
pub const BLUE: Color = Color {
    r: 0.0,
    g: 0.0,
    b: 1.0,
    a: 1.0,
};

/// Predefined yellow color (R=1.0, G=1.0, B=0.0)
pub const YELLOW: Color = Color {
    r: 1.0,
    g: 1.0,
    b: 0.0,
    a: 1.0,
};

/// Predefined orange color (R=1.0, G=0.5, B=0.0)
pub const ORANGE: Color = Color {
    r: 1.0,
    g: 0.5,
    b: 0.0,
    a: 1.0,
};

/// Predefined pink/magenta color (R=1.0, G=0.0, B=1.0)
pub const PINK: Color = Color {
    r: 1.0,
    g: 0.0,
    b: 1.0,
    a: 1.0,
};

/// Predefined white color (R=1.0, G=1.0, B=1.0)
pub const WHITE: Color = Color {
    r: 1.0,
    g: 1.0,
    b: 1.0,
    a: 1.0,
};

/// Predefined black color (R=0.0, G=0.0, B=0.0)
pub const BLACK: Color = Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 1.0,
};

/// Fully transparent color, used for `none` fills and hit trackers
pub const TRANSPARENT: Color = Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 0.0,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_forms() {
        assert_eq!("#fff".parse::<Color>().unwrap(), WHITE);
        assert_eq!("#FF0000".parse::<Color>().unwrap(), RED);
        assert!("#12345".parse::<Color>().is_err());
    }

    #[test]
    fn parses_rgb_and_rgba() {
        let c: Color = "rgba(0, 0, 0, 0.75)".parse().unwrap();
        assert_eq!(c, Color::new(0.0, 0.0, 0.0, 0.75));
        let c: Color = "rgb(255, 255, 0)".parse().unwrap();
        assert_eq!(c, YELLOW);
        assert!("rgb(1, 2)".parse::<Color>().is_err());
    }

    #[test]
    fn parses_names_and_none() {
        assert_eq!("Black".parse::<Color>().unwrap(), BLACK);
        assert_eq!("none".parse::<Color>().unwrap(), TRANSPARENT);
        assert!("chartreuse".parse::<Color>().is_err());
    }

    #[test]
    fn contrast_picks_readable_text() {
        assert_eq!(BLACK.contrast(), WHITE);
        assert_eq!(YELLOW.contrast(), BLACK);
    }

    #[test]
    fn parse_or_falls_back() {
        assert_eq!(Color::parse_or("bogus", RED), RED);
    }
}
