//! Hex, RGB and HSL conversions.
//!
//! Hex colors are always six digits (`#` optional, case-insensitive) and are
//! formatted back as lowercase `#rrggbb`. HSL uses degrees for hue and
//! percentages for saturation and lightness.

use palette::Srgb;

use crate::error::{Error, Result};

/// Hue/saturation/lightness: `h` in [0, 360), `s` and `l` in [0, 100].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

/// Parse a 6-digit hex color, with or without a leading `#`.
pub fn parse_hex(input: &str) -> Result<Srgb<u8>> {
    let hex = input.strip_prefix('#').unwrap_or(input);
    // from_str_radix accepts a leading '+', so check the digits explicitly.
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::invalid_color(input));
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16).map_err(|_| Error::invalid_color(input))
    };
    Ok(Srgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Format a color as lowercase `#rrggbb`.
pub fn rgb_to_hex(c: Srgb<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", c.red, c.green, c.blue)
}

/// Format a color the way CSS writes it: `rgb(r, g, b)`.
pub fn rgb_css(c: Srgb<u8>) -> String {
    format!("rgb({}, {}, {})", c.red, c.green, c.blue)
}

/// Convert a hex color to HSL.
pub fn hex_to_hsl(hex: &str) -> Result<Hsl> {
    Ok(rgb_to_hsl(parse_hex(hex)?))
}

/// Convert an 8-bit sRGB color to HSL.
pub fn rgb_to_hsl(c: Srgb<u8>) -> Hsl {
    let r = f64::from(c.red) / 255.0;
    let g = f64::from(c.green) / 255.0;
    let b = f64::from(c.blue) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    // Achromatic.
    if max == min {
        return Hsl { h: 0.0, s: 0.0, l: l * 100.0 };
    }

    let d = max - min;
    let s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };
    let sixths = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    Hsl {
        h: (sixths / 6.0 * 360.0).rem_euclid(360.0),
        s: s * 100.0,
        l: l * 100.0,
    }
}

/// Convert HSL back to a hex color.
///
/// Hue may lie outside [0, 360); it wraps. Channels round half-up.
pub fn hsl_to_hex(h: f64, s: f64, l: f64) -> String {
    rgb_to_hex(hsl_to_rgb(h, s, l))
}

/// Convert HSL to an 8-bit sRGB color.
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> Srgb<u8> {
    let s = s / 100.0;
    let l = l / 100.0;
    let a = s * l.min(1.0 - l);
    let channel = |n: f64| -> u8 {
        let k = (n + h / 30.0).rem_euclid(12.0);
        let v = l - a * (k - 3.0).min(9.0 - k).clamp(-1.0, 1.0);
        (255.0 * v + 0.5).floor().clamp(0.0, 255.0) as u8
    };
    Srgb::new(channel(0.0), channel(8.0), channel(4.0))
}

/// A uniformly random `#rrggbb` color drawn from the system random source.
pub fn random_hex() -> Result<String> {
    let mut bytes = [0u8; 3];
    getrandom::fill(&mut bytes).map_err(|e| Error::Random(e.to_string()))?;
    Ok(rgb_to_hex(Srgb::new(bytes[0], bytes[1], bytes[2])))
}
