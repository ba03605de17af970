//! Color-theory palette generation.
//!
//! A palette is derived from a base color by rotating its hue (or, for the
//! monochromatic scheme, stepping its lightness). Saturation is kept from the
//! base color. The output is deterministic for a given input.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::color::{hex_to_hsl, hsl_to_hex};
use crate::error::{Error, Result};

/// Lightness step between monochromatic variants, in percent.
const MONO_STEP: f64 = 15.0;
/// Monochromatic lightness never leaves this range.
const MONO_MIN_L: f64 = 10.0;
const MONO_MAX_L: f64 = 90.0;

/// Hue spacing between neighbouring analogous colors, in degrees.
const ANALOGOUS_STEP: f64 = 30.0;

/// Rule used to relate the palette's hues to the base color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum HarmonyScheme {
    /// Base hue and its opposite, with interpolated hues in between.
    Complementary,
    /// Neighbouring hues centred on the base hue.
    Analogous,
    /// Three hues 120° apart.
    Triadic,
    /// Base hue plus the two neighbours of its complement (±30°).
    SplitComplementary,
    /// Four hues 90° apart.
    Tetradic,
    /// A single hue at varying lightness.
    Monochromatic,
}

impl HarmonyScheme {
    pub const ALL: [HarmonyScheme; 6] = [
        HarmonyScheme::Complementary,
        HarmonyScheme::Analogous,
        HarmonyScheme::Triadic,
        HarmonyScheme::SplitComplementary,
        HarmonyScheme::Tetradic,
        HarmonyScheme::Monochromatic,
    ];

    /// The tag used in forms and on the command line.
    pub fn tag(self) -> &'static str {
        match self {
            HarmonyScheme::Complementary => "complementary",
            HarmonyScheme::Analogous => "analogous",
            HarmonyScheme::Triadic => "triadic",
            HarmonyScheme::SplitComplementary => "split-complementary",
            HarmonyScheme::Tetradic => "tetradic",
            HarmonyScheme::Monochromatic => "monochromatic",
        }
    }

    /// Smallest count for which the scheme produces its full set of anchors.
    pub fn minimum(self) -> usize {
        match self {
            HarmonyScheme::Monochromatic => 1,
            HarmonyScheme::Complementary
            | HarmonyScheme::Analogous
            | HarmonyScheme::SplitComplementary => 2,
            HarmonyScheme::Triadic => 3,
            HarmonyScheme::Tetradic => 4,
        }
    }
}

impl fmt::Display for HarmonyScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for HarmonyScheme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        HarmonyScheme::ALL
            .into_iter()
            .find(|scheme| scheme.tag() == s)
            .ok_or_else(|| Error::UnknownHarmonyScheme(s.to_string()))
    }
}

/// Generate a palette from a scheme tag such as `"split-complementary"`.
pub fn generate_color_palette(method: &str, base_hex: &str, count: usize) -> Result<Vec<String>> {
    generate_palette(method.parse()?, base_hex, count)
}

/// Generate `count` colors related to `base_hex` by `scheme`.
///
/// Each scheme first emits its anchor colors, then extends the sequence up
/// to `count`. The result is truncated to `count`, so a count below
/// [`HarmonyScheme::minimum`] yields only the leading anchors.
pub fn generate_palette(scheme: HarmonyScheme, base_hex: &str, count: usize) -> Result<Vec<String>> {
    if count == 0 {
        return Err(Error::InvalidCount(0));
    }
    let base = hex_to_hsl(base_hex)?;
    let (hue, sat, light) = (base.h, base.s, base.l);
    let n = count as f64;
    let at = |h: f64| hsl_to_hex(h.rem_euclid(360.0), sat, light);

    let mut palette = Vec::new();
    match scheme {
        HarmonyScheme::Complementary => {
            palette.push(at(hue));
            palette.push(at(hue + 180.0));
            // Interpolation runs only when count >= 3, so count - 1 >= 2.
            for i in 2..count {
                let t = (i - 1) as f64 / (n - 1.0);
                palette.push(at(hue + t * 180.0));
            }
        }
        HarmonyScheme::Analogous => {
            let start = hue - (n - 1.0) * (ANALOGOUS_STEP / 2.0);
            for i in 0..count {
                palette.push(at(start + i as f64 * ANALOGOUS_STEP + 360.0));
            }
        }
        HarmonyScheme::Triadic => {
            palette.extend([0.0, 120.0, 240.0].map(|offset| at(hue + offset)));
            // Extra colors step from the base hue, not from the last anchor.
            for i in 3..count {
                palette.push(at(hue + i as f64 * 60.0));
            }
        }
        HarmonyScheme::SplitComplementary => {
            palette.extend([0.0, 150.0, 210.0].map(|offset| at(hue + offset)));
            // Runs only when count >= 4, so count - 2 >= 2.
            for i in 3..count {
                let t = (i - 3) as f64 / (n - 2.0);
                palette.push(at(hue + 150.0 + t * 60.0));
            }
        }
        HarmonyScheme::Tetradic => {
            palette.extend([0.0, 90.0, 180.0, 270.0].map(|offset| at(hue + offset)));
            for i in 4..count {
                palette.push(at(hue + i as f64 * 45.0));
            }
        }
        HarmonyScheme::Monochromatic => {
            let middle = (count / 2) as f64;
            for i in 0..count {
                let l = (light + (i as f64 - middle) * MONO_STEP).clamp(MONO_MIN_L, MONO_MAX_L);
                palette.push(hsl_to_hex(hue, sat, l));
            }
        }
    }

    palette.truncate(count);
    log::debug!("generated {} palette from {base_hex}: {palette:?}", scheme);
    Ok(palette)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hue_of(hex: &str) -> f64 {
        hex_to_hsl(hex).unwrap().h
    }

    fn hue_close(a: f64, b: f64) -> bool {
        let d = (a - b).rem_euclid(360.0);
        d.min(360.0 - d) < 1.5
    }

    #[test]
    fn triadic_red_is_rgb() {
        let p = generate_color_palette("triadic", "#FF0000", 3).unwrap();
        assert_eq!(p, ["#ff0000", "#00ff00", "#0000ff"]);
    }

    #[test]
    fn complementary_blue_is_yellow() {
        let p = generate_color_palette("complementary", "#0000FF", 2).unwrap();
        assert_eq!(p, ["#0000ff", "#ffff00"]);
    }

    #[test]
    fn monochromatic_steps_lightness() {
        let p = generate_color_palette("monochromatic", "#336699", 3).unwrap();
        assert_eq!(p, ["#204060", "#336699", "#538cc6"]);
        for (hex, expected_l) in p.iter().zip([25.0, 40.0, 55.0]) {
            let hsl = hex_to_hsl(hex).unwrap();
            assert!((hsl.l - expected_l).abs() < 0.5, "{hex}: l = {}", hsl.l);
            assert!(hue_close(hsl.h, 210.0), "{hex}: h = {}", hsl.h);
        }
    }

    #[test]
    fn monochromatic_clamps_lightness() {
        // l = 50: variants reach 50 - 4 * 15 = -10 and 50 + 4 * 15 = 110
        let p = generate_palette(HarmonyScheme::Monochromatic, "#ff0000", 9).unwrap();
        let lightness: Vec<f64> = p.iter().map(|h| hex_to_hsl(h).unwrap().l).collect();
        assert!((lightness[0] - 10.0).abs() < 0.5);
        assert!((lightness[1] - 10.0).abs() < 0.5);
        assert!((lightness[7] - 90.0).abs() < 0.5);
        assert!((lightness[8] - 90.0).abs() < 0.5);
        assert_eq!(p[4], "#ff0000");
    }

    #[test]
    fn length_matches_count_from_minimum_up() {
        for scheme in HarmonyScheme::ALL {
            for count in scheme.minimum()..=10 {
                let p = generate_palette(scheme, "#336699", count).unwrap();
                assert_eq!(p.len(), count, "{scheme} with count {count}");
            }
        }
    }

    #[test]
    fn count_below_minimum_keeps_leading_anchors() {
        let p = generate_palette(HarmonyScheme::Tetradic, "#ff0000", 2).unwrap();
        assert_eq!(p, ["#ff0000", "#80ff00"]);
        let p = generate_palette(HarmonyScheme::Complementary, "#0000ff", 1).unwrap();
        assert_eq!(p, ["#0000ff"]);
        let p = generate_palette(HarmonyScheme::SplitComplementary, "#ff0000", 1).unwrap();
        assert_eq!(p, ["#ff0000"]);
    }

    #[test]
    fn minimum_count_yields_anchors_only() {
        let p = generate_palette(HarmonyScheme::Tetradic, "#ff0000", 4).unwrap();
        assert_eq!(p, ["#ff0000", "#80ff00", "#00ffff", "#8000ff"]);

        let p = generate_palette(HarmonyScheme::SplitComplementary, "#ff0000", 2).unwrap();
        assert_eq!(p.len(), 2);
        assert!(hue_close(hue_of(&p[1]), 150.0));
    }

    #[test]
    fn analogous_is_centred_on_base() {
        let p = generate_palette(HarmonyScheme::Analogous, "#ff0000", 3).unwrap();
        let hues: Vec<f64> = p.iter().map(|h| hue_of(h)).collect();
        assert!(hue_close(hues[0], 330.0));
        assert!(hue_close(hues[1], 0.0));
        assert!(hue_close(hues[2], 30.0));
    }

    #[test]
    fn complementary_interpolates_towards_complement() {
        let p = generate_palette(HarmonyScheme::Complementary, "#ff0000", 5).unwrap();
        let hues: Vec<f64> = p.iter().map(|h| hue_of(h)).collect();
        // anchors, then t = 1/4, 2/4, 3/4 of the way to 180°
        for (h, expected) in hues.iter().zip([0.0, 180.0, 45.0, 90.0, 135.0]) {
            assert!(hue_close(*h, expected), "{h} vs {expected}");
        }
    }

    #[test]
    fn split_complementary_interpolates_between_neighbours() {
        let p = generate_palette(HarmonyScheme::SplitComplementary, "#ff0000", 5).unwrap();
        let hues: Vec<f64> = p.iter().map(|h| hue_of(h)).collect();
        for (h, expected) in hues.iter().zip([0.0, 150.0, 210.0, 150.0, 170.0]) {
            assert!(hue_close(*h, expected), "{h} vs {expected}");
        }
    }

    #[test]
    fn triadic_extension_steps_from_base_hue() {
        let p = generate_palette(HarmonyScheme::Triadic, "#ff0000", 5).unwrap();
        assert!(hue_close(hue_of(&p[3]), 180.0));
        assert!(hue_close(hue_of(&p[4]), 240.0));
    }

    #[test]
    fn saturation_and_lightness_are_kept() {
        let base = hex_to_hsl("#336699").unwrap();
        for hex in generate_palette(HarmonyScheme::Tetradic, "#336699", 6).unwrap() {
            let hsl = hex_to_hsl(&hex).unwrap();
            assert!((hsl.l - base.l).abs() < 0.5, "{hex}");
            assert!((hsl.s - base.s).abs() < 1.5, "{hex}");
        }
    }

    #[test]
    fn deterministic() {
        for scheme in HarmonyScheme::ALL {
            let a = generate_palette(scheme, "#a1b2c3", 7).unwrap();
            let b = generate_palette(scheme, "a1b2c3", 7).unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn analogous_wraps_start_hue_below_minus_360() {
        // 26 colors from red start at -375 degrees.
        let p = generate_color_palette("analogous", "#ff0000", 26).unwrap();
        assert_eq!(p.len(), 26);
        assert_eq!(p[0], "#ff0040");
        assert_eq!(p[25], "#ff4000");
        for (i, hex) in p.iter().enumerate() {
            let expected = (-375.0 + i as f64 * 30.0).rem_euclid(360.0);
            let h = hue_of(hex);
            assert!((0.0..360.0).contains(&h), "{hex}: h = {h}");
            assert!(hue_close(h, expected), "{i}: {hex} has hue {h}, expected {expected}");
        }
    }

    #[test]
    fn monochromatic_even_count_centres_on_upper_middle() {
        let p = generate_color_palette("monochromatic", "#336699", 4).unwrap();
        assert_eq!(p, ["#0d1a26", "#204060", "#336699", "#538cc6"]);
        for (hex, expected_l) in p.iter().zip([10.0, 25.0, 40.0, 55.0]) {
            let hsl = hex_to_hsl(hex).unwrap();
            assert!((hsl.l - expected_l).abs() < 0.5, "{hex}: l = {}", hsl.l);
            assert!(hue_close(hsl.h, 210.0), "{hex}: h = {}", hsl.h);
        }
    }

    #[test]
    fn large_counts_are_generated_in_full() {
        for scheme in HarmonyScheme::ALL {
            let p = generate_palette(scheme, "#336699", 1000).unwrap();
            assert_eq!(p.len(), 1000, "{scheme}");
        }
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(
            generate_color_palette("triadic", "#ff0000", 0),
            Err(Error::InvalidCount(0))
        ));
        assert!(matches!(
            generate_color_palette("rainbow", "#ff0000", 3),
            Err(Error::UnknownHarmonyScheme(s)) if s == "rainbow"
        ));
        assert!(matches!(
            generate_color_palette("triadic", "not-a-color", 3),
            Err(Error::InvalidColorFormat(_))
        ));
    }

    #[test]
    fn tags_round_trip() {
        for scheme in HarmonyScheme::ALL {
            assert_eq!(scheme.tag().parse::<HarmonyScheme>().unwrap(), scheme);
        }
    }
}
