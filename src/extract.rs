//! Dominant palette extraction from encoded images.
//!
//! Pixels are clustered with k-means in Lab space; each cluster centroid is
//! one swatch. Fully transparent pixels are ignored.

use std::collections::HashSet;

use image::{DynamicImage, GenericImageView, imageops::FilterType};
use kmeans_colors::{Sort, get_kmeans};
use palette::{IntoColor, Lab, Srgb};
use serde::Serialize;

use crate::color::{rgb_css, rgb_to_hex};
use crate::error::{Error, Result};

const MAX_ITERATIONS: usize = 20;
const CONVERGENCE: f32 = 1e-4;

/// Cluster assignments are stored as `u8`, so more clusters than this alias.
pub const MAX_CLUSTERS: usize = 256;

/// Longest side images are reduced to before clustering, unless overridden.
pub const DEFAULT_DOWNSCALE: u32 = 256;

/// One extracted color and the share of sampled pixels it represents.
///
/// Serializes as `{"hex": "#rrggbb", "rgb": [r, g, b], "share": f32}`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(into = "SwatchReport")]
pub struct Swatch {
    pub color: Srgb<u8>,
    /// Fraction of sampled pixels in this cluster, in (0, 1].
    pub share: f32,
}

impl Swatch {
    pub fn hex(&self) -> String {
        rgb_to_hex(self.color)
    }

    pub fn rgb(&self) -> String {
        rgb_css(self.color)
    }

    pub fn report(&self) -> SwatchReport {
        SwatchReport {
            hex: self.hex(),
            rgb: [self.color.red, self.color.green, self.color.blue],
            share: self.share,
        }
    }
}

/// Serialized view of a [`Swatch`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SwatchReport {
    pub hex: String,
    pub rgb: [u8; 3],
    pub share: f32,
}

impl From<Swatch> for SwatchReport {
    fn from(swatch: Swatch) -> Self {
        swatch.report()
    }
}

/// Options for [`extract_palette`].
#[derive(Clone, Copy, Debug)]
pub struct ExtractOptions {
    /// Downscale so the longest side is at most this many pixels.
    pub downscale: Option<u32>,
    /// k-means seed; the same seed always yields the same palette.
    pub seed: u64,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            downscale: Some(DEFAULT_DOWNSCALE),
            seed: 0,
        }
    }
}

/// Extract up to `count` dominant colors from encoded image bytes.
///
/// Swatches are ordered most dominant first. Fewer than `count` swatches are
/// returned when the image has fewer distinct colors, and never more than
/// [`MAX_CLUSTERS`].
pub fn extract_palette(input: &[u8], count: usize, opts: ExtractOptions) -> Result<Vec<Swatch>> {
    if count == 0 {
        return Err(Error::InvalidCount(0));
    }
    let img = image::load_from_memory(input)?;
    extract_from_image(&img, count, opts)
}

/// Same as [`extract_palette`] for an already decoded image.
pub fn extract_from_image(img: &DynamicImage, count: usize, opts: ExtractOptions) -> Result<Vec<Swatch>> {
    if count == 0 {
        return Err(Error::InvalidCount(0));
    }

    let working = match opts.downscale {
        Some(limit) => downscale(img, limit),
        None => img.to_rgba8(),
    };

    // Collect Lab pixels from opaque areas
    let mut distinct = HashSet::new();
    let mut lab_pixels: Vec<Lab> = Vec::new();
    for px in working.pixels() {
        let [r, g, b, a] = px.0;
        if a == 0 {
            continue;
        }
        distinct.insert([r, g, b]);
        let srgb = Srgb::<u8>::new(r, g, b);
        lab_pixels.push(srgb.into_linear().into_color());
    }
    if lab_pixels.is_empty() {
        return Err(Error::EmptyImage);
    }

    // k-means++ seeding cannot pick more centers than there are distinct colors.
    let k = count.min(distinct.len()).min(MAX_CLUSTERS);
    log::debug!(
        "clustering {} pixels ({} distinct) into {k} colors",
        lab_pixels.len(),
        distinct.len()
    );
    let kmeans = get_kmeans(k, MAX_ITERATIONS, CONVERGENCE, false, &lab_pixels, opts.seed);

    let mut clusters = Lab::sort_indexed_colors(&kmeans.centroids, &kmeans.indices);
    clusters.retain(|c| c.percentage > 0.0);
    clusters.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));

    Ok(clusters
        .into_iter()
        .map(|c| {
            let rgb_f32: Srgb<f32> = Srgb::from_linear(c.centroid.into_color());
            Swatch {
                color: rgb_f32.into_format::<u8>(),
                share: c.percentage,
            }
        })
        .collect())
}

fn downscale(img: &DynamicImage, limit: u32) -> image::RgbaImage {
    let (orig_w, orig_h) = img.dimensions();
    let max_side = orig_w.max(orig_h);
    if limit == 0 || max_side <= limit {
        return img.to_rgba8();
    }
    let ratio = limit as f32 / max_side as f32;
    let w = ((orig_w as f32) * ratio).round().max(1.0) as u32;
    let h = ((orig_h as f32) * ratio).round().max(1.0) as u32;
    image::imageops::resize(img, w, h, FilterType::Nearest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png(img: &RgbaImage) -> Vec<u8> {
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png).unwrap();
        buf
    }

    /// 10x10 image: 7 rows red, 3 rows blue.
    fn red_blue() -> RgbaImage {
        RgbaImage::from_fn(10, 10, |_, y| {
            if y < 7 { Rgba([255, 0, 0, 255]) } else { Rgba([0, 0, 255, 255]) }
        })
    }

    fn near(c: Srgb<u8>, r: u8, g: u8, b: u8) -> bool {
        c.red.abs_diff(r) <= 3 && c.green.abs_diff(g) <= 3 && c.blue.abs_diff(b) <= 3
    }

    #[test]
    fn dominant_color_first() {
        let swatches = extract_palette(&png(&red_blue()), 2, ExtractOptions::default()).unwrap();
        assert_eq!(swatches.len(), 2);
        assert!(near(swatches[0].color, 255, 0, 0), "{:?}", swatches[0]);
        assert!(near(swatches[1].color, 0, 0, 255), "{:?}", swatches[1]);
        assert!((swatches[0].share - 0.7).abs() < 1e-3);
        assert!((swatches[1].share - 0.3).abs() < 1e-3);
    }

    #[test]
    fn count_is_capped_by_distinct_colors() {
        let swatches = extract_palette(&png(&red_blue()), 8, ExtractOptions::default()).unwrap();
        assert_eq!(swatches.len(), 2);
    }

    #[test]
    fn transparent_pixels_are_ignored() {
        let img = RgbaImage::from_fn(4, 4, |x, _| {
            if x == 0 { Rgba([0, 255, 0, 255]) } else { Rgba([255, 0, 0, 0]) }
        });
        let swatches = extract_palette(&png(&img), 3, ExtractOptions::default()).unwrap();
        assert_eq!(swatches.len(), 1);
        assert!(near(swatches[0].color, 0, 255, 0));
    }

    #[test]
    fn fully_transparent_image_fails() {
        let img = RgbaImage::from_pixel(3, 3, Rgba([0, 0, 0, 0]));
        assert!(matches!(
            extract_palette(&png(&img), 3, ExtractOptions::default()),
            Err(Error::EmptyImage)
        ));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(matches!(
            extract_palette(b"definitely not an image", 3, ExtractOptions::default()),
            Err(Error::ImageDecode(_))
        ));
    }

    #[test]
    fn zero_count_fails() {
        assert!(matches!(
            extract_palette(&png(&red_blue()), 0, ExtractOptions::default()),
            Err(Error::InvalidCount(0))
        ));
    }

    #[test]
    fn count_is_capped_at_max_clusters() {
        // 1600 distinct colors
        let img = RgbaImage::from_fn(40, 40, |x, y| {
            Rgba([(x * 6) as u8, (y * 6) as u8, ((x + y) * 3) as u8, 255])
        });
        let opts = ExtractOptions { downscale: None, seed: 7 };
        let swatches = extract_palette(&png(&img), 300, opts).unwrap();
        assert!(!swatches.is_empty());
        assert!(swatches.len() <= MAX_CLUSTERS, "{}", swatches.len());
        let total: f32 = swatches.iter().map(|s| s.share).sum();
        assert!((total - 1.0).abs() < 1e-3, "shares sum to {total}");
        assert!(swatches.iter().all(|s| s.share > 0.0 && s.share <= 1.0));
    }

    #[test]
    fn swatch_serializes_hex_rgb_and_share() {
        let swatch = Swatch {
            color: Srgb::new(0x33, 0x66, 0x99),
            share: 0.5,
        };
        let json = serde_json::to_value(swatch).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "hex": "#336699", "rgb": [51, 102, 153], "share": 0.5 })
        );
    }

    #[test]
    fn downscale_keeps_aspect_ratio() {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(400, 100));
        let small = downscale(&img, 100);
        assert_eq!(small.dimensions(), (100, 25));
        assert_eq!(downscale(&img, 1000).dimensions(), (400, 100));
    }
}
