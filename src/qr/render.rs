//! QR rasterization, logo overlay and decorative backgrounds.
//!
//! Symbol encoding is done by the `qrcode` crate; this module lays the
//! modules onto an RGBA canvas and composites the extras.

use std::io::Cursor;
use std::str::FromStr;

use image::{ImageFormat, Rgba, RgbaImage, imageops::FilterType};
use palette::Srgb;
use qrcode::QrCode;
use qrcode::render::svg;

use crate::color::{parse_hex, rgb_to_hex};
use crate::error::{Error, Result};

pub const DEFAULT_SIZE: u32 = 300;
/// Quiet zone width, in modules.
pub const DEFAULT_MARGIN: u32 = 2;

/// Logo edge as a fraction of the canvas width.
const LOGO_FRACTION: f32 = 0.2;
/// Light-colored border kept around the logo, in pixels.
const LOGO_PADDING: u32 = 2;
/// Opacity of the code drawn over an artistic background.
const ARTISTIC_QR_OPACITY: f32 = 0.9;

const GEOMETRIC_CELL: u32 = 40;
const DOT_SPACING: u32 = 20;
const DOT_RADIUS: f32 = 3.0;
const WAVE_FREQUENCY: f32 = 0.05;
const WAVE_AMPLITUDE: f32 = 50.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackgroundPattern {
    /// Checkerboard of 40px squares along the diagonals.
    Geometric,
    /// Filled sine wave across the lower half.
    Waves,
    /// Small dots on a 20px grid.
    Dots,
    /// Diagonal fade from the pattern color to white.
    Gradient,
}

impl FromStr for BackgroundPattern {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "geometric" => Ok(BackgroundPattern::Geometric),
            "waves" => Ok(BackgroundPattern::Waves),
            "dots" => Ok(BackgroundPattern::Dots),
            "gradient" => Ok(BackgroundPattern::Gradient),
            _ => Err(Error::UnknownOption {
                kind: "background pattern",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArtisticBackground {
    pub pattern: BackgroundPattern,
    pub color: Srgb<u8>,
}

/// Rendering options for one QR code.
#[derive(Clone, Debug)]
pub struct QrStyle {
    /// Edge length of the square output, in pixels.
    pub size: u32,
    /// Quiet zone, in modules.
    pub margin: u32,
    pub dark: Srgb<u8>,
    pub light: Srgb<u8>,
    /// Centered logo; ignored when an artistic background is set.
    pub logo: Option<RgbaImage>,
    pub artistic: Option<ArtisticBackground>,
}

impl Default for QrStyle {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            margin: DEFAULT_MARGIN,
            dark: Srgb::new(0, 0, 0),
            light: Srgb::new(255, 255, 255),
            logo: None,
            artistic: None,
        }
    }
}

impl QrStyle {
    pub fn new(size: u32) -> Self {
        Self { size, ..Self::default() }
    }

    pub fn with_colors(mut self, dark: &str, light: &str) -> Result<Self> {
        self.dark = parse_hex(dark)?;
        self.light = parse_hex(light)?;
        Ok(self)
    }

    /// Decode and attach a logo from encoded image bytes.
    pub fn with_logo_bytes(mut self, bytes: &[u8]) -> Result<Self> {
        self.logo = Some(image::load_from_memory(bytes)?.to_rgba8());
        Ok(self)
    }

    pub fn with_artistic(mut self, pattern: BackgroundPattern, color: &str) -> Result<Self> {
        self.artistic = Some(ArtisticBackground {
            pattern,
            color: parse_hex(color)?,
        });
        Ok(self)
    }
}

/// Encode `text` and render it with `style`.
pub fn render_qr(text: &str, style: &QrStyle) -> Result<RgbaImage> {
    let code = QrCode::new(text.as_bytes()).map_err(|e| Error::QrEncode(e.to_string()))?;
    let mut canvas = draw_modules(&code, style);

    match (&style.artistic, &style.logo) {
        (Some(bg), _) => canvas = apply_artistic_background(&canvas, bg),
        (None, Some(logo)) => overlay_logo(&mut canvas, logo, style.light),
        (None, None) => {}
    }
    log::debug!(
        "rendered QR ({} modules) at {}px for {} bytes of data",
        code.width(),
        canvas.width(),
        text.len()
    );
    Ok(canvas)
}

/// Encode `text` as an SVG document at least `size` pixels wide.
pub fn render_qr_svg(text: &str, size: u32, dark: Srgb<u8>, light: Srgb<u8>) -> Result<String> {
    let code = QrCode::new(text.as_bytes()).map_err(|e| Error::QrEncode(e.to_string()))?;
    let (dark, light) = (rgb_to_hex(dark), rgb_to_hex(light));
    Ok(code
        .render::<svg::Color>()
        .min_dimensions(size, size)
        .dark_color(svg::Color(&dark))
        .light_color(svg::Color(&light))
        .build())
}

/// PNG-encode a rendered canvas.
pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .map_err(|e| Error::ImageEncode(e.to_string()))?;
    Ok(buf)
}

fn opaque(c: Srgb<u8>) -> Rgba<u8> {
    Rgba([c.red, c.green, c.blue, 255])
}

/// Scale the module grid (plus quiet zone) onto a `size` x `size` canvas.
fn draw_modules(code: &QrCode, style: &QrStyle) -> RgbaImage {
    let modules = code.width() as u32;
    let colors = code.to_colors();
    let total = modules + 2 * style.margin;
    // Never drop modules: a canvas smaller than the grid is enlarged.
    let side = style.size.max(total);

    let (dark, light) = (opaque(style.dark), opaque(style.light));
    let module_at = |p: u32| (u64::from(p) * u64::from(total) / u64::from(side)) as u32;

    RgbaImage::from_fn(side, side, |x, y| {
        let (mx, my) = (module_at(x), module_at(y));
        let inside = (style.margin..style.margin + modules).contains(&mx)
            && (style.margin..style.margin + modules).contains(&my);
        if !inside {
            return light;
        }
        let idx = ((my - style.margin) * modules + (mx - style.margin)) as usize;
        if colors[idx] == qrcode::Color::Dark { dark } else { light }
    })
}

fn overlay_logo(canvas: &mut RgbaImage, logo: &RgbaImage, background: Srgb<u8>) {
    let side = canvas.width();
    let logo_size = ((side as f32 * LOGO_FRACTION).round() as u32).max(1);
    let origin = (side - logo_size) / 2;

    // Clear the logo area plus padding to the background color.
    let start = origin.saturating_sub(LOGO_PADDING);
    let end = (origin + logo_size + LOGO_PADDING).min(side);
    let bg = opaque(background);
    for y in start..end {
        for x in start..end {
            canvas.put_pixel(x, y, bg);
        }
    }

    let scaled = image::imageops::resize(logo, logo_size, logo_size, FilterType::Lanczos3);
    for (x, y, px) in scaled.enumerate_pixels() {
        let dst = canvas.get_pixel_mut(origin + x, origin + y);
        *dst = blend_over(*dst, *px, 1.0);
    }
}

/// Paint the pattern on a transparent layer, then draw the code on top at
/// reduced opacity.
fn apply_artistic_background(qr: &RgbaImage, bg: &ArtisticBackground) -> RgbaImage {
    let (w, h) = qr.dimensions();
    let mut layer = RgbaImage::new(w, h);
    let ink = opaque(bg.color);

    match bg.pattern {
        BackgroundPattern::Geometric => {
            for x in (0..w).step_by(GEOMETRIC_CELL as usize) {
                for y in (0..h).step_by(GEOMETRIC_CELL as usize) {
                    if (x + y) % (GEOMETRIC_CELL * 2) == 0 {
                        fill_rect(&mut layer, x, y, GEOMETRIC_CELL, GEOMETRIC_CELL, ink);
                    }
                }
            }
        }
        BackgroundPattern::Waves => {
            for x in 0..w {
                let crest = h as f32 / 2.0 + (x as f32 * WAVE_FREQUENCY).sin() * WAVE_AMPLITUDE;
                let top = crest.max(0.0).ceil() as u32;
                for y in top.min(h)..h {
                    layer.put_pixel(x, y, ink);
                }
            }
        }
        BackgroundPattern::Dots => {
            for cx in (0..w).step_by(DOT_SPACING as usize) {
                for cy in (0..h).step_by(DOT_SPACING as usize) {
                    fill_disc(&mut layer, cx as f32, cy as f32, DOT_RADIUS, ink);
                }
            }
        }
        BackgroundPattern::Gradient => {
            let (wf, hf) = (w as f32, h as f32);
            let norm = (wf * wf + hf * hf).max(1.0);
            for (x, y, px) in layer.enumerate_pixels_mut() {
                // Projection onto the (0,0) -> (w,h) diagonal.
                let t = ((x as f32 * wf + y as f32 * hf) / norm).clamp(0.0, 1.0);
                let mix = |c: u8| (f32::from(c) + (255.0 - f32::from(c)) * t).round() as u8;
                *px = Rgba([mix(bg.color.red), mix(bg.color.green), mix(bg.color.blue), 255]);
            }
        }
    }

    for (x, y, px) in layer.enumerate_pixels_mut() {
        *px = blend_over(*px, *qr.get_pixel(x, y), ARTISTIC_QR_OPACITY);
    }
    layer
}

fn fill_rect(img: &mut RgbaImage, x0: u32, y0: u32, w: u32, h: u32, color: Rgba<u8>) {
    for y in y0..(y0 + h).min(img.height()) {
        for x in x0..(x0 + w).min(img.width()) {
            img.put_pixel(x, y, color);
        }
    }
}

fn fill_disc(img: &mut RgbaImage, cx: f32, cy: f32, r: f32, color: Rgba<u8>) {
    let x0 = (cx - r).floor().max(0.0) as u32;
    let y0 = (cy - r).floor().max(0.0) as u32;
    let x1 = ((cx + r).ceil() as u32).min(img.width());
    let y1 = ((cy + r).ceil() as u32).min(img.height());
    for y in y0..y1 {
        for x in x0..x1 {
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - cy;
            if dx * dx + dy * dy <= r * r {
                img.put_pixel(x, y, color);
            }
        }
    }
}

/// Source-over compositing with straight alpha; `opacity` scales `src`.
fn blend_over(dst: Rgba<u8>, src: Rgba<u8>, opacity: f32) -> Rgba<u8> {
    let sa = f32::from(src[3]) / 255.0 * opacity;
    let da = f32::from(dst[3]) / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }
    let channel = |i: usize| {
        let c = (f32::from(src[i]) * sa + f32::from(dst[i]) * da * (1.0 - sa)) / out_a;
        c.round().clamp(0.0, 255.0) as u8
    };
    Rgba([channel(0), channel(1), channel(2), (out_a * 255.0).round() as u8])
}
