//! Color studio: palette extraction, color-theory palettes, CSS gradients
//! and QR codes, usable natively or from the browser through wasm-bindgen.

use js_sys::{Array, Object, Reflect, Uint8Array};
use wasm_bindgen::prelude::*;

pub mod color;
pub mod error;
pub mod export;
pub mod extract;
pub mod gradient;
pub mod harmony;
pub mod qr;

pub use color::{Hsl, hex_to_hsl, hsl_to_hex, parse_hex, random_hex, rgb_css, rgb_to_hex};
pub use error::{Error, Result};
pub use export::palette_csv;
pub use extract::{ExtractOptions, Swatch, extract_palette};
pub use gradient::{Gradient, GradientDirection};
pub use harmony::{HarmonyScheme, generate_color_palette, generate_palette};

impl From<Error> for JsValue {
    fn from(e: Error) -> Self {
        JsValue::from_str(&e.to_string())
    }
}

// ------------------------------------------------------------
// Browser bindings
// ------------------------------------------------------------

/// Largest color count accepted from JavaScript.
const MAX_JS_COUNT: usize = 4096;

fn js_count(count: i32) -> Result<usize> {
    usize::try_from(count)
        .ok()
        .filter(|&c| c > 0 && c <= MAX_JS_COUNT)
        .ok_or(Error::InvalidCount(i64::from(count)))
}

fn js_strings(values: &Array, what: &str) -> std::result::Result<Vec<String>, JsValue> {
    values
        .iter()
        .map(|v| {
            v.as_string()
                .ok_or_else(|| JsValue::from_str(&format!("{what} values must be strings")))
        })
        .collect()
}

fn set(obj: &Object, key: &str, value: &JsValue) -> std::result::Result<(), JsValue> {
    Reflect::set(obj, &JsValue::from_str(key), value).map(|_| ())
}

/// Generate a harmony palette. Returns an array of `#rrggbb` strings.
#[wasm_bindgen(js_name = generatePalette)]
pub fn generate_palette_js(method: &str, base_color: &str, count: i32) -> std::result::Result<Array, JsValue> {
    let palette = generate_color_palette(method, base_color, js_count(count)?)?;
    Ok(palette.iter().map(|hex| JsValue::from_str(hex)).collect())
}

/// Extract dominant colors from encoded image bytes.
///
/// Returns an array of `{ hex, rgb, share }` objects, most dominant first.
#[wasm_bindgen(js_name = extractPalette)]
pub fn extract_palette_js(input: Vec<u8>, count: i32) -> std::result::Result<Array, JsValue> {
    let swatches = extract_palette(&input, js_count(count)?, ExtractOptions::default())?;
    let out = Array::new();
    for swatch in swatches {
        let obj = Object::new();
        set(&obj, "hex", &JsValue::from_str(&swatch.hex()))?;
        set(&obj, "rgb", &JsValue::from_str(&swatch.rgb()))?;
        set(&obj, "share", &JsValue::from_f64(f64::from(swatch.share)))?;
        out.push(&obj);
    }
    Ok(out)
}

/// CSV text for a list of hex colors.
#[wasm_bindgen(js_name = exportPaletteCsv)]
pub fn export_palette_csv_js(colors: Array) -> std::result::Result<String, JsValue> {
    let colors = js_strings(&colors, "Palette")?
        .iter()
        .map(|hex| parse_hex(hex))
        .collect::<Result<Vec<_>>>()?;
    Ok(palette_csv(&colors)?)
}

/// The `background: ...;` declaration for the given stops and direction.
#[wasm_bindgen(js_name = gradientCss)]
pub fn gradient_css_js(colors: Array, direction: &str) -> std::result::Result<String, JsValue> {
    let colors = js_strings(&colors, "Gradient")?;
    let direction = direction.parse::<GradientDirection>().unwrap_or_default();
    Ok(Gradient::new(&colors, direction)?.css_declaration())
}

#[wasm_bindgen(js_name = randomColor)]
pub fn random_color_js() -> std::result::Result<String, JsValue> {
    Ok(random_hex()?)
}

#[wasm_bindgen(js_name = contactPayload)]
pub fn contact_payload_js(
    name: String,
    phone: String,
    email: String,
    org: String,
    address: String,
) -> std::result::Result<String, JsValue> {
    let contact = qr::Contact { name, phone, email, org, address };
    Ok(qr::QrPayload::Contact(contact).to_text()?)
}

#[wasm_bindgen(js_name = wifiPayload)]
pub fn wifi_payload_js(
    ssid: String,
    password: String,
    security: &str,
    hidden: bool,
) -> std::result::Result<String, JsValue> {
    let network = qr::WifiNetwork {
        ssid,
        password,
        security: security.parse()?,
        hidden,
    };
    Ok(qr::QrPayload::Wifi(network).to_text()?)
}

/// Render a QR code to PNG bytes.
///
/// `pattern` enables the artistic background (`geometric`, `waves`, `dots`,
/// `gradient`), in which case the logo is not drawn.
#[wasm_bindgen(js_name = qrPng)]
pub fn qr_png_js(
    text: &str,
    size: u32,
    dark: &str,
    light: &str,
    logo: Option<Vec<u8>>,
    pattern: Option<String>,
    pattern_color: Option<String>,
) -> std::result::Result<Uint8Array, JsValue> {
    let mut style = qr::QrStyle::new(size).with_colors(dark, light)?;
    if let Some(bytes) = logo {
        style = style.with_logo_bytes(&bytes)?;
    }
    if let Some(pattern) = pattern {
        let color = pattern_color.as_deref().unwrap_or(dark);
        style = style.with_artistic(pattern.parse()?, color)?;
    }
    let png = qr::encode_png(&qr::render_qr(text, &style)?)?;
    Ok(Uint8Array::from(png.as_slice()))
}

#[wasm_bindgen(js_name = qrSvg)]
pub fn qr_svg_js(text: &str, size: u32, dark: &str, light: &str) -> std::result::Result<String, JsValue> {
    Ok(qr::render_qr_svg(text, size, parse_hex(dark)?, parse_hex(light)?)?)
}

/// Render every row of a batch CSV. Returns `{ name, fileName, png }` objects
/// for the page to package.
#[wasm_bindgen(js_name = batchQr)]
pub fn batch_qr_js(csv: &str, size: u32, color: &str) -> std::result::Result<Array, JsValue> {
    let entries = qr::parse_batch_csv(csv)?;
    let out = Array::new();
    for item in qr::render_batch(&entries, size, color)? {
        let obj = Object::new();
        set(&obj, "name", &JsValue::from_str(&item.name))?;
        set(&obj, "fileName", &JsValue::from_str(&item.file_name))?;
        set(&obj, "png", &Uint8Array::from(item.png.as_slice()))?;
        out.push(&obj);
    }
    Ok(out)
}

#[wasm_bindgen(js_name = batchTemplate)]
pub fn batch_template_js() -> String {
    qr::TEMPLATE_CSV.to_string()
}
