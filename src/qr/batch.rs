//! Batch QR generation from a `Name,URL/Data` CSV.

use palette::Srgb;

use super::render::{DEFAULT_MARGIN, QrStyle, encode_png, render_qr};
use crate::color::parse_hex;
use crate::error::{Error, Result};

/// Starter CSV offered for download.
pub const TEMPLATE_CSV: &str = "Name,URL/Data\n\
Example 1,https://example.com/page1\n\
Example 2,https://example.com/page2\n\
Example 3,https://example.com/page3";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchEntry {
    pub name: String,
    pub data: String,
}

/// A rendered batch entry.
#[derive(Clone, Debug)]
pub struct BatchItem {
    pub name: String,
    pub file_name: String,
    pub png: Vec<u8>,
}

/// Parse the batch CSV.
///
/// The first row is a header. A row is kept when it has exactly as many
/// fields as the header and a non-empty first field; the second field (if
/// any) is the data to encode.
pub fn parse_batch_csv(text: &str) -> Result<Vec<BatchEntry>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());
    let columns = rdr.headers()?.len();

    let mut entries = Vec::new();
    for record in rdr.records() {
        let record = record?;
        if record.len() != columns || record.get(0).is_none_or(str::is_empty) {
            log::debug!("skipping batch row {:?}", record.position().map(|p| p.line()));
            continue;
        }
        entries.push(BatchEntry {
            name: record[0].to_string(),
            data: record.get(1).unwrap_or_default().to_string(),
        });
    }

    if entries.is_empty() {
        return Err(Error::EmptyBatch);
    }
    log::info!("loaded {} QR codes from CSV", entries.len());
    Ok(entries)
}

/// File name for an entry: every character outside `[A-Za-z0-9]` becomes `_`.
pub fn batch_file_name(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{stem}.png")
}

/// Render every entry on white with the given dark color.
///
/// Entries the encoder rejects are logged and left out.
pub fn render_batch(entries: &[BatchEntry], size: u32, dark: &str) -> Result<Vec<BatchItem>> {
    let style = QrStyle {
        size,
        margin: DEFAULT_MARGIN,
        dark: parse_hex(dark)?,
        light: Srgb::new(255, 255, 255),
        ..QrStyle::default()
    };

    let mut items = Vec::with_capacity(entries.len());
    for entry in entries {
        let png = match render_qr(&entry.data, &style).and_then(|img| encode_png(&img)) {
            Ok(png) => png,
            Err(e) => {
                log::warn!("skipping batch entry '{}': {e}", entry.name);
                continue;
            }
        };
        items.push(BatchItem {
            name: entry.name.clone(),
            file_name: batch_file_name(&entry.name),
            png,
        });
    }
    Ok(items)
}
