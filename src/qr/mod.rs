//! QR codes: payload text, rendering and batch processing.

pub mod batch;
pub mod payload;
pub mod render;

pub use batch::{BatchEntry, BatchItem, TEMPLATE_CSV, batch_file_name, parse_batch_csv, render_batch};
pub use payload::{Contact, QrPayload, WifiNetwork, WifiSecurity};
pub use render::{ArtisticBackground, BackgroundPattern, QrStyle, encode_png, render_qr, render_qr_svg};
