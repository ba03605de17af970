//! Palette export.

use palette::Srgb;

use crate::color::{rgb_css, rgb_to_hex};
use crate::error::{Error, Result};

/// Render a palette as CSV with a `Hex,RGB` header.
///
/// The RGB column holds `rgb(r, g, b)` and is quoted since it contains commas.
pub fn palette_csv(colors: &[Srgb<u8>]) -> Result<String> {
    if colors.is_empty() {
        return Err(Error::EmptyPalette);
    }

    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    wtr.write_record(["Hex", "RGB"])?;
    for &c in colors {
        wtr.write_record([rgb_to_hex(c), rgb_css(c)])?;
    }
    let bytes = wtr.into_inner().map_err(|e| Error::Io(e.into_error()))?;
    // Only ASCII was written.
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_header_and_quoted_rows() {
        let csv = palette_csv(&[Srgb::new(255, 0, 0), Srgb::new(0, 16, 32)]).unwrap();
        assert_eq!(
            csv,
            "Hex,RGB\n#ff0000,\"rgb(255, 0, 0)\"\n#001020,\"rgb(0, 16, 32)\"\n"
        );
    }

    #[test]
    fn reads_back_with_csv_reader() {
        let csv = palette_csv(&[Srgb::new(1, 2, 3)]).unwrap();
        let mut rdr = csv::Reader::from_reader(csv.as_bytes());
        let rows: Vec<csv::StringRecord> = rdr.records().collect::<std::result::Result<_, _>>().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "#010203");
        assert_eq!(&rows[0][1], "rgb(1, 2, 3)");
    }

    #[test]
    fn empty_palette_is_an_error() {
        assert!(matches!(palette_csv(&[]), Err(Error::EmptyPalette)));
    }
}
