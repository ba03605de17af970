use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use color_studio_wasm::qr::{self, Contact, QrPayload, QrStyle, WifiNetwork};
use color_studio_wasm::{
    ExtractOptions, Gradient, GradientDirection, HarmonyScheme, extract_palette, generate_palette,
    palette_csv, parse_hex, random_hex,
};

/// Palettes, gradients and QR codes from the command line.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a color-theory palette from a base color
    Generate {
        /// complementary, analogous, triadic, split-complementary, tetradic or monochromatic
        #[arg(short, long, default_value = "complementary")]
        method: String,

        /// Base color as hex (random when omitted)
        #[arg(short, long)]
        base: Option<String>,

        /// Number of colors
        #[arg(short = 'n', long, default_value_t = 5)]
        count: usize,

        /// Print JSON instead of one color per line
        #[arg(long)]
        json: bool,
    },

    /// Extract the dominant colors of an image
    Extract {
        input: PathBuf,

        /// Number of colors
        #[arg(short = 'k', long, default_value_t = 6)]
        count: usize,

        /// Longest side to sample at; 0 samples every pixel
        #[arg(short, long, default_value_t = color_studio_wasm::extract::DEFAULT_DOWNSCALE)]
        downscale: u32,

        /// Also write the palette as CSV
        #[arg(long)]
        csv: Option<PathBuf>,

        #[arg(long)]
        json: bool,
    },

    /// Print the CSS for a gradient
    Gradient {
        /// Color stops as hex
        #[arg(required = true)]
        colors: Vec<String>,

        /// CSS direction (e.g. "to right", "135deg") or "circle"
        #[arg(short, long, default_value = "to right")]
        direction: String,
    },

    /// Render a single QR code
    Qr {
        #[command(flatten)]
        style: QrArgs,

        #[command(subcommand)]
        payload: PayloadArgs,
    },

    /// Render one QR code per CSV row into a directory
    Batch {
        csv: PathBuf,

        #[arg(short, long, default_value_t = qr::render::DEFAULT_SIZE)]
        size: u32,

        /// Foreground color
        #[arg(short, long, default_value = "#000000")]
        color: String,

        #[arg(short = 'd', long, default_value = "qrcodes")]
        out_dir: PathBuf,
    },

    /// Write a starter CSV for `batch`
    Template {
        #[arg(default_value = "qr-template.csv")]
        output: PathBuf,
    },
}

#[derive(Args, Debug)]
struct QrArgs {
    /// Output file; `.svg` writes a vector image, anything else PNG
    #[arg(short, long, default_value = "qrcode.png")]
    output: PathBuf,

    /// Edge length in pixels
    #[arg(short, long, default_value_t = qr::render::DEFAULT_SIZE)]
    size: u32,

    #[arg(long, default_value = "#000000")]
    dark: String,

    #[arg(long, default_value = "#ffffff")]
    light: String,

    /// Image drawn in the middle of the code
    #[arg(long)]
    logo: Option<PathBuf>,

    /// Artistic background: geometric, waves, dots or gradient
    #[arg(long)]
    pattern: Option<String>,

    #[arg(long, default_value = "#667eea")]
    pattern_color: String,
}

#[derive(Subcommand, Debug)]
enum PayloadArgs {
    Url { url: String },
    Text { text: String },
    Contact {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        org: String,
        #[arg(long, default_value = "")]
        address: String,
    },
    Wifi {
        ssid: String,
        #[arg(long, default_value = "")]
        password: String,
        /// WPA, WEP or nopass
        #[arg(long, default_value = "WPA")]
        security: String,
        #[arg(long)]
        hidden: bool,
    },
}

impl PayloadArgs {
    fn into_payload(self) -> Result<QrPayload> {
        Ok(match self {
            PayloadArgs::Url { url } => QrPayload::Url(url),
            PayloadArgs::Text { text } => QrPayload::Text(text),
            PayloadArgs::Contact { name, phone, email, org, address } => {
                QrPayload::Contact(Contact { name, phone, email, org, address })
            }
            PayloadArgs::Wifi { ssid, password, security, hidden } => QrPayload::Wifi(WifiNetwork {
                ssid,
                password,
                security: security.parse()?,
                hidden,
            }),
        })
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Generate { method, base, count, json } => {
            let scheme: HarmonyScheme = method.parse()?;
            let base = match base {
                Some(hex) => hex,
                None => random_hex()?,
            };
            let palette = generate_palette(scheme, &base, count)
                .with_context(|| format!("generating {scheme} palette from {base}"))?;
            if json {
                let out = serde_json::json!({ "method": scheme, "base": base, "colors": palette });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                for hex in palette {
                    println!("{hex}");
                }
            }
        }
        Command::Extract { input, count, downscale, csv, json } => {
            let bytes = fs::read(&input).with_context(|| format!("reading {}", input.display()))?;
            let opts = ExtractOptions {
                downscale: (downscale > 0).then_some(downscale),
                ..ExtractOptions::default()
            };
            let swatches = extract_palette(&bytes, count, opts).context("palette extraction failed")?;

            if let Some(path) = csv {
                let colors: Vec<_> = swatches.iter().map(|s| s.color).collect();
                write_file(&path, palette_csv(&colors)?.as_bytes())?;
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&swatches)?);
            } else {
                for s in &swatches {
                    println!("{}  {}  {:5.1}%", s.hex(), s.rgb(), s.share * 100.0);
                }
            }
        }
        Command::Gradient { colors, direction } => {
            let direction: GradientDirection = direction.parse()?;
            println!("{}", Gradient::new(&colors, direction)?);
        }
        Command::Qr { style, payload } => {
            let text = payload.into_payload()?.to_text()?;
            let is_svg = style
                .output
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));

            if is_svg {
                let svg = qr::render_qr_svg(&text, style.size, parse_hex(&style.dark)?, parse_hex(&style.light)?)?;
                write_file(&style.output, svg.as_bytes())?;
            } else {
                let mut qr_style = QrStyle::new(style.size).with_colors(&style.dark, &style.light)?;
                if let Some(logo) = &style.logo {
                    let bytes = fs::read(logo).with_context(|| format!("reading logo {}", logo.display()))?;
                    qr_style = qr_style.with_logo_bytes(&bytes)?;
                }
                if let Some(pattern) = &style.pattern {
                    qr_style = qr_style.with_artistic(pattern.parse()?, &style.pattern_color)?;
                }
                let img = qr::render_qr(&text, &qr_style).context("QR rendering failed")?;
                write_file(&style.output, &qr::encode_png(&img)?)?;
            }
        }
        Command::Batch { csv, size, color, out_dir } => {
            let text = fs::read_to_string(&csv).with_context(|| format!("reading {}", csv.display()))?;
            let entries = qr::parse_batch_csv(&text)?;
            let items = qr::render_batch(&entries, size, &color)?;
            for item in &items {
                write_file(&out_dir.join(&item.file_name), &item.png)?;
            }
            println!("{} of {} QR codes written", items.len(), entries.len());
        }
        Command::Template { output } => {
            write_file(&output, qr::TEMPLATE_CSV.as_bytes())?;
        }
    }

    Ok(())
}

fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents).with_context(|| format!("writing {}", path.display()))?;
    println!("Saved → {}", path.display());
    Ok(())
}
