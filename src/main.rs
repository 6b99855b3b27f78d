/**
 * Halftone Screen CLI - command-line interface for screen generation and dithering
 */

mod apply;
mod encode;
mod error;
mod geometry;
mod mask;
mod params;
mod screen;
mod sequence;
mod threshold;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::PathBuf;

use apply::{apply_dithering, save_thresholds_to_png, Color, DitherOptions, ScreenTile};
use encode::{OutputFormat, ScreenOutput};
use params::{DotShape, RoundingPolicy, ScreenParams};
use screen::{generate, generate_thresholds};

/// Halftone screen generation and dithering tools
#[derive(Parser)]
#[command(name = "halftone-screen")]
#[command(version = "0.2.0")]
#[command(about = "Ordered-dither halftone screen tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a halftone screen tile
    Generate {
        /// Output file path
        #[arg(short, long, default_value = "screen.bin")]
        output: PathBuf,

        /// Target screen angle in degrees
        #[arg(short, long, default_value = "0")]
        angle: f64,

        /// Target frequency in lines per inch
        #[arg(short, long, default_value = "75")]
        frequency: f64,

        /// Horizontal device resolution in dpi
        #[arg(long, default_value = "300")]
        hres: f64,

        /// Vertical device resolution in dpi
        #[arg(long, default_value = "300")]
        vres: f64,

        /// Requested gray-level count
        #[arg(short, long, default_value = "256")]
        levels: u16,

        /// Force a supercell of at least this size for extra levels
        #[arg(long, default_value = "1")]
        supercell: u16,

        /// Dot shape: round, ellipse, inverted, rhomboid, line-x, line-y,
        /// diamond, square, redbook
        #[arg(short, long, default_value = "round")]
        shape: String,

        /// Use legacy Holladay cell-area truncation
        #[arg(long)]
        holladay: bool,

        /// Output encoding: TOSArray, ThreshString or Type3
        #[arg(long, default_value = "Type3")]
        format: String,

        /// Also save a grayscale PNG preview of the threshold tile
        #[arg(long)]
        preview: Option<PathBuf>,
    },

    /// Apply halftone dithering to an image
    Dither {
        /// Input image path
        #[arg(short, long)]
        input: PathBuf,

        /// Output image path
        #[arg(short, long)]
        output: PathBuf,

        /// Path to a threshold tile image; when omitted the tile is
        /// generated from --angle/--frequency
        #[arg(short, long)]
        tile: Option<PathBuf>,

        /// Screen angle used when generating the tile
        #[arg(short, long, default_value = "45")]
        angle: f64,

        /// Screen frequency used when generating the tile
        #[arg(long, default_value = "75")]
        frequency: f64,

        /// Dot shape used when generating the tile
        #[arg(short, long, default_value = "round")]
        shape: String,

        /// Foreground color (hex)
        #[arg(short, long, default_value = "#000000")]
        foreground: String,

        /// Background color (hex)
        #[arg(short, long, default_value = "#ffffff")]
        background: String,

        /// Output width in pixels (maintains aspect ratio if height not specified)
        #[arg(short, long)]
        width: Option<u32>,

        /// Output height in pixels (maintains aspect ratio if width not specified)
        #[arg(long)]
        height: Option<u32>,

        /// Contrast adjustment (1.0 = normal, >1 = more contrast, <1 = less)
        #[arg(short, long)]
        contrast: Option<f32>,
    },

    /// Scan a frequency range and report the achievable screens
    Sweep {
        /// Target screen angle in degrees
        #[arg(short, long, default_value = "45")]
        angle: f64,

        /// Lowest frequency to try
        #[arg(long, default_value = "50")]
        from: f64,

        /// Highest frequency to try
        #[arg(long, default_value = "200")]
        to: f64,

        /// Frequency step
        #[arg(long, default_value = "5")]
        step: f64,

        /// Device resolution in dpi (both axes)
        #[arg(short, long, default_value = "300")]
        resolution: f64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            output,
            angle,
            frequency,
            hres,
            vres,
            levels,
            supercell,
            shape,
            holladay,
            format,
            preview,
        } => {
            let params = ScreenParams {
                angle,
                frequency,
                hres,
                vres,
                levels,
                supercell_size: supercell,
                dot_shape: DotShape::from_name(&shape).context("Failed to parse dot shape")?,
                rounding: if holladay {
                    RoundingPolicy::Holladay
                } else {
                    RoundingPolicy::Nearest
                },
                output: format
                    .parse::<OutputFormat>()
                    .context("Failed to parse output format")?,
            };

            println!("Generating {}x{} dpi screen", hres, vres);
            println!("Angle: {} deg, Frequency: {} lpi", angle, frequency);
            println!("Shape: {}, Format: {}", shape, params.output);
            println!("Output: {}", output.display());
            println!();

            if let Some(parent) = output.parent() {
                fs::create_dir_all(parent).context("Failed to create output directory")?;
            }

            let screen = generate(&params).context("Failed to generate screen")?;

            println!(
                "Achieved: {:.4} deg at {:.4} lpi, {}x{} tile, {} levels",
                screen.report.actual_angle,
                screen.report.actual_frequency,
                screen.report.width,
                screen.report.height,
                screen.report.levels,
            );

            match &screen.output {
                ScreenOutput::TosArray(data) => {
                    let text: Vec<String> = data.iter().map(|v| v.to_string()).collect();
                    fs::write(&output, text.join(" "))
                        .context("Failed to write turn-on array")?;
                }
                ScreenOutput::ThreshString(blob) => {
                    fs::write(&output, blob).context("Failed to write threshold blob")?;
                }
                ScreenOutput::Type3(dict) => {
                    fs::write(&output, dict.to_postscript())
                        .context("Failed to write halftone dictionary")?;
                }
            }

            if let Some(path) = preview {
                let thresh =
                    generate_thresholds(&params).context("Failed to generate preview tile")?;
                save_thresholds_to_png(&thresh, &path).context("Failed to save preview")?;
                println!("Preview saved to: {}", path.display());
            }

            println!();
            println!("Done!");
        }

        Commands::Dither {
            input,
            output,
            tile,
            angle,
            frequency,
            shape,
            foreground,
            background,
            width,
            height,
            contrast,
        } => {
            if !input.exists() {
                anyhow::bail!("Input file does not exist: {}", input.display());
            }

            let fg = Color::from_hex(&foreground).context("Failed to parse foreground color")?;
            let bg = Color::from_hex(&background).context("Failed to parse background color")?;

            if let Some(c) = contrast {
                if c <= 0.0 {
                    anyhow::bail!("Contrast must be positive");
                }
            }

            let screen_tile = match &tile {
                Some(path) => {
                    if !path.exists() {
                        anyhow::bail!("Threshold tile does not exist: {}", path.display());
                    }
                    ScreenTile::load(path).context("Failed to load threshold tile")?
                }
                None => {
                    let params = ScreenParams {
                        angle,
                        frequency,
                        dot_shape: DotShape::from_name(&shape)
                            .context("Failed to parse dot shape")?,
                        ..Default::default()
                    };
                    let thresh =
                        generate_thresholds(&params).context("Failed to generate screen")?;
                    ScreenTile::from_thresholds(&thresh)
                }
            };

            println!("Processing: {}", input.display());
            println!("Output: {}", output.display());
            match &tile {
                Some(path) => println!("Tile: {}", path.display()),
                None => println!("Screen: {} deg at {} lpi, {} dots", angle, frequency, shape),
            }
            println!();

            if let Some(parent) = output.parent() {
                fs::create_dir_all(parent).context("Failed to create output directory")?;
            }

            let options = DitherOptions {
                foreground: fg,
                background: bg,
                width,
                height,
                contrast,
            };

            apply_dithering(&input, &output, &screen_tile, options)
                .context("Failed to apply dithering")?;

            println!("Dithered image saved to: {}", output.display());
            println!();
            println!("Done!");
        }

        Commands::Sweep {
            angle,
            from,
            to,
            step,
            resolution,
        } => {
            if from <= 0.0 || to < from || step <= 0.0 {
                anyhow::bail!("Invalid frequency range");
            }

            let count = ((to - from) / step) as u64 + 1;
            let bar = ProgressBar::new(count);
            bar.set_style(
                ProgressStyle::default_bar()
                    .template("{bar:40.cyan/blue} {pos}/{len} {msg}")
                    .context("Failed to build progress style")?,
            );

            println!("  target lpi | actual lpi | actual deg | tile");
            println!("  -----------+------------+------------+---------");

            let mut freq = from;
            while freq <= to {
                let params = ScreenParams {
                    angle,
                    frequency: freq,
                    hres: resolution,
                    vres: resolution,
                    ..Default::default()
                };
                match generate(&params) {
                    Ok(screen) => {
                        bar.println(format!(
                            "  {:>10.1} | {:>10.3} | {:>10.4} | {}x{}",
                            freq,
                            screen.report.actual_frequency,
                            screen.report.actual_angle,
                            screen.report.width,
                            screen.report.height,
                        ));
                    }
                    Err(e) => {
                        bar.println(format!("  {:>10.1} | failed: {}", freq, e));
                    }
                }
                bar.inc(1);
                freq += step;
            }
            bar.finish_and_clear();

            println!();
            println!("Done!");
        }
    }

    Ok(())
}
