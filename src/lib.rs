//! Halftone Screen Library
//!
//! A Rust implementation of rational ordered-dither halftone screen
//! generation: given a target angle, frequency and device resolution, it
//! solves for the closest representable screen lattice, grows a turn-on
//! sequence for the requested dot shape, and emits a threshold tile ready
//! for ordered dithering.
//!
//! # Features
//!
//! - Rational lattice solver with deterministic tie-breaking
//! - Nine built-in dot shapes, from classic round dots to line screens
//! - Supercell replication for extra gray levels at a fixed geometry
//! - Three output encodings: turn-on arrays, raw threshold blobs, and
//!   HalftoneType 3 dictionaries
//! - Ordered dithering of images against any generated tile
//!
//! # Quick Start
//!
//! ## Generating a Screen
//!
//! ```no_run
//! use halftone_screen::{generate, ScreenParams};
//!
//! let params = ScreenParams {
//!     angle: 45.0,
//!     frequency: 75.0,
//!     ..Default::default()
//! };
//!
//! let screen = generate(&params).unwrap();
//! println!(
//!     "achieved {:.2} deg at {:.2} lpi",
//!     screen.report.actual_angle, screen.report.actual_frequency
//! );
//! ```
//!
//! ## Dithering Images
//!
//! ```no_run
//! use halftone_screen::{
//!     apply_dithering, generate_thresholds, DitherOptions, ScreenParams, ScreenTile,
//! };
//!
//! let thresh = generate_thresholds(&ScreenParams::default()).unwrap();
//! let tile = ScreenTile::from_thresholds(&thresh);
//! apply_dithering("input.jpg", "output.png", &tile, DitherOptions::default()).unwrap();
//! ```
//!
//! # Pipeline
//!
//! Screen generation runs in 5 stages:
//!
//! 1. **Solve**: search small integer lattice vectors for the best
//!    rational approximation of the requested angle and frequency
//! 2. **Mask**: reduce the lattice to its Holladay brick tile
//! 3. **Grow**: order the tile's cells into a connected turn-on sequence
//!    shaped by the dot metric
//! 4. **Replicate**: expand to a supercell when more levels are forced
//! 5. **Synthesize**: sweep the sequence into threshold bytes and encode
//!
//! Every stage is deterministic; identical parameters produce identical
//! output on every platform.

#![doc(html_root_url = "https://docs.rs/halftone-screen/0.2.0")]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

/// Image dithering module
pub mod apply;
/// Output encoding module
pub mod encode;
/// Error types
pub mod error;
/// Rational lattice solver
pub mod geometry;
/// Holladay brick tile construction
pub mod mask;
/// Screen parameters
pub mod params;
/// Generation pipeline
pub mod screen;
/// Turn-on sequence growth
pub mod sequence;
/// Threshold synthesis
pub mod threshold;

// Re-export main types for convenience
pub use apply::{
    apply_dithering, ordered_dither, save_thresholds_to_png, Color, DitherError, DitherOptions,
    ScreenTile,
};
pub use encode::{decode_thresh_string, decode_tos, OutputFormat, ScreenOutput, Type3Halftone};
pub use error::ScreenError;
pub use geometry::{solve, LatticeBasis};
pub use mask::DotMask;
pub use params::{DotShape, RoundingPolicy, ScreenParams, Value};
pub use screen::{
    generate, generate_thresholds, generate_with_transfer, GeneratedScreen, ScreenReport,
};
pub use sequence::TurnOnSequence;
pub use threshold::ThresholdArray;
