/**
 * Screen Generation Pipeline
 *
 * Runs the full chain for one parameter set:
 *
 *   params -> lattice basis -> dot mask -> turn-on sequence
 *          -> supercell replication -> thresholds -> encoded output
 *
 * The pipeline is pure and deterministic: the same parameters always
 * produce the identical encoded screen, byte for byte. The report carries
 * the achieved angle and frequency so callers can surface how far the
 * rational approximation landed from the request.
 */

use crate::encode::{OutputFormat, ScreenOutput};
use crate::error::Result;
use crate::geometry::{expansion_factor, solve};
use crate::mask::DotMask;
use crate::params::ScreenParams;
use crate::sequence::TurnOnSequence;
use crate::threshold::ThresholdArray;

/// Achieved geometry of a generated screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenReport {
    /// Tile width in device pixels
    pub width: u32,
    /// Tile height in device pixels
    pub height: u32,
    /// Achieved screen angle in degrees
    pub actual_angle: f64,
    /// Achieved density frequency in lines per inch
    pub actual_frequency: f64,
    /// Distinct gray levels the tile can render
    pub levels: usize,
}

/// A fully generated screen: encoded output plus the achieved geometry
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedScreen {
    /// The encoded screen in the requested format
    pub output: ScreenOutput,
    /// Achieved geometry
    pub report: ScreenReport,
}

/// Run the whole pipeline for one parameter set
pub fn generate(params: &ScreenParams) -> Result<GeneratedScreen> {
    generate_with_transfer(params, None)
}

/// Like [`generate`], with an optional gray-response transfer curve
/// applied to every threshold byte
pub fn generate_with_transfer(
    params: &ScreenParams,
    transfer: Option<&[u8; 256]>,
) -> Result<GeneratedScreen> {
    let basis = solve(params)?;
    let mask = DotMask::build(&basis)?;
    let seq = TurnOnSequence::grow(&mask, params.dot_shape, params.aspect())?;

    let factor = expansion_factor(basis.area(), params.supercell_size);
    let seq = seq.replicate(&mask, factor)?;

    let report = ScreenReport {
        width: seq.width(),
        height: seq.height(),
        actual_angle: basis.actual_angle(params.hres, params.vres),
        actual_frequency: basis.actual_frequency(params.hres, params.vres),
        levels: seq.len() + 1,
    };

    let output = match params.output {
        OutputFormat::TosArray => ScreenOutput::tos(&seq),
        OutputFormat::ThreshString => {
            let thresh = ThresholdArray::synthesize(&seq, params.levels, transfer)?;
            ScreenOutput::thresh_string(&thresh)
        }
        OutputFormat::Type3 => {
            let thresh = ThresholdArray::synthesize(&seq, params.levels, transfer)?;
            ScreenOutput::type3(&thresh)
        }
    };

    Ok(GeneratedScreen { output, report })
}

/// Generate the threshold array for a parameter set, regardless of the
/// requested output encoding. Used by the dithering front end and the
/// PNG preview.
pub fn generate_thresholds(params: &ScreenParams) -> Result<ThresholdArray> {
    let basis = solve(params)?;
    let mask = DotMask::build(&basis)?;
    let seq = TurnOnSequence::grow(&mask, params.dot_shape, params.aspect())?;
    let factor = expansion_factor(basis.area(), params.supercell_size);
    let seq = seq.replicate(&mask, factor)?;
    ThresholdArray::synthesize(&seq, params.levels, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::{decode_thresh_string, decode_tos};
    use crate::error::ScreenError;
    use crate::params::{DotShape, Value};

    fn params(angle: f64, freq: f64) -> ScreenParams {
        ScreenParams {
            angle,
            frequency: freq,
            ..Default::default()
        }
    }

    #[test]
    fn test_pipeline_deterministic() {
        let mut p = params(15.0, 75.0);
        p.output = OutputFormat::ThreshString;
        let a = generate(&p).unwrap();
        for _ in 0..3 {
            let b = generate(&p).unwrap();
            assert_eq!(a.output, b.output);
            assert_eq!(a.report, b.report);
        }
    }

    #[test]
    fn test_thresh_string_contract() {
        // 0 deg / 150 lpi / 300 dpi: a 2x2 tile whose four thresholds are
        // all distinct.
        let mut p = params(0.0, 150.0);
        p.output = OutputFormat::ThreshString;
        let screen = generate(&p).unwrap();
        let ScreenOutput::ThreshString(blob) = screen.output else {
            panic!("wrong variant");
        };
        let (w, h, bytes) = decode_thresh_string(&blob).unwrap();
        assert_eq!((w, h), (2, 2));
        let mut sorted = bytes.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), 4);
    }

    #[test]
    fn test_tos_output_matches_report() {
        let mut p = params(45.0, 75.0);
        p.output = OutputFormat::TosArray;
        let screen = generate(&p).unwrap();
        let ScreenOutput::TosArray(data) = screen.output else {
            panic!("wrong variant");
        };
        let (w, h, points) = decode_tos(&data).unwrap();
        assert_eq!(u32::from(w), screen.report.width);
        assert_eq!(u32::from(h), screen.report.height);
        assert_eq!(points.len() + 1, screen.report.levels);
    }

    #[test]
    fn test_type3_output() {
        let p = params(0.0, 100.0);
        let screen = generate(&p).unwrap();
        let ScreenOutput::Type3(dict) = screen.output else {
            panic!("wrong variant");
        };
        assert_eq!(u32::from(dict.width), screen.report.width);
        assert_eq!(u32::from(dict.height), screen.report.height);
        assert_eq!(
            dict.thresholds.len(),
            screen.report.width as usize * screen.report.height as usize
        );
    }

    #[test]
    fn test_report_exact_geometry() {
        let screen = generate(&params(45.0, 75.0)).unwrap();
        assert_eq!(screen.report.actual_angle, 45.0);
        assert_eq!(screen.report.actual_frequency, 75.0);
    }

    #[test]
    fn test_levels_do_not_grow_the_tile() {
        // Levels only quantizes the gray ramp; the tile stays the size the
        // lattice dictates unless SuperCellSize forces expansion.
        let mut p = params(0.0, 150.0);
        p.levels = 256;
        let screen = generate(&p).unwrap();
        assert_eq!((screen.report.width, screen.report.height), (2, 2));
    }

    #[test]
    fn test_supercell_expands_tile() {
        let mut p = params(0.0, 150.0);
        p.supercell_size = 4;
        p.levels = 16;
        let screen = generate(&p).unwrap();
        assert_eq!((screen.report.width, screen.report.height), (4, 4));
        assert_eq!(screen.report.levels, 17);
    }

    #[test]
    fn test_invalid_entries_fail_up_front() {
        let p = ScreenParams::from_entries(&[("Frequency", Value::Real(0.0))]);
        assert!(matches!(p, Err(ScreenError::Range(_))));

        let p = ScreenParams::from_entries(&[("OutputType", Value::Name("Bogus".into()))]);
        assert!(matches!(p, Err(ScreenError::Undefined(_))));
    }

    #[test]
    fn test_shapes_share_geometry() {
        let mut p = params(15.0, 75.0);
        let round = generate(&p).unwrap();
        p.dot_shape = DotShape::Inverted;
        let inverted = generate(&p).unwrap();
        assert_eq!(round.report, inverted.report);
        assert_ne!(round.output, inverted.output);
    }
}
