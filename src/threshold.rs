/**
 * Threshold Array Synthesizer
 *
 * Converts a turn-on sequence into a per-cell threshold byte array. The
 * sweep walks 256 level buckets; a cell is assigned to the bucket whose
 * cumulative-area window contains its coverage value, and stores
 * 255 - level, so cells that turn on earlier activate at lighter grays
 * (higher stored threshold). Cells the sweep leaves behind are 0,
 * fully-on at minimum ink.
 *
 * Output is linear: no gamma correction is applied unless the caller
 * passes an explicit transfer curve.
 */

use crate::error::{Result, ScreenError};
use crate::mask::Grid;
use crate::sequence::TurnOnSequence;

/// Divisor of the bucket-boundary tolerance: the sweep admits a cell while
/// `coverage < end_value - delta_value / BUCKET_EPSILON_DIVISOR`.
///
/// Empirical constant carried from the original threshold remap; pinned,
/// not derived.
pub const BUCKET_EPSILON_DIVISOR: f64 = 256.0;

/// Per-cell threshold bytes for one tile, row-major `x + width * y`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThresholdArray {
    grid: Grid<u8>,
}

impl ThresholdArray {
    /// Run the 256-bucket sweep over a turn-on sequence.
    ///
    /// `levels` quantizes the gray ramp (clamped to 256 for byte output);
    /// `transfer` optionally remaps each assigned byte through a nonlinear
    /// gray-response curve.
    pub fn synthesize(
        seq: &TurnOnSequence,
        levels: u16,
        transfer: Option<&[u8; 256]>,
    ) -> Result<Self> {
        if seq.is_empty() {
            return Err(ScreenError::Range("empty turn-on sequence".into()));
        }
        let n = seq.len();
        let mut grid: Grid<u8> = Grid::new(seq.width(), seq.height())?;

        let delta_value = 1.0 / n as f64;
        let epsilon = delta_value / BUCKET_EPSILON_DIVISOR;
        let level_count = u32::from(levels).min(256);

        let mut cur = 0usize;
        for level in 0..256u32 {
            let end_value = ((1 + level) as f64 / 255.0).min(255.0);
            while cur < n && seq.coverage(cur) < end_value - epsilon {
                let (x, y) = seq.points()[cur];
                let mut byte = quantized_byte(level, level_count);
                if let Some(curve) = transfer {
                    byte = curve[byte as usize];
                }
                grid.set(x as u32, y as u32, byte);
                cur += 1;
            }
            if cur >= n {
                break;
            }
        }
        // Cells missed by the sweep keep their cleared value: threshold 0.

        Ok(Self { grid })
    }

    /// Tile width
    pub fn width(&self) -> u32 {
        self.grid.width()
    }

    /// Tile height
    pub fn height(&self) -> u32 {
        self.grid.height()
    }

    /// Threshold at a cell
    pub fn get(&self, x: u32, y: u32) -> u8 {
        *self.grid.get(x, y)
    }

    /// Row-major threshold bytes
    pub fn as_slice(&self) -> &[u8] {
        self.grid.as_slice()
    }

    /// Consume into the row-major byte buffer
    pub fn into_vec(self) -> Vec<u8> {
        self.grid.into_vec()
    }
}

/// Store 255 - level, with the level first quantized onto the requested
/// gray ramp
fn quantized_byte(level: u32, level_count: u32) -> u8 {
    if level_count <= 1 {
        return 255;
    }
    let q = level * level_count / 256;
    (255 - q * 255 / (level_count - 1)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::solve;
    use crate::mask::DotMask;
    use crate::params::{DotShape, ScreenParams};

    fn sequence_for(angle: f64, freq: f64, res: f64) -> TurnOnSequence {
        let basis = solve(&ScreenParams {
            angle,
            frequency: freq,
            hres: res,
            vres: res,
            ..Default::default()
        })
        .unwrap();
        let mask = DotMask::build(&basis).unwrap();
        TurnOnSequence::grow(&mask, DotShape::Round, 1.0).unwrap()
    }

    #[test]
    fn test_four_cell_thresholds() {
        let seq = sequence_for(0.0, 150.0, 300.0);
        let thresh = ThresholdArray::synthesize(&seq, 256, None).unwrap();
        // Sequence is (1,1), (1,0), (0,1), (0,0): each cell lands in its
        // own bucket.
        assert_eq!(thresh.get(1, 1), 255);
        assert_eq!(thresh.get(1, 0), 192);
        assert_eq!(thresh.get(0, 1), 128);
        assert_eq!(thresh.get(0, 0), 64);
    }

    #[test]
    fn test_monotonic_with_turn_on_order() {
        let seq = sequence_for(45.0, 75.0, 300.0);
        let thresh = ThresholdArray::synthesize(&seq, 256, None).unwrap();
        let mut prev = u16::from(u8::MAX) + 1;
        for &(x, y) in seq.points() {
            let t = u16::from(thresh.get(x as u32, y as u32));
            assert!(t <= prev, "threshold rises along the sequence");
            prev = t;
        }
    }

    #[test]
    fn test_distinct_levels_when_cells_are_few() {
        let seq = sequence_for(0.0, 150.0, 300.0);
        let thresh = ThresholdArray::synthesize(&seq, 256, None).unwrap();
        let mut bytes: Vec<u8> = thresh.as_slice().to_vec();
        bytes.sort_unstable_by(|a, b| b.cmp(a));
        for pair in bytes.windows(2) {
            assert!(pair[0] > pair[1]);
        }
    }

    #[test]
    fn test_midpoint_cell_gets_midpoint_gray() {
        // Odd tile: the forced 0.5 coverage must land at mid gray.
        let seq = sequence_for(0.0, 100.0, 300.0);
        assert_eq!(seq.len(), 9);
        let thresh = ThresholdArray::synthesize(&seq, 256, None).unwrap();
        let (x, y) = seq.points()[4];
        assert_eq!(thresh.get(x as u32, y as u32), 128);
    }

    #[test]
    fn test_bilevel_quantization() {
        let seq = sequence_for(0.0, 100.0, 300.0);
        let thresh = ThresholdArray::synthesize(&seq, 2, None).unwrap();
        let light = thresh.as_slice().iter().filter(|&&b| b == 255).count();
        let dark = thresh.as_slice().iter().filter(|&&b| b == 0).count();
        assert_eq!(light + dark, 9);
        assert_eq!(light, 5);
    }

    #[test]
    fn test_transfer_curve_remaps() {
        let seq = sequence_for(0.0, 150.0, 300.0);
        let mut inverting = [0u8; 256];
        for (i, v) in inverting.iter_mut().enumerate() {
            *v = 255 - i as u8;
        }
        let plain = ThresholdArray::synthesize(&seq, 256, None).unwrap();
        let mapped = ThresholdArray::synthesize(&seq, 256, Some(&inverting)).unwrap();
        for (p, m) in plain.as_slice().iter().zip(mapped.as_slice()) {
            assert_eq!(*m, 255 - *p);
        }
    }

    #[test]
    fn test_epsilon_constant_pinned() {
        // The tolerance is delta/256: an empirical constant from the
        // original remap loop. Pin it; do not re-derive it.
        assert_eq!(BUCKET_EPSILON_DIVISOR, 256.0);
    }

    #[test]
    fn test_deterministic() {
        let seq = sequence_for(15.0, 75.0, 300.0);
        let a = ThresholdArray::synthesize(&seq, 256, None).unwrap();
        let b = ThresholdArray::synthesize(&seq, 256, None).unwrap();
        assert_eq!(a.as_slice(), b.as_slice());
    }
}
