/**
 * Output Encoder
 *
 * Serializes a generated screen into one of three external forms. The
 * format name is resolved once at the boundary into a tagged variant; the
 * synthesis pipeline never branches on it.
 *
 *   TOSArray      [width, height, x0, y0, x1, y1, ...] integers,
 *                 length 2 + 2 * width * height
 *   ThreshString  raw blob: width and height as big-endian u16 pairs,
 *                 then width * height threshold bytes row-major
 *   Type3         structured halftone dictionary: Thresholds string,
 *                 Width, Height, HalftoneType = 3
 */

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, ScreenError};
use crate::sequence::TurnOnSequence;
use crate::threshold::ThresholdArray;

/// Requested output encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Turn-on coordinate array
    TosArray,
    /// Raw threshold blob with a 4-byte dimension header
    ThreshString,
    /// Self-describing HalftoneType 3 dictionary
    Type3,
}

impl FromStr for OutputFormat {
    type Err = ScreenError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "TOSArray" => Ok(OutputFormat::TosArray),
            "ThreshString" => Ok(OutputFormat::ThreshString),
            "Type3" => Ok(OutputFormat::Type3),
            _ => Err(ScreenError::Undefined(format!("output type {s:?}"))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::TosArray => "TOSArray",
            OutputFormat::ThreshString => "ThreshString",
            OutputFormat::Type3 => "Type3",
        })
    }
}

/// A HalftoneType 3 threshold dictionary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Type3Halftone {
    /// Tile width
    pub width: u16,
    /// Tile height
    pub height: u16,
    /// Row-major threshold bytes, `width * height` of them
    pub thresholds: Vec<u8>,
}

impl Type3Halftone {
    /// Dictionary tag for threshold-array halftones
    pub const HALFTONE_TYPE: u8 = 3;

    /// Render the dictionary as PostScript source suitable for
    /// `sethalftone`
    pub fn to_postscript(&self) -> String {
        let mut out = String::with_capacity(self.thresholds.len() * 2 + 128);
        out.push_str("<<\n  /HalftoneType 3\n");
        out.push_str(&format!("  /Width {}\n  /Height {}\n", self.width, self.height));
        out.push_str("  /Thresholds <\n");
        for chunk in self.thresholds.chunks(32) {
            out.push_str("    ");
            for byte in chunk {
                out.push_str(&format!("{byte:02X}"));
            }
            out.push('\n');
        }
        out.push_str("  >\n>>\n");
        out
    }
}

/// One encoded screen, tagged by its external form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenOutput {
    /// `[width, height, x0, y0, ...]`
    TosArray(Vec<i32>),
    /// Raw header-plus-thresholds blob
    ThreshString(Vec<u8>),
    /// Structured threshold dictionary
    Type3(Type3Halftone),
}

impl ScreenOutput {
    /// Encode the turn-on sequence as a coordinate array
    pub fn tos(seq: &TurnOnSequence) -> Self {
        let mut data = Vec::with_capacity(2 + 2 * seq.len());
        data.push(seq.width() as i32);
        data.push(seq.height() as i32);
        for &(x, y) in seq.points() {
            data.push(i32::from(x));
            data.push(i32::from(y));
        }
        ScreenOutput::TosArray(data)
    }

    /// Encode thresholds as the raw big-endian-header blob
    pub fn thresh_string(thresh: &ThresholdArray) -> Self {
        let (w, h) = (thresh.width() as u16, thresh.height() as u16);
        let mut data = Vec::with_capacity(4 + thresh.as_slice().len());
        data.extend_from_slice(&w.to_be_bytes());
        data.extend_from_slice(&h.to_be_bytes());
        data.extend_from_slice(thresh.as_slice());
        ScreenOutput::ThreshString(data)
    }

    /// Encode thresholds as a HalftoneType 3 dictionary
    pub fn type3(thresh: &ThresholdArray) -> Self {
        ScreenOutput::Type3(Type3Halftone {
            width: thresh.width() as u16,
            height: thresh.height() as u16,
            thresholds: thresh.as_slice().to_vec(),
        })
    }
}

/// Decode a TOSArray back into its (width, height, sequence) triple
pub fn decode_tos(data: &[i32]) -> Result<(u16, u16, Vec<(u16, u16)>)> {
    if data.len() < 2 {
        return Err(ScreenError::Type("TOSArray shorter than its header".into()));
    }
    let (w, h) = (data[0], data[1]);
    if !(1..=0xFFFF).contains(&w) || !(1..=0xFFFF).contains(&h) {
        return Err(ScreenError::Range(format!("TOSArray dimensions {w}x{h}")));
    }
    let n = w as usize * h as usize;
    if data.len() != 2 + 2 * n {
        return Err(ScreenError::Type(format!(
            "TOSArray length {} for a {w}x{h} tile",
            data.len()
        )));
    }
    let mut points = Vec::with_capacity(n);
    for pair in data[2..].chunks_exact(2) {
        let (x, y) = (pair[0], pair[1]);
        if x < 0 || x >= w || y < 0 || y >= h {
            return Err(ScreenError::Range(format!("TOSArray entry ({x}, {y})")));
        }
        points.push((x as u16, y as u16));
    }
    Ok((w as u16, h as u16, points))
}

/// Decode a raw ThreshString blob into (width, height, thresholds)
pub fn decode_thresh_string(data: &[u8]) -> Result<(u16, u16, Vec<u8>)> {
    if data.len() < 4 {
        return Err(ScreenError::Type("ThreshString shorter than its header".into()));
    }
    let w = u16::from_be_bytes([data[0], data[1]]);
    let h = u16::from_be_bytes([data[2], data[3]]);
    let n = w as usize * h as usize;
    if n == 0 {
        return Err(ScreenError::Range(format!("ThreshString dimensions {w}x{h}")));
    }
    if data.len() != 4 + n {
        return Err(ScreenError::Type(format!(
            "ThreshString length {} for a {w}x{h} tile",
            data.len()
        )));
    }
    Ok((w, h, data[4..].to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::solve;
    use crate::mask::DotMask;
    use crate::params::{DotShape, ScreenParams};

    fn seq_and_thresh(angle: f64, freq: f64) -> (TurnOnSequence, ThresholdArray) {
        let basis = solve(&ScreenParams {
            angle,
            frequency: freq,
            ..Default::default()
        })
        .unwrap();
        let mask = DotMask::build(&basis).unwrap();
        let seq = TurnOnSequence::grow(&mask, DotShape::Round, 1.0).unwrap();
        let thresh = ThresholdArray::synthesize(&seq, 256, None).unwrap();
        (seq, thresh)
    }

    #[test]
    fn test_format_names() {
        assert_eq!("TOSArray".parse::<OutputFormat>().unwrap(), OutputFormat::TosArray);
        assert_eq!("Type3".parse::<OutputFormat>().unwrap(), OutputFormat::Type3);
        assert_eq!(
            "ThreshString".parse::<OutputFormat>().unwrap(),
            OutputFormat::ThreshString
        );
        assert!(matches!(
            "Bogus".parse::<OutputFormat>(),
            Err(ScreenError::Undefined(_))
        ));
        assert_eq!(OutputFormat::TosArray.to_string(), "TOSArray");
    }

    #[test]
    fn test_tos_round_trip() {
        let (seq, _) = seq_and_thresh(45.0, 75.0);
        let ScreenOutput::TosArray(data) = ScreenOutput::tos(&seq) else {
            panic!("wrong variant");
        };
        assert_eq!(data.len(), 2 + 2 * seq.len());
        let (w, h, points) = decode_tos(&data).unwrap();
        assert_eq!(u32::from(w), seq.width());
        assert_eq!(u32::from(h), seq.height());
        assert_eq!(points, seq.points());
    }

    #[test]
    fn test_thresh_string_header() {
        let (_, thresh) = seq_and_thresh(0.0, 150.0);
        let ScreenOutput::ThreshString(blob) = ScreenOutput::thresh_string(&thresh) else {
            panic!("wrong variant");
        };
        assert_eq!(&blob[..4], &[0, 2, 0, 2]);
        assert_eq!(blob.len(), 4 + 4);
        let (w, h, bytes) = decode_thresh_string(&blob).unwrap();
        assert_eq!((w, h), (2, 2));
        assert_eq!(bytes, thresh.as_slice());
    }

    #[test]
    fn test_type3_dictionary() {
        let (_, thresh) = seq_and_thresh(0.0, 150.0);
        let ScreenOutput::Type3(dict) = ScreenOutput::type3(&thresh) else {
            panic!("wrong variant");
        };
        assert_eq!(dict.width, 2);
        assert_eq!(dict.height, 2);
        assert_eq!(dict.thresholds.len(), 4);
        assert_eq!(Type3Halftone::HALFTONE_TYPE, 3);

        let ps = dict.to_postscript();
        assert!(ps.contains("/HalftoneType 3"));
        assert!(ps.contains("/Width 2"));
        assert!(ps.contains("/Height 2"));
        assert!(ps.contains("/Thresholds <"));
    }

    #[test]
    fn test_decode_rejects_malformed() {
        assert!(matches!(decode_tos(&[2]), Err(ScreenError::Type(_))));
        assert!(matches!(decode_tos(&[0, 2, 0, 0]), Err(ScreenError::Range(_))));
        assert!(matches!(
            decode_tos(&[2, 2, 0, 0]),
            Err(ScreenError::Type(_))
        ));
        assert!(matches!(
            decode_tos(&[1, 1, 5, 0]),
            Err(ScreenError::Range(_))
        ));
        assert!(matches!(
            decode_thresh_string(&[0, 1]),
            Err(ScreenError::Type(_))
        ));
        assert!(matches!(
            decode_thresh_string(&[0, 1, 0, 1, 9, 9]),
            Err(ScreenError::Type(_))
        ));
    }
}
